use crate::coord::Coord;
use crate::pool::HandleId;

/// Errors raised by the claim engine.
///
/// None of these are player-facing: they indicate an integration bug between
/// a collaborator (movement, level loading) and the core.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Grid dimensions must both be positive
    #[error("invalid grid dimensions {columns}x{rows}")]
    InvalidDimension { columns: i32, rows: i32 },

    /// Coordinate outside `[0, columns) x [0, rows)`
    #[error("coordinate {coord} outside {columns}x{rows} grid")]
    OutOfBounds { coord: Coord, columns: i32, rows: i32 },

    /// Grid used before `initialize` or after `reset`
    #[error("grid is not initialized")]
    NotInitialized,

    #[error("wall at {0} cannot change status")]
    WallImmutable(Coord),

    #[error("filled cell at {0} cannot change status")]
    FilledImmutable(Coord),

    /// Level start or enemy spawn placed on a wall
    #[error("spawn point {0} is on a wall")]
    BlockedSpawn(Coord),

    #[error("unknown pool handle {0:?}")]
    UnknownHandle(HandleId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

impl EngineError {
    /// Errors caused by a collaborator handing the core bad input.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            EngineError::OutOfBounds { .. } | EngineError::NotInitialized
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
