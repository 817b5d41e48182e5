use crate::coord::Coord;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    Empty,
    Trail,
    Wall,
    Filled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Board {
    columns: i32,
    rows: i32,
    cells: Vec<Vec<CellStatus>>,
    total_fillable: usize,
    filled: usize,
}

impl Board {
    fn index(&self, coord: Coord) -> Result<(usize, usize)> {
        if coord.x < 0 || coord.y < 0 || coord.x >= self.columns || coord.y >= self.rows {
            return Err(EngineError::OutOfBounds {
                coord,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok((coord.x as usize, coord.y as usize))
    }
}

/// Authoritative per-cell status for the live level.
///
/// `None` inside means no level is loaded: every query fails with
/// [`EngineError::NotInitialized`] until the next [`GridState::initialize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridState {
    board: Option<Board>,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a `columns` x `rows` grid with Wall at each of `walls` and
    /// Empty everywhere else. On error the grid is left uninitialized.
    pub fn initialize(&mut self, columns: i32, rows: i32, walls: &[Coord]) -> Result<()> {
        self.board = None;

        if columns <= 0 || rows <= 0 {
            return Err(EngineError::InvalidDimension { columns, rows });
        }

        let mut board = Board {
            columns,
            rows,
            cells: vec![vec![CellStatus::Empty; columns as usize]; rows as usize],
            total_fillable: 0,
            filled: 0,
        };

        let mut wall_count = 0usize;
        for &wall in walls {
            let (x, y) = board.index(wall)?;
            if board.cells[y][x] == CellStatus::Wall {
                // Repeated obstacle coordinates count once.
                log::debug!("duplicate wall at {wall} ignored");
                continue;
            }
            board.cells[y][x] = CellStatus::Wall;
            wall_count += 1;
        }

        board.total_fillable = (columns as usize) * (rows as usize) - wall_count;
        log::debug!(
            "grid {}x{} initialized: {} walls, {} fillable",
            columns,
            rows,
            wall_count,
            board.total_fillable
        );
        self.board = Some(board);
        Ok(())
    }

    /// Release the grid. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.board = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.board.is_some()
    }

    fn board(&self) -> Result<&Board> {
        self.board.as_ref().ok_or(EngineError::NotInitialized)
    }

    fn board_mut(&mut self) -> Result<&mut Board> {
        self.board.as_mut().ok_or(EngineError::NotInitialized)
    }

    pub fn columns(&self) -> Result<i32> {
        Ok(self.board()?.columns)
    }

    pub fn rows(&self) -> Result<i32> {
        Ok(self.board()?.rows)
    }

    /// Whether `coord` lies on the live grid. `false` when uninitialized.
    pub fn contains(&self, coord: Coord) -> bool {
        self.board
            .as_ref()
            .map_or(false, |board| board.index(coord).is_ok())
    }

    pub fn status(&self, coord: Coord) -> Result<CellStatus> {
        let board = self.board()?;
        let (x, y) = board.index(coord)?;
        Ok(board.cells[y][x])
    }

    pub fn is_empty(&self, coord: Coord) -> Result<bool> {
        Ok(self.status(coord)? == CellStatus::Empty)
    }

    pub fn is_filled(&self, coord: Coord) -> Result<bool> {
        Ok(self.status(coord)? == CellStatus::Filled)
    }

    /// Change a cell's status.
    ///
    /// Walls never change and nothing becomes a Wall after `initialize`.
    /// Filled is terminal: re-filling is a no-op, anything else is rejected.
    pub fn set_status(&mut self, coord: Coord, status: CellStatus) -> Result<()> {
        let board = self.board_mut()?;
        let (x, y) = board.index(coord)?;
        let current = board.cells[y][x];

        match (current, status) {
            (CellStatus::Wall, _) | (_, CellStatus::Wall) => {
                return Err(EngineError::WallImmutable(coord));
            }
            (CellStatus::Filled, CellStatus::Filled) => return Ok(()),
            (CellStatus::Filled, _) => return Err(EngineError::FilledImmutable(coord)),
            (_, CellStatus::Filled) => board.filled += 1,
            _ => {}
        }

        board.cells[y][x] = status;
        Ok(())
    }

    /// Number of Filled cells, maintained incrementally.
    pub fn filled_count(&self) -> Result<usize> {
        Ok(self.board()?.filled)
    }

    /// `columns * rows` minus distinct walls.
    pub fn total_fillable(&self) -> Result<usize> {
        Ok(self.board()?.total_fillable)
    }

    pub fn is_level_complete(&self) -> Result<bool> {
        let board = self.board()?;
        Ok(board.filled == board.total_fillable)
    }

    /// Cells currently Empty. Trail cells of an uncommitted trail are not counted.
    pub fn empty_count(&self) -> Result<usize> {
        let board = self.board()?;
        Ok(board
            .cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == CellStatus::Empty)
            .count())
    }

    /// Row-major snapshot of every cell, for renderers.
    pub fn cells(&self) -> Result<impl Iterator<Item = (Coord, CellStatus)> + '_> {
        let board = self.board()?;
        Ok(board.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &cell)| (Coord::new(x as i32, y as i32), cell))
        }))
    }
}
