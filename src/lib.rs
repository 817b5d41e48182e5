pub mod coord;
pub mod error;
pub mod grid;
pub mod pool;
pub mod path;
pub mod flood;
pub mod resolver;
pub mod session;
pub mod level;
pub mod config;
pub mod runner;
pub mod enemy;
pub mod game;
pub mod renderer;
pub mod cli_renderer;

pub use coord::{Coord, Direction};
pub use error::{EngineError, Result};
pub use grid::{CellStatus, GridState};
pub use pool::{CellPool, CubeHandle, HandleId};
pub use path::{PathTracker, TrailEntry};
pub use flood::{flood_fill, Region};
pub use resolver::{FillResolver, Resolution, Side, SplitOutcome};
pub use session::{LevelComplete, LevelState, Session};
pub use level::{LevelDatabase, LevelSettings};
pub use config::EngineConfig;
pub use runner::{RunState, Runner};
pub use enemy::{Contact, Enemy, EnemySettings, MovementAxis};
pub use game::{Game, GameState};
pub use renderer::{Renderer, Input};
pub use cli_renderer::CliRenderer;
