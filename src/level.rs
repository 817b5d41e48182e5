//! Level settings and the level database.
//!
//! ## File format (`levels.toml`):
//!   ```toml
//!   [[level]]
//!   name = "Pillars"
//!   columns = 11
//!   rows = 11
//!   obstacles = [[3, 3], [7, 7]]
//!   start = [0, 0]
//!
//!   [[level.enemies]]
//!   position = [5, 5]
//!   axis = "horizontal"   # or "vertical", "still"
//!   distance = 3
//!   period = 2
//!   ```
//!
//! Everything but `columns` and `rows` is optional.

use serde::Deserialize;
use std::path::Path;

use crate::coord::Coord;
use crate::enemy::{EnemySettings, MovementAxis};
use crate::error::{EngineError, Result};
use crate::grid::GridState;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LevelSettings {
    #[serde(default = "default_name")]
    pub name: String,
    pub columns: i32,
    pub rows: i32,
    #[serde(default)]
    pub obstacles: Vec<[i32; 2]>,
    #[serde(default)]
    pub start: [i32; 2],
    #[serde(default)]
    pub enemies: Vec<EnemySettings>,
}

fn default_name() -> String {
    "Untitled".into()
}

impl LevelSettings {
    pub fn new(name: &str, columns: i32, rows: i32, obstacles: &[(i32, i32)]) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
            obstacles: obstacles.iter().map(|&(x, y)| [x, y]).collect(),
            start: [0, 0],
            enemies: Vec::new(),
        }
    }

    pub fn obstacle_coords(&self) -> Vec<Coord> {
        self.obstacles.iter().map(|&[x, y]| Coord::new(x, y)).collect()
    }

    pub fn start_coord(&self) -> Coord {
        Coord::new(self.start[0], self.start[1])
    }

    pub fn is_obstacle(&self, coord: Coord) -> bool {
        self.obstacles.contains(&[coord.x, coord.y])
    }

    /// Same checks as loading the level into a grid, plus the token start
    /// and every enemy spawn must be open cells on the grid.
    pub fn validate(&self) -> Result<()> {
        let mut grid = GridState::new();
        grid.initialize(self.columns, self.rows, &self.obstacle_coords())?;

        let spawns = std::iter::once(self.start_coord())
            .chain(self.enemies.iter().map(EnemySettings::spawn));
        for spawn in spawns {
            if !grid.contains(spawn) {
                return Err(EngineError::OutOfBounds {
                    coord: spawn,
                    columns: self.columns,
                    rows: self.rows,
                });
            }
            if self.is_obstacle(spawn) {
                return Err(EngineError::BlockedSpawn(spawn));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Default)]
struct TomlLevels {
    #[serde(default, rename = "level")]
    levels: Vec<LevelSettings>,
}

/// Ordered, never-empty list of levels.
#[derive(Debug, Clone)]
pub struct LevelDatabase {
    levels: Vec<LevelSettings>,
}

impl LevelDatabase {
    /// Invalid levels are dropped; an empty result falls back to the
    /// built-in set.
    pub fn new(levels: Vec<LevelSettings>) -> Self {
        let levels: Vec<LevelSettings> = levels
            .into_iter()
            .filter(|level| match level.validate() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("skipping level '{}': {e}", level.name);
                    false
                }
            })
            .collect();

        if levels.is_empty() {
            log::warn!("no usable levels, using built-in set");
            return Self::builtin();
        }
        Self { levels }
    }

    pub fn builtin() -> Self {
        let mut pillars = LevelSettings::new(
            "Pillars",
            11,
            11,
            &[(3, 3), (7, 3), (3, 7), (7, 7)],
        );
        pillars.start = [5, 0];
        pillars.enemies = vec![EnemySettings::new(5, 5, MovementAxis::Horizontal, 3)];

        let mut corridor = LevelSettings::new(
            "Corridor",
            15,
            9,
            &[(7, 2), (7, 3), (7, 4), (7, 5), (7, 6)],
        );
        corridor.start = [0, 4];
        corridor.enemies = vec![
            EnemySettings::new(3, 4, MovementAxis::Vertical, 3),
            EnemySettings::new(11, 4, MovementAxis::Vertical, 3),
        ];

        Self {
            levels: vec![LevelSettings::new("Open field", 11, 11, &[]), pillars, corridor],
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let parsed: TomlLevels = toml::from_str(text)?;
        Ok(Self::new(parsed.levels))
    }

    /// Read a level file, falling back to the built-in set on any failure.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_toml_str(&text) {
                Ok(db) => {
                    log::info!("loaded {} levels from {}", db.len(), path.display());
                    db
                }
                Err(e) => {
                    log::warn!("{}: {e}; using built-in levels", path.display());
                    Self::builtin()
                }
            },
            Err(_) => Self::builtin(),
        }
    }

    /// Level `index`, wrapping around past the last one.
    pub fn level(&self, index: usize) -> &LevelSettings {
        &self.levels[index % self.levels.len()]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
