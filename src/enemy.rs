use serde::Deserialize;

use crate::coord::{Coord, Direction};
use crate::error::Result;
use crate::grid::{CellStatus, GridState};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MovementAxis {
    #[default]
    Still,
    Horizontal,
    Vertical,
}

/// An enemy as written in a level file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EnemySettings {
    pub position: [i32; 2],
    #[serde(default)]
    pub axis: MovementAxis,
    /// Cells travelled each way from the spawn point.
    #[serde(default)]
    pub distance: i32,
    /// Game ticks per step. 1 keeps pace with the token.
    #[serde(default = "default_period")]
    pub period: u32,
}

fn default_period() -> u32 {
    2
}

impl EnemySettings {
    pub fn new(x: i32, y: i32, axis: MovementAxis, distance: i32) -> Self {
        Self {
            position: [x, y],
            axis,
            distance,
            period: default_period(),
        }
    }

    pub fn spawn(&self) -> Coord {
        Coord::new(self.position[0], self.position[1])
    }
}

/// What an enemy ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Runner,
    Trail,
}

/// A patrolling enemy. Walks back and forth along one axis and dies when
/// it ends up inside claimed territory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub position: Coord,
    pub active: bool,
    axis: MovementAxis,
    min: i32,
    max: i32,
    forward: bool,
    period: u32,
    wait: u32,
}

impl Enemy {
    pub fn new(settings: &EnemySettings) -> Self {
        let spawn = settings.spawn();
        let centre = match settings.axis {
            MovementAxis::Vertical => spawn.y,
            _ => spawn.x,
        };
        let reach = settings.distance.max(0);
        let period = settings.period.max(1);
        Self {
            position: spawn,
            active: true,
            axis: settings.axis,
            min: centre - reach,
            max: centre + reach,
            forward: true,
            period,
            wait: period,
        }
    }

    fn heading(&self) -> Option<Direction> {
        match (self.axis, self.forward) {
            (MovementAxis::Still, _) => None,
            (MovementAxis::Horizontal, true) => Some(Direction::Right),
            (MovementAxis::Horizontal, false) => Some(Direction::Left),
            (MovementAxis::Vertical, true) => Some(Direction::Down),
            (MovementAxis::Vertical, false) => Some(Direction::Up),
        }
    }

    fn along(&self, coord: Coord) -> i32 {
        match self.axis {
            MovementAxis::Vertical => coord.y,
            _ => coord.x,
        }
    }

    fn can_enter(&self, grid: &GridState, next: Coord) -> Result<bool> {
        let along = self.along(next);
        if along < self.min || along > self.max || !grid.contains(next) {
            return Ok(false);
        }
        Ok(grid.status(next)? != CellStatus::Wall)
    }

    /// Step once every `period` ticks. Turns around at the patrol ends, at
    /// walls and at the border; stays put if boxed in both ways.
    pub fn advance(&mut self, grid: &GridState) -> Result<()> {
        if !self.active || self.axis == MovementAxis::Still {
            return Ok(());
        }
        self.wait = self.wait.saturating_sub(1);
        if self.wait > 0 {
            return Ok(());
        }
        self.wait = self.period;

        for _ in 0..2 {
            let Some(heading) = self.heading() else {
                return Ok(());
            };
            let next = self.position.moved(heading);
            if self.can_enter(grid, next)? {
                self.position = next;
                return Ok(());
            }
            self.forward = !self.forward;
        }
        Ok(())
    }

    /// Filled ground destroys the enemy first; otherwise sharing a cell with
    /// the token or a trail cell is a contact.
    pub fn check(&mut self, grid: &GridState, runner: Coord) -> Result<Option<Contact>> {
        if !self.active {
            return Ok(None);
        }
        match grid.status(self.position)? {
            CellStatus::Filled => {
                log::info!("enemy destroyed at {}", self.position);
                self.active = false;
                Ok(None)
            }
            _ if self.position == runner => Ok(Some(Contact::Runner)),
            CellStatus::Trail => Ok(Some(Contact::Trail)),
            _ => Ok(None),
        }
    }
}
