use crate::coord::{Coord, Direction};
use crate::error::Result;
use crate::grid::CellStatus;
use crate::session::{LevelComplete, LevelState, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Moving,
    Crashed,
}

/// The moving token. Slides one cell per tick in its heading. It stops at
/// the border or a wall, and at claimed territory only while drawing.
#[derive(Debug, Clone)]
pub struct Runner {
    pub position: Coord,
    pub heading: Option<Direction>,
    pub state: RunState,
}

impl Runner {
    pub fn new(start: Coord) -> Self {
        Self {
            position: start,
            heading: None,
            state: RunState::Idle,
        }
    }

    /// Turn towards `direction`. A token resting on an Empty cell starts its
    /// trail there.
    pub fn steer(&mut self, direction: Direction, session: &mut Session) -> Result<()> {
        if self.state == RunState::Crashed || session.state() != LevelState::Playing {
            return Ok(());
        }
        // Can't reverse onto the trail being drawn
        if session.is_drawing() && self.heading == Some(direction.opposite()) {
            return Ok(());
        }

        self.heading = Some(direction);
        self.state = RunState::Moving;

        if session.is_tile_empty(self.position)? {
            session.on_cell_entered(self.position, direction)?;
        }
        Ok(())
    }

    /// Advance one cell.
    pub fn tick(&mut self, session: &mut Session) -> Result<Option<LevelComplete>> {
        if self.state != RunState::Moving || session.state() != LevelState::Playing {
            return Ok(None);
        }
        let Some(heading) = self.heading else {
            return Ok(None);
        };

        let next = self.position.moved(heading);
        if !session.grid().contains(next) {
            return self.halt(session);
        }

        match session.grid().status(next)? {
            CellStatus::Wall => self.halt(session),
            CellStatus::Filled => {
                self.position = next;
                if session.is_drawing() {
                    return self.halt(session);
                }
                Ok(None)
            }
            CellStatus::Empty => {
                self.position = next;
                session.on_cell_entered(next, heading)?;
                Ok(None)
            }
            CellStatus::Trail => {
                // Hit own trail. The board stays as it is until the level
                // is restarted.
                log::info!("runner crossed its own trail at {next}");
                self.position = next;
                self.state = RunState::Crashed;
                self.heading = None;
                Ok(None)
            }
        }
    }

    fn halt(&mut self, session: &mut Session) -> Result<Option<LevelComplete>> {
        self.state = RunState::Idle;
        self.heading = None;
        session.on_loop_closed()
    }
}
