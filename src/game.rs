use std::time::Instant;

use crate::config::EngineConfig;
use crate::coord::Direction;
use crate::enemy::Enemy;
use crate::error::Result;
use crate::level::{LevelDatabase, LevelSettings};
use crate::runner::{RunState, Runner};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// Session controller: owns the level list, the claim session, the token and
/// the enemies, and turns player input and ticks into core calls.
///
/// On `Lost` the board is left as it was so it can still be drawn; the
/// session is only aborted when the level is restarted.
pub struct Game {
    pub session: Session,
    pub runner: Runner,
    pub enemies: Vec<Enemy>,
    pub levels: LevelDatabase,
    pub level_index: usize,
    pub state: GameState,
    /// When the latest claim happened, for the cosmetic lift.
    pub claimed_at: Option<Instant>,
}

impl Game {
    pub fn new(config: &EngineConfig, levels: LevelDatabase) -> Result<Self> {
        let start = levels.level(0).start_coord();
        let mut game = Self {
            session: Session::from_config(config),
            runner: Runner::new(start),
            enemies: Vec::new(),
            levels,
            level_index: 0,
            state: GameState::Playing,
            claimed_at: None,
        };
        game.start_level()?;
        Ok(game)
    }

    fn start_level(&mut self) -> Result<()> {
        let level = self.levels.level(self.level_index).clone();
        self.session.load_level(&level)?;
        self.runner = Runner::new(level.start_coord());
        self.enemies = level.enemies.iter().map(Enemy::new).collect();
        self.state = GameState::Playing;
        self.claimed_at = None;
        Ok(())
    }

    pub fn level(&self) -> &LevelSettings {
        self.levels.level(self.level_index)
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.state != GameState::Playing {
            return Ok(());
        }
        self.runner.steer(direction, &mut self.session)
    }

    pub fn update(&mut self) -> Result<()> {
        if self.state != GameState::Playing {
            return Ok(());
        }

        let resolved_before = self.session.resolutions();
        let signal = self.runner.tick(&mut self.session)?;

        if self.runner.state == RunState::Crashed {
            self.state = GameState::Lost;
            return Ok(());
        }
        if self.session.resolutions() != resolved_before {
            self.claimed_at = Some(Instant::now());
        }
        if signal.is_some() {
            self.state = GameState::Won;
            return Ok(());
        }

        self.update_enemies()
    }

    fn update_enemies(&mut self) -> Result<()> {
        let grid = self.session.grid();
        let runner = self.runner.position;

        for enemy in &mut self.enemies {
            let mut contact = enemy.check(grid, runner)?;
            if contact.is_none() {
                enemy.advance(grid)?;
                contact = enemy.check(grid, runner)?;
            }
            if let Some(contact) = contact {
                log::info!("enemy at {} hit the {:?}", enemy.position, contact);
                self.state = GameState::Lost;
                return Ok(());
            }
        }
        Ok(())
    }

    pub fn active_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.active)
    }

    pub fn next_level(&mut self) -> Result<()> {
        if self.state != GameState::Won {
            return Ok(());
        }
        self.level_index = (self.level_index + 1) % self.levels.len();
        self.start_level()
    }

    /// Restart the current level.
    pub fn reset(&mut self) -> Result<()> {
        self.session.abort();
        self.start_level()
    }

    /// Claimed share of the level, 1.0 once won.
    pub fn filled_ratio(&self) -> f32 {
        if self.state == GameState::Won {
            return 1.0;
        }
        let grid = self.session.grid();
        match (grid.filled_count(), grid.total_fillable()) {
            (Ok(filled), Ok(total)) if total > 0 => filled as f32 / total as f32,
            _ => 0.0,
        }
    }
}
