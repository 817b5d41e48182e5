use crate::config::EngineConfig;
use crate::coord::{Coord, Direction};
use crate::error::{EngineError, Result};
use crate::grid::{CellStatus, GridState};
use crate::level::LevelSettings;
use crate::path::{PathTracker, TrailEntry};
use crate::pool::CellPool;
use crate::resolver::{FillResolver, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    Uninitialized,
    Playing,
    Completed,
}

/// Emitted once when the last fillable cell of a level is claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelComplete {
    /// Levels completed by this session, this one included.
    pub levels_completed: u32,
    /// Fillable cells the level had.
    pub filled: usize,
}

/// One level's worth of claim state, owned by whoever drives the game.
///
/// Movement and collision collaborators talk to the core only through
/// this type: `on_cell_entered` for each crossing into a cell and
/// `on_loop_closed` when the token touches Wall or Filled territory again.
#[derive(Debug)]
pub struct Session {
    grid: GridState,
    path: PathTracker,
    pool: CellPool,
    resolver: FillResolver,
    state: LevelState,
    strict_boundaries: bool,
    levels_completed: u32,
    resolutions: u64,
    last_resolution: Option<Resolution>,
}

impl Session {
    pub fn new(pool: CellPool, strict_boundaries: bool) -> Self {
        Self {
            grid: GridState::new(),
            path: PathTracker::new(),
            pool,
            resolver: FillResolver::new(),
            state: LevelState::Uninitialized,
            strict_boundaries,
            levels_completed: 0,
            resolutions: 0,
            last_resolution: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            CellPool::with_capacity(config.pool.warm_size),
            config.game.strict_boundaries,
        )
    }

    /// Log collaborator mistakes; in strict mode they abort the program.
    fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_boundary() {
                log::error!("rejected collaborator call: {err}");
                if self.strict_boundaries {
                    panic!("rejected collaborator call: {err}");
                }
            }
        }
        result
    }

    /// Start a fresh level. Any previous trail is dropped and every pooled
    /// cube is returned.
    pub fn initialize_level(&mut self, columns: i32, rows: i32, walls: &[Coord]) -> Result<()> {
        self.path.clear();
        self.pool.release_all();
        self.last_resolution = None;
        self.resolutions = 0;
        self.state = LevelState::Uninitialized;

        self.grid.initialize(columns, rows, walls)?;
        self.state = LevelState::Playing;
        log::info!(
            "level {}x{} started, {} cells to claim",
            columns,
            rows,
            self.grid.total_fillable()?
        );
        Ok(())
    }

    pub fn load_level(&mut self, level: &LevelSettings) -> Result<()> {
        log::info!("loading level '{}'", level.name);
        self.initialize_level(level.columns, level.rows, &level.obstacle_coords())
    }

    /// The token crossed into `coord` heading `direction`. Empty cells join
    /// the trail; anything else is left alone.
    pub fn on_cell_entered(&mut self, coord: Coord, direction: Direction) -> Result<()> {
        let status = self.guard(self.grid.status(coord))?;
        if status != CellStatus::Empty {
            log::debug!("entered {:?} cell at {coord}, not a trail cell", status);
            return Ok(());
        }

        self.grid.set_status(coord, CellStatus::Trail)?;
        self.path.record(coord, direction);
        Ok(())
    }

    /// Resolve the current trail. Returns the completion signal if this
    /// closure claimed the last cell of the level.
    pub fn on_loop_closed(&mut self) -> Result<Option<LevelComplete>> {
        if self.path.is_empty() {
            return Ok(None);
        }
        if !self.grid.is_initialized() {
            self.path.clear();
            return self.guard(Err(EngineError::NotInitialized));
        }

        let total = self.grid.total_fillable()?;
        let trail = self.path.drain_all();
        let resolution = self.resolver.resolve(&mut self.grid, &mut self.pool, trail)?;
        self.resolutions += 1;

        let signal = if resolution.level_complete {
            self.state = LevelState::Completed;
            self.levels_completed += 1;
            log::info!("level complete ({} cells)", total);
            Some(LevelComplete {
                levels_completed: self.levels_completed,
                filled: total,
            })
        } else {
            log::info!(
                "claimed {} cells ({} trail, {} enclosed)",
                resolution.claimed.len(),
                resolution.trail_len,
                resolution.region_len()
            );
            None
        };

        self.last_resolution = Some(resolution);
        Ok(signal)
    }

    pub fn is_tile_empty(&self, coord: Coord) -> Result<bool> {
        self.guard(self.grid.is_empty(coord))
    }

    pub fn remaining_empty_count(&self) -> Result<usize> {
        self.guard(self.grid.empty_count())
    }

    /// Drop the grid, the trail and every pooled cube. Used on restart.
    pub fn abort(&mut self) {
        self.grid.reset();
        self.path.clear();
        self.pool.release_all();
        self.last_resolution = None;
        self.state = LevelState::Uninitialized;
        log::info!("level aborted");
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn pool(&self) -> &CellPool {
        &self.pool
    }

    pub fn trail(&self) -> &[TrailEntry] {
        self.path.entries()
    }

    pub fn is_drawing(&self) -> bool {
        !self.path.is_empty()
    }

    /// Loop closures resolved since the level started.
    pub fn resolutions(&self) -> u64 {
        self.resolutions
    }

    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    pub fn levels_completed(&self) -> u32 {
        self.levels_completed
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Side, SplitOutcome};
    use proptest::prelude::*;

    use Direction::{Down, Left, Right};

    fn lenient() -> Session {
        Session::new(CellPool::with_capacity(25), false)
    }

    fn trace(session: &mut Session, steps: &[(i32, i32, Direction)]) {
        for &(x, y, direction) in steps {
            session.on_cell_entered(Coord::new(x, y), direction).unwrap();
        }
    }

    #[test]
    fn test_small_pocket_is_claimed_on_open_grid() {
        let mut session = lenient();
        session.initialize_level(5, 5, &[]).unwrap();

        trace(
            &mut session,
            &[(2, 0, Down), (2, 1, Down), (1, 1, Left), (1, 2, Down), (0, 2, Left)],
        );
        assert_eq!(session.trail().len(), 5);

        let signal = session.on_loop_closed().unwrap();
        assert_eq!(signal, None);

        let resolution = session.last_resolution().unwrap();
        assert_eq!(
            resolution.outcome,
            SplitOutcome::Claimed {
                at: Coord::new(2, 0),
                side: Side::A,
                size: 3,
                other: 17,
            }
        );
        for c in [(0, 0), (1, 0), (0, 1)] {
            assert!(session.grid().is_filled(Coord::from(c)).unwrap());
        }
        assert_eq!(session.grid().filled_count().unwrap(), 8);
        assert_eq!(session.remaining_empty_count().unwrap(), 17);
        assert_eq!(session.pool().active_count(), 8);
        assert!(!session.is_drawing());
        assert_eq!(session.state(), LevelState::Playing);
    }

    #[test]
    fn test_trail_without_lateral_pair_fills_only_itself() {
        let mut session = lenient();
        session.initialize_level(5, 5, &[]).unwrap();
        let before = session.grid().filled_count().unwrap();

        trace(&mut session, &[(0, 0, Right), (1, 0, Right), (2, 0, Right)]);
        session.on_loop_closed().unwrap();

        assert_eq!(session.grid().filled_count().unwrap(), before + 3);
        assert_eq!(
            session.last_resolution().unwrap().outcome,
            SplitOutcome::NoSplitPoint
        );
    }

    #[test]
    fn test_completion_signals_once_and_releases_grid() {
        let mut session = lenient();
        session.initialize_level(5, 3, &[]).unwrap();

        // Cut down the middle: left 2x3 claimed with the cut.
        trace(&mut session, &[(2, 0, Down), (2, 1, Down), (2, 2, Down)]);
        assert_eq!(session.on_loop_closed().unwrap(), None);
        assert_eq!(session.remaining_empty_count().unwrap(), 6);

        trace(&mut session, &[(3, 0, Down), (3, 1, Down), (3, 2, Down)]);
        assert_eq!(session.on_loop_closed().unwrap(), None);

        trace(&mut session, &[(4, 2, Left)]);
        trace(&mut session, &[(4, 1, Left), (4, 0, Left)]);
        let signal = session.on_loop_closed().unwrap();

        assert_eq!(
            signal,
            Some(LevelComplete {
                levels_completed: 1,
                filled: 15,
            })
        );
        assert_eq!(session.state(), LevelState::Completed);
        assert!(!session.grid().is_initialized());
        assert!(matches!(
            session.remaining_empty_count(),
            Err(EngineError::NotInitialized)
        ));

        // Nothing left to resolve, no second signal.
        assert_eq!(session.on_loop_closed().unwrap(), None);
    }

    #[test]
    fn test_entering_non_empty_cells_is_ignored() {
        let mut session = lenient();
        session.initialize_level(3, 3, &[Coord::new(1, 1)]).unwrap();

        session.on_cell_entered(Coord::new(1, 1), Down).unwrap();
        session.on_cell_entered(Coord::new(0, 0), Down).unwrap();
        session.on_cell_entered(Coord::new(0, 0), Down).unwrap();

        assert_eq!(session.trail().len(), 1);
        assert!(!session.is_tile_empty(Coord::new(0, 0)).unwrap());
    }

    #[test]
    fn test_abort_discards_trail_and_grid() {
        let mut session = lenient();
        session.initialize_level(4, 4, &[]).unwrap();
        trace(&mut session, &[(0, 0, Right), (1, 0, Right)]);
        session.on_loop_closed().unwrap();
        trace(&mut session, &[(0, 1, Right)]);

        session.abort();

        assert_eq!(session.state(), LevelState::Uninitialized);
        assert!(session.trail().is_empty());
        assert_eq!(session.pool().active_count(), 0);
        assert!(!session.grid().is_initialized());

        session.initialize_level(4, 4, &[]).unwrap();
        assert_eq!(session.remaining_empty_count().unwrap(), 16);
        assert_eq!(session.on_loop_closed().unwrap(), None);
    }

    #[test]
    fn test_new_level_reuses_pooled_cubes() {
        let mut session = Session::new(CellPool::with_capacity(2), false);
        session.initialize_level(4, 1, &[]).unwrap();
        trace(&mut session, &[(0, 0, Right), (1, 0, Right), (2, 0, Right)]);
        session.on_loop_closed().unwrap();
        assert_eq!(session.pool().len(), 3);

        session.initialize_level(4, 1, &[]).unwrap();
        assert_eq!(session.pool().active_count(), 0);
        trace(&mut session, &[(0, 0, Right)]);
        session.on_loop_closed().unwrap();
        assert_eq!(session.pool().len(), 3, "pool grows only when exhausted");
    }

    #[test]
    fn test_lenient_session_rejects_bad_coordinates() {
        let mut session = lenient();
        assert!(matches!(
            session.on_cell_entered(Coord::new(0, 0), Down),
            Err(EngineError::NotInitialized)
        ));

        session.initialize_level(3, 3, &[]).unwrap();
        assert!(matches!(
            session.is_tile_empty(Coord::new(3, 0)),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert!(session.trail().is_empty());
    }

    #[test]
    #[should_panic(expected = "rejected collaborator call")]
    fn test_strict_session_panics_on_bad_coordinates() {
        let mut session = Session::new(CellPool::with_capacity(0), true);
        session.initialize_level(3, 3, &[]).unwrap();
        let _ = session.on_cell_entered(Coord::new(-1, 0), Left);
    }

    #[test]
    fn test_invalid_level_leaves_session_uninitialized() {
        let mut session = lenient();
        assert!(matches!(
            session.initialize_level(0, 3, &[]),
            Err(EngineError::InvalidDimension { .. })
        ));
        assert_eq!(session.state(), LevelState::Uninitialized);
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        /// Filled never exceeds the fillable total, and a level signals
        /// completion at most once
        #[test]
        fn prop_completion_signalled_at_most_once(
            walls in prop::collection::vec((0i32..6, 0i32..6), 0..6),
            moves in prop::collection::vec(
                prop::option::of(((0i32..6, 0i32..6), direction_strategy())),
                1..120,
            ),
        ) {
            let walls: Vec<Coord> = walls.into_iter().map(Coord::from).collect();
            let mut session = lenient();
            session.initialize_level(6, 6, &walls).unwrap();
            let mut signals = 0;

            for step in moves {
                match step {
                    Some((coord, direction)) => {
                        let _ = session.on_cell_entered(Coord::from(coord), direction);
                    }
                    None => {
                        if session.on_loop_closed().unwrap().is_some() {
                            signals += 1;
                            prop_assert!(!session.grid().is_initialized());
                        }
                    }
                }

                if session.grid().is_initialized() {
                    let filled = session.grid().filled_count().unwrap();
                    prop_assert!(filled <= session.grid().total_fillable().unwrap());
                    prop_assert_eq!(session.pool().active_count(), filled);
                }
            }

            prop_assert!(signals <= 1);
            prop_assert_eq!(signals == 1, session.state() == LevelState::Completed);
        }
    }
}
