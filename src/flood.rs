use std::collections::HashSet;

use crate::coord::Coord;
use crate::error::{EngineError, Result};
use crate::grid::{CellStatus, GridState};

/// A connected set of cells that were Empty when the fill visited them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    cells: Vec<Coord>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coord> {
        self.cells.iter()
    }

    pub fn shares_cell_with(&self, other: &Region) -> bool {
        let mine: HashSet<&Coord> = self.cells.iter().collect();
        other.cells.iter().any(|c| mine.contains(c))
    }

    /// Undo the visited marking left by [`flood_fill`].
    pub fn restore(&self, grid: &mut GridState) -> Result<()> {
        for &coord in &self.cells {
            if grid.status(coord)? == CellStatus::Trail {
                grid.set_status(coord, CellStatus::Empty)?;
            }
        }
        Ok(())
    }

    pub fn into_cells(self) -> Vec<Coord> {
        self.cells
    }
}

/// Collect the 4-connected Empty component containing `seed`.
///
/// Visited cells are marked Trail, which is what stops the walk from
/// revisiting them. They stay marked on return: the caller must call
/// [`Region::restore`] before anyone else reads the grid. A seed that is not
/// Empty, or lies off the grid, yields an empty region.
pub fn flood_fill(grid: &mut GridState, seed: Coord) -> Result<Region> {
    if !grid.is_initialized() {
        return Err(EngineError::NotInitialized);
    }

    let mut cells = Vec::new();
    let mut stack = vec![seed];

    while let Some(coord) = stack.pop() {
        if !grid.contains(coord) || grid.status(coord)? != CellStatus::Empty {
            continue;
        }

        grid.set_status(coord, CellStatus::Trail)?;
        cells.push(coord);
        stack.extend(coord.neighbours());
    }

    Ok(Region { cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A `columns` x `rows` grid whose outer ring is walled off.
    fn boxed_grid(columns: i32, rows: i32) -> GridState {
        let mut walls = Vec::new();
        for x in 0..columns {
            walls.push(Coord::new(x, 0));
            walls.push(Coord::new(x, rows - 1));
        }
        for y in 0..rows {
            walls.push(Coord::new(0, y));
            walls.push(Coord::new(columns - 1, y));
        }
        let mut grid = GridState::new();
        grid.initialize(columns, rows, &walls).unwrap();
        grid
    }

    proptest! {
        /// An enclosed w x h pocket yields exactly w*h cells, and restoring
        /// leaves the grid identical to before the fill
        #[test]
        fn prop_enclosed_rectangle_round_trip(
            w in 1i32..10,
            h in 1i32..10,
            sx in 0i32..10,
            sy in 0i32..10,
        ) {
            let mut grid = boxed_grid(w + 2, h + 2);
            let before = grid.clone();
            let seed = Coord::new(1 + sx % w, 1 + sy % h);

            let region = flood_fill(&mut grid, seed).unwrap();
            prop_assert_eq!(region.len(), (w * h) as usize);
            prop_assert_eq!(grid.empty_count().unwrap(), 0);

            region.restore(&mut grid).unwrap();
            prop_assert_eq!(grid, before);
        }

        /// Result set does not depend on which cell of the region seeds it
        #[test]
        fn prop_region_independent_of_seed(
            walls in prop::collection::vec((0i32..8, 0i32..8), 0..20),
            a in (0i32..8, 0i32..8),
            b in (0i32..8, 0i32..8),
        ) {
            let walls: Vec<Coord> = walls.into_iter().map(Coord::from).collect();
            let mut grid = GridState::new();
            grid.initialize(8, 8, &walls).unwrap();
            let (a, b) = (Coord::from(a), Coord::from(b));

            let from_a = flood_fill(&mut grid, a).unwrap();
            from_a.restore(&mut grid).unwrap();

            if from_a.contains(b) {
                let from_b = flood_fill(&mut grid, b).unwrap();
                from_b.restore(&mut grid).unwrap();

                let mut left = from_a.into_cells();
                let mut right = from_b.into_cells();
                left.sort_by_key(|c| (c.y, c.x));
                right.sort_by_key(|c| (c.y, c.x));
                prop_assert_eq!(left, right);
            }
        }
    }

    #[test]
    fn test_fill_stops_at_non_empty_cells() {
        let mut grid = GridState::new();
        // Vertical wall splits a 5x3 grid into 2x3 and 2x3.
        let walls: Vec<Coord> = (0..3).map(|y| Coord::new(2, y)).collect();
        grid.initialize(5, 3, &walls).unwrap();

        let left = flood_fill(&mut grid, Coord::new(0, 1)).unwrap();
        assert_eq!(left.len(), 6);
        assert!(left.iter().all(|c| c.x < 2));
        assert_eq!(grid.status(Coord::new(0, 0)).unwrap(), CellStatus::Trail);
    }

    #[test]
    fn test_non_empty_seed_yields_empty_region() {
        let mut grid = GridState::new();
        grid.initialize(3, 3, &[Coord::new(1, 1)]).unwrap();

        let region = flood_fill(&mut grid, Coord::new(1, 1)).unwrap();
        assert!(region.is_empty());
        assert_eq!(grid.empty_count().unwrap(), 8);
    }

    #[test]
    fn test_seed_off_grid_yields_empty_region() {
        let mut grid = GridState::new();
        grid.initialize(3, 3, &[]).unwrap();

        let region = flood_fill(&mut grid, Coord::new(-1, 0)).unwrap();
        assert!(region.is_empty());
    }

    #[test]
    fn test_second_fill_of_same_region_is_empty() {
        let mut grid = GridState::new();
        grid.initialize(4, 4, &[]).unwrap();

        let first = flood_fill(&mut grid, Coord::new(0, 0)).unwrap();
        let second = flood_fill(&mut grid, Coord::new(3, 3)).unwrap();

        assert_eq!(first.len(), 16);
        assert!(second.is_empty());
        assert!(!first.shares_cell_with(&second));
    }

    #[test]
    fn test_fill_requires_live_grid() {
        let mut grid = GridState::new();
        assert!(matches!(
            flood_fill(&mut grid, Coord::new(0, 0)),
            Err(EngineError::NotInitialized)
        ));
    }
}
