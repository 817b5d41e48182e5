use std::cmp::Ordering;

use crate::coord::Coord;
use crate::error::Result;
use crate::flood::{flood_fill, Region};
use crate::grid::{CellStatus, GridState};
use crate::path::TrailEntry;
use crate::pool::CellPool;

/// Which lateral of the split point a region was grown from.
/// `A` is the lower-index side (`x-1` or `y-1`), `B` the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// No trail cell had two Empty laterals away from the border.
    NoSplitPoint,
    /// A split point existed but the trail did not separate two regions.
    NoSeparation { at: Coord },
    Claimed {
        at: Coord,
        side: Side,
        size: usize,
        other: usize,
    },
}

/// What one loop closure did to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: SplitOutcome,
    /// Every cell moved to Filled, trail cells first.
    pub claimed: Vec<Coord>,
    pub trail_len: usize,
    pub level_complete: bool,
}

impl Resolution {
    pub fn region_len(&self) -> usize {
        match self.outcome {
            SplitOutcome::Claimed { size, .. } => size,
            _ => 0,
        }
    }
}

/// Turns a closed trail into Filled territory, claiming the smaller side.
#[derive(Debug, Clone, Default)]
pub struct FillResolver;

impl FillResolver {
    pub fn new() -> Self {
        Self
    }

    /// First trail entry, in travel order, whose two laterals are both
    /// Empty and lie inside `[1, dimension - 2]` on the lateral axis.
    pub fn find_split_point(
        &self,
        grid: &GridState,
        trail: &[TrailEntry],
    ) -> Result<Option<(Coord, Coord, Coord)>> {
        let columns = grid.columns()?;
        let rows = grid.rows()?;

        for entry in trail {
            let (a, b) = entry.coord.laterals(entry.direction);
            let (lo, hi, limit) = if entry.direction.is_vertical() {
                (a.x, b.x, columns)
            } else {
                (a.y, b.y, rows)
            };
            if lo < 1 || hi > limit - 2 {
                continue;
            }
            if grid.is_empty(a)? && grid.is_empty(b)? {
                return Ok(Some((entry.coord, a, b)));
            }
        }
        Ok(None)
    }

    /// Resolve a loop closure over the drained `trail`.
    ///
    /// Trail cells always become Filled. When a split point separates two
    /// regions the smaller one is claimed too; equal disjoint regions go to
    /// side `A`. Each newly Filled cell takes one placed handle from `pool`.
    /// If that fills the level the grid is reset before returning.
    pub fn resolve(
        &self,
        grid: &mut GridState,
        pool: &mut CellPool,
        trail: Vec<TrailEntry>,
    ) -> Result<Resolution> {
        let mut outcome = SplitOutcome::NoSplitPoint;
        let mut chosen = Region::default();

        if let Some((at, seed_a, seed_b)) = self.find_split_point(grid, &trail)? {
            let region_a = flood_fill(grid, seed_a)?;
            let region_b = flood_fill(grid, seed_b)?;
            region_a.restore(grid)?;
            region_b.restore(grid)?;

            log::debug!(
                "split at {at}: side A {} cells, side B {} cells",
                region_a.len(),
                region_b.len()
            );

            outcome = match pick_side(&region_a, &region_b) {
                Some(Side::A) => {
                    let other = region_b.len();
                    chosen = region_a;
                    SplitOutcome::Claimed {
                        at,
                        side: Side::A,
                        size: chosen.len(),
                        other,
                    }
                }
                Some(Side::B) => {
                    let other = region_a.len();
                    chosen = region_b;
                    SplitOutcome::Claimed {
                        at,
                        side: Side::B,
                        size: chosen.len(),
                        other,
                    }
                }
                None => SplitOutcome::NoSeparation { at },
            };
        }

        let trail_len = trail.len();
        let mut claimed = Vec::with_capacity(trail_len + chosen.len());
        let targets = trail
            .iter()
            .map(|entry| entry.coord)
            .chain(chosen.into_cells());

        for coord in targets {
            if grid.is_filled(coord)? {
                continue;
            }
            let handle = pool.request();
            pool.place(handle, coord)?;
            grid.set_status(coord, CellStatus::Filled)?;
            claimed.push(coord);
        }

        let level_complete = grid.is_level_complete()?;
        if level_complete {
            grid.reset();
        }

        log::debug!(
            "resolved trail of {trail_len}: {:?}, {} cells filled",
            outcome,
            claimed.len()
        );

        Ok(Resolution {
            outcome,
            claimed,
            trail_len,
            level_complete,
        })
    }
}

/// Smaller region wins. Equal sizes: the same region seen twice is no
/// split at all; two disjoint regions go to `A`.
fn pick_side(a: &Region, b: &Region) -> Option<Side> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    match a.len().cmp(&b.len()) {
        Ordering::Less => Some(Side::A),
        Ordering::Greater => Some(Side::B),
        Ordering::Equal if a.shares_cell_with(b) => None,
        Ordering::Equal => Some(Side::A),
    }
}
