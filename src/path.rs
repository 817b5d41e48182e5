use crate::coord::{Coord, Direction};

/// One cell of the uncommitted trail and the heading it was entered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailEntry {
    pub coord: Coord,
    pub direction: Direction,
}

impl TrailEntry {
    pub fn new(coord: Coord, direction: Direction) -> Self {
        Self { coord, direction }
    }
}

/// Chronological record of the cells the token has crossed since the last fill.
#[derive(Debug, Clone, Default)]
pub struct PathTracker {
    entries: Vec<TrailEntry>,
}

impl PathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Returns false if `coord` repeats the last entry.
    pub fn record(&mut self, coord: Coord, direction: Direction) -> bool {
        if self.entries.last().map(|e| e.coord) == Some(coord) {
            log::warn!("repeated trail entry at {coord} ignored");
            return false;
        }
        self.entries.push(TrailEntry::new(coord, direction));
        true
    }

    /// Take the whole trail, leaving the tracker empty.
    pub fn drain_all(&mut self) -> Vec<TrailEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TrailEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_chronological_order() {
        let mut path = PathTracker::new();
        path.record(Coord::new(1, 0), Direction::Down);
        path.record(Coord::new(1, 1), Direction::Down);
        path.record(Coord::new(2, 1), Direction::Right);

        let coords: Vec<Coord> = path.entries().iter().map(|e| e.coord).collect();
        assert_eq!(
            coords,
            vec![Coord::new(1, 0), Coord::new(1, 1), Coord::new(2, 1)]
        );
        assert_eq!(path.last().unwrap().direction, Direction::Right);
    }

    #[test]
    fn test_repeated_coordinate_is_not_recorded() {
        let mut path = PathTracker::new();
        assert!(path.record(Coord::new(1, 1), Direction::Down));
        assert!(!path.record(Coord::new(1, 1), Direction::Left));
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_drain_all_empties_the_tracker() {
        let mut path = PathTracker::new();
        path.record(Coord::new(0, 0), Direction::Right);
        path.record(Coord::new(1, 0), Direction::Right);

        let drained = path.drain_all();
        assert_eq!(drained.len(), 2);
        assert!(path.is_empty());
        assert!(path.drain_all().is_empty(), "no entry may be read twice");
    }
}
