use std::fmt;

/// Cell coordinate: `x` is the column, `y` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Coord::new(self.x, self.y - 1),
            Direction::Down => Coord::new(self.x, self.y + 1),
            Direction::Left => Coord::new(self.x - 1, self.y),
            Direction::Right => Coord::new(self.x + 1, self.y),
        }
    }

    /// The 4-connected neighbours, no diagonals.
    pub fn neighbours(&self) -> [Coord; 4] {
        [
            Coord::new(self.x - 1, self.y),
            Coord::new(self.x + 1, self.y),
            Coord::new(self.x, self.y - 1),
            Coord::new(self.x, self.y + 1),
        ]
    }

    /// The two cells perpendicular to `direction`, lower index first.
    pub fn laterals(&self, direction: Direction) -> (Coord, Coord) {
        if direction.is_vertical() {
            (Coord::new(self.x - 1, self.y), Coord::new(self.x + 1, self.y))
        } else {
            (Coord::new(self.x, self.y - 1), Coord::new(self.x, self.y + 1))
        }
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moved_follows_row_major_axes() {
        let c = Coord::new(2, 2);
        assert_eq!(c.moved(Direction::Up), Coord::new(2, 1));
        assert_eq!(c.moved(Direction::Down), Coord::new(2, 3));
        assert_eq!(c.moved(Direction::Left), Coord::new(1, 2));
        assert_eq!(c.moved(Direction::Right), Coord::new(3, 2));
    }

    #[test]
    fn test_laterals_are_perpendicular_to_travel() {
        let c = Coord::new(3, 4);
        assert_eq!(
            c.laterals(Direction::Down),
            (Coord::new(2, 4), Coord::new(4, 4))
        );
        assert_eq!(
            c.laterals(Direction::Up),
            (Coord::new(2, 4), Coord::new(4, 4))
        );
        assert_eq!(
            c.laterals(Direction::Left),
            (Coord::new(3, 3), Coord::new(3, 5))
        );
        assert_eq!(
            c.laterals(Direction::Right),
            (Coord::new(3, 3), Coord::new(3, 5))
        );
    }

    #[test]
    fn test_opposite_is_involution() {
        for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(d.opposite().is_vertical(), d.is_vertical());
        }
    }
}
