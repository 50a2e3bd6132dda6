use std::fmt::Display;

use crate::coordinates::Square;

/// The family of line a direction travels along.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    File = 0,
    Rank = 1,
    UpDiagonal = 2,
    DownDiagonal = 3,
}

impl LineKind {
    /// Represents all line families.
    pub const ALL_KINDS: [LineKind; 4] = [
        LineKind::File,
        LineKind::Rank,
        LineKind::UpDiagonal,
        LineKind::DownDiagonal,
    ];
}

/// The sense in which a direction traverses its line: towards higher offsets, towards lower
/// offsets, or not at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Movement {
    Forwards,
    Backwards,
    Nowhere,
}

/// Represents a relative motion along a rank, file, or diagonal.
///
/// Motion that is not along such a line is represented by `None`. Each direction is defined by a
/// file delta and a rank delta, both in {-1, 0, 1}. The discriminants are laid out so that the
/// deltas can be recovered arithmetically and the opposite direction is the mirror around `None`.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    DownLeft = 0,
    Left = 1,
    UpLeft = 2,
    Down = 3,
    None = 4,
    Up = 5,
    DownRight = 6,
    Right = 7,
    UpRight = 8,
}

impl Direction {
    /// The eight directions that actually move, in discriminant order.
    pub const OUTWARD: [Direction; 8] = [
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
        Direction::Down,
        Direction::Up,
        Direction::DownRight,
        Direction::Right,
        Direction::UpRight,
    ];

    /// The four directions a rook slides along.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Up,
        Direction::Right,
    ];

    /// The four directions a bishop slides along.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::DownLeft,
        Direction::UpLeft,
        Direction::DownRight,
        Direction::UpRight,
    ];

    /// Returns how many files over the next square in this direction is.
    pub fn file_delta(&self) -> i8 {
        (*self as i8) / 3 - 1
    }

    /// Returns how many ranks over the next square in this direction is.
    pub fn rank_delta(&self) -> i8 {
        (*self as i8) % 3 - 1
    }

    /// Returns the opposite direction. `None` is its own opposite.
    pub fn opposite(&self) -> Direction {
        Direction::from(8 - *self as u8)
    }

    /// Returns the line family this direction travels along, or `Option::None` for
    /// `Direction::None`.
    pub fn line_kind(&self) -> Option<LineKind> {
        match (self.file_delta(), self.rank_delta()) {
            (0, 0) => None,
            (0, _) => Some(LineKind::File),
            (_, 0) => Some(LineKind::Rank),
            (f, r) if f == r => Some(LineKind::UpDiagonal),
            _ => Some(LineKind::DownDiagonal),
        }
    }

    /// Returns the traversal sense of this direction along its line's square ordering.
    pub fn movement(&self) -> Movement {
        match (4i8 - *self as i8).signum() {
            -1 => Movement::Forwards,
            1 => Movement::Backwards,
            _ => Movement::Nowhere,
        }
    }

    /// Returns the direction pointing from one square towards another, or `Direction::None` when
    /// the two squares do not share a rank, file, or 45-degree diagonal.
    ///
    /// The result is derived arithmetically from the coordinate deltas: the squares are aligned
    /// exactly when one delta is zero or both have equal magnitude.
    pub fn between(from: Square, to: Square) -> Direction {
        let file_delta = u8::from(to.file()) as i8 - u8::from(from.file()) as i8;
        let rank_delta = u8::from(to.rank()) as i8 - u8::from(from.rank()) as i8;
        if file_delta == 0 && rank_delta == 0 {
            return Direction::None;
        }
        if file_delta != 0 && rank_delta != 0 && file_delta.abs() != rank_delta.abs() {
            return Direction::None;
        }
        Direction::by_deltas(file_delta.signum(), rank_delta.signum())
    }

    /// Returns the direction defined by unit deltas. Both deltas must be in {-1, 0, 1}.
    pub fn by_deltas(file_delta: i8, rank_delta: i8) -> Direction {
        assert!(file_delta.abs() <= 1 && rank_delta.abs() <= 1);
        Direction::from(((file_delta + 1) * 3 + rank_delta + 1) as u8)
    }
}

impl From<u8> for Direction {
    /// Converts a `u8` value to a `Direction`.
    fn from(value: u8) -> Self {
        assert!(value <= Direction::UpRight.into());
        unsafe { std::mem::transmute(value) }
    }
}

impl From<Direction> for u8 {
    /// Converts a `Direction` to a `u8` value.
    fn from(direction: Direction) -> Self {
        direction as u8
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::DownLeft => "down-left",
            Direction::Left => "left",
            Direction::UpLeft => "up-left",
            Direction::Down => "down",
            Direction::None => "none",
            Direction::Up => "up",
            Direction::DownRight => "down-right",
            Direction::Right => "right",
            Direction::UpRight => "up-right",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas() {
        assert_eq!((Direction::Up.file_delta(), Direction::Up.rank_delta()), (0, 1));
        assert_eq!((Direction::Down.file_delta(), Direction::Down.rank_delta()), (0, -1));
        assert_eq!((Direction::Left.file_delta(), Direction::Left.rank_delta()), (-1, 0));
        assert_eq!((Direction::Right.file_delta(), Direction::Right.rank_delta()), (1, 0));
        assert_eq!((Direction::UpRight.file_delta(), Direction::UpRight.rank_delta()), (1, 1));
        assert_eq!((Direction::DownLeft.file_delta(), Direction::DownLeft.rank_delta()), (-1, -1));
        assert_eq!((Direction::None.file_delta(), Direction::None.rank_delta()), (0, 0));
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::UpRight.opposite(), Direction::DownLeft);
        assert_eq!(Direction::UpLeft.opposite(), Direction::DownRight);
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_opposites_reverse_each_outward_direction() {
        for direction in Direction::OUTWARD {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.opposite().file_delta(), -direction.file_delta());
            assert_eq!(direction.opposite().rank_delta(), -direction.rank_delta());
        }
    }

    #[test]
    fn test_line_kind() {
        assert_eq!(Direction::Up.line_kind(), Some(LineKind::File));
        assert_eq!(Direction::Down.line_kind(), Some(LineKind::File));
        assert_eq!(Direction::Left.line_kind(), Some(LineKind::Rank));
        assert_eq!(Direction::UpRight.line_kind(), Some(LineKind::UpDiagonal));
        assert_eq!(Direction::DownLeft.line_kind(), Some(LineKind::UpDiagonal));
        assert_eq!(Direction::UpLeft.line_kind(), Some(LineKind::DownDiagonal));
        assert_eq!(Direction::DownRight.line_kind(), Some(LineKind::DownDiagonal));
        assert_eq!(Direction::None.line_kind(), None);
    }

    #[test]
    fn test_movement() {
        assert_eq!(Direction::Up.movement(), Movement::Forwards);
        assert_eq!(Direction::Right.movement(), Movement::Forwards);
        assert_eq!(Direction::Down.movement(), Movement::Backwards);
        assert_eq!(Direction::Left.movement(), Movement::Backwards);
        assert_eq!(Direction::None.movement(), Movement::Nowhere);
    }

    #[test]
    fn test_between_aligned_squares() {
        assert_eq!(Direction::between(Square::E1, Square::E8), Direction::Up);
        assert_eq!(Direction::between(Square::E8, Square::E1), Direction::Down);
        assert_eq!(Direction::between(Square::A4, Square::H4), Direction::Right);
        assert_eq!(Direction::between(Square::A1, Square::H8), Direction::UpRight);
        assert_eq!(Direction::between(Square::H1, Square::A8), Direction::UpLeft);
        assert_eq!(Direction::between(Square::D5, Square::D5), Direction::None);
    }

    #[test]
    fn test_between_unaligned_squares() {
        assert_eq!(Direction::between(Square::E4, Square::F6), Direction::None);
        assert_eq!(Direction::between(Square::A1, Square::C2), Direction::None);
        assert_eq!(Direction::between(Square::B7, Square::H8), Direction::None);
    }
}
