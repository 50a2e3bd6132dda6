use once_cell::sync::Lazy;

use crate::coordinates::{File, Rank, Square};
use crate::direction::{Direction, LineKind};

/// A maximal rank, file, or diagonal of the board, with its squares in traversal order.
///
/// Files are ordered by ascending rank and every other family by ascending file, matching the
/// sense in which [`Direction::movement`](crate::direction::Direction::movement) reports
/// `Forwards`.
#[derive(Debug)]
pub struct Line {
    kind: LineKind,
    index: u8,
    squares: Vec<Square>,
}

impl Line {
    /// Returns the family this line belongs to.
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Returns the index of this line within its family.
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Returns the squares of this line in traversal order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Returns the position of a square within this line's traversal order. The square must be on
    /// the line.
    pub fn offset_of(&self, square: Square) -> usize {
        self.squares
            .iter()
            .position(|&sq| sq == square)
            .unwrap_or_else(|| panic!("{} is not on this line", square))
    }

    /// Returns whether the given square lies on this line.
    pub fn contains(&self, square: Square) -> bool {
        index_in_kind(square, self.kind) == self.index
    }

    /// Returns the line of the given family passing through a square.
    pub fn through(square: Square, kind: LineKind) -> &'static Line {
        let index = index_in_kind(square, kind) as usize;
        match kind {
            LineKind::File => &FILES[index],
            LineKind::Rank => &RANKS[index],
            LineKind::UpDiagonal => &UP_DIAGONALS[index],
            LineKind::DownDiagonal => &DOWN_DIAGONALS[index],
        }
    }
}

fn index_in_kind(square: Square, kind: LineKind) -> u8 {
    match kind {
        LineKind::File => u8::from(square.file()),
        LineKind::Rank => u8::from(square.rank()),
        LineKind::UpDiagonal => square.up_diagonal(),
        LineKind::DownDiagonal => square.down_diagonal(),
    }
}

fn build_lines(kind: LineKind, count: u8) -> Vec<Line> {
    (0..count)
        .map(|index| {
            let mut squares: Vec<Square> = Square::ALL_SQUARES
                .into_iter()
                .filter(|&sq| index_in_kind(sq, kind) == index)
                .collect();
            squares.sort_by_key(|&sq| (u8::from(sq.file()), u8::from(sq.rank())));
            Line { kind, index, squares }
        })
        .collect()
}

static FILES: Lazy<Vec<Line>> = Lazy::new(|| build_lines(LineKind::File, 8));
static RANKS: Lazy<Vec<Line>> = Lazy::new(|| build_lines(LineKind::Rank, 8));
static UP_DIAGONALS: Lazy<Vec<Line>> = Lazy::new(|| build_lines(LineKind::UpDiagonal, 15));
static DOWN_DIAGONALS: Lazy<Vec<Line>> = Lazy::new(|| build_lines(LineKind::DownDiagonal, 15));

/// For each square and outward direction, the squares reachable by repeated single steps, nearest
/// first and excluding the origin.
static RAYS: Lazy<Vec<[Vec<Square>; 8]>> = Lazy::new(|| {
    Square::ALL_SQUARES
        .into_iter()
        .map(|origin| {
            Direction::OUTWARD.map(|direction| {
                let mut squares = Vec::new();
                let mut current = origin.towards(direction);
                while let Some(sq) = current {
                    squares.push(sq);
                    current = sq.towards(direction);
                }
                squares
            })
        })
        .collect()
});

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

fn neighbors(origin: Square, jumps: &[(i8, i8)]) -> Vec<Square> {
    jumps
        .iter()
        .filter_map(|&(df, dr)| {
            let file = u8::from(origin.file()) as i8 + df;
            let rank = u8::from(origin.rank()) as i8 + dr;
            if (0..8).contains(&file) && (0..8).contains(&rank) {
                Some(Square::new(File::from(file as u8), Rank::from(rank as u8)))
            } else {
                None
            }
        })
        .collect()
}

static KNIGHT_NEIGHBORS: Lazy<Vec<Vec<Square>>> = Lazy::new(|| {
    Square::ALL_SQUARES
        .into_iter()
        .map(|origin| neighbors(origin, &KNIGHT_JUMPS))
        .collect()
});

static KING_NEIGHBORS: Lazy<Vec<Vec<Square>>> = Lazy::new(|| {
    Square::ALL_SQUARES
        .into_iter()
        .map(|origin| {
            Direction::OUTWARD
                .into_iter()
                .filter_map(|direction| origin.towards(direction))
                .collect()
        })
        .collect()
});

/// Returns the outward index of a direction into the per-square ray table.
fn outward_index(direction: Direction) -> usize {
    Direction::OUTWARD
        .iter()
        .position(|&d| d == direction)
        .expect("direction must be outward")
}

/// Returns the squares reachable from `origin` by sliding in `direction`, nearest first. The
/// direction must not be `Direction::None`.
pub fn ray(origin: Square, direction: Direction) -> &'static [Square] {
    &RAYS[usize::from(origin)][outward_index(direction)]
}

/// Returns the squares a knight on `origin` attacks.
pub fn knight_neighbors(origin: Square) -> &'static [Square] {
    &KNIGHT_NEIGHBORS[usize::from(origin)]
}

/// Returns the squares a king on `origin` attacks.
pub fn king_neighbors(origin: Square) -> &'static [Square] {
    &KING_NEIGHBORS[usize::from(origin)]
}

/// Forces the construction of all topology tables. Idempotent and safe to call from multiple
/// threads.
pub fn initialize() {
    Lazy::force(&FILES);
    Lazy::force(&RANKS);
    Lazy::force(&UP_DIAGONALS);
    Lazy::force(&DOWN_DIAGONALS);
    Lazy::force(&RAYS);
    Lazy::force(&KNIGHT_NEIGHBORS);
    Lazy::force(&KING_NEIGHBORS);
}
