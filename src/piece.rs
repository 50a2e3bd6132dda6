use std::fmt::Display;

use crate::coordinates::Rank;
use crate::direction::Direction;

/// Represents the color of the players.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const COUNT: usize = 2;
    pub const ALL_COLORS: [Color; Color::COUNT] = [Color::White, Color::Black];

    /// Returns the opposite color.
    pub fn opposite(self) -> Color {
        Color::from(u8::from(self) ^ 1)
    }

    /// Returns the direction this color's pawns push towards.
    pub fn pawn_push(self) -> Direction {
        match self {
            Color::White => Direction::Up,
            Color::Black => Direction::Down,
        }
    }

    /// Returns the rank this color's pawns start on.
    pub fn pawn_start_rank(self) -> Rank {
        match self {
            Color::White => Rank::R2,
            Color::Black => Rank::R7,
        }
    }

    /// Returns the rank on which this color's pawns promote.
    pub fn promotion_rank(self) -> Rank {
        match self {
            Color::White => Rank::R8,
            Color::Black => Rank::R1,
        }
    }

    /// Returns the rank this color's pawns stand on immediately after a two square advance, which
    /// is also the rank from which the opponent captures en passant.
    pub fn double_push_rank(self) -> Rank {
        match self {
            Color::White => Rank::R4,
            Color::Black => Rank::R5,
        }
    }
}

impl From<u8> for Color {
    /// Converts a `u8` value to a `Color`.
    fn from(value: u8) -> Self {
        assert!(value <= Color::Black.into());
        unsafe { std::mem::transmute(value) }
    }
}

impl From<Color> for u8 {
    /// Converts a `Color` to a `u8` value.
    fn from(color: Color) -> Self {
        color as u8
    }
}

impl From<Color> for usize {
    fn from(color: Color) -> Self {
        color as usize
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Represents the type of a piece without regard to its color.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Knight = 0,
    Bishop = 1,
    Rook = 2,
    Queen = 3,
    King = 4,
    Pawn = 5,
}

impl PieceType {
    pub const COUNT: usize = 6;
    pub const ALL_PIECE_TYPES: [PieceType; PieceType::COUNT] = [
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
        PieceType::Pawn,
    ];

    /// The piece types a pawn may promote to. The order matches the two bit encoding used by
    /// promotion moves, so a promotion type's discriminant is its encoded value.
    pub const PROMOTION_PIECE_TYPES: [PieceType; 4] = [
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
    ];

    /// Returns the directions this piece type slides along, or an empty slice for non sliders.
    pub fn slide_directions(self) -> &'static [Direction] {
        match self {
            PieceType::Bishop => &Direction::DIAGONAL,
            PieceType::Rook => &Direction::ORTHOGONAL,
            PieceType::Queen => &Direction::OUTWARD,
            _ => &[],
        }
    }

    /// Returns whether this piece type moves by sliding along lines.
    pub fn is_slider(self) -> bool {
        !self.slide_directions().is_empty()
    }
}

impl From<u8> for PieceType {
    /// Converts a `u8` value to a `PieceType`.
    fn from(value: u8) -> Self {
        assert!(value <= PieceType::Pawn.into());
        unsafe { std::mem::transmute(value) }
    }
}

impl From<PieceType> for u8 {
    /// Converts a `PieceType` to a `u8` value.
    fn from(piece_type: PieceType) -> Self {
        piece_type as u8
    }
}

impl From<PieceType> for usize {
    fn from(piece_type: PieceType) -> Self {
        piece_type as usize
    }
}

impl Display for PieceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceType::Knight => "knight",
            PieceType::Bishop => "bishop",
            PieceType::Rook => "rook",
            PieceType::Queen => "queen",
            PieceType::King => "king",
            PieceType::Pawn => "pawn",
        };
        write!(f, "{}", name)
    }
}

/// Represents a piece of a given type and color, packed into a single byte as
/// `piece_type << 1 | color`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    pub const WHITE_KNIGHT: Piece = Piece::new(Color::White, PieceType::Knight);
    pub const WHITE_BISHOP: Piece = Piece::new(Color::White, PieceType::Bishop);
    pub const WHITE_ROOK: Piece = Piece::new(Color::White, PieceType::Rook);
    pub const WHITE_QUEEN: Piece = Piece::new(Color::White, PieceType::Queen);
    pub const WHITE_KING: Piece = Piece::new(Color::White, PieceType::King);
    pub const WHITE_PAWN: Piece = Piece::new(Color::White, PieceType::Pawn);
    pub const BLACK_KNIGHT: Piece = Piece::new(Color::Black, PieceType::Knight);
    pub const BLACK_BISHOP: Piece = Piece::new(Color::Black, PieceType::Bishop);
    pub const BLACK_ROOK: Piece = Piece::new(Color::Black, PieceType::Rook);
    pub const BLACK_QUEEN: Piece = Piece::new(Color::Black, PieceType::Queen);
    pub const BLACK_KING: Piece = Piece::new(Color::Black, PieceType::King);
    pub const BLACK_PAWN: Piece = Piece::new(Color::Black, PieceType::Pawn);

    pub const COUNT: usize = PieceType::COUNT * Color::COUNT;

    /// Creates a new piece from a color and a piece type.
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece((piece_type as u8) << 1 | color as u8)
    }

    /// Returns the color of the piece.
    pub fn color(self) -> Color {
        Color::from(self.0 & 1)
    }

    /// Returns the type of the piece.
    pub fn piece_type(self) -> PieceType {
        PieceType::from(self.0 >> 1)
    }

    /// Returns the piece represented by a character in English notation, uppercase for white and
    /// lowercase for black.
    pub fn from_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        let piece_type = match c.to_ascii_lowercase() {
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            'p' => PieceType::Pawn,
            _ => return None,
        };
        Some(Piece::new(color, piece_type))
    }

    /// Returns the character representing the piece, uppercase for white and lowercase for black.
    pub fn to_char(self) -> char {
        let c = match self.piece_type() {
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
            PieceType::Pawn => 'p',
        };
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl From<Piece> for usize {
    fn from(piece: Piece) -> Self {
        piece.0 as usize
    }
}

impl std::fmt::Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color(), self.piece_type())
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
