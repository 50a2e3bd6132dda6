use std::fmt::Display;

use bitflags::bitflags;

use crate::coordinates::Square;
use crate::piece::Color;

/// Represents the wing a castling move takes place on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

impl CastlingSide {
    pub const ALL_SIDES: [CastlingSide; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];
}

/// One of the four castling permissions, together with the fixed geometry of the move it allows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastlingRight {
    WhiteKingside,
    WhiteQueenside,
    BlackKingside,
    BlackQueenside,
}

impl CastlingRight {
    pub const ALL_RIGHTS: [CastlingRight; 4] = [
        CastlingRight::WhiteKingside,
        CastlingRight::WhiteQueenside,
        CastlingRight::BlackKingside,
        CastlingRight::BlackQueenside,
    ];

    /// Returns the right for the given color and wing.
    pub fn new(color: Color, side: CastlingSide) -> CastlingRight {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => CastlingRight::WhiteKingside,
            (Color::White, CastlingSide::Queenside) => CastlingRight::WhiteQueenside,
            (Color::Black, CastlingSide::Kingside) => CastlingRight::BlackKingside,
            (Color::Black, CastlingSide::Queenside) => CastlingRight::BlackQueenside,
        }
    }

    pub fn color(self) -> Color {
        match self {
            CastlingRight::WhiteKingside | CastlingRight::WhiteQueenside => Color::White,
            CastlingRight::BlackKingside | CastlingRight::BlackQueenside => Color::Black,
        }
    }

    pub fn side(self) -> CastlingSide {
        match self {
            CastlingRight::WhiteKingside | CastlingRight::BlackKingside => CastlingSide::Kingside,
            CastlingRight::WhiteQueenside | CastlingRight::BlackQueenside => CastlingSide::Queenside,
        }
    }

    /// Returns the square the king castles from.
    pub fn king_from(self) -> Square {
        match self.color() {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        }
    }

    /// Returns the square the king castles to.
    pub fn king_to(self) -> Square {
        match self {
            CastlingRight::WhiteKingside => Square::G1,
            CastlingRight::WhiteQueenside => Square::C1,
            CastlingRight::BlackKingside => Square::G8,
            CastlingRight::BlackQueenside => Square::C8,
        }
    }

    /// Returns the square the castling rook starts on.
    pub fn rook_from(self) -> Square {
        match self {
            CastlingRight::WhiteKingside => Square::H1,
            CastlingRight::WhiteQueenside => Square::A1,
            CastlingRight::BlackKingside => Square::H8,
            CastlingRight::BlackQueenside => Square::A8,
        }
    }

    /// Returns the square the castling rook lands on.
    pub fn rook_to(self) -> Square {
        match self {
            CastlingRight::WhiteKingside => Square::F1,
            CastlingRight::WhiteQueenside => Square::D1,
            CastlingRight::BlackKingside => Square::F8,
            CastlingRight::BlackQueenside => Square::D8,
        }
    }

    /// Returns the squares between king and rook that must be empty.
    pub fn vacated(self) -> &'static [Square] {
        match self {
            CastlingRight::WhiteKingside => &[Square::F1, Square::G1],
            CastlingRight::WhiteQueenside => &[Square::B1, Square::C1, Square::D1],
            CastlingRight::BlackKingside => &[Square::F8, Square::G8],
            CastlingRight::BlackQueenside => &[Square::B8, Square::C8, Square::D8],
        }
    }

    /// Returns the squares the king crosses or lands on, all of which must be unattacked. The
    /// starting square is covered separately by the rule that castling out of check is illegal.
    pub fn king_path(self) -> &'static [Square] {
        match self {
            CastlingRight::WhiteKingside => &[Square::F1, Square::G1],
            CastlingRight::WhiteQueenside => &[Square::D1, Square::C1],
            CastlingRight::BlackKingside => &[Square::F8, Square::G8],
            CastlingRight::BlackQueenside => &[Square::D8, Square::C8],
        }
    }

    /// Returns the flag representing this right in a [`CastlingRights`] set.
    pub fn flag(self) -> CastlingRights {
        match self {
            CastlingRight::WhiteKingside => CastlingRights::WHITE_KINGSIDE,
            CastlingRight::WhiteQueenside => CastlingRights::WHITE_QUEENSIDE,
            CastlingRight::BlackKingside => CastlingRights::BLACK_KINGSIDE,
            CastlingRight::BlackQueenside => CastlingRights::BLACK_QUEENSIDE,
        }
    }
}

bitflags! {
    /// Represents a set of castling permissions.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct CastlingRights: u8 {
        const WHITE_KINGSIDE = 1 << 0;
        const WHITE_QUEENSIDE = 1 << 1;
        const BLACK_KINGSIDE = 1 << 2;
        const BLACK_QUEENSIDE = 1 << 3;
    }
}

impl CastlingRights {
    /// Returns the set of both rights belonging to a color.
    pub fn both_sides(color: Color) -> CastlingRights {
        match color {
            Color::White => CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE,
            Color::Black => CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE,
        }
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        if self.contains(CastlingRights::WHITE_KINGSIDE) {
            write!(f, "K")?;
        }
        if self.contains(CastlingRights::WHITE_QUEENSIDE) {
            write!(f, "Q")?;
        }
        if self.contains(CastlingRights::BLACK_KINGSIDE) {
            write!(f, "k")?;
        }
        if self.contains(CastlingRights::BLACK_QUEENSIDE) {
            write!(f, "q")?;
        }
        Ok(())
    }
}
