use std::fmt::Display;

use crate::castling::CastlingRight;
use crate::coordinates::Square;
use crate::piece::{Color, Piece, PieceType};

/// The shape of a move, recovered from its flag bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    Capture,
    Castle,
    Promotion,
    CapturePromotion,
    EnPassant,
}

/// Represents a chess move packed into a `u32`.
///
/// The layout, from the least significant bit up: the moving piece type (3 bits), a capture flag
/// (1), the captured piece type (3), the start square (6), the end square (6), a castling flag
/// (1), a promotion flag (1), the promotion piece type (2), an en passant flag (1) and the moving
/// color (1). The two bit promotion field stores the promotion type's discriminant, which is why
/// only knight, bishop, rook and queen fit. A value decodes without any outside context.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move(u32);

const PIECE_TYPE_OFFSET: u32 = 0;
const CAPTURE_FLAG_OFFSET: u32 = 3;
const CAPTURED_OFFSET: u32 = 4;
const FROM_OFFSET: u32 = 7;
const TO_OFFSET: u32 = 13;
const CASTLE_FLAG_OFFSET: u32 = 19;
const PROMOTION_FLAG_OFFSET: u32 = 20;
const PROMOTION_OFFSET: u32 = 21;
const EN_PASSANT_FLAG_OFFSET: u32 = 23;
const COLOR_OFFSET: u32 = 24;

const ENCODED_BITS: u32 = 25;

impl Move {
    fn encode(
        piece: Piece,
        from: Square,
        to: Square,
        captured: Option<PieceType>,
        promote_to: Option<PieceType>,
        is_castle: bool,
        is_en_passant: bool,
    ) -> Move {
        let mut bits = 0u32;
        bits |= u32::from(u8::from(piece.piece_type())) << PIECE_TYPE_OFFSET;
        if let Some(captured) = captured {
            bits |= 1 << CAPTURE_FLAG_OFFSET;
            bits |= u32::from(u8::from(captured)) << CAPTURED_OFFSET;
        }
        bits |= u32::from(u8::from(from)) << FROM_OFFSET;
        bits |= u32::from(u8::from(to)) << TO_OFFSET;
        if is_castle {
            bits |= 1 << CASTLE_FLAG_OFFSET;
        }
        if let Some(promote_to) = promote_to {
            assert!(PieceType::PROMOTION_PIECE_TYPES.contains(&promote_to));
            bits |= 1 << PROMOTION_FLAG_OFFSET;
            bits |= u32::from(u8::from(promote_to)) << PROMOTION_OFFSET;
        }
        if is_en_passant {
            bits |= 1 << EN_PASSANT_FLAG_OFFSET;
        }
        bits |= u32::from(u8::from(piece.color())) << COLOR_OFFSET;
        Move(bits)
    }

    /// Creates a move that does not capture anything.
    pub fn new(piece: Piece, from: Square, to: Square) -> Move {
        Move::encode(piece, from, to, None, None, false, false)
    }

    /// Creates a capturing move.
    pub fn new_capture(piece: Piece, from: Square, to: Square, captured: PieceType) -> Move {
        Move::encode(piece, from, to, Some(captured), None, false, false)
    }

    /// Creates a quiet pawn promotion.
    pub fn new_promotion(color: Color, from: Square, to: Square, promote_to: PieceType) -> Move {
        Move::encode(
            Piece::new(color, PieceType::Pawn),
            from,
            to,
            None,
            Some(promote_to),
            false,
            false,
        )
    }

    /// Creates a capturing pawn promotion.
    pub fn new_capture_promotion(
        color: Color,
        from: Square,
        to: Square,
        captured: PieceType,
        promote_to: PieceType,
    ) -> Move {
        Move::encode(
            Piece::new(color, PieceType::Pawn),
            from,
            to,
            Some(captured),
            Some(promote_to),
            false,
            false,
        )
    }

    /// Creates an en passant capture. The captured piece is always a pawn and the captured pawn
    /// does not stand on the destination square.
    pub fn new_en_passant(color: Color, from: Square, to: Square) -> Move {
        Move::encode(
            Piece::new(color, PieceType::Pawn),
            from,
            to,
            Some(PieceType::Pawn),
            None,
            false,
            true,
        )
    }

    /// Creates a castling move, expressed as the king's displacement.
    pub fn new_castle(right: CastlingRight) -> Move {
        Move::encode(
            Piece::new(right.color(), PieceType::King),
            right.king_from(),
            right.king_to(),
            None,
            None,
            true,
            false,
        )
    }

    fn field(self, offset: u32, width: u32) -> u32 {
        (self.0 >> offset) & ((1 << width) - 1)
    }

    /// Returns the moving piece.
    pub fn piece(self) -> Piece {
        Piece::new(self.color(), self.piece_type())
    }

    /// Returns the type of the moving piece.
    pub fn piece_type(self) -> PieceType {
        PieceType::from(self.field(PIECE_TYPE_OFFSET, 3) as u8)
    }

    /// Returns the color of the moving piece.
    pub fn color(self) -> Color {
        Color::from(self.field(COLOR_OFFSET, 1) as u8)
    }

    /// Returns the square the piece moves from.
    pub fn from_square(self) -> Square {
        Square::from(self.field(FROM_OFFSET, 6) as u8)
    }

    /// Returns the square the piece moves to.
    pub fn to_square(self) -> Square {
        Square::from(self.field(TO_OFFSET, 6) as u8)
    }

    /// Indicates whether the move captures a piece.
    pub fn is_capture(self) -> bool {
        self.field(CAPTURE_FLAG_OFFSET, 1) != 0
    }

    /// Returns the captured piece if the move is a capture.
    pub fn captured(self) -> Option<Piece> {
        if self.is_capture() {
            let piece_type = PieceType::from(self.field(CAPTURED_OFFSET, 3) as u8);
            Some(Piece::new(self.color().opposite(), piece_type))
        } else {
            None
        }
    }

    /// Indicates whether the move is a castling.
    pub fn is_castle(self) -> bool {
        self.field(CASTLE_FLAG_OFFSET, 1) != 0
    }

    /// Returns the castling right a castling move exercises.
    pub fn castling_right(self) -> Option<CastlingRight> {
        if !self.is_castle() {
            return None;
        }
        CastlingRight::ALL_RIGHTS
            .into_iter()
            .find(|right| right.color() == self.color() && right.king_to() == self.to_square())
    }

    /// Indicates whether the move is a pawn promotion.
    pub fn is_promotion(self) -> bool {
        self.field(PROMOTION_FLAG_OFFSET, 1) != 0
    }

    /// Returns the piece type a promotion move promotes to.
    pub fn promotion(self) -> Option<PieceType> {
        if self.is_promotion() {
            Some(PieceType::from(self.field(PROMOTION_OFFSET, 2) as u8))
        } else {
            None
        }
    }

    /// Indicates whether the move is an en passant capture.
    pub fn is_en_passant(self) -> bool {
        self.field(EN_PASSANT_FLAG_OFFSET, 1) != 0
    }

    /// Returns the shape of the move.
    pub fn kind(self) -> MoveKind {
        if self.is_castle() {
            MoveKind::Castle
        } else if self.is_en_passant() {
            MoveKind::EnPassant
        } else if self.is_promotion() {
            if self.is_capture() {
                MoveKind::CapturePromotion
            } else {
                MoveKind::Promotion
            }
        } else if self.is_capture() {
            MoveKind::Capture
        } else {
            MoveKind::Quiet
        }
    }
}

impl From<Move> for u32 {
    /// Returns the packed representation of a move.
    fn from(mv: Move) -> Self {
        mv.0
    }
}

impl From<u32> for Move {
    /// Reconstitutes a move from its packed representation.
    fn from(value: u32) -> Self {
        assert!(value < 1 << ENCODED_BITS);
        Move(value)
    }
}

impl Display for Move {
    /// Formats the move in coordinate notation, with a lowercase suffix for promotions.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from_square(), self.to_square())?;
        if let Some(promote_to) = self.promotion() {
            let suffix = match promote_to {
                PieceType::Knight => 'n',
                PieceType::Bishop => 'b',
                PieceType::Rook => 'r',
                PieceType::Queen => 'q',
                _ => unreachable!(),
            };
            write!(f, "{}", suffix)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self, self.kind())
    }
}
