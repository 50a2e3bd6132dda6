use std::fmt::Display;
use std::sync::OnceLock;

use thiserror::Error;

use crate::castling::{CastlingRight, CastlingRights};
use crate::coordinates::{File, Rank, Square};
use crate::movegen;
use crate::moves::{Move, MoveKind};
use crate::piece::{Color, Piece, PieceType};

/// Represents the reasons a piece arrangement can be rejected when building a [`Position`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    TooManyKings(Color),

    #[error("there is a pawn on the back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("the en passant file {0} is not backed by a just-pushed {1} pawn")]
    InvalidEnPassant(File, Color),
}

/// Represents a chess position.
///
/// A position is an immutable value: deriving the next position with [`Position::apply`] leaves
/// the source untouched. The legal move list is computed on first request and cached, so the set
/// of moves a position answers with can never change over its lifetime.
#[derive(Debug)]
pub struct Position {
    board: [Option<Piece>; Square::COUNT],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_file: Option<File>,
    halfmove_clock: u16,
    last_move: Option<Move>,
    king_squares: [Square; Color::COUNT],
    legal_moves: OnceLock<Vec<Move>>,
}

impl Clone for Position {
    fn clone(&self) -> Self {
        Position {
            board: self.board,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_file: self.en_passant_file,
            halfmove_clock: self.halfmove_clock,
            last_move: self.last_move,
            king_squares: self.king_squares,
            legal_moves: self.legal_moves.clone(),
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_file == other.en_passant_file
    }
}

impl Eq for Position {}

impl Position {
    /// Returns the position at the start of a game.
    pub fn initial() -> Position {
        PositionBuilder::starting_position()
            .build()
            .expect("the starting arrangement is valid")
    }

    /// Returns the piece standing on a square.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[usize::from(square)]
    }

    pub(crate) fn board(&self) -> &[Option<Piece>; Square::COUNT] {
        &self.board
    }

    /// Returns the color whose turn it is.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Indicates whether a castling right is still available. A right being available does not
    /// mean castling is playable right now.
    pub fn can_castle(&self, right: CastlingRight) -> bool {
        self.castling_rights.contains(right.flag())
    }

    /// Returns the full set of still-available castling rights.
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Returns the file on which an en passant capture is currently possible.
    pub fn en_passant_file(&self) -> Option<File> {
        self.en_passant_file
    }

    /// Returns the number of plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Returns the move that produced this position, if it was derived from another position.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Returns the square the given color's king stands on.
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[usize::from(color)]
    }

    /// Returns every legal move in this position. The list is computed once and cached.
    pub fn legal_moves(&self) -> &[Move] {
        self.legal_moves
            .get_or_init(|| movegen::generate_legal_moves(self))
    }

    /// Returns the position reached by playing a move.
    ///
    /// The move must belong to the side to move and its piece must stand on its start square;
    /// violating either is a caller bug and panics.
    pub fn apply(&self, mv: Move) -> Position {
        assert_eq!(mv.color(), self.side_to_move, "move is for the wrong side");
        assert_eq!(
            self.piece_at(mv.from_square()),
            Some(mv.piece()),
            "the moving piece is not on its start square"
        );

        let mut builder = PositionBuilder::from_position(self);
        builder.set_en_passant(None);
        builder.clear(mv.from_square());

        match mv.kind() {
            MoveKind::Quiet | MoveKind::Capture => {
                builder.set_piece(mv.to_square(), mv.piece());
                if mv.piece_type() == PieceType::Pawn && is_double_push(mv.from_square(), mv.to_square()) {
                    builder.set_en_passant(Some(mv.from_square().file()));
                }
            }
            MoveKind::EnPassant => {
                builder.set_piece(mv.to_square(), mv.piece());
                builder.clear(Square::new(mv.to_square().file(), mv.from_square().rank()));
            }
            MoveKind::Promotion | MoveKind::CapturePromotion => {
                let promote_to = mv.promotion().expect("a promotion move has a target type");
                builder.set_piece(mv.to_square(), Piece::new(mv.color(), promote_to));
            }
            MoveKind::Castle => {
                let right = mv.castling_right().expect("a castling move names its right");
                builder.set_piece(mv.to_square(), mv.piece());
                builder.clear(right.rook_from());
                builder.set_piece(right.rook_to(), Piece::new(mv.color(), PieceType::Rook));
            }
        }

        let mut rights = self.castling_rights;
        rights &= !rights_anchored_at(mv.from_square());
        rights &= !rights_anchored_at(mv.to_square());
        builder.set_castling(rights);

        if mv.piece_type() == PieceType::Pawn || mv.is_capture() {
            builder.set_halfmove_clock(0);
        } else {
            builder.set_halfmove_clock(self.halfmove_clock + 1);
        }

        builder.set_last_move(Some(mv));
        builder.set_side_to_move(self.side_to_move.opposite());
        builder
            .build()
            .expect("applying a move to a valid position yields a valid position")
    }
}

/// Returns the castling rights that depend on the piece standing on a square, for revocation when
/// that square is vacated or captured on.
fn rights_anchored_at(square: Square) -> CastlingRights {
    let mut rights = CastlingRights::empty();
    for right in CastlingRight::ALL_RIGHTS {
        if right.king_from() == square || right.rook_from() == square {
            rights |= right.flag();
        }
    }
    rights
}

fn is_double_push(from: Square, to: Square) -> bool {
    from.file() == to.file()
        && (u8::from(from.rank()) as i8 - u8::from(to.rank()) as i8).abs() == 2
}

/// Builds [`Position`] values, validating the arrangement once at [`PositionBuilder::build`].
#[derive(Clone, Debug)]
pub struct PositionBuilder {
    board: [Option<Piece>; Square::COUNT],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_file: Option<File>,
    halfmove_clock: u16,
    last_move: Option<Move>,
}

impl PositionBuilder {
    /// Creates a builder for an empty board, white to move, no castling rights.
    pub fn new() -> PositionBuilder {
        PositionBuilder {
            board: [None; Square::COUNT],
            side_to_move: Color::White,
            castling_rights: CastlingRights::empty(),
            en_passant_file: None,
            halfmove_clock: 0,
            last_move: None,
        }
    }

    /// Creates a builder holding the starting arrangement with all castling rights.
    pub fn starting_position() -> PositionBuilder {
        let mut builder = PositionBuilder::new();
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, piece_type) in File::ALL_FILES.into_iter().zip(back_rank) {
            builder.set_piece(Square::new(file, Rank::R1), Piece::new(Color::White, piece_type));
            builder.set_piece(Square::new(file, Rank::R2), Piece::WHITE_PAWN);
            builder.set_piece(Square::new(file, Rank::R7), Piece::BLACK_PAWN);
            builder.set_piece(Square::new(file, Rank::R8), Piece::new(Color::Black, piece_type));
        }
        builder.set_castling(CastlingRights::all());
        builder
    }

    /// Creates a builder seeded with an existing position.
    pub fn from_position(position: &Position) -> PositionBuilder {
        PositionBuilder {
            board: position.board,
            side_to_move: position.side_to_move,
            castling_rights: position.castling_rights,
            en_passant_file: position.en_passant_file,
            halfmove_clock: position.halfmove_clock,
            last_move: position.last_move,
        }
    }

    /// Puts a piece on a square, replacing whatever stood there.
    pub fn set_piece(&mut self, square: Square, piece: Piece) -> &mut PositionBuilder {
        self.board[usize::from(square)] = Some(piece);
        self
    }

    /// Empties a square.
    pub fn clear(&mut self, square: Square) -> &mut PositionBuilder {
        self.board[usize::from(square)] = None;
        self
    }

    /// Sets the color to move.
    pub fn set_side_to_move(&mut self, color: Color) -> &mut PositionBuilder {
        self.side_to_move = color;
        self
    }

    /// Sets the full castling rights set.
    pub fn set_castling(&mut self, rights: CastlingRights) -> &mut PositionBuilder {
        self.castling_rights = rights;
        self
    }

    /// Sets or clears the en passant capture file.
    pub fn set_en_passant(&mut self, file: Option<File>) -> &mut PositionBuilder {
        self.en_passant_file = file;
        self
    }

    /// Sets the number of plies since the last capture or pawn move.
    pub fn set_halfmove_clock(&mut self, halfmove_clock: u16) -> &mut PositionBuilder {
        self.halfmove_clock = halfmove_clock;
        self
    }

    /// Records the move that produced the position being built.
    pub fn set_last_move(&mut self, last_move: Option<Move>) -> &mut PositionBuilder {
        self.last_move = last_move;
        self
    }

    /// Validates the arrangement and returns the finished position.
    pub fn build(&self) -> Result<Position, PositionError> {
        let king_squares = self.find_kings()?;
        self.check_pawn_ranks()?;
        self.check_en_passant()?;
        Ok(Position {
            board: self.board,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_file: self.en_passant_file,
            halfmove_clock: self.halfmove_clock,
            last_move: self.last_move,
            king_squares,
            legal_moves: OnceLock::new(),
        })
    }

    fn find_kings(&self) -> Result<[Square; Color::COUNT], PositionError> {
        let mut kings = [None; Color::COUNT];
        for square in Square::ALL_SQUARES {
            if let Some(piece) = self.board[usize::from(square)] {
                if piece.piece_type() == PieceType::King {
                    let slot = &mut kings[usize::from(piece.color())];
                    if slot.is_some() {
                        return Err(PositionError::TooManyKings(piece.color()));
                    }
                    *slot = Some(square);
                }
            }
        }
        Ok([
            kings[usize::from(Color::White)].ok_or(PositionError::MissingKing(Color::White))?,
            kings[usize::from(Color::Black)].ok_or(PositionError::MissingKing(Color::Black))?,
        ])
    }

    fn check_pawn_ranks(&self) -> Result<(), PositionError> {
        for square in Square::ALL_SQUARES {
            if square.rank() != Rank::R1 && square.rank() != Rank::R8 {
                continue;
            }
            if let Some(piece) = self.board[usize::from(square)] {
                if piece.piece_type() == PieceType::Pawn {
                    return Err(PositionError::PawnOnBackRank(square));
                }
            }
        }
        Ok(())
    }

    fn check_en_passant(&self) -> Result<(), PositionError> {
        let Some(file) = self.en_passant_file else {
            return Ok(());
        };
        let pusher = self.side_to_move.opposite();
        let pawn_square = Square::new(file, pusher.double_push_rank());
        let invalid = || PositionError::InvalidEnPassant(file, pusher);

        if self.board[usize::from(pawn_square)] != Some(Piece::new(pusher, PieceType::Pawn)) {
            return Err(invalid());
        }
        // The pawn just pushed two squares, so the squares it crossed are empty.
        let backwards = pusher.pawn_push().opposite();
        let mut crossed = pawn_square;
        for _ in 0..2 {
            crossed = crossed
                .towards(backwards)
                .expect("a double-pushed pawn is two squares from its start rank");
            if self.board[usize::from(crossed)].is_some() {
                return Err(invalid());
            }
        }
        Ok(())
    }
}

impl Default for PositionBuilder {
    fn default() -> Self {
        PositionBuilder::new()
    }
}

impl Display for Position {
    /// Renders the board as an 8x8 grid with rank and file labels, pieces in English letters and
    /// empty squares as dots.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in Rank::ALL_RANKS.into_iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL_FILES {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => write!(f, " {}", piece)?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{} to move", self.side_to_move)
    }
}
