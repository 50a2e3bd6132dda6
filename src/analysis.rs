use crate::coordinates::Square;
use crate::direction::Direction;
use crate::lines;
use crate::piece::{Color, Piece, PieceType};
use crate::position::Position;

type Board = [Option<Piece>; Square::COUNT];

/// Indicates whether any piece of `by`'s color attacks `target`.
///
/// When `ignored` is set, that square is treated as empty, which lets king-safety tests look
/// through the king itself so that a slider's attack extends past it.
pub(crate) fn attacks(board: &Board, target: Square, by: Color, ignored: Option<Square>) -> bool {
    let occupant = |square: Square| {
        if Some(square) == ignored {
            None
        } else {
            board[usize::from(square)]
        }
    };

    for &square in lines::knight_neighbors(target) {
        if occupant(square) == Some(Piece::new(by, PieceType::Knight)) {
            return true;
        }
    }
    for &square in lines::king_neighbors(target) {
        if occupant(square) == Some(Piece::new(by, PieceType::King)) {
            return true;
        }
    }
    // A pawn of color `by` attacks `target` from one square behind it, on either adjacent file.
    for lateral in [-1, 1] {
        let towards_pawn = Direction::by_deltas(lateral, -by.pawn_push().rank_delta());
        if let Some(square) = target.towards(towards_pawn) {
            if occupant(square) == Some(Piece::new(by, PieceType::Pawn)) {
                return true;
            }
        }
    }
    for direction in Direction::OUTWARD {
        for &square in lines::ray(target, direction) {
            if let Some(piece) = occupant(square) {
                if piece.color() == by && piece.piece_type().slide_directions().contains(&direction)
                {
                    return true;
                }
                break;
            }
        }
    }
    false
}

/// The preprocessed view of a position that legal move generation works from.
///
/// One scan outward from the king in each of the eight directions yields both the sliding
/// checkers and the pinned pieces, since a pin is just a check ray interrupted by exactly one
/// friendly piece. Knight and pawn checks are found by direct offset tests.
pub struct Analysis<'a> {
    position: &'a Position,
    king: Square,
    checkers: Vec<Square>,
    pins: [Option<Direction>; Square::COUNT],
    safe_king_squares: Vec<Square>,
    piece_squares: [Vec<Square>; Piece::COUNT],
}

impl<'a> Analysis<'a> {
    /// Analyzes a position from the point of view of the side to move.
    pub fn from_position(position: &'a Position) -> Analysis<'a> {
        let us = position.side_to_move();
        let king = position.king_square(us);
        let board = position.board();

        let mut piece_squares: [Vec<Square>; Piece::COUNT] =
            std::array::from_fn(|_| Vec::new());
        for square in Square::ALL_SQUARES {
            if let Some(piece) = board[usize::from(square)] {
                piece_squares[usize::from(piece)].push(square);
            }
        }

        let mut checkers = Vec::new();
        let mut pins = [None; Square::COUNT];
        for direction in Direction::OUTWARD {
            scan_ray(board, us, king, direction, &mut checkers, &mut pins);
        }
        for &square in lines::knight_neighbors(king) {
            if board[usize::from(square)] == Some(Piece::new(us.opposite(), PieceType::Knight)) {
                checkers.push(square);
            }
        }
        for lateral in [-1, 1] {
            let towards_pawn = Direction::by_deltas(lateral, us.pawn_push().rank_delta());
            if let Some(square) = king.towards(towards_pawn) {
                if board[usize::from(square)] == Some(Piece::new(us.opposite(), PieceType::Pawn)) {
                    checkers.push(square);
                }
            }
        }

        let safe_king_squares = lines::king_neighbors(king)
            .iter()
            .copied()
            .filter(|&square| {
                let occupant = board[usize::from(square)];
                occupant.map_or(true, |piece| piece.color() != us)
                    && !attacks(board, square, us.opposite(), Some(king))
            })
            .collect();

        Analysis { position, king, checkers, pins, safe_king_squares, piece_squares }
    }

    /// Returns the square of the side to move's king.
    pub fn king(&self) -> Square {
        self.king
    }

    /// Returns the squares of the pieces currently giving check.
    pub fn checkers(&self) -> &[Square] {
        &self.checkers
    }

    /// Indicates whether the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        !self.checkers.is_empty()
    }

    /// Indicates whether at least two pieces give check at once.
    pub fn is_double_check(&self) -> bool {
        self.checkers.len() >= 2
    }

    /// Returns the direction of the pin ray through a pinned friendly piece, pointing from the
    /// king towards the piece, or `None` if the piece on that square is not pinned.
    pub fn pin_direction(&self, square: Square) -> Option<Direction> {
        self.pins[usize::from(square)]
    }

    /// Returns the king's neighboring squares it could move to without landing in check. Squares
    /// occupied by friendly pieces are excluded, squares occupied by undefended enemy pieces are
    /// included.
    pub fn safe_king_squares(&self) -> &[Square] {
        &self.safe_king_squares
    }

    /// Indicates whether an enemy piece attacks a square of the side to move.
    pub fn is_square_attacked(&self, square: Square) -> bool {
        attacks(
            self.position.board(),
            square,
            self.position.side_to_move().opposite(),
            None,
        )
    }

    /// Returns the squares holding the given piece, in board order.
    pub fn piece_squares(&self, piece: Piece) -> &[Square] {
        &self.piece_squares[usize::from(piece)]
    }

    /// Indicates whether capturing en passant with the pawn on `from`, removing the enemy pawn on
    /// `captured`, would leave the king attacked along their shared rank.
    ///
    /// This is the one discovered check the pin scan cannot see, because two pawns leave the rank
    /// in a single move.
    pub fn is_en_passant_exposed(&self, from: Square, captured: Square) -> bool {
        if self.king.rank() != from.rank() {
            return false;
        }
        let board = self.position.board();
        let enemy = self.position.side_to_move().opposite();
        let direction = Direction::between(self.king, from);
        for &square in lines::ray(self.king, direction) {
            if square == from || square == captured {
                continue;
            }
            if let Some(piece) = board[usize::from(square)] {
                return piece.color() == enemy
                    && piece.piece_type().slide_directions().contains(&direction);
            }
        }
        false
    }
}

/// Walks one ray away from the king, recording a checking slider or a pin. A single friendly
/// piece between the king and an enemy slider on the ray is pinned; a second blocker of either
/// color ends the scan.
fn scan_ray(
    board: &Board,
    us: Color,
    king: Square,
    direction: Direction,
    checkers: &mut Vec<Square>,
    pins: &mut [Option<Direction>; Square::COUNT],
) {
    let mut blocker: Option<Square> = None;
    for &square in lines::ray(king, direction) {
        let Some(piece) = board[usize::from(square)] else {
            continue;
        };
        if piece.color() == us {
            if blocker.is_some() {
                return;
            }
            blocker = Some(square);
            continue;
        }
        if piece.piece_type().slide_directions().contains(&direction) {
            match blocker {
                None => checkers.push(square),
                Some(pinned) => pins[usize::from(pinned)] = Some(direction),
            }
        }
        return;
    }
}
