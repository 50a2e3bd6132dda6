use crate::analysis::Analysis;
use crate::castling::{CastlingRight, CastlingSide};
use crate::coordinates::Square;
use crate::direction::Direction;
use crate::lines;
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceType};
use crate::position::Position;

/// Generates every legal move for the side to move.
///
/// Double check restricts the answer to king moves. Single check restricts non-king moves to
/// capturing the checker or interposing on the check ray. Pinned pieces only move along their pin
/// line. The returned list contains no duplicates.
pub fn generate_legal_moves(position: &Position) -> Vec<Move> {
    let analysis = Analysis::from_position(position);
    let mut generator = Generator::new(position, &analysis);

    generator.generate_king_moves();
    if analysis.is_double_check() {
        return generator.moves;
    }

    let us = position.side_to_move();
    for piece_type in PieceType::ALL_PIECE_TYPES {
        if piece_type == PieceType::King {
            continue;
        }
        for &from in analysis.piece_squares(Piece::new(us, piece_type)) {
            match piece_type {
                PieceType::Pawn => generator.generate_pawn_moves(from),
                PieceType::Knight => generator.generate_knight_moves(from),
                _ => generator.generate_slider_moves(from, piece_type),
            }
        }
    }
    generator.generate_castlings();
    generator.moves
}

struct Generator<'a> {
    position: &'a Position,
    analysis: &'a Analysis<'a>,
    us: Color,
    /// With a single checker, the destinations that resolve the check. `None` when not in check.
    check_targets: Option<Vec<Square>>,
    moves: Vec<Move>,
}

impl<'a> Generator<'a> {
    fn new(position: &'a Position, analysis: &'a Analysis<'a>) -> Generator<'a> {
        let check_targets = match analysis.checkers() {
            &[] => None,
            &[checker] => Some(check_resolution_squares(analysis.king(), checker)),
            &[..] => Some(Vec::new()),
        };
        Generator {
            position,
            analysis,
            us: position.side_to_move(),
            check_targets,
            moves: Vec::new(),
        }
    }

    /// Indicates whether a non-king move from `from` to `to` respects the pin and check
    /// restrictions.
    fn allows(&self, from: Square, to: Square) -> bool {
        if let Some(pin) = self.analysis.pin_direction(from) {
            if Direction::between(self.analysis.king(), to) != pin {
                return false;
            }
        }
        match &self.check_targets {
            Some(targets) => targets.contains(&to),
            None => true,
        }
    }

    fn enemy_at(&self, square: Square) -> Option<PieceType> {
        self.position
            .piece_at(square)
            .filter(|piece| piece.color() != self.us)
            .map(Piece::piece_type)
    }

    fn push(&mut self, piece_type: PieceType, from: Square, to: Square) {
        let piece = Piece::new(self.us, piece_type);
        let mv = match self.enemy_at(to) {
            Some(captured) => Move::new_capture(piece, from, to, captured),
            None => Move::new(piece, from, to),
        };
        self.moves.push(mv);
    }

    fn generate_king_moves(&mut self) {
        let king = self.analysis.king();
        for &to in self.analysis.safe_king_squares() {
            self.push(PieceType::King, king, to);
        }
    }

    fn generate_knight_moves(&mut self, from: Square) {
        for &to in lines::knight_neighbors(from) {
            if self.position.piece_at(to).map_or(false, |piece| piece.color() == self.us) {
                continue;
            }
            if self.allows(from, to) {
                self.push(PieceType::Knight, from, to);
            }
        }
    }

    fn generate_slider_moves(&mut self, from: Square, piece_type: PieceType) {
        for &direction in piece_type.slide_directions() {
            for &to in lines::ray(from, direction) {
                match self.position.piece_at(to) {
                    Some(piece) if piece.color() == self.us => break,
                    Some(_) => {
                        if self.allows(from, to) {
                            self.push(piece_type, from, to);
                        }
                        break;
                    }
                    None => {
                        if self.allows(from, to) {
                            self.push(piece_type, from, to);
                        }
                    }
                }
            }
        }
    }

    fn generate_pawn_moves(&mut self, from: Square) {
        let push = self.us.pawn_push();
        let promotion_rank = self.us.promotion_rank();

        // Pushes. Back-rank validation guarantees the forward neighbor exists.
        if let Some(to) = from.towards(push) {
            if self.position.piece_at(to).is_none() {
                if to.rank() == promotion_rank {
                    self.push_promotions(from, to, None);
                } else {
                    if self.allows(from, to) {
                        self.push(PieceType::Pawn, from, to);
                    }
                    if from.rank() == self.us.pawn_start_rank() {
                        let double = to.towards(push).expect("a start-rank pawn can push twice");
                        if self.position.piece_at(double).is_none() && self.allows(from, double) {
                            self.push(PieceType::Pawn, from, double);
                        }
                    }
                }
            }
        }

        // Captures.
        for lateral in [-1, 1] {
            let diagonal = Direction::by_deltas(lateral, push.rank_delta());
            let Some(to) = from.towards(diagonal) else {
                continue;
            };
            let Some(captured) = self.enemy_at(to) else {
                continue;
            };
            if to.rank() == promotion_rank {
                self.push_promotions(from, to, Some(captured));
            } else if self.allows(from, to) {
                let piece = Piece::new(self.us, PieceType::Pawn);
                self.moves.push(Move::new_capture(piece, from, to, captured));
            }
        }

        self.generate_en_passant(from);
    }

    fn push_promotions(&mut self, from: Square, to: Square, captured: Option<PieceType>) {
        if !self.allows(from, to) {
            return;
        }
        for promote_to in PieceType::PROMOTION_PIECE_TYPES {
            let mv = match captured {
                Some(captured) => {
                    Move::new_capture_promotion(self.us, from, to, captured, promote_to)
                }
                None => Move::new_promotion(self.us, from, to, promote_to),
            };
            self.moves.push(mv);
        }
    }

    fn generate_en_passant(&mut self, from: Square) {
        let Some(file) = self.position.en_passant_file() else {
            return;
        };
        let enemy = self.us.opposite();
        let captured = Square::new(file, enemy.double_push_rank());
        let adjacent = from.rank() == captured.rank()
            && (u8::from(from.file()) as i8 - u8::from(file) as i8).abs() == 1;
        if !adjacent {
            return;
        }
        let to = captured
            .towards(self.us.pawn_push())
            .expect("the square behind a double-pushed pawn is on the board");

        if let Some(pin) = self.analysis.pin_direction(from) {
            if Direction::between(self.analysis.king(), to) != pin {
                return;
            }
        }
        // Capturing the checking pawn resolves the check even though the destination differs.
        if let Some(targets) = &self.check_targets {
            if !targets.contains(&to) && self.analysis.checkers() != [captured] {
                return;
            }
        }
        if self.analysis.is_en_passant_exposed(from, captured) {
            return;
        }
        self.moves.push(Move::new_en_passant(self.us, from, to));
    }

    fn generate_castlings(&mut self) {
        if self.analysis.is_in_check() {
            return;
        }
        for side in CastlingSide::ALL_SIDES {
            let right = CastlingRight::new(self.us, side);
            if !self.position.can_castle(right) {
                continue;
            }
            if self.position.piece_at(right.king_from())
                != Some(Piece::new(self.us, PieceType::King))
                || self.position.piece_at(right.rook_from())
                    != Some(Piece::new(self.us, PieceType::Rook))
            {
                continue;
            }
            let vacated = right
                .vacated()
                .iter()
                .all(|&square| self.position.piece_at(square).is_none());
            let path_safe = right
                .king_path()
                .iter()
                .all(|&square| !self.analysis.is_square_attacked(square));
            if vacated && path_safe {
                self.moves.push(Move::new_castle(right));
            }
        }
    }
}

/// Returns the destinations that resolve a single check: the checker's square and, for a sliding
/// checker, the empty squares between it and the king.
fn check_resolution_squares(king: Square, checker: Square) -> Vec<Square> {
    let mut targets = vec![checker];
    let direction = Direction::between(king, checker);
    if direction != Direction::None {
        for &square in lines::ray(king, direction) {
            if square == checker {
                break;
            }
            targets.push(square);
        }
    }
    targets
}
