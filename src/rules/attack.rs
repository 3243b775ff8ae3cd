//! Attack detection.
//!
//! Sweeps the eight sliding directions, the knight offsets, and the two
//! pawn-attack squares. Adjacent enemy kings are not considered attackers.

use crate::board::board_state::BoardState;
use crate::board::square::Square;
use crate::board::types::{Color, PieceKind};

const STRAIGHT_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Whether any piece of `attacker` colour attacks `square`.
pub fn is_square_attacked(board: &BoardState, square: Square, attacker: Color) -> bool {
    for (d_row, d_col) in STRAIGHT_DIRECTIONS {
        if attacked_in_direction(board, square, d_row, d_col, attacker, false) {
            return true;
        }
    }
    for (d_row, d_col) in DIAGONAL_DIRECTIONS {
        if attacked_in_direction(board, square, d_row, d_col, attacker, true) {
            return true;
        }
    }

    for (d_row, d_col) in KNIGHT_OFFSETS {
        if let Some(target) = square.offset(d_row, d_col) {
            if board
                .piece_at(target)
                .is_some_and(|p| p.color == attacker && p.kind == PieceKind::Knight)
            {
                return true;
            }
        }
    }

    // An attacking pawn sits one row on the side it advances from.
    let pawn_row = match attacker {
        Color::Light => 1,
        Color::Dark => -1,
    };
    for d_col in [-1, 1] {
        if let Some(target) = square.offset(pawn_row, d_col) {
            if board
                .piece_at(target)
                .is_some_and(|p| p.color == attacker && p.kind == PieceKind::Pawn)
            {
                return true;
            }
        }
    }

    false
}

/// Whether the colour's king currently stands attacked. King-less positions
/// are invalid but must not crash, so they report false.
pub fn is_king_under_attack(board: &BoardState, color: Color) -> bool {
    match board.king_square(color) {
        Some(square) => is_square_attacked(board, square, color.opposite()),
        None => false,
    }
}

fn attacked_in_direction(
    board: &BoardState,
    from: Square,
    d_row: i8,
    d_col: i8,
    attacker: Color,
    diagonal: bool,
) -> bool {
    let mut current = from;
    while let Some(next) = current.offset(d_row, d_col) {
        current = next;
        if let Some(piece) = board.piece_at(current) {
            if piece.color != attacker {
                return false;
            }
            return match piece.kind {
                PieceKind::Queen => true,
                PieceKind::Rook => !diagonal,
                PieceKind::Bishop => diagonal,
                _ => false,
            };
        }
    }
    false
}
