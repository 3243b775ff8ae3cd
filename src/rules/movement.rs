//! Per-piece movement predicates.
//!
//! These answer "can this piece pattern reach that square" without any king
//! safety. Kings and queens report true unconditionally at this layer; the
//! candidate-resolution path relies on that leniency the same way the
//! sliding enumeration and king-safety checks one layer up compensate for
//! it.

use crate::board::board_state::BoardState;
use crate::board::square::Square;
use crate::board::types::{Color, PieceKind};

/// Row direction a pawn of the given colour advances in.
#[inline]
pub const fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::Light => -1,
        Color::Dark => 1,
    }
}

/// Movement-predicate legality from `from` to `to` for the piece standing
/// on `from`. False when `from` is empty.
pub fn piece_can_reach(board: &BoardState, from: Square, to: Square) -> bool {
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return false,
    };
    if from == to {
        return false;
    }

    // King safety and sliding enumeration are enforced one layer up.
    if matches!(piece.kind, PieceKind::King | PieceKind::Queen) {
        return true;
    }

    if board.piece_at(to).is_some_and(|dest| dest.color == piece.color) {
        return false;
    }

    let d_row = to.row as i8 - from.row as i8;
    let d_col = to.col as i8 - from.col as i8;

    match piece.kind {
        PieceKind::Pawn => pawn_can_reach(board, from, to, d_row, d_col),
        PieceKind::Rook => {
            (d_row == 0) != (d_col == 0) && path_is_clear(board, from, to, d_row, d_col)
        }
        PieceKind::Bishop => {
            d_row.abs() == d_col.abs() && path_is_clear(board, from, to, d_row, d_col)
        }
        PieceKind::Knight => {
            (d_row.abs() == 2 && d_col.abs() == 1) || (d_row.abs() == 1 && d_col.abs() == 2)
        }
        PieceKind::Queen | PieceKind::King => unreachable!("handled above"),
    }
}

fn pawn_can_reach(board: &BoardState, from: Square, to: Square, d_row: i8, d_col: i8) -> bool {
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return false,
    };
    let dir = pawn_direction(piece.color);
    let dest = board.piece_at(to);

    // Single push.
    if d_col == 0 && d_row == dir && dest.is_none() {
        return true;
    }

    // Double push from the un-moved rank, intermediate square clear.
    if d_col == 0 && d_row == 2 * dir && dest.is_none() && !piece.has_moved {
        let between = from
            .offset(dir, 0)
            .expect("one step ahead of a double push stays on the board");
        if board.piece_at(between).is_none() {
            return true;
        }
    }

    // Diagonal capture only.
    if d_col.abs() == 1
        && d_row == dir
        && dest.is_some_and(|target| target.color == piece.color.opposite())
    {
        return true;
    }

    false
}

/// Every square strictly between `from` and `to` is empty. Caller
/// guarantees the two are aligned on a rank, file, or diagonal.
fn path_is_clear(board: &BoardState, from: Square, to: Square, d_row: i8, d_col: i8) -> bool {
    let step_row = d_row.signum();
    let step_col = d_col.signum();

    let mut current = from;
    loop {
        current = match current.offset(step_row, step_col) {
            Some(next) => next,
            None => return false,
        };
        if current == to {
            return true;
        }
        if board.piece_at(current).is_some() {
            return false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    #[test]
    fn pawn_pushes_from_the_start_rank() {
        let board = BoardState::new_game();
        assert!(piece_can_reach(&board, sq(6, 4), sq(5, 4)));
        assert!(piece_can_reach(&board, sq(6, 4), sq(4, 4)));
        assert!(!piece_can_reach(&board, sq(6, 4), sq(3, 4)));
        assert!(!piece_can_reach(&board, sq(6, 4), sq(5, 5)));
    }

    #[test]
    fn moved_pawn_loses_the_double_push() {
        let mut board = BoardState::new_game();
        board.move_piece(sq(6, 4), sq(5, 4)).expect("e2-e3");
        assert!(piece_can_reach(&board, sq(5, 4), sq(4, 4)));
        assert!(!piece_can_reach(&board, sq(5, 4), sq(3, 4)));
    }

    #[test]
    fn double_push_is_blocked_by_an_intermediate_piece() {
        let board =
            BoardState::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").expect("fen");
        assert!(!piece_can_reach(&board, sq(6, 4), sq(4, 4)));
        assert!(!piece_can_reach(&board, sq(6, 4), sq(5, 4)));
    }

    #[test]
    fn pawn_captures_diagonally_only_onto_opponents() {
        let board =
            BoardState::from_fen("4k3/8/8/8/8/3p4/4P3/4K3 w - - 0 1").expect("fen");
        assert!(piece_can_reach(&board, sq(6, 4), sq(5, 3)));
        assert!(!piece_can_reach(&board, sq(6, 4), sq(5, 5)));
    }

    #[test]
    fn dark_pawns_advance_down_the_board() {
        let board = BoardState::new_game();
        assert!(piece_can_reach(&board, sq(1, 3), sq(2, 3)));
        assert!(piece_can_reach(&board, sq(1, 3), sq(3, 3)));
        assert!(!piece_can_reach(&board, sq(1, 3), sq(0, 3)));
    }

    #[test]
    fn rook_needs_a_clear_straight_path() {
        let board =
            BoardState::from_fen("4k3/8/8/8/R2p4/8/8/4K3 w - - 0 1").expect("fen");
        assert!(piece_can_reach(&board, sq(4, 0), sq(4, 3)));
        assert!(!piece_can_reach(&board, sq(4, 0), sq(4, 5)));
        assert!(piece_can_reach(&board, sq(4, 0), sq(0, 0)));
        assert!(!piece_can_reach(&board, sq(4, 0), sq(3, 1)));
    }

    #[test]
    fn bishop_needs_a_clear_diagonal() {
        let board =
            BoardState::from_fen("4k3/8/8/2p5/8/4B3/8/4K3 w - - 0 1").expect("fen");
        assert!(piece_can_reach(&board, sq(5, 4), sq(3, 2)));
        assert!(!piece_can_reach(&board, sq(5, 4), sq(2, 1)));
        assert!(!piece_can_reach(&board, sq(5, 4), sq(5, 6)));
    }

    #[test]
    fn knight_jumps_its_offset_set() {
        let board = BoardState::new_game();
        assert!(piece_can_reach(&board, sq(7, 1), sq(5, 2)));
        assert!(piece_can_reach(&board, sq(7, 1), sq(5, 0)));
        assert!(!piece_can_reach(&board, sq(7, 1), sq(5, 1)));
        // Own pawn on d2 blocks the landing square.
        assert!(!piece_can_reach(&board, sq(7, 1), sq(6, 3)));
    }

    #[test]
    fn king_and_queen_are_unconditionally_legal_at_this_layer() {
        let board = BoardState::new_game();
        assert!(piece_can_reach(&board, sq(7, 4), sq(0, 0)));
        assert!(piece_can_reach(&board, sq(7, 3), sq(2, 6)));
    }

    #[test]
    fn empty_source_square_reaches_nothing() {
        let board = BoardState::new_game();
        assert!(!piece_can_reach(&board, sq(4, 4), sq(3, 4)));
    }
}
