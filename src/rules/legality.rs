//! Full move legality: king safety, castling eligibility, legal-move
//! enumeration, and candidate-source resolution for algebraic tokens.

use crate::board::board_state::{home_row, BoardState};
use crate::board::square::{Square, BOARD_SIZE};
use crate::board::types::{castle_right, CastleSide, Color, PieceKind};
use crate::rules::attack::is_king_under_attack;
use crate::rules::movement::piece_can_reach;

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Whether moving `from` to `to` would leave the mover's own king under
/// attack. The move is tried on a scratch copy, so the live board is never
/// touched.
pub fn would_expose_king(board: &BoardState, from: Square, to: Square) -> bool {
    let color = match board.piece_at(from) {
        Some(piece) => piece.color,
        None => return false,
    };

    let mut trial = board.clone();
    if trial.move_piece(from, to).is_err() {
        return false;
    }
    is_king_under_attack(&trial, color)
}

/// Castling eligibility: rights still held, king and rook in place, the
/// intervening squares empty, the king not in check, and neither the
/// transit square nor the destination exposing the king.
pub fn can_castle(board: &BoardState, color: Color, side: CastleSide) -> bool {
    if board.castling_rights & castle_right(color, side) == 0 {
        return false;
    }

    let row = home_row(color);
    let king_from = Square { row, col: 4 };
    if !board
        .piece_at(king_from)
        .is_some_and(|p| p.kind == PieceKind::King && p.color == color)
    {
        return false;
    }

    let (rook_col, between_cols): (u8, &'static [u8]) = match side {
        CastleSide::KingSide => (7, &[5, 6]),
        CastleSide::QueenSide => (0, &[1, 2, 3]),
    };
    let (transit_col, dest_col) = match side {
        CastleSide::KingSide => (5, 6),
        CastleSide::QueenSide => (3, 2),
    };

    if !board
        .piece_at(Square { row, col: rook_col })
        .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color)
    {
        return false;
    }

    for col in between_cols {
        if board.piece_at(Square { row, col: *col }).is_some() {
            return false;
        }
    }

    if is_king_under_attack(board, color) {
        return false;
    }

    !would_expose_king(board, king_from, Square { row, col: transit_col })
        && !would_expose_king(board, king_from, Square { row, col: dest_col })
}

/// Every square the piece on `from` may legally move to, castling targets
/// included. A move is allowed when, simulated, it leaves the mover's king
/// not under attack. Used for UI highlighting and interactive validation.
pub fn legal_destinations(board: &BoardState, from: Square) -> Vec<Square> {
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return Vec::new(),
    };
    let color = piece.color;

    let mut out = match piece.kind {
        PieceKind::Pawn | PieceKind::Knight => {
            let mut targets = Vec::new();
            for row in 0..BOARD_SIZE {
                for col in 0..BOARD_SIZE {
                    let to = Square { row, col };
                    if piece_can_reach(board, from, to) {
                        targets.push(to);
                    }
                }
            }
            targets
        }
        PieceKind::Rook => slide_destinations(board, from, color, &ROOK_DIRECTIONS),
        PieceKind::Bishop => slide_destinations(board, from, color, &BISHOP_DIRECTIONS),
        PieceKind::Queen => {
            let mut targets = slide_destinations(board, from, color, &ROOK_DIRECTIONS);
            targets.extend(slide_destinations(board, from, color, &BISHOP_DIRECTIONS));
            targets
        }
        PieceKind::King => {
            let mut targets = Vec::new();
            for d_row in -1..=1i8 {
                for d_col in -1..=1i8 {
                    if d_row == 0 && d_col == 0 {
                        continue;
                    }
                    if let Some(to) = from.offset(d_row, d_col) {
                        if !board.piece_at(to).is_some_and(|p| p.color == color) {
                            targets.push(to);
                        }
                    }
                }
            }
            let row = home_row(color);
            if can_castle(board, color, CastleSide::KingSide) {
                targets.push(Square { row, col: 6 });
            }
            if can_castle(board, color, CastleSide::QueenSide) {
                targets.push(Square { row, col: 2 });
            }
            return targets
                .into_iter()
                .filter(|to| !would_expose_king(board, from, *to))
                .collect();
        }
    };

    out.retain(|to| !would_expose_king(board, from, *to));
    out
}

/// Row-major scan for pieces of the side to move that could produce the
/// given destination, filtered by the optional disambiguators. The lenient
/// notation path takes the first entry.
pub fn find_candidate_sources(
    board: &BoardState,
    kind: PieceKind,
    dest: Square,
    disamb_col: Option<u8>,
    disamb_row: Option<u8>,
) -> Vec<Square> {
    let mut candidates = Vec::new();

    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let from = Square { row, col };
            let matches_kind = board
                .piece_at(from)
                .is_some_and(|p| p.kind == kind && p.color == board.side_to_move);
            if !matches_kind {
                continue;
            }
            if !piece_can_reach(board, from, dest) {
                continue;
            }
            if disamb_col.is_some_and(|c| c != col) {
                continue;
            }
            if disamb_row.is_some_and(|r| r != row) {
                continue;
            }
            candidates.push(from);
        }
    }

    candidates
}

fn slide_destinations(
    board: &BoardState,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
) -> Vec<Square> {
    let mut targets = Vec::new();
    for (d_row, d_col) in directions {
        let mut current = from;
        while let Some(next) = current.offset(*d_row, *d_col) {
            current = next;
            match board.piece_at(current) {
                None => targets.push(current),
                Some(other) => {
                    if other.color != color {
                        targets.push(current);
                    }
                    break;
                }
            }
        }
    }
    targets
}
