//! Authoritative board state.
//!
//! `BoardState` owns the piece arena and the 8x8 grid of arena handles,
//! together with side-to-move, castling rights, and the move counters.
//! Snapshots and trial moves are whole-value clones; nothing in this module
//! mutates state it later has to restore by hand.

use crate::board::square::{Square, BOARD_SIZE};
use crate::board::types::*;
use crate::errors::ChessError;
use crate::notation::fen::{generate_fen, parse_fen};

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Back rank of the given colour in the internal convention.
#[inline]
pub const fn home_row(color: Color) -> u8 {
    match color {
        Color::Light => 7,
        Color::Dark => 0,
    }
}

#[derive(Debug, Clone)]
pub struct BoardState {
    grid: [[Option<PieceId>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    pieces: Vec<PieceRecord>,
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    /// Parsed from FEN and re-emitted; no capture logic consumes it.
    pub en_passant_square: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl BoardState {
    /// Board with no pieces, White to move.
    pub fn empty() -> Self {
        Self {
            grid: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            pieces: Vec::new(),
            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        parse_fen(fen)
    }

    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    /// Register a new piece. Used by the FEN parser; makes no legality
    /// judgement beyond refusing an occupied square.
    pub fn add_piece(
        &mut self,
        kind: PieceKind,
        color: Color,
        square: Square,
    ) -> Result<PieceId, ChessError> {
        if self.piece_id_at(square).is_some() {
            return Err(ChessError::MalformedFen(format!(
                "square {square} is described twice"
            )));
        }
        // Pawns off their home rank have necessarily moved; everything else
        // defers to the castling-rights bitset.
        let pawn_home = match color {
            Color::Light => 6,
            Color::Dark => 1,
        };
        let has_moved = kind == PieceKind::Pawn && square.row != pawn_home;
        let id = self.pieces.len();
        self.pieces.push(PieceRecord {
            kind,
            color,
            square,
            has_moved,
            alive: true,
        });
        self.grid[square.row as usize][square.col as usize] = Some(id);
        Ok(id)
    }

    #[inline]
    pub fn piece_id_at(&self, square: Square) -> Option<PieceId> {
        self.grid[square.row as usize][square.col as usize]
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&PieceRecord> {
        self.piece_id_at(square).map(|id| &self.pieces[id])
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> &PieceRecord {
        &self.pieces[id]
    }

    /// All arena records, dead pieces included.
    #[inline]
    pub fn pieces(&self) -> &[PieceRecord] {
        &self.pieces
    }

    /// Square of the colour's king, `None` in king-less (invalid but
    /// tolerated) positions.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces
            .iter()
            .find(|p| p.kind == PieceKind::King && p.color == color && p.alive)
            .map(|p| p.square)
    }

    /// Move a piece, capturing whatever occupies the destination. Updates
    /// the grid, the arena, `has_moved`, the castling rights, and the
    /// halfmove clock. Turn flipping is [`BoardState::finish_turn`].
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<Option<PieceId>, ChessError> {
        let mover = self
            .piece_id_at(from)
            .ok_or(ChessError::IllegalMove { from, to })?;

        let captured = self.piece_id_at(to);
        if let Some(victim) = captured {
            let (color, kind, square) = {
                let v = &self.pieces[victim];
                (v.color, v.kind, v.square)
            };
            if kind == PieceKind::Rook {
                self.revoke_rook_right(color, square);
            }
            self.pieces[victim].alive = false;
        }

        let (kind, color) = (self.pieces[mover].kind, self.pieces[mover].color);
        match kind {
            PieceKind::King => self.castling_rights &= !castle_rights_of(color),
            PieceKind::Rook => self.revoke_rook_right(color, from),
            _ => {}
        }

        self.grid[from.row as usize][from.col as usize] = None;
        self.grid[to.row as usize][to.col as usize] = Some(mover);
        self.pieces[mover].square = to;
        self.pieces[mover].has_moved = true;

        self.en_passant_square = None;
        self.halfmove_clock = if kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };

        Ok(captured)
    }

    /// Relocate king and rook atomically and clear both of the colour's
    /// castling rights. The caller is responsible for having checked
    /// eligibility via the legality rules.
    pub fn apply_castling(&mut self, color: Color, side: CastleSide) -> Result<(), ChessError> {
        let row = home_row(color);
        let (king_to, rook_from, rook_to) = match side {
            CastleSide::KingSide => (6, 7, 5),
            CastleSide::QueenSide => (2, 0, 3),
        };
        let king_from = Square { row, col: 4 };
        let rook_from = Square { row, col: rook_from };

        let king_id = self
            .piece_id_at(king_from)
            .filter(|id| self.pieces[*id].kind == PieceKind::King)
            .ok_or(ChessError::IllegalMove {
                from: king_from,
                to: Square { row, col: king_to },
            })?;
        let rook_id = self
            .piece_id_at(rook_from)
            .filter(|id| self.pieces[*id].kind == PieceKind::Rook)
            .ok_or(ChessError::IllegalMove {
                from: rook_from,
                to: Square { row, col: rook_to },
            })?;

        self.grid[row as usize][4] = None;
        self.grid[row as usize][rook_from.col as usize] = None;
        self.grid[row as usize][king_to as usize] = Some(king_id);
        self.grid[row as usize][rook_to as usize] = Some(rook_id);

        self.pieces[king_id].square = Square { row, col: king_to };
        self.pieces[king_id].has_moved = true;
        self.pieces[rook_id].square = Square { row, col: rook_to };
        self.pieces[rook_id].has_moved = true;

        self.castling_rights &= !castle_rights_of(color);
        self.en_passant_square = None;
        self.halfmove_clock += 1;
        Ok(())
    }

    /// Flip the side to move and advance the fullmove number after Black's
    /// move. Called once per applied move by the game layer.
    pub fn finish_turn(&mut self) {
        self.side_to_move = self.side_to_move.opposite();
        if self.side_to_move == Color::Light {
            self.fullmove_number += 1;
        }
    }

    /// Cross-check grid and arena. A mismatch means the two views of piece
    /// identity have desynchronised, which the rest of the crate cannot
    /// recover from, so this panics rather than returning an error.
    pub fn assert_synchronized(&self) {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let square = Square { row, col };
                if let Some(id) = self.piece_id_at(square) {
                    let record = &self.pieces[id];
                    if !record.alive || record.square != square {
                        panic!(
                            "board corruption: grid square {square} holds piece {id} \
                             but the arena places it at {} (alive: {})",
                            record.square, record.alive
                        );
                    }
                }
            }
        }
        for (id, record) in self.pieces.iter().enumerate() {
            if record.alive && self.piece_id_at(record.square) != Some(id) {
                panic!(
                    "board corruption: arena piece {id} claims square {} \
                     but the grid disagrees",
                    record.square
                );
            }
        }
    }

    fn revoke_rook_right(&mut self, color: Color, square: Square) {
        let row = home_row(color);
        if square.row != row {
            return;
        }
        if square.col == 0 {
            self.castling_rights &= !castle_right(color, CastleSide::QueenSide);
        } else if square.col == 7 {
            self.castling_rights &= !castle_right(color, CastleSide::KingSide);
        }
    }
}
