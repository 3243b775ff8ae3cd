//! The analysis-game context object.
//!
//! `AnalysisGame` ties the board, the legality rules, the notation codecs,
//! and the history tracker together behind a synchronous API. It is a
//! plain value constructed and owned by the host application; mutators
//! return explicit result structs instead of firing change notifications.

use crate::board::board_state::{home_row, BoardState};
use crate::board::square::{Orientation, Square};
use crate::board::types::{CastleSide, PieceKind};
use crate::errors::ChessError;
use crate::history::tracker::{MoveHistory, MoveRecord};
use crate::notation::algebraic::{col_to_file_letter, square_to_algebraic};
use crate::notation::pgn::{extract_movetext, tokenize_movetext, write_pgn, ImportReport};
use crate::notation::san::{parse_san_token, SanToken};
use crate::rules::legality::{
    can_castle, find_candidate_sources, legal_destinations, would_expose_king,
};
use crate::rules::selection::{classify_tap, SelectionAction};

/// Everything that changed when a move was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub record: MoveRecord,
    pub captured: Option<PieceKind>,
    pub fen: String,
}

/// Result of a tap on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    Selected(Square),
    Moved(AppliedMove),
    Cleared,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct AnalysisGame {
    board: BoardState,
    history: MoveHistory,
    selected: Option<Square>,
    highlights: Vec<Square>,
    orientation: Orientation,
}

impl AnalysisGame {
    pub fn new() -> Self {
        Self::with_board(BoardState::new_game())
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Ok(Self::with_board(BoardState::from_fen(fen)?))
    }

    fn with_board(board: BoardState) -> Self {
        let history = MoveHistory::new(board.clone());
        Self {
            board,
            history,
            selected: None,
            highlights: Vec::new(),
            orientation: Orientation::default(),
        }
    }

    #[inline]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[inline]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn current_fen(&self) -> String {
        self.board.to_fen()
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Flip which side is displayed at the bottom. Purely presentational;
    /// legality and stored history are unaffected.
    pub fn flip_orientation(&mut self) {
        self.orientation = self.orientation.flipped();
    }

    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Squares highlighted for the current selection.
    #[inline]
    pub fn highlights(&self) -> &[Square] {
        &self.highlights
    }

    /// Drive the selection state machine with one tap.
    pub fn tap_square(&mut self, square: Square) -> TapOutcome {
        match classify_tap(&self.board, self.selected, &self.highlights, square) {
            SelectionAction::Select(from) => {
                self.selected = Some(from);
                self.highlights = legal_destinations(&self.board, from);
                TapOutcome::Selected(from)
            }
            SelectionAction::Move { from, to } => match self.apply_move(from, to) {
                Ok(applied) => TapOutcome::Moved(applied),
                Err(_) => {
                    self.clear_selection();
                    TapOutcome::Cleared
                }
            },
            SelectionAction::Clear => {
                self.clear_selection();
                TapOutcome::Cleared
            }
            SelectionAction::Ignore => TapOutcome::Ignored,
        }
    }

    /// Apply a move given as source and destination squares: the
    /// interactive path. Validates against the full legality rules,
    /// detects castling, builds the notation, and records history.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<AppliedMove, ChessError> {
        let illegal = ChessError::IllegalMove { from, to };

        let (kind, color) = match self.board.piece_at(from) {
            Some(piece) => (piece.kind, piece.color),
            None => return Err(illegal),
        };
        if color != self.board.side_to_move {
            return Err(illegal);
        }
        if !legal_destinations(&self.board, from).contains(&to) {
            return Err(illegal);
        }

        // A king travelling two files from its home square is castling;
        // no other legal king move covers that distance.
        let castling = if kind == PieceKind::King
            && from.row == home_row(color)
            && from.col == 4
            && to.row == from.row
        {
            match to.col {
                6 => Some(CastleSide::KingSide),
                2 => Some(CastleSide::QueenSide),
                _ => None,
            }
        } else {
            None
        };

        let captured = self.board.piece_at(to).map(|p| p.kind);
        let notation = match castling {
            Some(CastleSide::KingSide) => "O-O".to_owned(),
            Some(CastleSide::QueenSide) => "O-O-O".to_owned(),
            None => {
                let dest = square_to_algebraic(to, Orientation::WhiteBottom);
                if captured.is_some() {
                    let prefix = if kind == PieceKind::Pawn {
                        col_to_file_letter(from.col, Orientation::WhiteBottom).to_string()
                    } else {
                        kind.letter().to_owned()
                    };
                    format!("{prefix}x{dest}")
                } else {
                    format!("{}{dest}", kind.letter())
                }
            }
        };

        match castling {
            Some(side) => self.board.apply_castling(color, side)?,
            None => {
                self.board.move_piece(from, to)?;
            }
        }
        self.board.finish_turn();
        self.board.assert_synchronized();

        let record = MoveRecord {
            ply: self.history.current_ply(),
            notation,
            from,
            to,
            piece: kind,
            capture: captured.is_some(),
            castling,
        };
        self.history.record_move(record.clone(), self.board.clone());
        self.clear_selection();

        Ok(AppliedMove {
            record,
            captured,
            fen: self.board.to_fen(),
        })
    }

    /// Apply one algebraic token for the side to move. Ambiguous tokens
    /// resolve to the first row-major candidate that keeps the king safe.
    pub fn apply_san_token(&mut self, token: &str) -> Result<AppliedMove, ChessError> {
        let unresolvable = || ChessError::MalformedMoveToken(token.to_owned());

        let (from, to) = match parse_san_token(token)? {
            SanToken::Castle(side) => {
                let color = self.board.side_to_move;
                if !can_castle(&self.board, color, side) {
                    return Err(unresolvable());
                }
                let row = home_row(color);
                let to_col = match side {
                    CastleSide::KingSide => 6,
                    CastleSide::QueenSide => 2,
                };
                (Square { row, col: 4 }, Square { row, col: to_col })
            }
            SanToken::Normal {
                kind,
                dest,
                disamb_col,
                disamb_row,
                ..
            } => {
                let candidates =
                    find_candidate_sources(&self.board, kind, dest, disamb_col, disamb_row);
                let source = candidates
                    .into_iter()
                    .find(|from| !would_expose_king(&self.board, *from, dest))
                    .ok_or_else(unresolvable)?;
                (source, dest)
            }
        };

        self.apply_move(from, to).map_err(|err| match err {
            ChessError::IllegalMove { .. } => unresolvable(),
            other => other,
        })
    }

    /// Strict token resolution: errors instead of guessing when more than
    /// one source square remains after disambiguation.
    pub fn resolve_san_strict(&self, token: &str) -> Result<Square, ChessError> {
        match parse_san_token(token)? {
            SanToken::Castle(side) => {
                let color = self.board.side_to_move;
                if can_castle(&self.board, color, side) {
                    Ok(Square {
                        row: home_row(color),
                        col: 4,
                    })
                } else {
                    Err(ChessError::MalformedMoveToken(token.to_owned()))
                }
            }
            SanToken::Normal {
                kind,
                dest,
                disamb_col,
                disamb_row,
                ..
            } => {
                let candidates: Vec<Square> =
                    find_candidate_sources(&self.board, kind, dest, disamb_col, disamb_row)
                        .into_iter()
                        .filter(|from| !would_expose_king(&self.board, *from, dest))
                        .collect();
                match candidates.len() {
                    0 => Err(ChessError::MalformedMoveToken(token.to_owned())),
                    1 => Ok(candidates[0]),
                    n => Err(ChessError::AmbiguousMove {
                        token: token.to_owned(),
                        candidates: n,
                    }),
                }
            }
        }
    }

    /// Replay a PGN movetext body (headers are stripped first). A token
    /// that does not resolve is skipped and counted, never aborting the
    /// rest of the import.
    pub fn import_movetext(&mut self, text: &str) -> ImportReport {
        let movetext = extract_movetext(text);
        let mut report = ImportReport::default();

        for token in tokenize_movetext(&movetext) {
            match self.apply_san_token(&token) {
                Ok(_) => report.applied += 1,
                Err(err) => {
                    report.skipped += 1;
                    log::warn!("skipping unresolvable move token '{token}': {err}");
                }
            }
        }

        report
    }

    /// Advance one ply along the active line. False at the end.
    pub fn step_forward(&mut self) -> bool {
        match self.history.step_forward() {
            Some(board) => {
                self.board = board;
                self.clear_selection();
                true
            }
            None => false,
        }
    }

    /// Go back one ply. False at the initial position.
    pub fn step_backward(&mut self) -> bool {
        match self.history.step_backward() {
            Some(board) => {
                self.board = board;
                self.clear_selection();
                true
            }
            None => false,
        }
    }

    /// Jump to the position after `ply` moves along the active line.
    pub fn jump_to_ply(&mut self, ply: usize) -> Result<(), ChessError> {
        self.board = self.history.restore(ply)?;
        self.clear_selection();
        Ok(())
    }

    /// Back to the initial position with all history dropped.
    pub fn reset(&mut self) {
        self.history.reset();
        self.board = self.history.initial_position().clone();
        self.clear_selection();
    }

    /// Human-readable listing of every piece, for commentary prompts.
    pub fn describe_position(&self) -> String {
        let mut parts = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                let square = Square { row, col };
                if let Some(piece) = self.board.piece_at(square) {
                    parts.push(format!(
                        "{} {} is at {}",
                        piece.color.side_name(),
                        piece.kind.name(),
                        square_to_algebraic(square, self.orientation)
                    ));
                }
            }
        }
        parts.join(", ")
    }

    /// Serialise the main line to PGN.
    pub fn export_pgn(&self, result: &str) -> String {
        write_pgn(self.history.main_line(), result)
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.highlights.clear();
    }
}

impl Default for AnalysisGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::Color;
    use crate::rules::attack::is_king_under_attack;

    fn sq(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    fn placement(fen: &str) -> String {
        fen.split_whitespace()
            .next()
            .expect("FEN has a placement field")
            .to_owned()
    }

    #[test]
    fn e4_moves_the_pawn_and_flips_the_turn() {
        let mut game = AnalysisGame::new();
        let applied = game.apply_san_token("e4").expect("e4 should apply");

        assert_eq!(applied.record.from, sq(6, 4));
        assert_eq!(applied.record.to, sq(4, 4));
        assert_eq!(applied.record.piece, PieceKind::Pawn);
        assert!(!applied.record.capture);
        assert_eq!(game.board().side_to_move, Color::Dark);
        assert_eq!(
            placement(&applied.fen),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR"
        );
    }

    #[test]
    fn kingside_castling_token_moves_king_and_rook() {
        let mut game =
            AnalysisGame::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").expect("fen");
        let applied = game.apply_san_token("O-O").expect("O-O should apply");

        assert_eq!(applied.record.notation, "O-O");
        assert_eq!(applied.record.castling, Some(CastleSide::KingSide));
        let king = game.board().piece_at(sq(7, 6)).expect("king on g1");
        let rook = game.board().piece_at(sq(7, 5)).expect("rook on f1");
        assert!(king.has_moved && rook.has_moved);
        // White's castling rights are gone from the FEN.
        assert_eq!(applied.fen.split(' ').nth(2), Some("-"));
    }

    #[test]
    fn castling_is_detected_from_the_square_path_too() {
        let mut game =
            AnalysisGame::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").expect("fen");
        let applied = game.apply_move(sq(7, 4), sq(7, 2)).expect("queenside castle");
        assert_eq!(applied.record.notation, "O-O-O");
        assert_eq!(
            game.board().piece_at(sq(7, 3)).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
    }

    #[test]
    fn ambiguous_knight_token_takes_the_first_row_major_candidate() {
        let mut game =
            AnalysisGame::from_fen("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1").expect("fen");
        game.apply_san_token("Nd2").expect("Nd2 should apply");

        // The f3 knight (row 5) precedes the b1 knight (row 7) row-major.
        assert!(game.board().piece_at(sq(5, 5)).is_none());
        assert_eq!(
            game.board().piece_at(sq(6, 3)).map(|p| p.kind),
            Some(PieceKind::Knight)
        );
        assert!(game.board().piece_at(sq(7, 1)).is_some());
    }

    #[test]
    fn strict_resolution_reports_the_ambiguity() {
        let game =
            AnalysisGame::from_fen("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1").expect("fen");
        let err = game.resolve_san_strict("Nd2").expect_err("ambiguous");
        assert!(matches!(
            err,
            ChessError::AmbiguousMove { candidates: 2, .. }
        ));
        assert_eq!(
            game.resolve_san_strict("Nbd2").expect("file disambiguator"),
            sq(7, 1)
        );
    }

    #[test]
    fn capture_notation_prefixes_piece_letter_or_pawn_file() {
        let mut game = AnalysisGame::new();
        for token in ["e4", "d5"] {
            game.apply_san_token(token).expect("opening moves");
        }
        let applied = game.apply_move(sq(4, 4), sq(3, 3)).expect("exd5");
        assert_eq!(applied.record.notation, "exd5");
        assert!(applied.record.capture);
        assert_eq!(applied.captured, Some(PieceKind::Pawn));

        let applied = game.apply_san_token("Qxd5").expect("queen recapture");
        assert_eq!(applied.record.notation, "Qxd5");
        assert_eq!(applied.captured, Some(PieceKind::Pawn));
    }

    #[test]
    fn import_records_five_moves_and_six_snapshots() {
        let mut game = AnalysisGame::new();
        let report = game.import_movetext("1. e4 e5 2. Nf3 Nc6 3. Bb5");

        assert_eq!(report.applied, 5);
        assert_eq!(report.skipped, 0);
        assert_eq!(game.history().main_line().len(), 5);
        assert!(game.history().snapshot_at(5).is_ok());
        assert!(game.history().snapshot_at(6).is_err());
    }

    #[test]
    fn import_strips_headers_and_result() {
        let mut game = AnalysisGame::new();
        let pgn = "[Event \"Casual\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Nf3 1-0";
        let report = game.import_movetext(pgn);
        assert_eq!(report.applied, 3);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn unresolvable_tokens_are_skipped_not_fatal() {
        let mut game = AnalysisGame::new();
        let report = game.import_movetext("1. e4 Qh7 2. e5");
        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(game.history().main_line().len(), 2);
    }

    #[test]
    fn approved_moves_never_leave_the_movers_king_in_check() {
        let mut game = AnalysisGame::new();
        for token in ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Bxc6", "dxc6", "O-O"] {
            let mover = game.board().side_to_move;
            game.apply_san_token(token).expect("legal game moves");
            assert!(
                !is_king_under_attack(game.board(), mover),
                "after {token} the mover's king must be safe"
            );
        }
    }

    #[test]
    fn step_backward_then_forward_restores_the_exact_placement() {
        let mut game = AnalysisGame::new();
        game.apply_san_token("e4").expect("e4");
        game.apply_san_token("e5").expect("e5");
        let after_e5 = game.current_fen();

        assert!(game.step_backward());
        let after_e4 = game.current_fen();
        assert_ne!(placement(&after_e4), placement(&after_e5));

        assert!(game.step_forward());
        assert_eq!(placement(&game.current_fen()), placement(&after_e5));
        assert!(!game.step_forward());
    }

    #[test]
    fn divergence_creates_a_branch_and_restores_its_position() {
        let mut game = AnalysisGame::new();
        game.apply_san_token("e4").expect("e4");
        game.apply_san_token("e5").expect("e5");

        game.jump_to_ply(1).expect("back to after e4");
        game.apply_san_token("c5").expect("c5 diverges");

        assert!(game.history().is_branching());
        assert_eq!(game.history().divergence_ply(), Some(1));
        // The shown position is the branch continuation.
        assert!(placement(&game.current_fen()).contains("2p5"));

        // Collapsing back to the divergence ply returns to the main line.
        game.jump_to_ply(1).expect("collapse");
        assert!(!game.history().is_branching());
        game.jump_to_ply(2).expect("main line ply 2");
        assert!(placement(&game.current_fen()).contains("4p3"));
    }

    #[test]
    fn tap_flow_selects_highlights_and_moves() {
        let mut game = AnalysisGame::new();

        // Tapping a Black piece while White is to move is silently ignored.
        assert_eq!(game.tap_square(sq(1, 4)), TapOutcome::Ignored);

        assert_eq!(game.tap_square(sq(6, 4)), TapOutcome::Selected(sq(6, 4)));
        assert_eq!(game.highlights().len(), 2);

        match game.tap_square(sq(4, 4)) {
            TapOutcome::Moved(applied) => assert_eq!(applied.record.notation, "e4"),
            other => panic!("expected a move, got {other:?}"),
        }
        assert!(game.selected().is_none());
        assert!(game.highlights().is_empty());
    }

    #[test]
    fn tap_on_an_unhighlighted_square_clears_the_selection() {
        let mut game = AnalysisGame::new();
        game.tap_square(sq(6, 4));
        assert_eq!(game.tap_square(sq(3, 3)), TapOutcome::Cleared);
        assert!(game.selected().is_none());
    }

    #[test]
    fn orientation_flip_never_reaches_stored_notation() {
        let mut game = AnalysisGame::new();
        game.flip_orientation();
        let applied = game.apply_move(sq(6, 4), sq(4, 4)).expect("e4");
        assert_eq!(applied.record.notation, "e4");
        assert_eq!(game.orientation(), Orientation::WhiteTop);
    }

    #[test]
    fn reset_returns_to_the_initial_position() {
        let mut game = AnalysisGame::new();
        game.import_movetext("1. e4 e5");
        game.reset();
        assert_eq!(game.current_fen(), crate::board::board_state::STARTING_POSITION_FEN);
        assert_eq!(game.history().main_line().len(), 0);
    }

    #[test]
    fn describe_position_lists_pieces_in_words() {
        let game = AnalysisGame::from_fen("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1").expect("fen");
        let description = game.describe_position();
        assert_eq!(
            description,
            "Black King is at e8, White Knight is at b1, White King is at e1"
        );
    }

    #[test]
    fn export_pgn_round_trips_through_import() {
        let mut game = AnalysisGame::new();
        game.import_movetext("1. e4 e5 2. Nf3 Nc6");
        let pgn = game.export_pgn("*");

        let mut replayed = AnalysisGame::new();
        let report = replayed.import_movetext(&pgn);
        assert_eq!(report.applied, 4);
        assert_eq!(report.skipped, 0);
        assert_eq!(replayed.current_fen(), game.current_fen());
    }
}
