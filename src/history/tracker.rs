//! Move history with single-branch variation tracking.
//!
//! The main line is an ordered list of move records plus one position
//! snapshot per ply (snapshot 0 is the initial position, so snapshot count
//! is always move count + 1). Playing a move that differs from the
//! recorded continuation at an earlier ply opens a branch; the branch
//! inherits everything before the divergence ply from the main line.
//! Navigating to or before the divergence ply collapses back toward the
//! main line.

use crate::board::board_state::BoardState;
use crate::board::square::Square;
use crate::board::types::{CastleSide, PieceKind};
use crate::errors::ChessError;

/// One recorded move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// 0-based half-move index this record occupies.
    pub ply: usize,
    /// Notation in the internal orientation, e.g. "Nxd5" or "O-O".
    pub notation: String,
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub capture: bool,
    pub castling: Option<CastleSide>,
}

#[derive(Debug, Clone)]
struct BranchLine {
    /// Ply of the branch's first own move.
    start_ply: usize,
    active: bool,
    moves: Vec<MoveRecord>,
    snapshots: Vec<BoardState>,
}

#[derive(Debug, Clone)]
pub struct MoveHistory {
    main_moves: Vec<MoveRecord>,
    /// `main_snapshots[n]` is the position after `n` main-line moves.
    main_snapshots: Vec<BoardState>,
    branch: Option<BranchLine>,
    current_ply: usize,
}

impl MoveHistory {
    pub fn new(initial: BoardState) -> Self {
        Self {
            main_moves: Vec::new(),
            main_snapshots: vec![initial],
            branch: None,
            current_ply: 0,
        }
    }

    /// Number of moves applied in the currently shown position.
    #[inline]
    pub fn current_ply(&self) -> usize {
        self.current_ply
    }

    #[inline]
    pub fn main_line(&self) -> &[MoveRecord] {
        &self.main_moves
    }

    /// The open branch's own moves, if one is active.
    pub fn branch_moves(&self) -> Option<&[MoveRecord]> {
        self.active_branch().map(|b| b.moves.as_slice())
    }

    /// Ply at which the active branch diverges from the main line.
    pub fn divergence_ply(&self) -> Option<usize> {
        self.active_branch().map(|b| b.start_ply)
    }

    #[inline]
    pub fn is_branching(&self) -> bool {
        self.active_branch().is_some()
    }

    pub fn initial_position(&self) -> &BoardState {
        &self.main_snapshots[0]
    }

    /// Length in plies of the line navigation currently follows.
    pub fn active_line_len(&self) -> usize {
        match self.active_branch() {
            Some(branch) => branch.start_ply + branch.moves.len(),
            None => self.main_moves.len(),
        }
    }

    /// Record a validated move together with the snapshot taken after it.
    ///
    /// Appends at the end of the active line; diverging from the main line
    /// opens (or re-opens) the branch; inside an open branch the record at
    /// the current ply is overwritten in place, later branch entries are
    /// left untouched. Recording the main line's own notation at an
    /// already-recorded ply just advances.
    pub fn record_move(&mut self, record: MoveRecord, snapshot: BoardState) {
        let ply = record.ply;

        if let Some(branch) = self.branch.as_mut().filter(|b| b.active) {
            let idx = ply - branch.start_ply;
            if idx < branch.moves.len() {
                branch.moves[idx] = record;
                branch.snapshots[idx] = snapshot;
            } else {
                branch.moves.push(record);
                branch.snapshots.push(snapshot);
            }
        } else if ply < self.main_moves.len() {
            if record.notation != self.main_moves[ply].notation {
                self.branch = Some(BranchLine {
                    start_ply: ply,
                    active: true,
                    moves: vec![record],
                    snapshots: vec![snapshot],
                });
            }
            // Identical notation replays the recorded continuation.
        } else {
            self.main_moves.push(record);
            self.main_snapshots.push(snapshot);
        }

        self.current_ply = ply + 1;
        debug_assert_eq!(self.main_snapshots.len(), self.main_moves.len() + 1);
    }

    /// Position after `ply` moves along the active line.
    pub fn snapshot_at(&self, ply: usize) -> Result<&BoardState, ChessError> {
        if let Some(branch) = self.active_branch() {
            if ply > branch.start_ply {
                return branch
                    .snapshots
                    .get(ply - branch.start_ply - 1)
                    .ok_or(ChessError::SnapshotOutOfRange(ply));
            }
        }
        self.main_snapshots
            .get(ply)
            .ok_or(ChessError::SnapshotOutOfRange(ply))
    }

    /// Jump to the position after `ply` moves. Moving to or before the
    /// divergence ply collapses the branch.
    pub fn restore(&mut self, ply: usize) -> Result<BoardState, ChessError> {
        let snapshot = self.snapshot_at(ply)?.clone();
        self.current_ply = ply;
        if let Some(branch) = self.branch.as_mut() {
            if branch.active && ply <= branch.start_ply {
                branch.active = false;
            }
        }
        Ok(snapshot)
    }

    /// Advance one ply within the active line; `None` at the end.
    pub fn step_forward(&mut self) -> Option<BoardState> {
        if self.current_ply < self.active_line_len() {
            self.restore(self.current_ply + 1).ok()
        } else {
            None
        }
    }

    /// Go back one ply; `None` at the initial position.
    pub fn step_backward(&mut self) -> Option<BoardState> {
        if self.current_ply > 0 {
            self.restore(self.current_ply - 1).ok()
        } else {
            None
        }
    }

    /// Drop all recorded moves and branches, back to ply 0.
    pub fn reset(&mut self) {
        self.main_moves.clear();
        self.main_snapshots.truncate(1);
        self.branch = None;
        self.current_ply = 0;
    }

    fn active_branch(&self) -> Option<&BranchLine> {
        self.branch.as_ref().filter(|b| b.active)
    }
}
