//! Tap/selection state machine.
//!
//! Classifies a tap against the current selection and highlight set:
//! `NoSelection -> Selected(piece) -> { MoveApplied | SelectionCleared |
//! SelectionChanged }`. Selecting a piece of the wrong colour is silently
//! ignored; a tap on a non-highlighted square clears the selection.

use crate::board::board_state::BoardState;
use crate::board::square::Square;

/// What a tap should do given the current selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// Select (or re-select) the piece on this square.
    Select(Square),
    /// Apply the move from the selected square to the tapped square.
    Move { from: Square, to: Square },
    /// Drop the selection without moving.
    Clear,
    /// No state change.
    Ignore,
}

pub fn classify_tap(
    board: &BoardState,
    selected: Option<Square>,
    highlights: &[Square],
    tap: Square,
) -> SelectionAction {
    let tapped_own_piece = board
        .piece_at(tap)
        .is_some_and(|p| p.color == board.side_to_move);

    match selected {
        None => {
            if tapped_own_piece {
                SelectionAction::Select(tap)
            } else {
                SelectionAction::Ignore
            }
        }
        Some(from) => {
            if tapped_own_piece {
                // Tapping another own piece switches the selection.
                SelectionAction::Select(tap)
            } else if tap != from && highlights.contains(&tap) {
                SelectionAction::Move { from, to: tap }
            } else {
                SelectionAction::Clear
            }
        }
    }
}
