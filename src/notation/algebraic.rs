//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g. `e4`) and internal
//! squares. Both directions take the display [`Orientation`] so flipped
//! boards read naturally; stored history always uses the internal
//! convention (`Orientation::WhiteBottom`).

use crate::board::square::{Orientation, Square};

/// Convert a square to algebraic text under the given display orientation.
pub fn square_to_algebraic(square: Square, orientation: Orientation) -> String {
    let (file, rank) = match orientation {
        Orientation::WhiteBottom => (b'a' + square.col, b'8' - square.row),
        Orientation::WhiteTop => (b'h' - square.col, b'1' + square.row),
    };
    format!("{}{}", char::from(file), char::from(rank))
}

/// Convert algebraic text (for example "e4") to a square.
pub fn algebraic_to_square(text: &str, orientation: Orientation) -> Result<Square, String> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid algebraic square: {text}"));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(format!("Invalid algebraic file: {}", file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(format!("Invalid algebraic rank: {}", rank as char));
    }

    let (col, row) = match orientation {
        Orientation::WhiteBottom => (file - b'a', b'8' - rank),
        Orientation::WhiteTop => (b'h' - file, rank - b'1'),
    };
    Ok(Square { row, col })
}

/// File letter of a column under the given orientation (used for pawn
/// capture notation such as "exd5").
pub fn col_to_file_letter(col: u8, orientation: Orientation) -> char {
    match orientation {
        Orientation::WhiteBottom => char::from(b'a' + col),
        Orientation::WhiteTop => char::from(b'h' - col),
    }
}
