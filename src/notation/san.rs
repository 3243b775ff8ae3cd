//! Algebraic move-token parsing.
//!
//! Recognises castling tokens and the short-algebraic shape
//! `[piece letter][disambiguator][x]<destination>`, for example `e4`,
//! `Nxd5`, `exd5`, `Rad1`, `R1d1`, `O-O`. Decorations (`+`, `#`, `!`, `?`)
//! are stripped before parsing.

use crate::board::square::{Orientation, Square};
use crate::board::types::{CastleSide, PieceKind};
use crate::errors::ChessError;
use crate::notation::algebraic::algebraic_to_square;

/// One parsed algebraic move token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanToken {
    Castle(CastleSide),
    Normal {
        kind: PieceKind,
        capture: bool,
        /// Source column named by a file disambiguator letter.
        disamb_col: Option<u8>,
        /// Source row named by a rank disambiguator digit.
        disamb_row: Option<u8>,
        dest: Square,
    },
}

/// Strip check/mate/annotation decorations from a token.
pub fn trim_decorations(token: &str) -> &str {
    token.trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'))
}

pub fn parse_san_token(token: &str) -> Result<SanToken, ChessError> {
    let body = trim_decorations(token);

    match body {
        "O-O" => return Ok(SanToken::Castle(CastleSide::KingSide)),
        "O-O-O" => return Ok(SanToken::Castle(CastleSide::QueenSide)),
        _ => {}
    }

    let malformed = || ChessError::MalformedMoveToken(token.to_owned());

    let mut chars = body.chars();
    let first = chars.next().ok_or_else(malformed)?;
    let (kind, rest) = match PieceKind::from_letter(first) {
        Some(kind) => (kind, chars.as_str()),
        None => (PieceKind::Pawn, body),
    };

    let capture = rest.contains('x');
    let rest: String = rest.chars().filter(|c| *c != 'x').collect();

    if rest.len() < 2 {
        return Err(malformed());
    }
    let (head, dest_text) = rest.split_at(rest.len() - 2);
    let dest =
        algebraic_to_square(dest_text, Orientation::WhiteBottom).map_err(|_| malformed())?;

    let mut disamb_col = None;
    let mut disamb_row = None;
    match head.len() {
        0 => {}
        1 => {
            let ch = head.as_bytes()[0];
            if (b'a'..=b'h').contains(&ch) {
                disamb_col = Some(ch - b'a');
            } else if (b'1'..=b'8').contains(&ch) {
                disamb_row = Some(b'8' - ch);
            } else {
                return Err(malformed());
            }
        }
        _ => return Err(malformed()),
    }

    Ok(SanToken::Normal {
        kind,
        capture,
        disamb_col,
        disamb_row,
        dest,
    })
}
