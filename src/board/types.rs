//! Core piece and rights types shared by the board, rules, and notation
//! subsystems.

use crate::board::square::Square;

/// Side to move / piece colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Conventional side name used in user-facing text.
    #[inline]
    pub const fn side_name(self) -> &'static str {
        match self {
            Color::Light => "White",
            Color::Dark => "Black",
        }
    }
}

/// Piece kind (colour is represented separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Algebraic-notation letter; pawns have none.
    #[inline]
    pub const fn letter(self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    /// Full piece name used in user-facing text.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }

    /// Parse an uppercase algebraic piece letter.
    pub fn from_letter(ch: char) -> Option<PieceKind> {
        match ch {
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Castling wing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// Compact castling rights bitmask.
pub type CastlingRights = u8;

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights =
    CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE | CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE;

/// Rights bit for one colour/wing pair.
#[inline]
pub const fn castle_right(color: Color, side: CastleSide) -> CastlingRights {
    match (color, side) {
        (Color::Light, CastleSide::KingSide) => CASTLE_LIGHT_KINGSIDE,
        (Color::Light, CastleSide::QueenSide) => CASTLE_LIGHT_QUEENSIDE,
        (Color::Dark, CastleSide::KingSide) => CASTLE_DARK_KINGSIDE,
        (Color::Dark, CastleSide::QueenSide) => CASTLE_DARK_QUEENSIDE,
    }
}

/// Both rights bits of one colour.
#[inline]
pub const fn castle_rights_of(color: Color) -> CastlingRights {
    castle_right(color, CastleSide::KingSide) | castle_right(color, CastleSide::QueenSide)
}

/// Map a FEN piece character to colour and kind.
pub fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, kind))
}

/// Map colour and kind back to the FEN piece character.
pub fn piece_to_fen_char(color: Color, kind: PieceKind) -> char {
    let ch = match kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match color {
        Color::Light => ch.to_ascii_uppercase(),
        Color::Dark => ch,
    }
}

/// Stable arena handle for one piece.
pub type PieceId = usize;

/// One piece in the arena. The grid stores `PieceId`s; the record keeps the
/// back-reference to the piece's current square so the two views can be
/// cross-checked after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceRecord {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub has_moved: bool,
    pub alive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_letters_match_algebraic_notation() {
        assert_eq!(PieceKind::Pawn.letter(), "");
        assert_eq!(PieceKind::Knight.letter(), "N");
        assert_eq!(PieceKind::Bishop.letter(), "B");
        assert_eq!(PieceKind::Rook.letter(), "R");
        assert_eq!(PieceKind::Queen.letter(), "Q");
        assert_eq!(PieceKind::King.letter(), "K");
    }

    #[test]
    fn fen_char_round_trip() {
        for (color, kind, ch) in [
            (Color::Light, PieceKind::Pawn, 'P'),
            (Color::Light, PieceKind::King, 'K'),
            (Color::Dark, PieceKind::Queen, 'q'),
            (Color::Dark, PieceKind::Knight, 'n'),
        ] {
            assert_eq!(piece_to_fen_char(color, kind), ch);
            assert_eq!(piece_from_fen_char(ch), Some((color, kind)));
        }
        assert_eq!(piece_from_fen_char('x'), None);
        assert_eq!(piece_from_fen_char('1'), None);
    }

    #[test]
    fn piece_letter_parsing_rejects_pawn_and_lowercase() {
        assert_eq!(PieceKind::from_letter('N'), Some(PieceKind::Knight));
        assert_eq!(PieceKind::from_letter('K'), Some(PieceKind::King));
        assert_eq!(PieceKind::from_letter('n'), None);
        assert_eq!(PieceKind::from_letter('P'), None);
    }

    #[test]
    fn castle_rights_bits_are_distinct() {
        let all = [
            castle_right(Color::Light, CastleSide::KingSide),
            castle_right(Color::Light, CastleSide::QueenSide),
            castle_right(Color::Dark, CastleSide::KingSide),
            castle_right(Color::Dark, CastleSide::QueenSide),
        ];
        let mut acc: CastlingRights = 0;
        for bit in all {
            assert_eq!(acc & bit, 0);
            acc |= bit;
        }
        assert_eq!(acc, CASTLE_ALL);
    }
}
