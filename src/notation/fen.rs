//! FEN parsing and generation.
//!
//! Builds a fully-populated [`BoardState`] from a Forsyth-Edwards Notation
//! string and serialises one back, preserving the six-field order:
//! placement, active colour, castling, en passant, halfmove clock,
//! fullmove number.

use crate::board::board_state::BoardState;
use crate::board::square::{Orientation, Square, BOARD_SIZE};
use crate::board::types::*;
use crate::errors::ChessError;
use crate::notation::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn parse_fen(fen: &str) -> Result<BoardState, ChessError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| malformed("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| malformed("missing side-to-move"))?;
    let castling_part = parts.next().ok_or_else(|| malformed("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| malformed("missing en-passant square"))?;
    let halfmove_part = parts.next().ok_or_else(|| malformed("missing halfmove clock"))?;
    let fullmove_part = parts.next().ok_or_else(|| malformed("missing fullmove number"))?;

    if parts.next().is_some() {
        return Err(malformed("extra trailing fields"));
    }

    let mut board = BoardState::empty();

    parse_board(board_part, &mut board)?;
    board.side_to_move = parse_side_to_move(side_part)?;
    board.castling_rights = parse_castling_rights(castling_part)?;
    board.en_passant_square = parse_en_passant_square(en_passant_part)?;
    board.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| malformed(&format!("invalid halfmove clock '{halfmove_part}'")))?;
    board.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| malformed(&format!("invalid fullmove number '{fullmove_part}'")))?;

    board.assert_synchronized();
    Ok(board)
}

pub fn generate_fen(board: &BoardState) -> String {
    let mut out = String::new();

    for row in 0..BOARD_SIZE {
        let mut empty_run = 0u8;
        for col in 0..BOARD_SIZE {
            match board.piece_at(Square { row, col }) {
                Some(piece) => {
                    if empty_run > 0 {
                        out.push(char::from(b'0' + empty_run));
                        empty_run = 0;
                    }
                    out.push(piece_to_fen_char(piece.color, piece.kind));
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push(char::from(b'0' + empty_run));
        }
        if row < BOARD_SIZE - 1 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(match board.side_to_move {
        Color::Light => 'w',
        Color::Dark => 'b',
    });

    out.push(' ');
    if board.castling_rights == 0 {
        out.push('-');
    } else {
        if board.castling_rights & CASTLE_LIGHT_KINGSIDE != 0 {
            out.push('K');
        }
        if board.castling_rights & CASTLE_LIGHT_QUEENSIDE != 0 {
            out.push('Q');
        }
        if board.castling_rights & CASTLE_DARK_KINGSIDE != 0 {
            out.push('k');
        }
        if board.castling_rights & CASTLE_DARK_QUEENSIDE != 0 {
            out.push('q');
        }
    }

    out.push(' ');
    match board.en_passant_square {
        Some(square) => out.push_str(&square_to_algebraic(square, Orientation::WhiteBottom)),
        None => out.push('-'),
    }

    out.push(' ');
    out.push_str(&board.halfmove_clock.to_string());
    out.push(' ');
    out.push_str(&board.fullmove_number.to_string());

    out
}

fn malformed(reason: &str) -> ChessError {
    ChessError::MalformedFen(reason.to_owned())
}

fn parse_board(board_part: &str, board: &mut BoardState) -> Result<(), ChessError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != BOARD_SIZE as usize {
        return Err(malformed("board layout must contain 8 ranks"));
    }

    // FEN lists the eighth rank first, which is row 0 internally.
    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0u8;

        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(malformed(&format!("invalid empty-square count '{ch}'")));
                }
                col += skip as u8;
                continue;
            }

            let (color, kind) = piece_from_fen_char(ch)
                .ok_or_else(|| malformed(&format!("invalid piece character '{ch}'")))?;

            if col >= BOARD_SIZE {
                return Err(malformed("board rank has too many files"));
            }

            board.add_piece(
                kind,
                color,
                Square {
                    row: row as u8,
                    col,
                },
            )?;
            col += 1;
        }

        if col != BOARD_SIZE {
            return Err(malformed("board rank does not sum to 8 files"));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ChessError> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(malformed(&format!("invalid side-to-move field '{side_part}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, ChessError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => return Err(malformed(&format!("invalid castling character '{ch}'"))),
        }
    }
    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, ChessError> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    algebraic_to_square(en_passant_part, Orientation::WhiteBottom)
        .map(Some)
        .map_err(|reason| malformed(&reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_state::STARTING_POSITION_FEN;

    #[test]
    fn starting_fen_round_trips() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(generate_fen(&board), STARTING_POSITION_FEN);
    }

    #[test]
    fn midgame_fens_round_trip() {
        for fen in [
            "1r4k1/7p/3p1bp1/p1pP4/P1P1prP1/1N2R2P/1P1N1PK1/8 b - - 3 31",
            "r1bq1rk1/ppp2ppp/2n5/2bp4/4n3/1P2PNP1/PBP2PBP/RN1Q1RK1 b - - 2 9",
            "8/bpp1k2p/p2pP1p1/P5q1/1P5N/8/6PP/5Q1K b - - 0 35",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        ] {
            let board = parse_fen(fen).expect("FEN should parse");
            assert_eq!(generate_fen(&board), fen);
        }
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0")
            .expect_err("five fields must not parse");
        assert!(matches!(err, ChessError::MalformedFen(_)));

        let err = parse_fen(&format!("{STARTING_POSITION_FEN} extra"))
            .expect_err("seven fields must not parse");
        assert!(matches!(err, ChessError::MalformedFen(_)));
    }

    #[test]
    fn rejects_wrong_rank_count() {
        let err = parse_fen("8/8/8/8 w - - 0 1").expect_err("four ranks must not parse");
        assert!(matches!(err, ChessError::MalformedFen(_)));
    }

    #[test]
    fn rejects_invalid_piece_letters() {
        let err = parse_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect_err("'x' must not parse");
        assert!(matches!(err, ChessError::MalformedFen(_)));
    }

    #[test]
    fn rejects_ranks_that_do_not_sum_to_eight() {
        let err = parse_fen("rnbqkbnr/pppppppp1/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect_err("nine files must not parse");
        assert!(matches!(err, ChessError::MalformedFen(_)));

        let err = parse_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect_err("seven files must not parse");
        assert!(matches!(err, ChessError::MalformedFen(_)));
    }

    #[test]
    fn rejects_bad_tail_fields() {
        let err = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1")
            .expect_err("bad side field");
        assert!(matches!(err, ChessError::MalformedFen(_)));

        let err = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KXkq - 0 1")
            .expect_err("bad castling field");
        assert!(matches!(err, ChessError::MalformedFen(_)));

        let err = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1")
            .expect_err("bad en-passant field");
        assert!(matches!(err, ChessError::MalformedFen(_)));

        let err = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - fifty 1")
            .expect_err("bad halfmove clock");
        assert!(matches!(err, ChessError::MalformedFen(_)));
    }

    #[test]
    fn pawns_off_their_home_rank_count_as_moved() {
        let board = parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
            .expect("FEN should parse");
        let advanced = board
            .piece_at(Square { row: 4, col: 4 })
            .expect("e4 should hold a pawn");
        assert!(advanced.has_moved);
        let home = board
            .piece_at(Square { row: 6, col: 0 })
            .expect("a2 should hold a pawn");
        assert!(!home.has_moved);
    }
}
