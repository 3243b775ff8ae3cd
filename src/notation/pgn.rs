//! PGN movetext utilities.
//!
//! Extracts a movetext body from pasted PGN (headers stripped by finding
//! the last `]`), tokenizes it for replay, and serialises recorded move
//! history back to PGN text. Comments, inline variations, and NAGs are
//! outside the supported grammar.

use std::collections::BTreeMap;

use crate::history::tracker::MoveRecord;
use crate::notation::san::trim_decorations;

const RESULT_TOKENS: [&str; 3] = ["1-0", "0-1", "1/2-1/2"];

/// Outcome of a movetext import: how many tokens applied and how many were
/// skipped as unresolvable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub applied: usize,
    pub skipped: usize,
}

pub fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

/// Pull the movetext body out of a pasted PGN blob. Everything after the
/// last header `]` is movetext; a trailing game result is removed.
pub fn extract_movetext(text: &str) -> String {
    let body = match text.rfind(']') {
        Some(idx) => &text[idx + 1..],
        None => text,
    };
    let mut movetext = body.trim().to_owned();

    for result in RESULT_TOKENS {
        if movetext.ends_with(result) {
            movetext.truncate(movetext.len() - result.len());
            let trimmed = movetext.trim_end().len();
            movetext.truncate(trimmed);
            break;
        }
    }

    movetext
}

/// Split movetext into bare move tokens: move-number tokens (anything
/// containing `.`) and result tokens are discarded, decorations stripped.
pub fn tokenize_movetext(movetext: &str) -> Vec<String> {
    movetext
        .split_whitespace()
        .filter(|token| !token.contains('.'))
        .filter(|token| !is_result_token(token))
        .map(|token| trim_decorations(token).to_owned())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Serialise a recorded line to PGN with default headers.
pub fn write_pgn(records: &[MoveRecord], result: &str) -> String {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Analysis".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert(
        "Date".to_owned(),
        chrono::Local::now().format("%Y.%m.%d").to_string(),
    );
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), normalize_result(result).to_owned());

    write_pgn_with_headers(records, &headers)
}

/// Serialise a recorded line to PGN with caller-supplied headers.
pub fn write_pgn_with_headers(
    records: &[MoveRecord],
    headers: &BTreeMap<String, String>,
) -> String {
    let mut out = String::new();

    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, value.replace('"', "\\\"")));
    }
    out.push('\n');

    let mut movetext_parts = Vec::<String>::with_capacity(records.len() + 1);
    for record in records {
        if record.ply % 2 == 0 {
            movetext_parts.push(format!("{}. {}", record.ply / 2 + 1, record.notation));
        } else {
            movetext_parts.push(record.notation.clone());
        }
    }

    let result = headers
        .get("Result")
        .map(|value| normalize_result(value))
        .unwrap_or("*");
    movetext_parts.push(result.to_owned());
    out.push_str(&movetext_parts.join(" "));
    out.push('\n');

    out
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}
