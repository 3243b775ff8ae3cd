//! Text transport to the external chess-engine collaborator.
//!
//! The engine is an opaque process speaking a line-oriented command
//! protocol (`isready`, `position fen ...`, `go depth N`, `eval`). This
//! module issues commands and polls its output for sentinel tokens with a
//! bounded retry count; what happens on a missed sentinel is the caller's
//! policy (the analysis layer treats it as a soft empty result).

use crate::errors::ChessError;

/// Synchronous text channel to the engine process. Implementations own the
/// line framing; `read_output` returns an empty string when no output is
/// pending yet.
pub trait EngineTransport {
    fn send_line(&mut self, command: &str);
    fn read_output(&mut self) -> String;
}

/// Bounded retry count for sentinel polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    pub max_attempts: u32,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self { max_attempts: 1000 }
    }
}

/// Read engine output until one of the sentinels appears, giving up after
/// the poll budget is spent.
pub fn poll_for_sentinel(
    transport: &mut dyn EngineTransport,
    budget: PollBudget,
    sentinels: &[&'static str],
) -> Result<String, ChessError> {
    let mut collected = String::new();

    for _ in 0..budget.max_attempts {
        let output = transport.read_output();
        if output.is_empty() {
            continue;
        }
        collected.push_str(&output);
        if sentinels.iter().any(|needle| collected.contains(needle)) {
            return Ok(collected);
        }
    }

    Err(ChessError::EngineTimeout(sentinels[0]))
}

/// Handshake: `isready` until the engine answers `readyok`.
pub fn ensure_ready(
    transport: &mut dyn EngineTransport,
    budget: PollBudget,
) -> Result<(), ChessError> {
    transport.send_line("isready");
    poll_for_sentinel(transport, budget, &["readyok"]).map(|_| ())
}

/// Ask for the best move in the given position. Returns the raw output
/// containing the `bestmove` line.
pub fn request_best_move(
    transport: &mut dyn EngineTransport,
    budget: PollBudget,
    fen: &str,
    depth: u8,
) -> Result<String, ChessError> {
    ensure_ready(transport, budget)?;
    transport.send_line(&format!("position fen {fen}"));
    ensure_ready(transport, budget)?;
    transport.send_line(&format!("go depth {depth}"));
    poll_for_sentinel(transport, budget, &["bestmove"])
}

/// Ask for a static evaluation of the engine's current position. Returns
/// the raw output containing the evaluation, mate, or stalemate line.
pub fn request_evaluation(
    transport: &mut dyn EngineTransport,
    budget: PollBudget,
) -> Result<String, ChessError> {
    ensure_ready(transport, budget)?;
    transport.send_line("eval");
    poll_for_sentinel(transport, budget, &["Final evaluation", "mate", "stalemate"])
}
