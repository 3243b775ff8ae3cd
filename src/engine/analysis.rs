//! Evaluation pipeline over the engine transport.
//!
//! Extracts best-move and evaluation figures from raw engine output and
//! packages them for the host. The polling loop runs on a worker thread
//! that only ever reads FEN snapshots and reports results back over a
//! channel; it never mutates game state.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::JoinHandle;

use crate::engine::transport::{
    request_best_move, request_evaluation, EngineTransport, PollBudget,
};

pub const DEFAULT_SEARCH_DEPTH: u8 = 4;

/// Steepness of the evaluation-to-probability logistic.
const EVAL_LOGISTIC_K: f64 = 0.5;

/// What one analysis pass produced. Missing sentinels leave fields empty
/// rather than failing the pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisReport {
    /// Long-algebraic best move, e.g. "e2e4".
    pub best_move: Option<String>,
    /// Evaluation in pawns from White's side, for the position after the
    /// suggested best move.
    pub evaluation: Option<f64>,
    pub white_win_probability: Option<f64>,
}

/// Token following "bestmove" in the engine output.
pub fn parse_best_move(output: &str) -> Option<String> {
    let mut tokens = output.split_whitespace().skip_while(|t| *t != "bestmove");
    tokens.next()?;
    tokens.next().map(|t| t.to_owned())
}

/// First numeric token after "Final evaluation" in the engine output.
pub fn parse_evaluation(output: &str) -> Option<f64> {
    let idx = output.find("Final evaluation")?;
    output[idx..]
        .split_whitespace()
        .find_map(|token| token.parse::<f64>().ok())
}

/// Logistic mapping from a pawn-unit evaluation to White's win
/// probability.
pub fn eval_to_win_probability(evaluation: f64) -> f64 {
    1.0 / (1.0 + (-EVAL_LOGISTIC_K * evaluation).exp())
}

/// One full analysis pass: best move for `fen`, then an evaluation of the
/// position after that move. Missed sentinels degrade to empty fields.
pub fn analyse_fen(
    transport: &mut dyn EngineTransport,
    budget: PollBudget,
    fen: &str,
    depth: u8,
) -> AnalysisReport {
    let best_move = match request_best_move(transport, budget, fen, depth) {
        Ok(output) => parse_best_move(&output),
        Err(err) => {
            log::warn!("best-move query gave no result: {err}");
            None
        }
    };

    let mut evaluation = None;
    if let Some(best) = &best_move {
        // Prime the engine with the position after the suggested move; the
        // evaluation below describes that position.
        let primed = format!("{fen} moves {best}");
        if let Err(err) = request_best_move(transport, budget, &primed, depth) {
            log::warn!("priming the post-move position failed: {err}");
        }
        evaluation = match request_evaluation(transport, budget) {
            Ok(output) => parse_evaluation(&output),
            Err(err) => {
                log::warn!("evaluation query gave no result: {err}");
                None
            }
        };
    }

    AnalysisReport {
        best_move,
        evaluation,
        white_win_probability: evaluation.map(eval_to_win_probability),
    }
}

/// Spawn the polling worker. It serves FEN requests until the request
/// sender is dropped (or the report receiver goes away), then exits.
pub fn spawn_analysis_worker<T>(
    mut transport: T,
    budget: PollBudget,
    depth: u8,
    requests: Receiver<String>,
    reports: Sender<(String, AnalysisReport)>,
) -> JoinHandle<()>
where
    T: EngineTransport + Send + 'static,
{
    std::thread::spawn(move || {
        while let Ok(fen) = requests.recv() {
            let report = analyse_fen(&mut transport, budget, &fen, depth);
            if reports.send((fen, report)).is_err() {
                break;
            }
        }
        log::debug!("analysis worker shutting down");
    })
}
