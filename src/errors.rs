//! Errors used throughout the analysis-board core.
//!
//! `ChessError` is the single error type across the crate. Parsing and
//! input-related variants are recoverable and suitable for presenting to
//! end users; grid/arena desynchronisation is not represented here because
//! it is a fatal invariant violation and panics instead.

use thiserror::Error;

use crate::board::square::Square;

/// Unified error type for the analysis-board core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A FEN string had the wrong shape (field count, rank count, rank sum,
    /// or an invalid character). The payload describes the offence.
    #[error("malformed FEN: {0}")]
    MalformedFen(String),

    /// An algebraic move token could not be resolved to any legal source
    /// square in the current position.
    #[error("move token '{0}' does not resolve to a legal move")]
    MalformedMoveToken(String),

    /// A move token matched more than one source square and carried no (or
    /// insufficient) disambiguation. Only the strict resolver reports this;
    /// the lenient path takes the first row-major match.
    #[error("move token '{token}' matches {candidates} source squares")]
    AmbiguousMove { token: String, candidates: usize },

    /// A square-to-square move request that the legality rules reject.
    #[error("no legal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    /// History navigation past the recorded snapshots.
    #[error("no snapshot recorded for ply {0}")]
    SnapshotOutOfRange(usize),

    /// The engine collaborator produced no sentinel token within the
    /// configured poll budget.
    #[error("engine produced no '{0}' sentinel within the poll budget")]
    EngineTimeout(&'static str),
}
