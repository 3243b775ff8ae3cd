//! Crate root module declarations for the Arbor Chess analysis-board core.
//!
//! This file exposes all top-level subsystems (board model, move legality
//! rules, notation codecs, history tracking, and external-collaborator
//! seams) so binaries, tests, and host applications can import stable
//! module paths.

pub mod errors;

pub mod board {
    pub mod board_state;
    pub mod square;
    pub mod types;
}

pub mod rules {
    pub mod attack;
    pub mod legality;
    pub mod movement;
    pub mod selection;
}

pub mod notation {
    pub mod algebraic;
    pub mod fen;
    pub mod pgn;
    pub mod san;
}

pub mod history {
    pub mod tracker;
}

pub mod game {
    pub mod analysis_game;
    pub mod message_hub;
}

pub mod engine {
    pub mod analysis;
    pub mod commentary;
    pub mod transport;
}
