//! Stdin PGN replay front-end.
//!
//! Reads a PGN (headers optional) from standard input, replays the
//! movetext through the analysis core, and prints the move list and the
//! final FEN. Unresolvable tokens are skipped and reported.

use std::io::Read;

use arbor_chess::game::analysis_game::AnalysisGame;

fn main() {
    env_logger::init();

    let mut input = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read stdin: {err}");
        std::process::exit(1);
    }

    let mut game = AnalysisGame::new();
    let report = game.import_movetext(&input);

    let mut line = String::new();
    for record in game.history().main_line() {
        if record.ply % 2 == 0 {
            if !line.is_empty() {
                println!("{line}");
            }
            line = format!("{}. {}", record.ply / 2 + 1, record.notation);
        } else {
            line.push(' ');
            line.push_str(&record.notation);
        }
    }
    if !line.is_empty() {
        println!("{line}");
    }

    println!("{}", game.current_fen());
    if report.skipped > 0 {
        eprintln!(
            "applied {} moves, skipped {} unresolvable tokens",
            report.applied, report.skipped
        );
    }
}
