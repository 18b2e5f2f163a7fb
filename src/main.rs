use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use log::{debug, error, info, LevelFilter};
use regex::Regex;

use crate::board::{is_valid_position, Position};
use crate::game::GameState;

mod board;
mod game;
mod move_generator;

build_info::build_info!(fn build_info);

/// Terminal two-player checkers. Enter squares as `row,col` to select a
/// piece and then a destination; `new` restarts, `quit` exits.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Log verbosity
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Squares to click before interactive play starts, e.g. --moves 2,1 3,2
    #[arg(long, num_args = 0.., value_name = "ROW,COL")]
    moves: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(message) = setup_logger(cli.log_level, cli.log_file.as_ref()) {
        eprintln!("{message}");
        exit(1);
    }

    let info = build_info();
    info!("{} {}", info.crate_info.name, info.crate_info.version);

    let square_regex = Regex::new(r"^\s*([0-9])\s*[,; ]\s*([0-9])\s*$").unwrap();
    let mut state = GameState::new();

    for input in &cli.moves {
        match parse_square(&square_regex, input) {
            Ok(position) => state = state.apply_click(position),
            Err(message) => {
                error!("Bad value '{input}' in --moves: {message}");
                exit(1);
            }
        }
    }

    print_state(&state);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to read input: {e}");
                break;
            }
        };

        match line.trim() {
            "" => continue,
            "quit" | "q" => break,
            "new" => {
                debug!("restarting game");
                state = GameState::new();
            }
            input => match parse_square(&square_regex, input) {
                Ok(position) => state = state.apply_click(position),
                Err(message) => {
                    println!("{message}");
                    continue;
                }
            },
        }

        print_state(&state);
    }
}

fn setup_logger(level: LevelFilter, log_file: Option<&PathBuf>) -> Result<(), String> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr());

    if let Some(path) = log_file {
        let file = fern::log_file(path).map_err(|e| format!("Failed to open log file {}: {e}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().map_err(|e| format!("Failed to install logger: {e}"))?;
    log_panics::init();

    Ok(())
}

/// Parses `row,col` (separator may also be `;` or a space) into an on-board
/// position.
fn parse_square(square_regex: &Regex, input: &str) -> Result<Position, String> {
    let captures = square_regex
        .captures(input)
        .ok_or_else(|| format!("Expected a square as 'row,col' but got '{input}'"))?;

    // The regex only admits single digits so these cannot fail.
    let row: i8 = captures[1].parse().unwrap();
    let col: i8 = captures[2].parse().unwrap();

    if !is_valid_position(row, col) {
        return Err(format!("Square {row},{col} is off the board"));
    }

    Ok(Position { row, col })
}

fn print_state(state: &GameState) {
    let (player1_count, player2_count) = state.board.piece_counts();

    println!("{}", state.board.pretty_print());
    println!("Red pieces: {player1_count}  White pieces: {player2_count}");

    if state.game_over {
        match state.winner {
            Some(winner) => println!("Player {winner} wins! Enter 'new' to play again."),
            None => error!("Game is over but there is no winner"),
        }
        return;
    }

    println!("Current player: {}", state.current_player);
    if let Some(selected) = &state.selected_piece {
        println!(
            "Selected piece at: {},{} ({} valid moves)",
            selected.position.row,
            selected.position.col,
            state.legal_moves.len()
        );
    }

    print!("> ");
    let _ = io::stdout().flush();
}
