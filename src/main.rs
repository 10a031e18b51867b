use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use game_2048::engine::{Board, Move};
use game_2048::game::{GameState, GameStatus};
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

#[derive(Debug, Parser)]
#[command(name = "game-2048", version, about = "Play 2048 in the terminal")]
struct Args {
    /// Seed for tile spawns (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Play uniformly random legal moves until the game ends
    #[arg(long)]
    auto: bool,

    /// Stop auto play after this many accepted moves
    #[arg(long, value_name = "N", requires = "auto")]
    max_moves: Option<u64>,

    /// Link appended to the share line
    #[arg(long, default_value = "https://play2048.co")]
    url: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_entropy()),
    };
    info!("starting game (seed: {:?})", args.seed);

    if args.auto {
        auto_play(&args, rng.as_mut())
    } else {
        interactive(&args, rng.as_mut())
    }
}

fn interactive(args: &Args, rng: &mut dyn RngCore) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut state = GameState::new(rng);
    render(&mut stdout, &state, &args.url)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read input")?;
        let input = line.trim();
        match input {
            "" => continue,
            "q" | "quit" => break,
            "n" | "new" => state = GameState::new(rng),
            _ => match input.parse::<Move>() {
                Ok(dir) => state = state.apply_move(dir, rng),
                Err(e) => {
                    writeln!(stdout, "{e}")?;
                    continue;
                }
            },
        }
        render(&mut stdout, &state, &args.url)?;
    }
    Ok(())
}

fn auto_play(args: &Args, rng: &mut dyn RngCore) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let mut state = GameState::new(rng);
    let mut move_count: u64 = 0;

    while !state.over {
        if args.max_moves.is_some_and(|limit| move_count >= limit) {
            break;
        }
        let legal = state.board.legal_moves();
        let Some(&dir) = legal.choose(rng) else {
            break;
        };
        state = state.apply_move(dir, rng);
        move_count += 1;
    }

    render(&mut stdout, &state, &args.url)?;
    writeln!(stdout, "Moves made: {}, highest tile: {}", move_count, state.board.highest_tile())?;
    Ok(())
}

fn render<W: Write>(out: &mut W, state: &GameState, url: &str) -> io::Result<()> {
    write!(out, "{}", state.board)?;
    writeln!(out, "{}", tier_map(&state.board))?;
    writeln!(out, "Score: {}", state.score)?;
    match state.status() {
        GameStatus::Playing => {}
        GameStatus::Won => writeln!(out, "You Win!")?,
        GameStatus::Over | GameStatus::WonAndOver => writeln!(out, "Game Over")?,
    }
    if state.won || state.over {
        writeln!(out, "{}", share_text(state.score, url))?;
    }
    // a won game keeps accepting moves until it is over
    if !state.over {
        writeln!(out, "Move with w/a/s/d or h/j/k/l, n for a new game, q to quit")?;
    }
    out.flush()
}

/// Colour tier of a tile value, 0 for empty up to 6 for anything above 1024.
fn tier(value: u32) -> u8 {
    match value {
        0 => 0,
        1..=4 => 1,
        5..=16 => 2,
        17..=64 => 3,
        65..=256 => 4,
        257..=1024 => 5,
        _ => 6,
    }
}

fn tier_map(board: &Board) -> String {
    board
        .rows()
        .iter()
        .map(|row| row.iter().map(|&v| tier(v).to_string()).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn share_text(score: u64, url: &str) -> String {
    format!("I scored {score} in 2048! {url}")
}
