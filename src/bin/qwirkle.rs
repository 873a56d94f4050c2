//! `qwirkle` CLI: `serve` hosts the HTTP session façade, `simulate` plays a
//! headless batch of AI-vs-AI games and emits one JSON line per game.
//! Exit code 0 on success, 1 on I/O or flag errors, per spec.md §6.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;

use qwirkle::estimator::MAX_PLAYOUT_TURNS;
use qwirkle::game::{GameState, Winner};
use qwirkle::movegen::generate_all_moves;
use qwirkle::solver::solver_by_name;
use qwirkle::server;

#[derive(Parser)]
#[command(name = "qwirkle", about = "Two-player Qwirkle engine: HTTP server and headless simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP session façade.
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
    /// Play `n` AI-vs-AI games headlessly, writing one JSON line per game.
    Simulate {
        #[arg(short = 'n', long = "num-games", default_value_t = 100)]
        n: usize,
        #[arg(long = "p1", default_value = "greedy")]
        p1: String,
        #[arg(long = "p2", default_value = "greedy")]
        p2: String,
        #[arg(long = "workers", default_value_t = num_cpus::get())]
        workers: usize,
        #[arg(long = "seed", default_value_t = 1)]
        seed: u64,
        #[arg(short = 'o', long = "output")]
        output: Option<String>,
    },
}

/// clap only matches multi-letter flags against `--long`; spec.md §6's CLI
/// grammar writes `simulate -n <count> -p1 <strategy> -p2 <strategy>
/// -workers <n> -seed <int> -o <path>` with a single dash throughout. This
/// rewrites any single-dash, multi-character, alphabetic flag (`-p1`,
/// `-workers`, `-seed`) to its `--` form before clap ever sees it, so both
/// the documented single-dash grammar and ordinary `--long` forms parse.
/// Single-char flags (`-n`, `-o`) and already-double-dashed flags pass
/// through untouched.
fn normalize_single_dash_flags(args: impl Iterator<Item = String>) -> Vec<String> {
    args.map(|arg| match arg.strip_prefix('-') {
        Some(rest) if rest.len() > 1 && rest.starts_with(|c: char| c.is_ascii_alphabetic()) => {
            format!("-{arg}")
        }
        _ => arg,
    })
    .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = match Cli::try_parse_from(normalize_single_dash_flags(std::env::args())) {
        Ok(cli) => cli,
        Err(e) => {
            eprint!("{e}");
            std::process::exit(1);
        }
    };
    let result = match cli.command {
        Command::Serve { addr } => run_serve(&addr),
        Command::Simulate { n, p1, p2, workers, seed, output } => {
            run_simulate(n, &p1, &p2, workers, seed, output.as_deref())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "qwirkle exited with an error");
        std::process::exit(1);
    }
    Ok(())
}

fn run_serve(addr: &str) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let app = server::build_router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "qwirkle serving");
        axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
        Ok::<(), anyhow::Error>(())
    })
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// One completed game's simulate-mode summary line.
#[derive(Debug, Serialize)]
struct GameRecord {
    id: usize,
    seed: u64,
    player_names: [String; 2],
    moves: usize,
    winner: Option<i32>,
    final_scores: [i32; 2],
    duration_ms: u128,
}

fn run_simulate(
    n: usize,
    p1: &str,
    p2: &str,
    workers: usize,
    seed: u64,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers.max(1)).build()?;
    let records: Vec<GameRecord> =
        pool.install(|| (0..n).into_par_iter().map(|i| play_one_game(i, seed.wrapping_add(i as u64), p1, p2)).collect());

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    for record in &records {
        writeln!(writer, "{}", serde_json::to_string(record)?)?;
    }
    writer.flush()?;
    Ok(())
}

/// Plays one full game to completion (or the shared turn cap) with the
/// greedy-loop pattern: generate all moves, let the configured solver
/// pick, fall back to swapping slot 0, or pass the turn if nothing at all
/// is possible.
fn play_one_game(index: usize, seed: u64, p1: &str, p2: &str) -> GameRecord {
    let start = Instant::now();
    let mut state = GameState::new(seed.max(1));
    let mut solvers = [solver_by_name(p1, seed.wrapping_add(101)), solver_by_name(p2, seed.wrapping_add(202))];
    let mut moves_played = 0usize;

    for _ in 0..MAX_PLAYOUT_TURNS {
        if state.game_over {
            break;
        }
        let candidate_moves = generate_all_moves(&state);
        let solver = &mut solvers[state.current_player];
        if let Some(mv) = solver.select_move(&state, &candidate_moves) {
            state.play_tiles_prevalidated(&mv.placements, mv.score);
            moves_played += 1;
            continue;
        }

        let hand_non_empty = !state.current_hand().is_empty();
        if !state.bag.is_empty() && hand_non_empty {
            let _ = state.swap_tiles(&[0]);
        } else if !state.game_over {
            state.current_player = state.other_player();
        }
    }

    if !state.game_over {
        // Hit the turn cap without either hand ever emptying (both sides
        // stalled on swaps). Classify by score so every simulated game
        // still reports a definitive winner, per spec.md §8 scenario 6.
        state.game_over = true;
        state.winner = Some(match state.scores[0].cmp(&state.scores[1]) {
            std::cmp::Ordering::Greater => Winner::Player(0),
            std::cmp::Ordering::Less => Winner::Player(1),
            std::cmp::Ordering::Equal => Winner::Tie,
        });
    }

    let winner = state.winner.map(|w| match w {
        Winner::Player(i) => i as i32,
        Winner::Tie => -1,
    });
    GameRecord {
        id: index,
        seed,
        player_names: [p1.to_string(), p2.to_string()],
        moves: moves_played,
        winner,
        final_scores: state.scores,
        duration_ms: start.elapsed().as_millis(),
    }
}
