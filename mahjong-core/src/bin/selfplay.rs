//! Self-play driver: batches of automated games, or one game's event log.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mahjong_core::engine::parser::format_tiles;
use mahjong_core::engine::{GameRule, SeatKind};
use mahjong_core::game_loop::{GameRunner, PassiveProvider};
use mahjong_core::seeding::{derive_game_seed, new_seeded_game, session_seed_from_u64};
use mahjong_core::simulator::{BatchConfig, BatchSimulator, BatchSummary};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Automated self-play for the four-seat tile game
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
#[command(about = "Run automated games and report outcomes", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML file with scoring rules; defaults apply when omitted
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Session seed
    #[arg(long, global = true, default_value = "0")]
    seed: u64,

    /// Print JSON instead of a text summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play many games in parallel and summarize them
    Batch {
        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: usize,

        /// Worker threads (defaults to the number of CPUs)
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Play one game of the session and print its event log
    Game {
        /// Index of the game within the session
        #[arg(long, default_value = "0")]
        index: u64,
    },
}

fn load_rule(path: Option<&PathBuf>) -> Result<GameRule> {
    let Some(path) = path else {
        return Ok(GameRule::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading rules from {}", path.display()))?;
    GameRule::from_toml_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn run_batch(rule: GameRule, seed: u64, games: usize, threads: Option<usize>, json: bool) -> Result<()> {
    let config = BatchConfig {
        num_games: games,
        session_seed: session_seed_from_u64(seed),
        num_threads: threads,
        rule,
    };
    let simulator = BatchSimulator::new(config.num_threads)?;
    let started = Instant::now();
    let results = simulator.run_batch(&config)?;
    let elapsed = started.elapsed();
    let summary = BatchSummary::from_results(&results);
    info!(games, ?elapsed, "batch finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("games:            {}", summary.games);
    println!("wins:             {}", summary.wins);
    println!("  self-draw:      {}", summary.self_draws);
    println!("  off kong:       {}", summary.kong_bonus_wins);
    println!("exhaustive draws: {}", summary.exhaustive_draws);
    println!("wins by seat:     {:?}", summary.wins_by_seat);
    println!("total scores:     {:?}", summary.total_scores);
    println!(
        "throughput:       {:.0} games/s",
        summary.games as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}

fn run_game(rule: GameRule, seed: u64, index: u64, json: bool) -> Result<()> {
    let game_seed = derive_game_seed(&session_seed_from_u64(seed), index);
    let state = new_seeded_game(rule, [SeatKind::Automated; 4], game_seed);
    let mut runner = GameRunner::new(state);
    runner.run_to_completion(&mut PassiveProvider)?;
    let state = runner.state();

    if json {
        println!("{}", serde_json::to_string_pretty(state.events())?);
        return Ok(());
    }
    for event in state.events() {
        let line = serde_json::to_string(event)?;
        match event.actor() {
            Some(seat) => println!("seat {seat}  {line}"),
            None => println!("        {line}"),
        }
    }
    for player in state.players() {
        println!("seat {} hand: {}", player.seat, format_tiles(&player.hand));
    }
    println!("result: {} scores {:?}", state.turn(), state.scores());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rule = load_rule(cli.rules.as_ref())?;

    match cli.command {
        Command::Batch { games, threads } => run_batch(rule, cli.seed, games, threads, cli.json),
        Command::Game { index } => run_game(rule, cli.seed, index, cli.json),
    }
}
