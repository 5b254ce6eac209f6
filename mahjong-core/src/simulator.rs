//! Batch self-play with rayon parallelism.
//!
//! Every game is all-automated and owns its state; games share nothing, so
//! they run in parallel on a dedicated rayon `ThreadPool`.

use anyhow::Context;
use mahjong_engine::{GameRule, Phase, SeatKind};
use rayon::prelude::*;
use serde::Serialize;

use crate::game_loop::{GameRunner, PassiveProvider};
use crate::seeding::{derive_game_seed, new_seeded_game};

/// Configuration for a batch simulation run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of games to simulate.
    pub num_games: usize,
    /// Root seed; game `i` uses `derive_game_seed(session_seed, i)`.
    pub session_seed: [u8; 32],
    /// Number of threads in the rayon pool. None = rayon default (num CPUs).
    pub num_threads: Option<usize>,
    pub rule: GameRule,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_games: 100,
            session_seed: [0u8; 32],
            num_threads: None,
            rule: GameRule::default(),
        }
    }
}

/// Result from a single completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub game_index: u64,
    pub scores: [i32; 4],
    pub phase: Phase,
    pub winner: Option<u8>,
    pub self_draw: bool,
    pub after_kong: bool,
    /// Wall tiles left when the game ended.
    pub wall_remaining: usize,
    pub events: usize,
}

/// Plays game `game_index` of the session to the end.
pub fn simulate_single_game(
    rule: GameRule,
    session_seed: &[u8; 32],
    game_index: u64,
) -> anyhow::Result<GameResult> {
    let seed = derive_game_seed(session_seed, game_index);
    let state = new_seeded_game(rule, [SeatKind::Automated; 4], seed);
    let mut runner = GameRunner::new(state);
    runner
        .run_to_completion(&mut PassiveProvider)
        .with_context(|| format!("self-play game {game_index}"))?;

    let state = runner.state();
    let win = state.win();
    Ok(GameResult {
        game_index,
        scores: state.scores(),
        phase: state.phase(),
        winner: win.map(|w| w.winner),
        self_draw: win.is_some_and(|w| w.is_self_draw()),
        after_kong: win.is_some_and(|w| w.after_kong),
        wall_remaining: state.wall_remaining(),
        events: state.events().len(),
    })
}

/// Aggregate over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub games: usize,
    pub wins: usize,
    pub self_draws: usize,
    pub kong_bonus_wins: usize,
    pub exhaustive_draws: usize,
    pub wins_by_seat: [usize; 4],
    pub total_scores: [i64; 4],
}

impl BatchSummary {
    pub fn from_results(results: &[GameResult]) -> Self {
        let mut summary = Self {
            games: results.len(),
            ..Self::default()
        };
        for r in results {
            match r.winner {
                Some(seat) => {
                    summary.wins += 1;
                    summary.wins_by_seat[seat as usize] += 1;
                    summary.self_draws += usize::from(r.self_draw);
                    summary.kong_bonus_wins += usize::from(r.after_kong);
                }
                None => summary.exhaustive_draws += 1,
            }
            for (total, &score) in summary.total_scores.iter_mut().zip(&r.scores) {
                *total += i64::from(score);
            }
        }
        summary
    }
}

/// Parallel batch simulator using a dedicated rayon ThreadPool.
pub struct BatchSimulator {
    pool: rayon::ThreadPool,
}

impl BatchSimulator {
    pub fn new(num_threads: Option<usize>) -> anyhow::Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))?;
        Ok(Self { pool })
    }

    /// Runs every game in the batch. Results come back in game order.
    pub fn run_batch(&self, config: &BatchConfig) -> anyhow::Result<Vec<GameResult>> {
        self.pool.install(|| run_batch_simple(config))
    }
}

/// Convenience: run a batch on rayon's global thread pool.
pub fn run_batch_simple(config: &BatchConfig) -> anyhow::Result<Vec<GameResult>> {
    let rule = config.rule;
    let session_seed = config.session_seed;
    (0..config.num_games)
        .into_par_iter()
        .map(|i| simulate_single_game(rule, &session_seed, i as u64))
        .collect()
}
