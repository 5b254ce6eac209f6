//! Property-based invariant tests for the game engine.
//!
//! Uses proptest to generate random seeds and seat mixes, plays full games
//! with random decisions, and verifies core invariants at every step.

use mahjong_core::engine::tile::NUM_TILES;
use mahjong_core::engine::types::TileCounts;
use mahjong_core::engine::winning_hand::{decompose, is_winning_hand, Set};
use mahjong_core::engine::{GameRule, GameState, Observation, SeatKind, Tile};
use mahjong_core::game_loop::{Decision, DecisionProvider, GameRunner, Prompt, MAX_STEPS};
use mahjong_core::seeding::{derive_game_seed, new_seeded_game};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Picks uniformly among every legal answer, passing included.
struct RandomProvider(ChaCha8Rng);

impl DecisionProvider for RandomProvider {
    fn decide(&mut self, _seat: u8, observation: &Observation, prompt: &Prompt) -> Decision {
        match prompt {
            Prompt::Draw => Decision::Draw,
            Prompt::Discard => Decision::Discard(self.0.random_range(0..observation.hand.len())),
            Prompt::Decide { capabilities, .. } => {
                let i = self.0.random_range(0..=capabilities.len());
                capabilities.get(i).map_or(Decision::Pass, |&c| Decision::Take(c))
            }
        }
    }
}

fn seats_for(mask: u8) -> [SeatKind; 4] {
    std::array::from_fn(|i| {
        if mask >> i & 1 == 1 {
            SeatKind::Human
        } else {
            SeatKind::Automated
        }
    })
}

fn new_game(seed: u64, mask: u8) -> GameState {
    new_seeded_game(
        GameRule::default(),
        seats_for(mask),
        derive_game_seed(&[0x5Au8; 32], seed),
    )
}

/// Copies of each value outside the wall.
fn visible_counts(state: &GameState) -> TileCounts {
    let mut counts = TileCounts::new();
    for p in state.players() {
        let tiles = p
            .hand
            .iter()
            .copied()
            .chain(p.discards.iter().copied())
            .chain(p.melds.iter().flat_map(|m| m.tiles()));
        for t in tiles {
            counts.add(t);
        }
    }
    counts
}

/// Play a full game, returning the final state.
fn play_full_game(seed: u64, mask: u8) -> GameState {
    let mut runner = GameRunner::new(new_game(seed, mask));
    let mut provider = RandomProvider(ChaCha8Rng::seed_from_u64(seed));
    runner.run_to_completion(&mut provider).unwrap();
    runner.into_state()
}

// ---------------------------------------------------------------------------
// Whole-game properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Conservation, copy limits and termination, checked after every step.
    #[test]
    fn game_invariants_hold(seed in 0u64..1_000_000, mask in 0u8..16) {
        let mut runner = GameRunner::new(new_game(seed, mask));
        let mut provider = RandomProvider(ChaCha8Rng::seed_from_u64(seed));

        loop {
            let running = runner
                .step_once(&mut provider)
                .map_err(|e| TestCaseError::fail(format!("seed {seed}: {e:#}")))?;
            let state = runner.state();

            prop_assert_eq!(state.tile_total(), NUM_TILES, "seed {}", seed);
            prop_assert!(!state.is_poisoned());
            for (tile, copies) in visible_counts(state).iter() {
                prop_assert!(copies <= 4, "seed {seed}: {copies} copies of {tile}");
            }
            if !running {
                break;
            }
        }

        // -- game terminates (within MAX_STEPS) --
        prop_assert!(runner.is_done());
        prop_assert!(runner.steps() <= MAX_STEPS);
    }

    /// Discard wins move points between two seats; self-draws only credit.
    #[test]
    fn scores_follow_win_kind(seed in 0u64..1_000_000, mask in 0u8..16) {
        let state = play_full_game(seed, mask);
        let sum: i32 = state.scores().iter().sum();
        match state.win() {
            Some(win) if win.is_self_draw() => {
                prop_assert_eq!(sum, win.amount);
                prop_assert_eq!(state.scores()[win.winner as usize], win.amount);
            }
            Some(win) => {
                prop_assert_eq!(sum, 0);
                let discarder = win.discarder.unwrap_or(win.winner);
                prop_assert_eq!(state.scores()[discarder as usize], -win.amount);
            }
            None => {
                prop_assert_eq!(state.scores(), [0; 4]);
            }
        }
    }

    #[test]
    fn same_seed_same_game(seed in 0u64..1_000_000, mask in 0u8..16) {
        let a = play_full_game(seed, mask);
        let b = play_full_game(seed, mask);
        prop_assert_eq!(a.events(), b.events());
        prop_assert_eq!(a.scores(), b.scores());
    }
}

// ---------------------------------------------------------------------------
// Validator properties
// ---------------------------------------------------------------------------

/// Sets built from `(tile id, run wanted)` plus a pair. `None` when that
/// would need a fifth copy of something.
fn build_hand(sets: &[(u8, bool)], pair: u8) -> Option<TileCounts> {
    let mut counts = TileCounts::new();
    for &(id, run) in sets {
        let tile = Tile::new(id)?;
        let group = match (run, tile.number()) {
            (true, Some(n)) if n <= 7 => {
                let second = tile.successor()?;
                [tile, second, second.successor()?]
            }
            _ => [tile; 3],
        };
        for t in group {
            counts.add(t);
        }
    }
    let pair = Tile::new(pair)?;
    counts.add(pair);
    counts.add(pair);
    let ok = counts.iter().all(|(_, c)| c <= 4);
    ok.then_some(counts)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn constructed_hands_always_win(
        sets in prop::collection::vec((0u8..34, any::<bool>()), 4),
        pair in 0u8..34,
    ) {
        let counts = build_hand(&sets, pair);
        prop_assume!(counts.is_some());
        let counts = counts.unwrap();
        prop_assert!(is_winning_hand(&counts, 0));

        // Whatever decomposition is found must rebuild the same multiset.
        let found = decompose(&counts, 0).unwrap();
        let mut rebuilt = TileCounts::new();
        rebuilt.add(found.pair);
        rebuilt.add(found.pair);
        for set in &found.sets {
            match *set {
                Set::Triplet(t) => (0..3).for_each(|_| rebuilt.add(t)),
                Set::Run(t) => {
                    let second = t.successor().unwrap();
                    rebuilt.add(t);
                    rebuilt.add(second);
                    rebuilt.add(second.successor().unwrap());
                }
            }
        }
        prop_assert_eq!(rebuilt, counts);
    }

    /// Melds stand in for sets: dropping k sets and declaring k melds keeps
    /// the hand winning.
    #[test]
    fn melds_replace_sets(
        sets in prop::collection::vec((0u8..34, any::<bool>()), 4),
        pair in 0u8..34,
        melds in 0usize..=4,
    ) {
        let partial = build_hand(&sets[melds..], pair);
        let full = build_hand(&sets, pair);
        prop_assume!(partial.is_some() && full.is_some());
        prop_assert!(is_winning_hand(&partial.unwrap(), melds));
    }

    #[test]
    fn honour_sequences_never_run(start in 27u8..32) {
        let tiles: Vec<Tile> = (start..start + 3).filter_map(Tile::new).collect();
        prop_assume!(tiles.len() == 3);
        prop_assert!(!mahjong_core::engine::winning_hand::is_run([tiles[0], tiles[1], tiles[2]]));
    }
}

// ---------------------------------------------------------------------------
// Standalone deterministic tests
// ---------------------------------------------------------------------------

#[test]
fn game_never_panics_100_seeds() {
    for seed in 0..100u64 {
        let state = play_full_game(seed, (seed % 16) as u8);
        assert!(state.is_over(), "seed {seed}: game did not finish");
    }
}
