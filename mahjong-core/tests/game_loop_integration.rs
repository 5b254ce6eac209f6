//! Integration tests for the game loop through the public API.

use std::collections::VecDeque;

use mahjong_core::engine::parser::parse_tiles;
use mahjong_core::engine::{
    Capability, DecisionContext, GameEvent, GameRule, GameState, Observation, Phase, SeatKind,
    Tile, Wall,
};
use mahjong_core::game_loop::{
    Decision, DecisionProvider, FirstChoiceProvider, GameRunner, HeuristicProvider, Prompt,
};
use mahjong_core::seeding::SessionRng;

/// Replays a fixed script and records every prompt it was shown.
struct Scripted {
    answers: VecDeque<Decision>,
    seen: Vec<(u8, Prompt)>,
}

impl DecisionProvider for Scripted {
    fn decide(&mut self, seat: u8, observation: &Observation, prompt: &Prompt) -> Decision {
        assert!(
            observation.opponents.iter().all(|o| o.hand_count >= 1),
            "opponents are reported by count only"
        );
        self.seen.push((seat, prompt.clone()));
        self.answers.pop_front().unwrap_or(Decision::Pass)
    }
}

fn stacked(hands: [&str; 4], draws: &str) -> Wall {
    let hands = hands.map(|h| parse_tiles(h).unwrap());
    Wall::stacked(
        [&hands[0], &hands[1], &hands[2], &hands[3]],
        &parse_tiles(draws).unwrap(),
    )
    .unwrap()
}

fn t(text: &str) -> Tile {
    text.parse().unwrap()
}

#[test]
fn human_discard_win_against_automated_table() {
    // Seat 1 (human) waits on 3s. Seat 0 (automated) holds only pairs
    // besides 3s, draws a third 2p and throws the 3s.
    let wall = stacked(
        [
            "3s22p44p66p88p22m44m",
            "111p555p999m111z3s",
            "22z33z44z55z66z77z5s",
            "123456789m1234s",
        ],
        "2p",
    );
    let seats = [
        SeatKind::Automated,
        SeatKind::Human,
        SeatKind::Automated,
        SeatKind::Automated,
    ];
    let state = GameState::from_wall(GameRule::default(), seats, wall).unwrap();
    let mut runner = GameRunner::new(state);
    let mut script = Scripted {
        answers: VecDeque::from([Decision::Take(Capability::Win)]),
        seen: Vec::new(),
    };
    runner.run_to_completion(&mut script).unwrap();

    assert_eq!(
        script.seen,
        vec![(
            1,
            Prompt::Decide {
                capabilities: vec![Capability::Win],
                context: DecisionContext::Claim {
                    discarder: 0,
                    tile: t("3s")
                },
            }
        )]
    );
    let state = runner.state();
    assert_eq!(state.phase(), Phase::Won);
    assert_eq!(state.scores(), [-5, 5, 0, 0]);
    assert_eq!(
        state.events().last(),
        Some(&GameEvent::Win {
            seat: 1,
            from: Some(0),
            tile: t("3s"),
            amount: 5
        })
    );
}

#[test]
fn observation_json_for_human_seat() {
    let mut session = SessionRng::from_u64(11);
    let state = mahjong_core::seeding::new_seeded_game(
        GameRule::default(),
        [SeatKind::Human; 4],
        session.next_game_seed(),
    );
    let json = state.observe(2).unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["seat"], 2);
    assert_eq!(value["wall_remaining"], 84);
    assert_eq!(value["acting_seat"], 0);
    assert_eq!(value["opponents"].as_array().unwrap().len(), 3);
}

#[test]
fn session_games_run_with_every_provider() {
    let mut session = SessionRng::from_u64(2024);
    for _ in 0..10 {
        let seed = session.next_game_seed();
        for provider in [0, 1] {
            let state = mahjong_core::seeding::new_seeded_game(
                GameRule::default(),
                [SeatKind::Human, SeatKind::Automated, SeatKind::Human, SeatKind::Automated],
                seed,
            );
            let mut runner = GameRunner::new(state);
            match provider {
                0 => runner.run_to_completion(&mut FirstChoiceProvider).unwrap(),
                _ => runner.run_to_completion(&mut HeuristicProvider).unwrap(),
            }
            assert!(runner.is_done());
            assert_eq!(runner.state().tile_total(), 136);
        }
    }
}

#[test]
fn custom_rules_change_payouts() {
    let rule = GameRule::from_toml_str("discard_base = 8").unwrap();
    let wall = stacked(
        [
            "3s2468p2468m2468s",
            "111p555p999m111z3s",
            "22z33z44z55z66z77z5s",
            "123456789m1234s",
        ],
        "7z",
    );
    let state = GameState::from_wall(rule, [SeatKind::Human; 4], wall).unwrap();
    let mut runner = GameRunner::new(state);
    let mut script = Scripted {
        answers: VecDeque::from([
            Decision::Draw,
            // 2p 4p 6p 8p 2s 3s ...
            Decision::Discard(5),
            Decision::Take(Capability::Win),
        ]),
        seen: Vec::new(),
    };
    runner.run_to_completion(&mut script).unwrap();
    assert_eq!(runner.scores(), [-8, 8, 0, 0]);
}
