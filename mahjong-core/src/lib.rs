//! Driver layer for the tile-matching engine.
//!
//! Deterministic seeding, a game runner that hands human decisions to a
//! provider, and parallel batch self-play.

pub mod game_loop;
pub mod seeding;
pub mod simulator;

pub use mahjong_engine as engine;
