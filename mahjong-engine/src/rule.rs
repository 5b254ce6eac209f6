use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// Table rules. Only the scoring amounts vary; the hand shape (four sets and
/// a pair, 13 dealt tiles) is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRule {
    /// Score every seat starts with.
    pub starting_score: i32,
    /// Base amount for a win on one's own draw.
    pub self_draw_base: i32,
    /// Base amount for a win on another seat's discard.
    pub discard_base: i32,
    /// Added on top of `self_draw_base` for a self-draw win.
    pub self_draw_bonus: i32,
    /// Added when the winning tile is the winner's kong replacement draw.
    pub kong_replacement_bonus: i32,
}

impl Default for GameRule {
    fn default() -> Self {
        Self {
            starting_score: 0,
            self_draw_base: 10,
            discard_base: 5,
            self_draw_bonus: 5,
            kong_replacement_bonus: 5,
        }
    }
}

impl GameRule {
    /// Parses a TOML rule table. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        toml::from_str(text).map_err(|e| EngineError::config(e.to_string()))
    }
}
