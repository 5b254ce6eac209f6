//! Win scoring: base amount plus self-draw and kong-replacement bonuses.
//!
//! A discard win is a zero-sum transfer from the discarder. A self-draw win
//! only credits the winner; nobody else pays.

use serde::{Deserialize, Serialize};

use crate::rule::GameRule;
use crate::tile::Tile;

/// Score changes produced by one win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub amount: i32,
    pub deltas: [i32; 4],
}

/// The finished win, kept on the game state for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRecord {
    pub winner: u8,
    /// Seat whose discard was claimed; `None` for a self-draw.
    pub discarder: Option<u8>,
    pub tile: Tile,
    pub after_kong: bool,
    pub amount: i32,
}

impl WinRecord {
    pub fn is_self_draw(&self) -> bool {
        self.discarder.is_none()
    }
}

/// Amount a win is worth. The kong bonus only applies to a self-draw,
/// since only then is the winning tile a replacement draw.
pub fn win_amount(rule: &GameRule, self_draw: bool, after_kong: bool) -> i32 {
    if self_draw {
        let mut amount = rule.self_draw_base + rule.self_draw_bonus;
        if after_kong {
            amount += rule.kong_replacement_bonus;
        }
        amount
    } else {
        rule.discard_base
    }
}

pub fn score_win(rule: &GameRule, winner: u8, discarder: Option<u8>, after_kong: bool) -> ScoreDelta {
    let amount = win_amount(rule, discarder.is_none(), after_kong);
    let mut deltas = [0; 4];
    deltas[winner as usize] += amount;
    if let Some(d) = discarder {
        deltas[d as usize] -= amount;
    }
    ScoreDelta { amount, deltas }
}
