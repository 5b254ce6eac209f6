//! Per-seat view of the game.
//!
//! An observation carries the seat's own concealed tiles and, for everyone
//! else, only what lies face up on the table plus a hand count.

use serde::Serialize;

use crate::action::{Capability, Phase, TurnState};
use crate::errors::{EngineError, EngineResult};
use crate::state::GameState;
use crate::tile::Tile;
use crate::types::{Meld, MeldKind};

/// An opponent's meld as it lies on the table. Concealed quads are face
/// down, so their tile is withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeldView {
    pub kind: MeldKind,
    pub tile: Option<Tile>,
    pub claimed_from: Option<u8>,
}

impl From<&Meld> for MeldView {
    fn from(meld: &Meld) -> Self {
        Self {
            kind: meld.kind,
            tile: (!meld.is_concealed()).then_some(meld.tile),
            claimed_from: meld.claimed_from,
        }
    }
}

/// What a seat can see of an opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentView {
    pub seat: u8,
    pub melds: Vec<MeldView>,
    pub discards: Vec<Tile>,
    pub hand_count: usize,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub seat: u8,
    pub hand: Vec<Tile>,
    pub melds: Vec<Meld>,
    pub discards: Vec<Tile>,
    pub score: i32,
    /// The tile this seat just drew, while it is still this seat's turn.
    pub last_drawn: Option<Tile>,
    /// The other three seats, in turn order after this one.
    pub opponents: Vec<OpponentView>,
    pub wall_remaining: usize,
    pub phase: Phase,
    pub current_seat: u8,
    /// Seat the engine is waiting on, `None` once the game is over.
    pub acting_seat: Option<u8>,
    pub last_discarded: Option<(u8, Tile)>,
    /// Filled only when this seat faces a decision.
    pub capabilities: Vec<Capability>,
}

impl Observation {
    /// Builds the view for `seat`. The seat must be in range.
    pub(crate) fn for_seat(state: &GameState, seat: u8) -> Self {
        let players = state.players();
        let me = &players[seat as usize];
        let opponents = (1..4u8)
            .map(|offset| &players[((seat + offset) % 4) as usize])
            .map(|p| OpponentView {
                seat: p.seat,
                melds: p.melds.iter().map(MeldView::from).collect(),
                discards: p.discards.clone(),
                hand_count: p.hand.len(),
                score: p.score,
            })
            .collect();

        let capabilities = match state.turn() {
            TurnState::AwaitingInterruptDecision {
                seat: s,
                capabilities,
                ..
            } if *s == seat => capabilities.clone(),
            _ => Vec::new(),
        };
        let last_drawn = if state.current_player() == seat {
            state.last_drawn()
        } else {
            None
        };

        Self {
            seat,
            hand: me.hand.clone(),
            melds: me.melds.clone(),
            discards: me.discards.clone(),
            score: me.score,
            last_drawn,
            opponents,
            wall_remaining: state.wall_remaining(),
            phase: state.phase(),
            current_seat: state.current_player(),
            acting_seat: state.turn().acting_seat(),
            last_discarded: state.last_discarded(),
            capabilities,
        }
    }

    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string(self).map_err(|e| EngineError::invariant(e.to_string()))
    }
}
