use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tile::Tile;

/// Something a seat may do at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Claim the discard to complete a winning hand.
    Win,
    /// Claim the discard with three held copies.
    Kong,
    /// Claim the discard with two held copies.
    Pong,
    /// The drawn tile completed the hand.
    SelfWin,
    /// All four copies of this value are held.
    ConcealedKong(Tile),
    /// The fourth copy of a claimed triplet is held.
    UpgradeKong(Tile),
}

impl Capability {
    /// Arbitration rank: wins over kongs over pongs.
    #[inline]
    pub const fn priority(self) -> u8 {
        match self {
            Capability::Win | Capability::SelfWin => 3,
            Capability::Kong | Capability::ConcealedKong(_) | Capability::UpgradeKong(_) => 2,
            Capability::Pong => 1,
        }
    }

    /// True for capabilities that claim another seat's discard.
    #[inline]
    pub const fn is_claim(self) -> bool {
        matches!(self, Capability::Win | Capability::Kong | Capability::Pong)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Win => f.write_str("win"),
            Capability::Kong => f.write_str("kong"),
            Capability::Pong => f.write_str("pong"),
            Capability::SelfWin => f.write_str("self-win"),
            Capability::ConcealedKong(t) => write!(f, "concealed kong {t}"),
            Capability::UpgradeKong(t) => write!(f, "upgrade kong {t}"),
        }
    }
}

/// A seat's answer at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    Take(Capability),
    Pass,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Take(cap) => cap.fmt(f),
            Choice::Pass => f.write_str("pass"),
        }
    }
}

/// Why the engine is waiting on a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionContext {
    /// `discarder` just threw `tile`; passing hands the chance on.
    Claim { discarder: u8, tile: Tile },
    /// The seat just drew; passing means it goes on to discard.
    SelfTurn,
}

/// Where the turn machine currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    AwaitingDraw(u8),
    AwaitingDiscard(u8),
    AwaitingInterruptDecision {
        seat: u8,
        capabilities: Vec<Capability>,
        context: DecisionContext,
    },
    Won(u8),
    Drawn,
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Won(_) | TurnState::Drawn)
    }

    /// The seat the engine is waiting on, if any.
    pub fn acting_seat(&self) -> Option<u8> {
        match *self {
            TurnState::AwaitingDraw(s)
            | TurnState::AwaitingDiscard(s)
            | TurnState::AwaitingInterruptDecision { seat: s, .. } => Some(s),
            TurnState::Won(_) | TurnState::Drawn => None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            TurnState::Won(_) => Phase::Won,
            TurnState::Drawn => Phase::Drawn,
            _ => Phase::Playing,
        }
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::AwaitingDraw(s) => write!(f, "awaiting draw from seat {s}"),
            TurnState::AwaitingDiscard(s) => write!(f, "awaiting discard from seat {s}"),
            TurnState::AwaitingInterruptDecision { seat, .. } => {
                write!(f, "awaiting decision from seat {seat}")
            }
            TurnState::Won(s) => write!(f, "won by seat {s}"),
            TurnState::Drawn => f.write_str("drawn"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    Won,
    Drawn,
}
