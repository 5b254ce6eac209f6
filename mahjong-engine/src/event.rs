//! Typed game event log.
//!
//! Events are pushed as plain enums during play; JSON only happens when a
//! boundary asks for it. Draw events carry the concealed tile, so the log is
//! a referee view and must be filtered before showing it to a seat.

use serde::Serialize;

use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// 13 tiles dealt to every seat.
    Deal { wall_remaining: usize },
    /// A seat took a tile from the wall.
    Draw {
        seat: u8,
        tile: Tile,
        replacement: bool,
    },
    Discard { seat: u8, tile: Tile },
    Pong { seat: u8, from: u8, tile: Tile },
    ExposedKong { seat: u8, from: u8, tile: Tile },
    ConcealedKong { seat: u8, tile: Tile },
    UpgradeKong { seat: u8, tile: Tile },
    /// A seat declined what it was offered.
    Pass { seat: u8 },
    Win {
        seat: u8,
        from: Option<u8>,
        tile: Tile,
        amount: i32,
    },
    /// The wall ran out.
    ExhaustiveDraw,
}

impl GameEvent {
    /// Seat that produced the event, if any.
    pub fn actor(&self) -> Option<u8> {
        match *self {
            GameEvent::Draw { seat, .. }
            | GameEvent::Discard { seat, .. }
            | GameEvent::Pong { seat, .. }
            | GameEvent::ExposedKong { seat, .. }
            | GameEvent::ConcealedKong { seat, .. }
            | GameEvent::UpgradeKong { seat, .. }
            | GameEvent::Pass { seat }
            | GameEvent::Win { seat, .. } => Some(seat),
            GameEvent::Deal { .. } | GameEvent::ExhaustiveDraw => None,
        }
    }
}
