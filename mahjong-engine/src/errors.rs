use derive_more::{Display, Error, From};

use crate::tile::Tile;

/// A command the engine refused without touching any state.
///
/// The caller is expected to retry with a valid command; the engine never
/// retries or repairs a rejected command on its own.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProtocolViolation {
    /// Seat index outside 0..4.
    #[display("seat {_0} does not exist")]
    InvalidSeat(#[error(not(source))] u8),
    /// The seat acted while the engine was waiting on someone else (or on a
    /// different kind of command).
    #[display("seat {seat} acted out of turn (engine is {expected})")]
    OutOfTurn { seat: u8, expected: String },
    /// The chosen capability was not in the set the engine offered.
    #[display("seat {seat} was not offered {choice}")]
    NotOffered { seat: u8, choice: String },
    /// The referenced tile (or tile index) is not in the seat's concealed hand.
    #[display("seat {seat} does not hold {tile}")]
    TileNotInHand { seat: u8, tile: String },
    /// The game already ended in a win or an exhaustive draw.
    #[display("game is over")]
    GameOver,
}

impl ProtocolViolation {
    pub(crate) fn tile_not_in_hand(seat: u8, tile: Tile) -> Self {
        ProtocolViolation::TileNotInHand {
            seat,
            tile: tile.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum EngineError {
    /// Rejected command, no mutation happened.
    #[display("protocol violation: {_0}")]
    Protocol(ProtocolViolation),
    /// Core bug: tile accounting or hand shape drifted. The game that
    /// produced it is poisoned and must not continue.
    #[from(ignore)]
    #[display("invariant violation: {message}")]
    InvariantViolation { message: String },
    /// Tile notation that could not be parsed.
    #[from(ignore)]
    #[display("parse error on '{input}': {message}")]
    Parse { input: String, message: String },
    /// Rule file or wall setup that cannot be used.
    #[from(ignore)]
    #[display("configuration error: {message}")]
    Config { message: String },
}

impl EngineError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        EngineError::InvariantViolation {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        EngineError::Config {
            message: message.into(),
        }
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, EngineError::Protocol(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
