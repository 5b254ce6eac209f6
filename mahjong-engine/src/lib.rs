pub mod action;
pub mod errors;
pub mod event;
pub mod observation;
pub mod parser;
pub mod rule;
pub mod score;
pub mod state;
pub mod tile;
pub mod types;
pub mod winning_hand;

pub use action::{Capability, Choice, DecisionContext, Phase, TurnState};
pub use errors::{EngineError, EngineResult, ProtocolViolation};
pub use event::GameEvent;
pub use observation::{MeldView, Observation, OpponentView};
pub use rule::GameRule;
pub use state::wall::Wall;
pub use state::GameState;
pub use tile::Tile;
pub use types::{Meld, MeldKind, SeatKind};
pub use winning_hand::is_winning_hand;
