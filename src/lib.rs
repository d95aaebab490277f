pub mod action;
pub mod card;
pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod policy;
pub mod record;
pub mod session;
pub mod store;
pub mod view;

pub use action::{ActionKind, Move};
pub use card::{Card, CardId, Deck};
pub use config::{EngineConfig, SeatConfig};
pub use error::RuleError;
pub use game::{Game, LogEntry, LogKind, LossCause, PendingAction, PendingBlock, Phase, PhaseKind};
pub use player::Player;
pub use policy::{DecisionError, DecisionProvider, PassivePolicy, RandomPolicy};
pub use session::Session;
pub use view::{Decision, PlayerView};

use serde::{Deserialize, Serialize};

use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

pub const STARTING_COINS: u8 = 2;
pub const MANDATORY_COUP_COINS: u8 = 10;
pub const COUP_COST: u8 = 7;
pub const ASSASSINATE_COST: u8 = 3;
pub const HAND_SIZE: usize = 2;
pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

pub const CHARACTER_VARIANTS: [Character; 5] = [
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
];
