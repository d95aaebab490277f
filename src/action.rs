use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

use crate::card::CardId;
use crate::Character;
use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};
use crate::{ASSASSINATE_COST, COUP_COST};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Income,
    ForeignAid,
    Tax,
    Steal,
    Assassinate,
    Exchange,
    Coup,
}

pub static ACTION_VARIANTS: [ActionKind; 7] = [
    ActionKind::Income,
    ActionKind::ForeignAid,
    ActionKind::Tax,
    ActionKind::Steal,
    ActionKind::Assassinate,
    ActionKind::Exchange,
    ActionKind::Coup,
];

impl ActionKind {
    /// Paid on declaration and never refunded.
    pub fn cost(self) -> u8 {
        match self {
            ActionKind::Coup => COUP_COST,
            ActionKind::Assassinate => ASSASSINATE_COST,
            _ => 0,
        }
    }

    pub fn requires_target(self) -> bool {
        matches!(self, ActionKind::Steal | ActionKind::Assassinate | ActionKind::Coup)
    }

    /// The character an actor implicitly claims by declaring this action.
    /// `None` means the action cannot be challenged.
    pub fn claimed_character(self) -> Option<Character> {
        match self {
            ActionKind::Tax => Some(Duke),
            ActionKind::Assassinate => Some(Assassin),
            ActionKind::Steal => Some(Captain),
            ActionKind::Exchange => Some(Ambassador),
            ActionKind::Income | ActionKind::ForeignAid | ActionKind::Coup => None,
        }
    }

    pub fn blocking_characters(self) -> &'static [Character] {
        match self {
            ActionKind::ForeignAid => &[Duke],
            ActionKind::Steal => &[Captain, Ambassador],
            ActionKind::Assassinate => &[Contessa],
            _ => &[],
        }
    }

    /// Only the target may block a targeted action, anyone may block foreign aid.
    pub fn only_target_blocks(self) -> bool {
        matches!(self, ActionKind::Steal | ActionKind::Assassinate)
    }
}

/// Everything a seat can submit to the engine.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Move {
    Declare {
        actor: usize,
        action: ActionKind,
        target: Option<usize>,
    },
    Challenge(usize),
    Block(usize, Character),
    Pass(usize),
    LoseCard(usize, CardId),
}

impl Move {
    pub fn seat(&self) -> usize {
        match self {
            Move::Declare { actor, .. } => *actor,
            Move::Challenge(seat) | Move::Block(seat, _) | Move::Pass(seat) | Move::LoseCard(seat, _) => {
                *seat
            }
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Declare {
                actor,
                action,
                target: Some(target),
            } => f.write_fmt(format_args!("Player {actor} declares {:?} on {target}", action)),
            Move::Declare {
                actor,
                action,
                target: None,
            } => f.write_fmt(format_args!("Player {actor} declares {:?}", action)),
            Move::Challenge(player_idx) => f.write_fmt(format_args!("Player {player_idx} challenges")),
            Move::Block(player_idx, character) => {
                f.write_fmt(format_args!("Player {player_idx} blocks with {:?}", character))
            }
            Move::Pass(player_idx) => f.write_fmt(format_args!("Player {player_idx} passes")),
            Move::LoseCard(player_idx, card_id) => {
                f.write_fmt(format_args!("Player {player_idx} loses card {}", card_id.0))
            }
        }
    }
}
