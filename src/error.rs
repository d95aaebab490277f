use thiserror::Error;

use crate::action::ActionKind;
use crate::card::CardId;
use crate::game::PhaseKind;
use crate::Character;

/// Reasons a move is refused. None of these are fatal: the state the move was
/// applied to is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("a game needs between {min} and {max} seats, got {got}")]
    SeatCount { min: usize, max: usize, got: usize },
    #[error("seat id '{0}' is used more than once")]
    DuplicateSeatId(String),
    #[error("the game is over")]
    GameOver,
    #[error("expected phase {expected:?}, but the game is in {found:?}")]
    WrongPhase { expected: PhaseKind, found: PhaseKind },
    #[error("seat {0} does not exist")]
    UnknownSeat(usize),
    #[error("it is not seat {0}'s turn")]
    NotYourTurn(usize),
    #[error("seat {0} has 10 or more coins and must Coup")]
    MustCoup(usize),
    #[error("{action:?} costs {cost} coins, seat has {coins}")]
    InsufficientCoins { action: ActionKind, cost: u8, coins: u8 },
    #[error("{0:?} needs a target")]
    MissingTarget(ActionKind),
    #[error("seat {0} cannot be targeted")]
    InvalidTarget(usize),
    #[error("seat {0} is not expected to respond")]
    NotAwaitingResponse(usize),
    #[error("{0:?} cannot be challenged")]
    Unchallengeable(ActionKind),
    #[error("{0:?} cannot be blocked")]
    Unblockable(ActionKind),
    #[error("seat {0} is not allowed to block this action")]
    IneligibleBlocker(usize),
    #[error("{character:?} does not block {action:?}")]
    WrongBlockCharacter { action: ActionKind, character: Character },
    #[error("seat {0} is not the one losing influence")]
    NotLosingInfluence(usize),
    #[error("seat {seat} has no hidden card {card:?}")]
    CardNotHidden { seat: usize, card: CardId },
    #[error("the court deck is empty")]
    DeckExhausted,
}
