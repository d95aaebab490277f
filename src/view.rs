use serde::{Deserialize, Serialize};

use crate::action::{ActionKind, Move};
use crate::card::CardId;
use crate::game::{Game, LogEntry, PendingAction, PendingBlock, Phase, PhaseKind};
use crate::player::Player;
use crate::policy::DecisionError;
use crate::Character;

/// What one seat is allowed to know about an opponent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentView {
    pub seat: usize,
    pub id: String,
    pub name: String,
    pub coins: u8,
    pub influence: usize,
    pub revealed: Vec<Character>,
    pub eliminated: bool,
}

/// The game as seen from one seat. Opponents' hidden roles never leave the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub seat: usize,
    pub phase: PhaseKind,
    pub turn: usize,
    pub current_player: usize,
    pub me: Player,
    pub opponents: Vec<OpponentView>,
    pub pending_action: Option<PendingAction>,
    pub pending_block: Option<PendingBlock>,
    pub history: Vec<LogEntry>,
    pub options: Vec<Decision>,
}

impl PlayerView {
    pub fn for_seat(game: &Game, seat: usize, log_window: usize) -> Option<Self> {
        let me = game.player(seat)?.clone();

        let opponents = game
            .players()
            .iter()
            .enumerate()
            .filter(|&(idx, _)| idx != seat)
            .map(|(idx, player)| OpponentView {
                seat: idx,
                id: player.id().to_string(),
                name: player.name().to_string(),
                coins: player.coins(),
                influence: player.influence(),
                revealed: player.revealed_cards().map(|card| card.character).collect(),
                eliminated: player.is_eliminated(),
            })
            .collect();

        let log = game.log_entries();
        let history = log[log.len().saturating_sub(log_window)..].to_vec();

        let options = game
            .actions()
            .into_iter()
            .filter(|mv| mv.seat() == seat)
            .map(Decision::from)
            .collect();

        Some(Self {
            seat,
            phase: game.phase().kind(),
            turn: game.turn(),
            current_player: game.current_player_idx(),
            me,
            opponents,
            pending_action: game.pending_action().copied(),
            pending_block: game.pending_block().copied(),
            history,
            options,
        })
    }
}

/// A decision as produced by a provider, in the shape providers send it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Decision {
    Action {
        action: ActionKind,
        #[serde(default)]
        target: Option<usize>,
    },
    Challenge,
    Block {
        claimed_role: Character,
    },
    Pass,
    LoseCard {
        card_id: CardId,
    },
}

impl Decision {
    /// Parses a provider reply. Anything around the outermost JSON object,
    /// like prose or code fences, is ignored.
    pub fn parse(text: &str) -> Result<Decision, DecisionError> {
        let start = text.find('{');
        let end = text.rfind('}');
        let json = match (start, end) {
            (Some(start), Some(end)) if start < end => &text[start..=end],
            _ => text,
        };

        serde_json::from_str(json).map_err(|err| DecisionError::Malformed(err.to_string()))
    }

    pub fn into_move(self, seat: usize) -> Move {
        match self {
            Decision::Action { action, target } => Move::Declare {
                actor: seat,
                action,
                target: if action.requires_target() { target } else { None },
            },
            Decision::Challenge => Move::Challenge(seat),
            Decision::Block { claimed_role } => Move::Block(seat, claimed_role),
            Decision::Pass => Move::Pass(seat),
            Decision::LoseCard { card_id } => Move::LoseCard(seat, card_id),
        }
    }
}

impl From<Move> for Decision {
    fn from(mv: Move) -> Self {
        match mv {
            Move::Declare { action, target, .. } => Decision::Action { action, target },
            Move::Challenge(_) => Decision::Challenge,
            Move::Block(_, claimed_role) => Decision::Block { claimed_role },
            Move::Pass(_) => Decision::Pass,
            Move::LoseCard(_, card_id) => Decision::LoseCard { card_id },
        }
    }
}

impl Game {
    /// Turns whatever a provider came back with into a legal move for `seat`.
    /// Unusable decisions fall back to the safe choice for the phase: Income
    /// at turn start (Coup when forced), Pass while responding, the first
    /// hidden card when influence must be lost. `None` if the seat has
    /// nothing to do right now.
    pub fn decision_to_move(&self, seat: usize, decision: Option<Decision>) -> Option<Move> {
        let legal: Vec<Move> = self.actions().into_iter().filter(|mv| mv.seat() == seat).collect();
        if legal.is_empty() {
            return None;
        }

        if let Some(decision) = decision {
            let mv = decision.into_move(seat);
            if legal.contains(&mv) {
                return Some(mv);
            }
            tracing::warn!(seat, ?mv, "unusable decision, falling back");
        }

        let fallback = match self.phase() {
            Phase::TurnStart => {
                let income = Move::Declare {
                    actor: seat,
                    action: ActionKind::Income,
                    target: None,
                };
                if legal.contains(&income) {
                    income
                } else {
                    legal[0].clone()
                }
            }
            Phase::ActionDeclared { .. } | Phase::BlockDeclared { .. } => Move::Pass(seat),
            Phase::InfluenceLoss { .. } | Phase::GameOver { .. } => legal[0].clone(),
        };

        Some(fallback)
    }
}
