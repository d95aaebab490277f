use std::fmt::{Debug, Formatter};
use std::ops::Range;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::{ActionKind, Move};
use crate::card::{Card, CardId, Deck};
use crate::config::SeatConfig;
use crate::error::RuleError;
use crate::player::Player;
use crate::{Character, HAND_SIZE, MANDATORY_COUP_COINS, MAX_SEATS, MIN_SEATS, STARTING_COINS};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub actor: usize,
    pub action: ActionKind,
    pub target: Option<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBlock {
    pub blocker: usize,
    pub character: Character,
}

/// Why a seat is being made to reveal a card. Decides what happens once the
/// card is gone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    CoupTarget { action: PendingAction },
    AssassinateTarget { action: PendingAction },
    // challenger was wrong about the actor, the action still goes ahead
    FailedActionChallenge { action: PendingAction },
    // challenger was wrong about the blocker, the block stands
    FailedBlockChallenge,
    // actor was bluffing, the action is gone
    SucceededActionChallenge,
    // blocker was bluffing, the action goes ahead
    SucceededBlockChallenge { action: PendingAction },
}

impl LossCause {
    pub fn pending_action(&self) -> Option<&PendingAction> {
        match self {
            LossCause::CoupTarget { action }
            | LossCause::AssassinateTarget { action }
            | LossCause::FailedActionChallenge { action }
            | LossCause::SucceededBlockChallenge { action } => Some(action),
            LossCause::FailedBlockChallenge | LossCause::SucceededActionChallenge => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    TurnStart,
    ActionDeclared {
        action: PendingAction,
        // seats that may still challenge, block or pass
        awaiting: Vec<usize>,
    },
    BlockDeclared {
        action: PendingAction,
        block: PendingBlock,
        awaiting: Vec<usize>,
    },
    InfluenceLoss {
        loser: usize,
        cause: LossCause,
    },
    GameOver {
        winner: usize,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    TurnStart,
    ActionDeclared,
    BlockDeclared,
    ChallengeLoss,
    GameOver,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::TurnStart => PhaseKind::TurnStart,
            Phase::ActionDeclared { .. } => PhaseKind::ActionDeclared,
            Phase::BlockDeclared { .. } => PhaseKind::BlockDeclared,
            Phase::InfluenceLoss { .. } => PhaseKind::ChallengeLoss,
            Phase::GameOver { .. } => PhaseKind::GameOver,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Info,
    Alert,
    Success,
    Danger,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: usize,
    pub text: String,
    pub kind: LogKind,
    /// milliseconds since the unix epoch
    pub timestamp: u64,
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Authoritative state of one game. Every operation takes `&self` and hands
/// back a new value, the receiver is never touched.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    turn: usize,
    current_player_idx: usize,
    players: Vec<Player>,
    deck: Deck,
    phase: Phase,
    log: Vec<LogEntry>,
    started_at: u64,
}

impl Debug for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("T {} | P {} | {:?}\n", self.turn, self.current_player_idx, self.phase.kind()).as_str())?;
        for (player_idx, player) in self.players.iter().enumerate() {
            let cards: Vec<(Character, bool)> = player.cards.iter().map(|card| (card.character, card.revealed)).collect();
            f.write_str(format!("\tP {player_idx}: ${} | {:?}\n", player.coins, cards).as_str())?;
        }
        Ok(())
    }
}

impl Game {
    pub fn new<R: Rng + Sized>(seats: &[SeatConfig], starting_coins: u8, rng: &mut R) -> Result<Self, RuleError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&seats.len()) {
            return Err(RuleError::SeatCount {
                min: MIN_SEATS,
                max: MAX_SEATS,
                got: seats.len(),
            });
        }

        for (idx, seat) in seats.iter().enumerate() {
            if seats[..idx].iter().any(|other| other.id == seat.id) {
                return Err(RuleError::DuplicateSeatId(seat.id.clone()));
            }
        }

        let mut deck = Deck::build(rng);

        let mut players = Vec::with_capacity(seats.len());
        for seat in seats {
            let mut cards = Vec::with_capacity(HAND_SIZE);
            for _ in 0..HAND_SIZE {
                cards.push(Card::hidden(deck.draw()?, rng));
            }

            players.push(Player {
                id: seat.id.clone(),
                name: seat.name.clone(),
                automated: seat.automated,
                coins: starting_coins,
                cards,
                eliminated: false,
                placement: None,
            });
        }

        let mut game = Self {
            turn: 1,
            current_player_idx: 0,
            players,
            deck,
            phase: Phase::TurnStart,
            log: Vec::new(),
            started_at: now_millis(),
        };

        game.log(LogKind::Info, "Game started. Good luck.".to_string());
        tracing::debug!(seats = game.players.len(), "game created");

        Ok(game)
    }

    /// A game with `num_players` generic seats, seat 0 human and the rest automated.
    pub fn with_seats<R: Rng + Sized>(num_players: usize, rng: &mut R) -> Result<Self, RuleError> {
        let seats: Vec<SeatConfig> = (0..num_players)
            .map(|idx| SeatConfig {
                id: format!("p{idx}"),
                name: format!("Player {idx}"),
                automated: idx != 0,
            })
            .collect();

        Self::new(&seats, STARTING_COINS, rng)
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn current_player_idx(&self) -> usize {
        self.current_player_idx
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_idx: usize) -> Option<&Player> {
        self.players.get(player_idx)
    }

    pub fn seat_of(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|player| player.id == id)
    }

    pub fn players_indexes(&self) -> Range<usize> {
        0..self.players.len()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    pub fn winner(&self) -> Option<usize> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        match &self.phase {
            Phase::ActionDeclared { action, .. } | Phase::BlockDeclared { action, .. } => Some(action),
            Phase::InfluenceLoss { cause, .. } => cause.pending_action(),
            Phase::TurnStart | Phase::GameOver { .. } => None,
        }
    }

    pub fn pending_block(&self) -> Option<&PendingBlock> {
        match &self.phase {
            Phase::BlockDeclared { block, .. } => Some(block),
            _ => None,
        }
    }

    pub fn waiting_for_response_from(&self) -> &[usize] {
        match &self.phase {
            Phase::ActionDeclared { awaiting, .. } | Phase::BlockDeclared { awaiting, .. } => awaiting,
            _ => &[],
        }
    }

    pub fn player_to_lose_influence(&self) -> Option<usize> {
        match self.phase {
            Phase::InfluenceLoss { loser, .. } => Some(loser),
            _ => None,
        }
    }

    /// The seat the host has to ask for a decision next.
    pub fn whose_decision(&self) -> Option<usize> {
        match &self.phase {
            Phase::TurnStart => Some(self.current_player_idx),
            Phase::ActionDeclared { awaiting, .. } | Phase::BlockDeclared { awaiting, .. } => awaiting.first().copied(),
            Phase::InfluenceLoss { loser, .. } => Some(*loser),
            Phase::GameOver { .. } => None,
        }
    }

    pub fn is_player_dead(&self, player_idx: usize) -> bool {
        self.players[player_idx].eliminated
    }

    pub fn living_players(&self) -> impl Iterator<Item = usize> + '_ {
        self.players_indexes().filter(|&idx| !self.is_player_dead(idx))
    }

    /// Living seats other than `exclude_idx`, in turn order starting after it.
    pub fn other_player_indexes(&self, exclude_idx: usize) -> Vec<usize> {
        (1..self.players.len())
            .map(|n| (exclude_idx + n) % self.players.len())
            .filter(|player_idx| !self.is_player_dead(*player_idx))
            .collect()
    }

    fn log(&mut self, kind: LogKind, text: String) {
        self.log.push(LogEntry {
            turn: self.turn,
            text,
            kind,
            timestamp: now_millis(),
        });
    }

    fn name(&self, player_idx: usize) -> &str {
        &self.players[player_idx].name
    }

    fn ensure_running(&self) -> Result<(), RuleError> {
        if self.is_over() {
            return Err(RuleError::GameOver);
        }
        Ok(())
    }

    fn ensure_seat(&self, player_idx: usize) -> Result<(), RuleError> {
        if player_idx >= self.players.len() {
            return Err(RuleError::UnknownSeat(player_idx));
        }
        Ok(())
    }

    fn wrong_phase(&self, expected: PhaseKind) -> RuleError {
        RuleError::WrongPhase {
            expected,
            found: self.phase.kind(),
        }
    }

    fn next_living_player(&self) -> usize {
        let mut idx = self.current_player_idx;

        idx = (idx + 1) % self.players.len();
        while self.is_player_dead(idx) {
            idx = (idx + 1) % self.players.len();
        }

        idx
    }

    // ---------------------------------------------------------------------
    // declaration
    // ---------------------------------------------------------------------

    pub fn declare_action(&self, actor: usize, action: ActionKind, target: Option<usize>) -> Result<Game, RuleError> {
        self.ensure_running()?;
        if self.phase != Phase::TurnStart {
            return Err(self.wrong_phase(PhaseKind::TurnStart));
        }
        self.ensure_seat(actor)?;
        if actor != self.current_player_idx {
            return Err(RuleError::NotYourTurn(actor));
        }

        let coins = self.players[actor].coins;
        if coins >= MANDATORY_COUP_COINS && action != ActionKind::Coup {
            return Err(RuleError::MustCoup(actor));
        }
        if coins < action.cost() {
            return Err(RuleError::InsufficientCoins {
                action,
                cost: action.cost(),
                coins,
            });
        }

        let target = if action.requires_target() {
            let target = target.ok_or(RuleError::MissingTarget(action))?;
            if target >= self.players.len() || target == actor || self.is_player_dead(target) {
                return Err(RuleError::InvalidTarget(target));
            }
            Some(target)
        } else {
            None
        };

        let mut game = self.clone();

        // pay up front, win or lose
        game.players[actor].coins -= action.cost();

        let text = match target {
            Some(target) => format!("{} declares {:?} on {}.", game.name(actor), action, game.name(target)),
            None => format!("{} declares {:?}.", game.name(actor), action),
        };
        game.log(LogKind::Info, text);
        tracing::debug!(turn = game.turn, actor, ?action, ?target, "action declared");

        let pending = PendingAction { actor, action, target };

        match (action, target) {
            (ActionKind::Income, _) => {
                game.players[actor].coins += 1;
                let text = format!("{} gained 1 coin.", game.name(actor));
                game.log(LogKind::Info, text);
                game.go_next_turn();
            }
            (ActionKind::Coup, Some(target)) => {
                game.phase = Phase::InfluenceLoss {
                    loser: target,
                    cause: LossCause::CoupTarget { action: pending },
                };
            }
            _ => {
                game.phase = Phase::ActionDeclared {
                    action: pending,
                    awaiting: game.other_player_indexes(actor),
                };
            }
        }

        Ok(game)
    }

    pub fn declare_block(&self, blocker: usize, character: Character) -> Result<Game, RuleError> {
        self.ensure_running()?;
        self.ensure_seat(blocker)?;

        let Phase::ActionDeclared { action, awaiting } = &self.phase else {
            return Err(self.wrong_phase(PhaseKind::ActionDeclared));
        };

        if !awaiting.contains(&blocker) {
            return Err(RuleError::NotAwaitingResponse(blocker));
        }

        let blockers = action.action.blocking_characters();
        if blockers.is_empty() {
            return Err(RuleError::Unblockable(action.action));
        }
        if action.action.only_target_blocks() && action.target != Some(blocker) {
            return Err(RuleError::IneligibleBlocker(blocker));
        }
        if !blockers.contains(&character) {
            return Err(RuleError::WrongBlockCharacter {
                action: action.action,
                character,
            });
        }

        let action = *action;
        let mut game = self.clone();

        let text = format!("{} blocks using {:?}.", game.name(blocker), character);
        game.log(LogKind::Info, text);
        tracing::debug!(turn = game.turn, blocker, ?character, "block declared");

        game.phase = Phase::BlockDeclared {
            action,
            block: PendingBlock { blocker, character },
            awaiting: game.other_player_indexes(blocker),
        };

        Ok(game)
    }

    // ---------------------------------------------------------------------
    // responses
    // ---------------------------------------------------------------------

    pub fn pass(&self, player_idx: usize) -> Result<Game, RuleError> {
        self.ensure_running()?;
        self.ensure_seat(player_idx)?;

        let mut game = self.clone();
        match &mut game.phase {
            Phase::ActionDeclared { awaiting, .. } | Phase::BlockDeclared { awaiting, .. } => {
                let Some(position) = awaiting.iter().position(|&idx| idx == player_idx) else {
                    return Err(RuleError::NotAwaitingResponse(player_idx));
                };
                awaiting.remove(position);
            }
            _ => return Err(self.wrong_phase(PhaseKind::ActionDeclared)),
        }

        let text = format!("{} passes.", game.name(player_idx));
        game.log(LogKind::Info, text);

        Ok(game)
    }

    pub fn challenge<R: Rng + Sized>(&self, challenger: usize, rng: &mut R) -> Result<Game, RuleError> {
        self.ensure_running()?;
        self.ensure_seat(challenger)?;

        let mut game = self.clone();

        match &self.phase {
            Phase::ActionDeclared { action, awaiting } => {
                if !awaiting.contains(&challenger) {
                    return Err(RuleError::NotAwaitingResponse(challenger));
                }
                let Some(required) = action.action.claimed_character() else {
                    return Err(RuleError::Unchallengeable(action.action));
                };

                let claimant = action.actor;
                let text = format!("{} challenges {}'s {:?}!", game.name(challenger), game.name(claimant), action.action);
                game.log(LogKind::Info, text);

                let loser = if game.vindicate(claimant, required, rng)? {
                    game.phase = Phase::InfluenceLoss {
                        loser: challenger,
                        cause: LossCause::FailedActionChallenge { action: *action },
                    };
                    challenger
                } else {
                    game.phase = Phase::InfluenceLoss {
                        loser: claimant,
                        cause: LossCause::SucceededActionChallenge,
                    };
                    claimant
                };
                tracing::debug!(turn = game.turn, challenger, claimant, loser, "action challenge resolved");
            }
            Phase::BlockDeclared { action, block, awaiting } => {
                if !awaiting.contains(&challenger) {
                    return Err(RuleError::NotAwaitingResponse(challenger));
                }

                let claimant = block.blocker;
                let text = format!(
                    "{} challenges {}'s block with {:?}!",
                    game.name(challenger),
                    game.name(claimant),
                    block.character
                );
                game.log(LogKind::Info, text);

                let loser = if game.vindicate(claimant, block.character, rng)? {
                    game.phase = Phase::InfluenceLoss {
                        loser: challenger,
                        cause: LossCause::FailedBlockChallenge,
                    };
                    challenger
                } else {
                    game.phase = Phase::InfluenceLoss {
                        loser: claimant,
                        cause: LossCause::SucceededBlockChallenge { action: *action },
                    };
                    claimant
                };
                tracing::debug!(turn = game.turn, challenger, claimant, loser, "block challenge resolved");
            }
            _ => return Err(self.wrong_phase(PhaseKind::ActionDeclared)),
        }

        Ok(game)
    }

    /// Checks a disputed claim. A true claim is proven by showing the card,
    /// which is then shuffled back and replaced so it can't be tracked.
    fn vindicate<R: Rng + Sized>(&mut self, claimant: usize, character: Character, rng: &mut R) -> Result<bool, RuleError> {
        match self.players[claimant].find_hidden(character) {
            Some(card_idx) => {
                let text = format!("{} reveals {:?}! Challenge failed.", self.name(claimant), character);
                self.log(LogKind::Info, text);
                self.replace_influence_card(claimant, card_idx, rng)?;
                Ok(true)
            }
            None => {
                let text = format!("{} does not have {:?}! Challenge won.", self.name(claimant), character);
                self.log(LogKind::Alert, text);
                Ok(false)
            }
        }
    }

    fn replace_influence_card<R: Rng + Sized>(&mut self, player_idx: usize, card_idx: usize, rng: &mut R) -> Result<(), RuleError> {
        let old = self.players[player_idx].cards[card_idx].character;
        self.deck.return_and_reshuffle(old, rng);
        let character = self.deck.draw()?;
        self.players[player_idx].cards[card_idx] = Card::hidden(character, rng);
        Ok(())
    }

    /// Once nobody is left to respond, the open window closes: an unanswered
    /// action goes through, an unanswered block stands.
    pub fn resolve_if_settled<R: Rng + Sized>(&self, rng: &mut R) -> Result<Game, RuleError> {
        match &self.phase {
            Phase::ActionDeclared { action, awaiting } if awaiting.is_empty() => {
                let mut game = self.clone();
                game.resolve_action(*action, rng)?;
                Ok(game)
            }
            Phase::BlockDeclared { awaiting, .. } if awaiting.is_empty() => {
                let mut game = self.clone();
                game.log(LogKind::Info, "Block stands. Action thwarted.".to_string());
                game.go_next_turn();
                Ok(game)
            }
            _ => Ok(self.clone()),
        }
    }

    // ---------------------------------------------------------------------
    // resolution
    // ---------------------------------------------------------------------

    fn resolve_action<R: Rng + Sized>(&mut self, pending: PendingAction, rng: &mut R) -> Result<(), RuleError> {
        let actor = pending.actor;
        tracing::debug!(turn = self.turn, actor, action = ?pending.action, "resolving action");

        match (pending.action, pending.target) {
            (ActionKind::ForeignAid, _) => {
                self.players[actor].coins += 2;
                let text = format!("{} collected Foreign Aid.", self.name(actor));
                self.log(LogKind::Info, text);
            }
            (ActionKind::Tax, _) => {
                self.players[actor].coins += 3;
                let text = format!("{} collected Tax.", self.name(actor));
                self.log(LogKind::Info, text);
            }
            (ActionKind::Steal, Some(target)) => {
                // target may already be out after losing a challenge
                if !self.is_player_dead(target) {
                    let stolen = self.players[target].coins.min(2);
                    self.players[target].coins -= stolen;
                    self.players[actor].coins += stolen;
                    let text = format!("{} stole {} from {}.", self.name(actor), stolen, self.name(target));
                    self.log(LogKind::Info, text);
                }
            }
            (ActionKind::Exchange, _) => {
                self.exchange(actor, rng)?;
                let text = format!("{} exchanged cards with the Court deck.", self.name(actor));
                self.log(LogKind::Info, text);
            }
            (ActionKind::Assassinate, Some(target)) => {
                if !self.is_player_dead(target) {
                    self.log(LogKind::Danger, "Assassination successful! Target must lose influence.".to_string());
                    self.phase = Phase::InfluenceLoss {
                        loser: target,
                        cause: LossCause::AssassinateTarget { action: pending },
                    };
                    return Ok(());
                }
            }
            // Income settles on declaration and Coup goes straight to influence loss,
            // targeted actions are never declared without a target
            (ActionKind::Income, _) | (ActionKind::Coup, _) | (ActionKind::Steal, None) | (ActionKind::Assassinate, None) => {}
        }

        self.go_next_turn();
        Ok(())
    }

    /// Every hidden card goes back to the court, each one is replaced by a fresh draw.
    fn exchange<R: Rng + Sized>(&mut self, player_idx: usize, rng: &mut R) -> Result<(), RuleError> {
        let slots: Vec<usize> = self.players[player_idx]
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.revealed)
            .map(|(idx, _)| idx)
            .collect();

        for &slot in &slots {
            let character = self.players[player_idx].cards[slot].character;
            self.deck.return_and_reshuffle(character, rng);
        }

        for &slot in &slots {
            let character = self.deck.draw()?;
            self.players[player_idx].cards[slot] = Card::hidden(character, rng);
        }

        Ok(())
    }

    pub fn lose_card<R: Rng + Sized>(&self, player_idx: usize, card_id: CardId, rng: &mut R) -> Result<Game, RuleError> {
        self.ensure_running()?;
        self.ensure_seat(player_idx)?;

        let Phase::InfluenceLoss { loser, cause } = self.phase else {
            return Err(self.wrong_phase(PhaseKind::ChallengeLoss));
        };
        if player_idx != loser {
            return Err(RuleError::NotLosingInfluence(player_idx));
        }

        let card_idx = match self.players[player_idx].slot_of(card_id) {
            Some(card_idx) if !self.players[player_idx].cards[card_idx].revealed => card_idx,
            _ => {
                return Err(RuleError::CardNotHidden {
                    seat: player_idx,
                    card: card_id,
                })
            }
        };

        let mut game = self.clone();

        // 'losing' an influence means the card is flipped face up and no longer counts
        game.players[player_idx].cards[card_idx].revealed = true;
        let text = format!(
            "{} lost influence: {:?}.",
            game.name(player_idx),
            game.players[player_idx].cards[card_idx].character
        );
        game.log(LogKind::Danger, text);

        if game.players[player_idx].influence() == 0 {
            game.eliminate(player_idx);

            if game.living_players().count() == 1 {
                game.go_next_turn();
                return Ok(game);
            }
        }

        match cause {
            LossCause::CoupTarget { .. } | LossCause::AssassinateTarget { .. } | LossCause::SucceededActionChallenge => {
                game.go_next_turn();
            }
            LossCause::FailedActionChallenge { action } | LossCause::SucceededBlockChallenge { action } => {
                game.resolve_action(action, rng)?;
            }
            LossCause::FailedBlockChallenge => {
                game.log(LogKind::Info, "Block stands. Action thwarted.".to_string());
                game.go_next_turn();
            }
        }

        Ok(game)
    }

    fn eliminate(&mut self, player_idx: usize) {
        self.players[player_idx].eliminated = true;

        // with two seats left alive after this one goes, it finished third
        let placement = self.living_players().count() + 1;
        self.players[player_idx].placement = Some(placement);

        let text = format!("{} has been exiled!", self.name(player_idx));
        self.log(LogKind::Danger, text);
        tracing::info!(turn = self.turn, player_idx, placement, "player eliminated");
    }

    // ---------------------------------------------------------------------
    // turn advance
    // ---------------------------------------------------------------------

    pub fn advance_turn(&self) -> Game {
        let mut game = self.clone();
        game.go_next_turn();
        game
    }

    fn go_next_turn(&mut self) {
        if self.is_over() {
            return;
        }

        let living: Vec<usize> = self.living_players().collect();
        if let [winner] = living.as_slice() {
            let winner = *winner;
            self.players[winner].placement = Some(1);
            self.phase = Phase::GameOver { winner };
            let text = format!("{} wins the game!", self.name(winner));
            self.log(LogKind::Success, text);
            tracing::info!(turn = self.turn, winner, "game over");
            return;
        }

        // reset state
        self.phase = Phase::TurnStart;

        // player's turn is over
        self.turn += 1;

        // go to next player
        self.current_player_idx = self.next_living_player();
    }

    // ---------------------------------------------------------------------
    // move dispatch
    // ---------------------------------------------------------------------

    /// Applies a move and closes the response window if it emptied.
    pub fn try_apply<R: Rng + Sized>(&self, mv: Move, rng: &mut R) -> Result<Game, RuleError> {
        let game = match mv {
            Move::Declare { actor, action, target } => self.declare_action(actor, action, target)?,
            Move::Challenge(challenger) => self.challenge(challenger, rng)?,
            Move::Block(blocker, character) => self.declare_block(blocker, character)?,
            Move::Pass(player_idx) => self.pass(player_idx)?,
            Move::LoseCard(player_idx, card_id) => self.lose_card(player_idx, card_id, rng)?,
        };

        game.resolve_if_settled(rng)
    }

    /// Like `try_apply`, but an illegal move leaves the game as it was with
    /// a note in the log.
    pub fn apply<R: Rng + Sized>(&self, mv: Move, rng: &mut R) -> Game {
        match self.try_apply(mv.clone(), rng) {
            Ok(game) => game,
            Err(RuleError::GameOver) => self.clone(),
            Err(err) => {
                tracing::warn!(turn = self.turn, ?mv, %err, "move rejected");
                let mut game = self.clone();
                game.log(LogKind::Alert, format!("{:?} rejected: {err}.", mv));
                game
            }
        }
    }

    pub fn actions(&self) -> Vec<Move> {
        let mut actions = Vec::with_capacity(self.players.len() * 3);

        match &self.phase {
            Phase::TurnStart => {
                let actor = self.current_player_idx;
                let coins = self.players[actor].coins;

                if coins >= MANDATORY_COUP_COINS {
                    // forced coup at 10+
                    for opponent_idx in self.other_player_indexes(actor) {
                        actions.push(Move::Declare {
                            actor,
                            action: ActionKind::Coup,
                            target: Some(opponent_idx),
                        });
                    }
                } else {
                    for action in [ActionKind::Income, ActionKind::ForeignAid, ActionKind::Tax, ActionKind::Exchange] {
                        actions.push(Move::Declare { actor, action, target: None });
                    }

                    for opponent_idx in self.other_player_indexes(actor) {
                        for action in [ActionKind::Steal, ActionKind::Assassinate, ActionKind::Coup] {
                            if coins >= action.cost() {
                                actions.push(Move::Declare {
                                    actor,
                                    action,
                                    target: Some(opponent_idx),
                                });
                            }
                        }
                    }
                }
            }
            Phase::ActionDeclared { action, awaiting } => {
                for &responder in awaiting {
                    actions.push(Move::Pass(responder));

                    if action.action.claimed_character().is_some() {
                        actions.push(Move::Challenge(responder));
                    }

                    if !action.action.only_target_blocks() || action.target == Some(responder) {
                        for &character in action.action.blocking_characters() {
                            actions.push(Move::Block(responder, character));
                        }
                    }
                }
            }
            Phase::BlockDeclared { awaiting, .. } => {
                for &responder in awaiting {
                    actions.push(Move::Pass(responder));
                    actions.push(Move::Challenge(responder));
                }
            }
            Phase::InfluenceLoss { loser, .. } => {
                for card in self.players[*loser].hidden_cards() {
                    actions.push(Move::LoseCard(*loser, card.id));
                }
            }
            Phase::GameOver { .. } => {}
        }

        actions
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    use super::*;
    use crate::action::ActionKind::{Assassinate, Coup, Exchange, ForeignAid, Income, Steal, Tax};
    use crate::card::DECK_SIZE;
    use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};
    use crate::CHARACTER_VARIANTS;

    pub(crate) fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(0xC0FFEE)
    }

    /// Re-deals so that every seat holds exactly `hands`, keeping the
    /// remaining cards in the deck.
    pub(crate) fn deal(game: &mut Game, hands: &[[Character; 2]]) {
        let mut rng = rng();
        let mut remaining: Vec<Character> = CHARACTER_VARIANTS
            .iter()
            .flat_map(|&card| std::iter::repeat(card).take(3))
            .collect();

        for (player_idx, hand) in hands.iter().enumerate() {
            game.players[player_idx].cards = hand
                .iter()
                .map(|&character| {
                    let position = remaining.iter().position(|&c| c == character).expect("card available");
                    remaining.remove(position);
                    Card::hidden(character, &mut rng)
                })
                .collect();
        }

        game.deck = Deck::from_cards(remaining);
    }

    fn declare(game: &Game, actor: usize, action: ActionKind, target: Option<usize>) -> Game {
        game.try_apply(Move::Declare { actor, action, target }, &mut rng())
            .unwrap_or_else(|err| panic!("failed to declare: {err}"))
    }

    fn play(game: &Game, mv: Move) -> Game {
        game.try_apply(mv.clone(), &mut rng())
            .unwrap_or_else(|err| panic!("failed to apply {:?}: {err}", mv))
    }

    fn card(game: &Game, player_idx: usize, slot: usize) -> CardId {
        game.players[player_idx].cards[slot].id
    }

    fn assert_conserved(game: &Game) {
        let mut seen: Vec<Character> = game.deck.iter().copied().collect();
        for player in &game.players {
            seen.extend(player.cards.iter().map(|card| card.character));
        }
        assert_eq!(seen.len(), DECK_SIZE);
        for character in CHARACTER_VARIANTS {
            assert_eq!(seen.iter().filter(|&&c| c == character).count(), 3, "{:?}", character);
        }
    }

    #[test]
    fn new_game() {
        let game = Game::with_seats(3, &mut rng()).unwrap();

        assert_eq!(game.turn(), 1);
        assert_eq!(game.phase(), &Phase::TurnStart);
        assert_eq!(game.deck().len(), DECK_SIZE - 6);
        assert_eq!(game.seat_of("p2"), Some(2));
        assert!(!game.players()[0].is_automated());
        assert!(game.players()[1].is_automated());
        for player in game.players() {
            assert_eq!(player.coins(), STARTING_COINS);
            assert_eq!(player.influence(), 2);
        }
        assert_conserved(&game);
    }

    #[test]
    fn seat_limits() {
        assert!(matches!(Game::with_seats(1, &mut rng()), Err(RuleError::SeatCount { .. })));
        assert!(matches!(Game::with_seats(7, &mut rng()), Err(RuleError::SeatCount { .. })));
        assert!(Game::with_seats(6, &mut rng()).is_ok());

        let seats = vec![
            SeatConfig { id: "a".into(), name: "A".into(), automated: false },
            SeatConfig { id: "a".into(), name: "B".into(), automated: true },
        ];
        assert_eq!(Game::new(&seats, 2, &mut rng()), Err(RuleError::DuplicateSeatId("a".into())));
    }

    #[test]
    fn income_advances_turn() {
        let game = Game::with_seats(3, &mut rng()).unwrap();
        let game = declare(&game, 0, Income, None);

        assert_eq!(game.players[0].coins, 3);
        assert_eq!(game.current_player_idx(), 1);
        assert_eq!(game.turn(), 2);
        assert_eq!(game.phase(), &Phase::TurnStart);
    }

    #[test]
    fn undisputed_tax() {
        let game = Game::with_seats(3, &mut rng()).unwrap();
        let game = declare(&game, 0, Tax, None);

        assert_eq!(game.waiting_for_response_from(), &[1, 2]);

        let game = play(&game, Move::Pass(1));
        assert_eq!(game.phase().kind(), PhaseKind::ActionDeclared);
        let game = play(&game, Move::Pass(2));

        assert_eq!(game.players[0].coins, 5);
        assert_eq!(game.phase(), &Phase::TurnStart);
        assert_eq!(game.current_player_idx(), 1);
    }

    #[test]
    fn pass_alone_does_not_resolve() {
        let game = Game::with_seats(2, &mut rng()).unwrap();
        let game = declare(&game, 0, Tax, None);

        let game = game.pass(1).unwrap();
        assert!(game.waiting_for_response_from().is_empty());
        assert_eq!(game.phase().kind(), PhaseKind::ActionDeclared);
        assert_eq!(game.players[0].coins, 2);

        let game = game.resolve_if_settled(&mut rng()).unwrap();
        assert_eq!(game.players[0].coins, 5);
        assert_eq!(game.current_player_idx(), 1);
    }

    #[test]
    fn rejected_moves_leave_state_alone() {
        let game = Game::with_seats(3, &mut rng()).unwrap();

        assert_eq!(game.declare_action(1, Income, None), Err(RuleError::NotYourTurn(1)));
        assert_eq!(game.declare_action(0, Steal, None), Err(RuleError::MissingTarget(Steal)));
        assert_eq!(game.declare_action(0, Steal, Some(0)), Err(RuleError::InvalidTarget(0)));
        assert_eq!(game.declare_action(0, Steal, Some(9)), Err(RuleError::InvalidTarget(9)));

        let mut with_exile = game.clone();
        with_exile.players[2].eliminated = true;
        for slot in with_exile.players[2].cards.iter_mut() {
            slot.revealed = true;
        }
        assert_eq!(with_exile.declare_action(0, Steal, Some(2)), Err(RuleError::InvalidTarget(2)));
        assert!(matches!(
            game.declare_action(0, Assassinate, Some(1)),
            Err(RuleError::InsufficientCoins { cost: 3, coins: 2, .. })
        ));
        assert!(matches!(
            game.declare_action(0, Coup, Some(1)),
            Err(RuleError::InsufficientCoins { cost: 7, .. })
        ));

        let after = game.apply(Move::Declare { actor: 1, action: Income, target: None }, &mut rng());
        assert_eq!(after.players(), game.players());
        assert_eq!(after.phase(), game.phase());
        assert_eq!(after.log_entries().len(), game.log_entries().len() + 1);
        assert_eq!(after.log_entries().last().unwrap().kind, LogKind::Alert);
    }

    #[test]
    fn mandatory_coup() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        game.players[0].coins = 10;

        for action in [Income, ForeignAid, Tax, Exchange] {
            assert_eq!(game.declare_action(0, action, None), Err(RuleError::MustCoup(0)));
        }
        assert_eq!(game.declare_action(0, Steal, Some(1)), Err(RuleError::MustCoup(0)));

        // coup p1 or p2, nothing else
        assert_eq!(game.actions().len(), 2);
        assert!(game.declare_action(0, Coup, Some(1)).is_ok());
    }

    #[test]
    fn test_coup() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        game.players[0].coins = 7;

        let game = declare(&game, 0, Coup, Some(1));

        assert_eq!(game.players[0].coins, 0);
        assert_eq!(game.player_to_lose_influence(), Some(1));
        assert!(game.waiting_for_response_from().is_empty());
        assert!(matches!(game.challenge(2, &mut rng()), Err(RuleError::WrongPhase { .. })));

        let game = play(&game, Move::LoseCard(1, card(&game, 1, 0)));

        assert_eq!(game.players[1].influence(), 1);
        assert_eq!(game.current_player_idx(), 1);
        assert_eq!(game.phase(), &Phase::TurnStart);
        assert_conserved(&game);
    }

    #[test]
    fn unchallengeable_actions() {
        let game = Game::with_seats(3, &mut rng()).unwrap();
        let game = declare(&game, 0, ForeignAid, None);

        assert_eq!(game.challenge(1, &mut rng()), Err(RuleError::Unchallengeable(ForeignAid)));

        let after = game.apply(Move::Challenge(1), &mut rng());
        assert_eq!(after.phase(), game.phase());
    }

    #[test]
    fn foreign_aid_blocked_by_anyone() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Captain, Contessa], [Duke, Contessa], [Assassin, Assassin]]);

        let game = declare(&game, 0, ForeignAid, None);

        assert_eq!(
            game.declare_block(2, Contessa),
            Err(RuleError::WrongBlockCharacter { action: ForeignAid, character: Contessa })
        );

        let game = play(&game, Move::Block(2, Duke));
        assert_eq!(game.pending_block(), Some(&PendingBlock { blocker: 2, character: Duke }));
        assert_eq!(game.waiting_for_response_from(), &[0, 1]);

        // nobody calls the bluff, the block stands
        let game = play(&game, Move::Pass(0));
        let game = play(&game, Move::Pass(1));

        assert_eq!(game.players[0].coins, 2);
        assert_eq!(game.current_player_idx(), 1);
        assert_eq!(game.pending_action(), None);
    }

    #[test]
    fn test_steal() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Captain, Duke], [Duke, Contessa], [Ambassador, Duke]]);

        let game = declare(&game, 0, Steal, Some(2));

        // p1 can't block, it's not targeting them
        assert_eq!(game.declare_block(1, Captain), Err(RuleError::IneligibleBlocker(1)));

        let game = play(&game, Move::Pass(1));
        let game = play(&game, Move::Pass(2));

        assert_eq!(game.players[0].coins, 4);
        assert_eq!(game.players[2].coins, 0);
        assert_eq!(game.current_player_idx(), 1);
    }

    #[test]
    fn steal_from_broke_target() {
        let mut game = Game::with_seats(2, &mut rng()).unwrap();
        game.players[1].coins = 1;

        let game = declare(&game, 0, Steal, Some(1));
        let game = play(&game, Move::Pass(1));

        assert_eq!(game.players[0].coins, 3);
        assert_eq!(game.players[1].coins, 0);
    }

    #[test]
    fn failed_steal_challenge() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Captain, Duke], [Duke, Contessa], [Ambassador, Duke]]);
        let captain_id = card(&game, 0, 0);

        let game = declare(&game, 0, Steal, Some(2));

        // p1 challenges, p0 really has the captain
        let game = play(&game, Move::Challenge(1));

        assert_eq!(game.player_to_lose_influence(), Some(1));
        assert_ne!(card(&game, 0, 0), captain_id, "revealed card gets a new identity");
        assert_conserved(&game);

        let game = play(&game, Move::LoseCard(1, card(&game, 1, 0)));

        // steal goes through
        assert_eq!(game.players[0].coins, 4);
        assert_eq!(game.players[2].coins, 0);
        assert_eq!(game.current_player_idx(), 1);
        assert_eq!(game.players[1].influence(), 1);
    }

    #[test]
    fn failed_challenge_can_eliminate() {
        let mut game = Game::with_seats(4, &mut rng()).unwrap();
        deal(
            &mut game,
            &[[Captain, Duke], [Duke, Contessa], [Ambassador, Duke], [Assassin, Assassin]],
        );
        game.players[1].cards[1].revealed = true;

        let game = declare(&game, 0, Steal, Some(2));
        let game = play(&game, Move::Challenge(1));
        let game = play(&game, Move::LoseCard(1, card(&game, 1, 0)));

        assert!(game.players[1].is_eliminated());
        // four alive before, three after
        assert_eq!(game.players[1].placement(), Some(4));
        assert_eq!(game.players[0].coins, 4);
        // p1 is out, p2 is up
        assert_eq!(game.current_player_idx(), 2);
    }

    #[test]
    fn successful_assassinate_challenge() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Duke, Captain], [Duke, Contessa], [Ambassador, Duke]]);
        game.players[0].coins = 3;

        let game = declare(&game, 0, Assassinate, Some(1));

        // paid up front
        assert_eq!(game.players[0].coins, 0);

        let game = play(&game, Move::Challenge(1));
        assert_eq!(game.player_to_lose_influence(), Some(0));
        assert_eq!(game.pending_action(), None);

        let game = play(&game, Move::LoseCard(0, card(&game, 0, 1)));

        assert_eq!(game.players[0].coins, 0, "no refund");
        assert_eq!(game.players[1].influence(), 2);
        assert_eq!(game.current_player_idx(), 1);
        assert_eq!(game.phase(), &Phase::TurnStart);
    }

    #[test]
    fn normal_assassinate() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Assassin, Captain], [Duke, Duke], [Ambassador, Captain]]);
        game.players[0].coins = 3;

        let game = declare(&game, 0, Assassinate, Some(1));
        let game = play(&game, Move::Pass(1));
        let game = play(&game, Move::Pass(2));

        assert_eq!(game.player_to_lose_influence(), Some(1));
        assert!(matches!(
            game.phase(),
            Phase::InfluenceLoss { cause: LossCause::AssassinateTarget { .. }, .. }
        ));

        let game = play(&game, Move::LoseCard(1, card(&game, 1, 0)));

        assert_eq!(game.current_player_idx(), 1);
        assert_eq!(game.players[1].influence(), 1);
    }

    #[test]
    fn double_assassinate() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Assassin, Captain], [Duke, Duke], [Ambassador, Captain]]);
        game.players[0].coins = 3;

        let game = declare(&game, 0, Assassinate, Some(1));

        // p1 challenges and is wrong
        let game = play(&game, Move::Challenge(1));
        let game = play(&game, Move::LoseCard(1, card(&game, 1, 0)));

        // assassination still lands
        assert_eq!(game.player_to_lose_influence(), Some(1));
        let game = play(&game, Move::LoseCard(1, card(&game, 1, 1)));

        assert!(game.players[1].is_eliminated());
        assert_eq!(game.players[1].placement(), Some(3));
        // p1 is dead, p2 is up
        assert_eq!(game.current_player_idx(), 2);
    }

    #[test]
    fn assassinate_on_eliminated_target_ends_turn() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Assassin, Captain], [Duke, Duke], [Ambassador, Captain]]);
        game.players[0].coins = 3;
        game.players[1].cards[1].revealed = true;

        let game = declare(&game, 0, Assassinate, Some(1));
        let game = play(&game, Move::Challenge(1));
        let game = play(&game, Move::LoseCard(1, card(&game, 1, 0)));

        assert!(game.players[1].is_eliminated());
        assert_eq!(game.phase(), &Phase::TurnStart);
        assert_eq!(game.current_player_idx(), 2);
    }

    #[test]
    fn steal_from_eliminated_target_takes_nothing() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Captain, Duke], [Duke, Contessa], [Ambassador, Duke]]);
        game.players[1].cards[1].revealed = true;

        let game = declare(&game, 0, Steal, Some(1));
        let game = play(&game, Move::Challenge(1));
        let game = play(&game, Move::LoseCard(1, card(&game, 1, 0)));

        assert!(game.players[1].is_eliminated());
        assert_eq!(game.players[0].coins, 2);
        assert_eq!(game.players[1].coins, 2);
        assert_eq!(game.phase(), &Phase::TurnStart);
        assert_eq!(game.current_player_idx(), 2);
        assert_conserved(&game);
    }

    #[test]
    fn test_steal_block_challenge() {
        let mut game = Game::with_seats(4, &mut rng()).unwrap();
        deal(
            &mut game,
            &[[Captain, Duke], [Duke, Contessa], [Ambassador, Duke], [Assassin, Contessa]],
        );

        let game = declare(&game, 0, Steal, Some(2));
        let game = play(&game, Move::Pass(1));
        let game = play(&game, Move::Block(2, Ambassador));

        // everyone but the blocker gets a say, the actor included
        assert_eq!(game.waiting_for_response_from(), &[3, 0, 1]);

        let game = play(&game, Move::Pass(1));
        let game = play(&game, Move::Pass(3));

        // p0 challenges, p2 really has the ambassador
        let shown = card(&game, 2, 0);
        let game = play(&game, Move::Challenge(0));
        assert_eq!(game.player_to_lose_influence(), Some(0));

        // the proven card was shuffled back and replaced
        assert_ne!(card(&game, 2, 0), shown);
        assert!(!game.players[2].cards[0].revealed);
        assert_eq!(game.players[2].influence(), 2);

        let game = play(&game, Move::LoseCard(0, card(&game, 0, 0)));

        assert_eq!(game.current_player_idx(), 1);
        assert_eq!(game.players[0].coins, 2);
        assert_eq!(game.players[2].coins, 2);
        assert!(game
            .log_entries()
            .iter()
            .any(|entry| entry.text == "Block stands. Action thwarted."));
        assert_conserved(&game);
    }

    #[test]
    fn bluffed_block_is_caught() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Captain, Duke], [Duke, Contessa], [Duke, Assassin]]);

        let game = declare(&game, 0, Steal, Some(2));
        let game = play(&game, Move::Block(2, Captain));
        let game = play(&game, Move::Challenge(1));

        assert_eq!(game.player_to_lose_influence(), Some(2));
        assert_eq!(game.pending_block(), None);
        assert_eq!(game.pending_action().map(|action| action.action), Some(Steal));

        let game = play(&game, Move::LoseCard(2, card(&game, 2, 1)));

        // steal goes ahead
        assert_eq!(game.players[0].coins, 4);
        assert_eq!(game.players[2].coins, 0);
        assert_eq!(game.current_player_idx(), 1);
    }

    #[test]
    fn only_responders_may_answer() {
        let game = Game::with_seats(3, &mut rng()).unwrap();
        let game = declare(&game, 0, Tax, None);

        assert_eq!(game.pass(0), Err(RuleError::NotAwaitingResponse(0)));
        assert_eq!(game.challenge(0, &mut rng()), Err(RuleError::NotAwaitingResponse(0)));

        let game = play(&game, Move::Pass(1));
        assert_eq!(game.pass(1), Err(RuleError::NotAwaitingResponse(1)));
    }

    #[test]
    fn exchange_keeps_hand_shape() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        deal(&mut game, &[[Ambassador, Duke], [Duke, Contessa], [Captain, Assassin]]);
        game.players[0].cards[1].revealed = true;
        let deck_before = game.deck().len();
        let hidden_before: Vec<CardId> = game.players[0].hidden_cards().map(|card| card.id).collect();

        let game = declare(&game, 0, Exchange, None);
        let game = play(&game, Move::Pass(1));
        let game = play(&game, Move::Pass(2));

        assert_eq!(game.deck().len(), deck_before);
        assert_eq!(game.players[0].cards.len(), 2);
        assert_eq!(game.players[0].influence(), 1);
        assert!(game.players[0].cards[1].revealed);
        assert_eq!(game.players[0].cards[1].character, Duke);
        assert!(game.players[0].hidden_cards().all(|card| !hidden_before.contains(&card.id)));
        assert_conserved(&game);
    }

    #[test]
    fn last_player_standing_wins() {
        let mut game = Game::with_seats(2, &mut rng()).unwrap();
        game.players[0].coins = 7;
        game.players[1].cards[0].revealed = true;

        let game = declare(&game, 0, Coup, Some(1));
        let game = play(&game, Move::LoseCard(1, card(&game, 1, 1)));

        assert!(game.is_over());
        assert_eq!(game.winner(), Some(0));
        assert_eq!(game.players[0].placement(), Some(1));
        assert_eq!(game.players[1].placement(), Some(2));

        // terminal and idempotent
        assert_eq!(game.advance_turn(), game);
        assert_eq!(game.declare_action(0, Income, None), Err(RuleError::GameOver));
        assert_eq!(game.apply(Move::Pass(1), &mut rng()), game);
        assert!(game.actions().is_empty());
    }

    #[test]
    fn losing_a_revealed_card_is_refused() {
        let mut game = Game::with_seats(3, &mut rng()).unwrap();
        game.players[0].coins = 7;
        game.players[1].cards[0].revealed = true;

        let game = declare(&game, 0, Coup, Some(1));
        let revealed = card(&game, 1, 0);

        assert_eq!(
            game.lose_card(1, revealed, &mut rng()),
            Err(RuleError::CardNotHidden { seat: 1, card: revealed })
        );
        assert_eq!(game.lose_card(2, card(&game, 2, 0), &mut rng()), Err(RuleError::NotLosingInfluence(2)));
    }

    #[test]
    fn turn_skips_the_dead() {
        let mut game = Game::with_seats(4, &mut rng()).unwrap();
        game.players[1].eliminated = true;
        game.players[2].eliminated = true;

        assert_eq!(game.other_player_indexes(0), vec![3]);

        let game = game.advance_turn();
        assert_eq!(game.current_player_idx(), 3);
        let game = game.advance_turn();
        assert_eq!(game.current_player_idx(), 0);
    }

    #[test]
    fn other_players() {
        let game = Game::with_seats(4, &mut rng()).unwrap();
        assert_eq!(game.other_player_indexes(0), vec![1, 2, 3]);
        assert_eq!(game.other_player_indexes(1), vec![2, 3, 0]);

        let game = Game::with_seats(3, &mut rng()).unwrap();
        assert_eq!(game.other_player_indexes(1), vec![2, 0]);
    }

    #[test]
    fn complete_game() {
        let mut rng = rng();
        let mut game = Game::with_seats(4, &mut rng).unwrap();

        for _ in 0..1000 {
            let mut actions = game.actions();
            if actions.is_empty() {
                panic!("no actions generated during unfinished game")
            }

            let random_index = rng.gen_range(0..actions.len());
            let random_action = actions.remove(random_index);

            game = game.try_apply(random_action, &mut rng).unwrap();
            assert_conserved(&game);

            if game.winner().is_some() {
                break;
            }
        }
    }
}
