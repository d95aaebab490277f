use rand::Rng;

use crate::action::Move;
use crate::game::{now_millis, Game, Phase};
use crate::policy::DecisionProvider;
use crate::record::{GameResult, RecordError, ResultRecorder};
use crate::store::{GameStore, StoreError};
use crate::view::PlayerView;

/// Hosts one game. The session owns its state outright, so every transition
/// goes through `&mut self` one at a time.
pub struct Session<R: Rng> {
    id: String,
    game: Game,
    rng: R,
    log_window: usize,
    reported: bool,
}

impl<R: Rng> Session<R> {
    pub fn new(id: impl Into<String>, game: Game, rng: R, log_window: usize) -> Self {
        Self {
            id: id.into(),
            game,
            rng,
            log_window,
            reported: false,
        }
    }

    /// Picks a saved game back up, `None` when nothing is stored under `id`.
    pub fn resume(id: &str, store: &dyn GameStore, rng: R, log_window: usize) -> Result<Option<Self>, StoreError> {
        Ok(store.load(id)?.map(|game| Self::new(id, game, rng, log_window)))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Submits a move, for seats driven from outside (a person at a screen).
    pub fn submit(&mut self, mv: Move) -> &Game {
        self.game = self.game.apply(mv, &mut self.rng);
        &self.game
    }

    /// Asks whoever is up for a decision and applies it. Provider failures
    /// and unusable answers are replaced by the safe default for the phase.
    pub fn step(&mut self, provider: &mut dyn DecisionProvider) -> Option<Move> {
        self.settle();
        let seat = self.game.whose_decision()?;
        let view = PlayerView::for_seat(&self.game, seat, self.log_window)?;

        let decision = match provider.decide(&view) {
            Ok(decision) => Some(decision),
            Err(err) => {
                tracing::warn!(session = %self.id, seat, %err, "no decision, using default");
                None
            }
        };

        let mv = self.game.decision_to_move(seat, decision)?;
        tracing::debug!(session = %self.id, ?mv, "applying");
        self.game = self.game.apply(mv.clone(), &mut self.rng);

        Some(mv)
    }

    /// Steps until the game is over or `max_steps` moves were made. Returns
    /// the number of moves made.
    pub fn run_to_completion(&mut self, provider: &mut dyn DecisionProvider, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && !self.game.is_over() {
            if self.step(provider).is_none() {
                break;
            }
            steps += 1;
        }
        steps
    }

    /// Closes a response window that nobody is left to answer, as a game
    /// saved right after a bare `Game::pass` has.
    fn settle(&mut self) {
        let open_window = matches!(self.game.phase(), Phase::ActionDeclared { .. } | Phase::BlockDeclared { .. });
        if !open_window || !self.game.waiting_for_response_from().is_empty() {
            return;
        }

        match self.game.resolve_if_settled(&mut self.rng) {
            Ok(game) => self.game = game,
            Err(err) => tracing::warn!(session = %self.id, %err, "could not close response window"),
        }
    }

    pub fn save(&self, store: &mut dyn GameStore) -> Result<(), StoreError> {
        store.save(&self.id, &self.game)
    }

    /// Reports the placement of `player_idx` once the game is over. Only the
    /// first successful call records anything.
    pub fn report(&mut self, recorder: &mut dyn ResultRecorder, player_idx: usize) -> Result<bool, RecordError> {
        if self.reported || !self.game.is_over() {
            return Ok(false);
        }

        let Some(player) = self.game.player(player_idx) else {
            return Ok(false);
        };
        let Some(placement) = player.placement() else {
            return Ok(false);
        };

        let result = GameResult {
            session_id: self.id.clone(),
            player_id: player.id().to_string(),
            placement,
            duration_secs: now_millis().saturating_sub(self.game.started_at()) / 1000,
        };

        recorder.record(&result)?;
        self.reported = true;
        tracing::info!(session = %self.id, placement, duration_secs = result.duration_secs, "result recorded");

        Ok(true)
    }
}
