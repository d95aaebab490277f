// automated players

use rand::Rng;
use thiserror::Error;

use crate::game::Game;
use crate::view::{Decision, PlayerView};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("decision provider unavailable: {0}")]
    Unavailable(String),
    #[error("malformed decision: {0}")]
    Malformed(String),
}

/// Anything that can pick a move for a seat given that seat's view. The
/// engine only ever talks to this trait, never to a concrete provider.
pub trait DecisionProvider {
    fn decide(&mut self, view: &PlayerView) -> Result<Decision, DecisionError>;
}

/// Picks uniformly among the options in the view.
pub struct RandomPolicy<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DecisionProvider for RandomPolicy<R> {
    fn decide(&mut self, view: &PlayerView) -> Result<Decision, DecisionError> {
        if view.options.is_empty() {
            return Err(DecisionError::Unavailable(format!("seat {} has no options", view.seat)));
        }

        let random_index = self.rng.gen_range(0..view.options.len());
        Ok(view.options[random_index].clone())
    }
}

/// Always passes. At turn start or when a card must go this is not a legal
/// answer, so the host's fallback picks Income or the first hidden card.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassivePolicy;

impl DecisionProvider for PassivePolicy {
    fn decide(&mut self, _view: &PlayerView) -> Result<Decision, DecisionError> {
        Ok(Decision::Pass)
    }
}

/// Plays random legal moves until someone wins or `max_steps` runs out.
pub fn random_playout<R: Rng + Sized>(game: &Game, rng: &mut R, max_steps: usize) -> Game {
    let mut game = game.clone();

    for _ in 0..max_steps {
        let mut actions = game.actions();
        if actions.is_empty() {
            // an emptied response window, left open by a bare pass
            let settled = match game.resolve_if_settled(rng) {
                Ok(settled) if settled != game => settled,
                _ => break,
            };
            game = settled;
            continue;
        }

        let random_index = rng.gen_range(0..actions.len());
        let random_action = actions.remove(random_index);

        game = game.apply(random_action, rng);

        if game.winner().is_some() {
            break;
        }
    }

    game
}
