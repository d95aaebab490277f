use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::{Character, CHARACTER_VARIANTS};

pub const COPIES_PER_CHARACTER: usize = 3;
pub const DECK_SIZE: usize = CHARACTER_VARIANTS.len() * COPIES_PER_CHARACTER;

/// Opaque card identity. A card that is laundered through the deck comes back
/// with a new id, so nobody can follow it across reveals.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub character: Character,
    pub revealed: bool,
}

impl Card {
    pub fn hidden<R: Rng + Sized>(character: Character, rng: &mut R) -> Self {
        Self {
            id: CardId(rng.gen()),
            character,
            revealed: false,
        }
    }
}

/// The court deck. Cards in here have no identity, they get one when drawn.
/// The last element is the top of the deck.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Character>,
}

impl Deck {
    pub fn build<R: Rng + Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Character> = CHARACTER_VARIANTS
            .iter()
            .flat_map(|&card| std::iter::repeat(card).take(COPIES_PER_CHARACTER))
            .collect();

        cards.shuffle(rng);

        Self { cards }
    }

    #[cfg(test)]
    pub(crate) fn from_cards(cards: Vec<Character>) -> Self {
        Self { cards }
    }

    pub fn draw(&mut self) -> Result<Character, RuleError> {
        self.cards.pop().ok_or(RuleError::DeckExhausted)
    }

    pub fn return_and_reshuffle<R: Rng + Sized>(&mut self, character: Character, rng: &mut R) {
        self.cards.push(character);
        self.cards.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> + '_ {
        self.cards.iter()
    }
}
