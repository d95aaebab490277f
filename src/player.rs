use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId};
use crate::Character;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) automated: bool,
    pub(crate) coins: u8,
    // slots are never removed, losing influence only flips a card face up
    pub(crate) cards: Vec<Card>,
    pub(crate) eliminated: bool,
    pub(crate) placement: Option<usize>,
}

impl Player {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_automated(&self) -> bool {
        self.automated
    }

    pub fn coins(&self) -> u8 {
        self.coins
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    pub fn placement(&self) -> Option<usize> {
        self.placement
    }

    pub fn hidden_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(|card| !card.revealed)
    }

    pub fn revealed_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(|card| card.revealed)
    }

    pub fn influence(&self) -> usize {
        self.hidden_cards().count()
    }

    /// Slot of a hidden card showing `character`, if the player really has one.
    pub fn find_hidden(&self, character: Character) -> Option<usize> {
        self.cards
            .iter()
            .position(|card| !card.revealed && card.character == character)
    }

    pub fn slot_of(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id == card_id)
    }
}
