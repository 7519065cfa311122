//! Strategies that react only to what is on the table this turn.

use cardguess_core::game::strategy::{Observation, RoundReveal, Strategy};
use cardguess_core::model::card::Card;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Declares the same card every time, so it never revises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCardStrategy {
    card: Card,
    name: &'static str,
}

impl FixedCardStrategy {
    pub fn new(card: Card) -> Self {
        let name = match card {
            Card::Red => "always_red",
            Card::Black => "always_black",
        };
        Self { card, name }
    }

    pub fn card(&self) -> Card {
        self.card
    }
}

impl Strategy for FixedCardStrategy {
    fn name(&self) -> &str {
        self.name
    }

    fn decide(&mut self, _observation: &Observation) -> Card {
        self.card
    }

    fn end_of_round(&mut self, _reward: i64, _reveal: &RoundReveal) {}
}

/// Opposite of the opponent's visible guess, or of its own card while the
/// opponent has not declared yet.
pub(crate) fn contrarian_card(observation: &Observation) -> Card {
    match observation.opponent_guess.card() {
        Some(card) => card.opposite(),
        None => observation.own_card.opposite(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContrarianStrategy;

impl Strategy for ContrarianStrategy {
    fn name(&self) -> &str {
        "contrarian"
    }

    fn decide(&mut self, observation: &Observation) -> Card {
        contrarian_card(observation)
    }

    fn end_of_round(&mut self, _reward: i64, _reveal: &RoundReveal) {}
}

/// Opens like [`ContrarianStrategy`] and then holds its declaration, which
/// passes at the first opportunity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyLastGuessStrategy;

impl Strategy for CopyLastGuessStrategy {
    fn name(&self) -> &str {
        "copy_last_guess"
    }

    fn decide(&mut self, observation: &Observation) -> Card {
        observation
            .own_guess
            .card()
            .unwrap_or_else(|| contrarian_card(observation))
    }

    fn end_of_round(&mut self, _reward: i64, _reveal: &RoundReveal) {}
}

#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn decide(&mut self, _observation: &Observation) -> Card {
        if self.rng.gen_bool(0.5) {
            Card::Red
        } else {
            Card::Black
        }
    }

    fn end_of_round(&mut self, _reward: i64, _reveal: &RoundReveal) {}
}
