use crate::model::card::Card;
use crate::model::guess::Guess;
use serde::Serialize;

/// Per-round state of one seat. Owned by [`RoundState`](super::round::RoundState).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundParticipant {
    dealt_card: Card,
    declared_guess: Guess,
    ante_spent: i64,
    has_passed: bool,
    starting_funds: i64,
    revisions: u32,
}

impl RoundParticipant {
    pub fn new(dealt_card: Card, starting_funds: i64) -> Self {
        Self {
            dealt_card,
            declared_guess: Guess::AwaitingGuess,
            ante_spent: 0,
            has_passed: false,
            starting_funds,
            revisions: 0,
        }
    }

    /// Builds a participant in an arbitrary state, e.g. a finished round
    /// handed straight to settlement.
    pub fn from_parts(
        dealt_card: Card,
        declared_guess: Guess,
        ante_spent: i64,
        has_passed: bool,
    ) -> Self {
        Self {
            dealt_card,
            declared_guess,
            ante_spent,
            has_passed,
            starting_funds: ante_spent,
            revisions: 0,
        }
    }

    pub fn dealt_card(&self) -> Card {
        self.dealt_card
    }

    pub fn declared_guess(&self) -> Guess {
        self.declared_guess
    }

    pub fn ante_spent(&self) -> i64 {
        self.ante_spent
    }

    pub fn has_passed(&self) -> bool {
        self.has_passed
    }

    pub fn starting_funds(&self) -> i64 {
        self.starting_funds
    }

    pub fn remaining_funds(&self) -> i64 {
        self.starting_funds - self.ante_spent
    }

    pub fn revisions(&self) -> u32 {
        self.revisions
    }

    pub fn has_revised(&self) -> bool {
        self.revisions > 0
    }

    pub(crate) fn declare(&mut self, card: Card, ante: i64) {
        if !self.declared_guess.is_awaiting() {
            self.revisions += 1;
        }
        self.declared_guess = Guess::from(card);
        self.ante_spent += ante;
    }

    pub(crate) fn pass(&mut self) {
        self.has_passed = true;
    }
}
