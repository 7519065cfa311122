use crate::model::card::Card;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A player's current declaration about the opponent's card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Guess {
    Red,
    Black,
    /// Nothing declared yet this round.
    #[default]
    AwaitingGuess,
}

impl Guess {
    pub const fn card(self) -> Option<Card> {
        match self {
            Guess::Red => Some(Card::Red),
            Guess::Black => Some(Card::Black),
            Guess::AwaitingGuess => None,
        }
    }

    pub const fn is_awaiting(self) -> bool {
        matches!(self, Guess::AwaitingGuess)
    }
}

impl From<Card> for Guess {
    fn from(card: Card) -> Self {
        match card {
            Card::Red => Guess::Red,
            Card::Black => Guess::Black,
        }
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.card() {
            Some(card) => fmt::Display::fmt(&card, f),
            None => f.write_str("AWAITING"),
        }
    }
}
