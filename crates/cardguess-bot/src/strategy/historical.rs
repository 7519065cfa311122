use super::reactive::contrarian_card;
use cardguess_core::game::strategy::{Observation, RoundReveal, Strategy};
use cardguess_core::model::card::Card;
use cardguess_core::model::guess::Guess;
use std::collections::HashMap;
use tracing::{Level, event};

pub const DEFAULT_LEARNING_TIME: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HistoryKey {
    own_card: Card,
    /// Opponent's visible guess at each of our decisions, interleaved with
    /// what we chose, ending with the guess visible right now.
    transcript: Vec<Guess>,
    candidate: Card,
}

#[derive(Debug, Clone, Copy, Default)]
struct RewardTally {
    sum: i64,
    count: u64,
}

impl RewardTally {
    fn mean(self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }
}

/// Looks up how each candidate card fared after the same transcript in past
/// rounds and plays the one with the better mean reward.
///
/// The first `learning_time` decisions are contrarian while the table fills.
#[derive(Debug, Clone)]
pub struct HistoricalStrategy {
    learning_time: u64,
    decisions: u64,
    memo: HashMap<HistoryKey, RewardTally>,
    transcript: Vec<Guess>,
    used_keys: Vec<HistoryKey>,
}

impl HistoricalStrategy {
    pub fn new(learning_time: u64) -> Self {
        Self {
            learning_time,
            decisions: 0,
            memo: HashMap::new(),
            transcript: Vec::new(),
            used_keys: Vec::new(),
        }
    }

    pub fn learning_time(&self) -> u64 {
        self.learning_time
    }

    pub fn decisions(&self) -> u64 {
        self.decisions
    }

    pub fn known_keys(&self) -> usize {
        self.memo.len()
    }

    fn key(&self, own_card: Card, candidate: Card) -> HistoryKey {
        HistoryKey {
            own_card,
            transcript: self.transcript.clone(),
            candidate,
        }
    }

    fn mean_reward(&self, own_card: Card, candidate: Card) -> f64 {
        self.memo
            .get(&self.key(own_card, candidate))
            .copied()
            .unwrap_or_default()
            .mean()
    }
}

impl Strategy for HistoricalStrategy {
    fn name(&self) -> &str {
        "historical"
    }

    fn decide(&mut self, observation: &Observation) -> Card {
        if observation.first_turn_in_round {
            self.transcript.clear();
            self.used_keys.clear();
        }
        self.transcript.push(observation.opponent_guess);
        self.decisions += 1;

        let card = if self.decisions > self.learning_time {
            let red = self.mean_reward(observation.own_card, Card::Red);
            let black = self.mean_reward(observation.own_card, Card::Black);
            if tracing::enabled!(Level::DEBUG) {
                event!(
                    target: "cardguess_bot::historical",
                    Level::DEBUG,
                    depth = self.transcript.len(),
                    mean_red = red,
                    mean_black = black,
                    known = self.memo.len(),
                );
            }
            if red > black { Card::Red } else { Card::Black }
        } else {
            contrarian_card(observation)
        };

        let key = self.key(observation.own_card, card);
        self.used_keys.push(key);
        self.transcript.push(Guess::from(card));
        card
    }

    fn end_of_round(&mut self, reward: i64, _reveal: &RoundReveal) {
        for key in self.used_keys.drain(..) {
            let tally = self.memo.entry(key).or_default();
            tally.sum += reward;
            tally.count += 1;
        }
        self.transcript.clear();
    }
}
