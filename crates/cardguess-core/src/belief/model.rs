use super::counters::{BeliefContext, BeliefCounters, RoundHistory};
use crate::model::card::Card;
use thiserror::Error;

/// Fixed prior that the opponent holds either color.
const UNIFORM_PRIOR: f64 = 0.5;

/// Bayesian opponent model backed by smoothed round counters.
///
/// Counters only ever grow: every observed round adds one to exactly one
/// cell, and the table lives as long as the owning bot.
#[derive(Debug, Clone)]
pub struct BeliefModel {
    counters: BeliefCounters,
    apriori: u32,
    observations: u64,
}

impl BeliefModel {
    pub fn new(apriori: u32) -> Result<Self, BeliefError> {
        if apriori == 0 {
            return Err(BeliefError::ZeroSmoothing);
        }
        Ok(Self {
            counters: BeliefCounters::uniform(apriori),
            apriori,
            observations: 0,
        })
    }

    pub fn apriori(&self) -> u32 {
        self.apriori
    }

    pub fn observations(&self) -> u64 {
        self.observations
    }

    pub fn counters(&self) -> &BeliefCounters {
        &self.counters
    }

    pub fn observe_completed_round(&mut self, history: RoundHistory) {
        self.counters.increment(history);
        self.observations += 1;
    }

    /// `P(context | opponent_card)`: share of the rounds with that opponent
    /// card whose context matches.
    pub fn likelihood(&self, context: &BeliefContext, opponent_card: Card) -> f64 {
        let matching = self.counters.sum_matching(context, Some(opponent_card));
        let total = self
            .counters
            .sum_matching(&BeliefContext::ANY, Some(opponent_card));
        assert!(
            total > 0,
            "belief counters for opponent card {opponent_card} are empty"
        );
        matching as f64 / total as f64
    }

    /// `P(context)` under the uniform prior on the opponent's card.
    pub fn evidence(&self, context: &BeliefContext) -> f64 {
        Card::ALL
            .iter()
            .map(|card| UNIFORM_PRIOR * self.likelihood(context, *card))
            .sum()
    }

    /// `P(opponent_card = candidate | context)`.
    ///
    /// # Panics
    ///
    /// Panics if the context has zero probability, which cannot happen while
    /// every cell holds at least the smoothing count.
    pub fn posterior_opponent_card(&self, context: &BeliefContext, candidate: Card) -> f64 {
        let evidence = self.evidence(context);
        assert!(
            evidence > 0.0,
            "context {context:?} has zero probability; belief counters are corrupted"
        );
        UNIFORM_PRIOR * self.likelihood(context, candidate) / evidence
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeliefError {
    #[error("smoothing constant must be positive")]
    ZeroSmoothing,
}
