use super::{BeliefContext, BeliefModel};
use crate::model::card::Card;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeliefMetrics {
    pub observations: u64,
    pub posterior_red: f64,
    /// Shannon entropy of the posterior in bits; 1.0 means no information.
    pub entropy_bits: f64,
}

impl BeliefMetrics {
    pub fn from_model(model: &BeliefModel, context: &BeliefContext) -> Self {
        let posterior_red = model.posterior_opponent_card(context, Card::Red);
        let entropy_bits: f64 = [posterior_red, 1.0 - posterior_red]
            .iter()
            .filter(|p| **p > 0.0)
            .map(|p| -p * p.log2())
            .sum();

        Self {
            observations: model.observations(),
            posterior_red,
            entropy_bits,
        }
    }
}
