use cardguess_core::belief::telemetry::BeliefMetrics;
use cardguess_core::belief::{BeliefContext, BeliefError, BeliefModel, RoundHistory};
use cardguess_core::game::strategy::{Observation, RoundReveal, Strategy};
use cardguess_core::model::card::Card;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{Level, event};

/// Default smoothing count seeded into every belief cell.
pub const DEFAULT_APRIORI: u32 = 10;

/// Guesses the opponent's card from a [`BeliefModel`] trained on every round
/// this bot has played.
#[derive(Debug, Clone)]
pub struct BayesianStrategy {
    model: BeliefModel,
    rng: StdRng,
    /// Opponent declaration seen at our previous decision this round.
    last_seen_opponent: Option<Card>,
    opponent_revised: bool,
}

impl BayesianStrategy {
    pub fn new(apriori: u32, seed: u64) -> Result<Self, BeliefError> {
        Ok(Self {
            model: BeliefModel::new(apriori)?,
            rng: StdRng::seed_from_u64(seed),
            last_seen_opponent: None,
            opponent_revised: false,
        })
    }

    pub fn model(&self) -> &BeliefModel {
        &self.model
    }

    fn track_opponent(&mut self, observation: &Observation) {
        if observation.first_turn_in_round {
            self.last_seen_opponent = None;
            self.opponent_revised = false;
        }
        if let Some(card) = observation.opponent_guess.card() {
            if self.last_seen_opponent.is_some_and(|seen| seen != card) {
                self.opponent_revised = true;
            }
            self.last_seen_opponent = Some(card);
        }
    }

    fn context(&self, observation: &Observation) -> BeliefContext {
        BeliefContext::new(
            Some(observation.own_card),
            observation.opponent_guess.card(),
            Some(self.opponent_revised),
        )
    }
}

impl Strategy for BayesianStrategy {
    fn name(&self) -> &str {
        "bayesian"
    }

    fn decide(&mut self, observation: &Observation) -> Card {
        self.track_opponent(observation);

        if observation.own_guess.is_awaiting() && observation.opponent_guess.is_awaiting() {
            let card = if self.rng.gen_bool(0.5) {
                Card::Red
            } else {
                Card::Black
            };
            log_decision(self, observation, None, card, "opening_random");
            return card;
        }

        let context = self.context(observation);
        let posterior_red = self.model.posterior_opponent_card(&context, Card::Red);

        let (card, reason) = match observation.own_guess.card() {
            None if posterior_red > 0.5 => (Card::Red, "declare_red"),
            None => (Card::Black, "declare_black"),
            Some(current) => {
                let current_p = self.model.posterior_opponent_card(&context, current);
                let other_p = self
                    .model
                    .posterior_opponent_card(&context, current.opposite());
                if other_p > current_p {
                    (current.opposite(), "revise")
                } else {
                    (current, "hold")
                }
            }
        };

        log_decision(self, observation, Some(&context), card, reason);
        card
    }

    fn end_of_round(&mut self, _reward: i64, reveal: &RoundReveal) {
        self.last_seen_opponent = None;
        self.opponent_revised = false;

        let Some(opponent_said) = reveal.opponent_final_guess.card() else {
            return;
        };
        self.model.observe_completed_round(RoundHistory::new(
            reveal.own_card,
            opponent_said,
            reveal.opponent_revised,
            reveal.opponent_card,
        ));
    }
}

fn log_decision(
    bot: &BayesianStrategy,
    observation: &Observation,
    context: Option<&BeliefContext>,
    chosen: Card,
    reason: &str,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let metrics = BeliefMetrics::from_model(&bot.model, context.unwrap_or(&BeliefContext::ANY));
    event!(
        target: "cardguess_bot::bayesian",
        Level::DEBUG,
        own_card = %observation.own_card,
        own_guess = %observation.own_guess,
        opponent_guess = %observation.opponent_guess,
        opponent_revised = bot.opponent_revised,
        posterior_red = metrics.posterior_red,
        entropy_bits = metrics.entropy_bits,
        observations = metrics.observations,
        chosen = %chosen,
        reason,
    );
}
