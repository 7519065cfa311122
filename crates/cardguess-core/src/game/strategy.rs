use crate::model::card::Card;
use crate::model::guess::Guess;
use crate::model::player::PlayerPosition;
use crate::model::round::RoundState;

/// What a seat can see when it is asked to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub own_card: Card,
    pub own_guess: Guess,
    pub opponent_guess: Guess,
    /// True on this seat's first decision of a new round.
    pub first_turn_in_round: bool,
    pub remaining_funds: i64,
    /// Opponent's card revealed at the end of the previous round, if any.
    pub previous_opponent_card: Option<Card>,
}

impl Observation {
    pub fn from_round(
        round: &RoundState,
        seat: PlayerPosition,
        previous_opponent_card: Option<Card>,
    ) -> Self {
        let own = round.participant(seat);
        let opponent = round.participant(seat.opponent());
        Self {
            own_card: own.dealt_card(),
            own_guess: own.declared_guess(),
            opponent_guess: opponent.declared_guess(),
            first_turn_in_round: round.decisions_made(seat) == 0,
            remaining_funds: own.remaining_funds(),
            previous_opponent_card,
        }
    }
}

/// Information disclosed to a seat once its round has been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReveal {
    pub own_card: Card,
    pub opponent_card: Card,
    /// Opponent's declaration at the moment the cards were revealed.
    pub opponent_final_guess: Guess,
    pub opponent_revised: bool,
}

impl RoundReveal {
    pub fn from_round(round: &RoundState, seat: PlayerPosition) -> Self {
        let own = round.participant(seat);
        let opponent = round.participant(seat.opponent());
        Self {
            own_card: own.dealt_card(),
            opponent_card: opponent.dealt_card(),
            opponent_final_guess: opponent.declared_guess(),
            opponent_revised: opponent.has_revised(),
        }
    }
}

/// Unified interface for every bot that can sit at the table.
pub trait Strategy: Send {
    fn name(&self) -> &str;

    /// Card to declare. Returning the current declaration passes.
    fn decide(&mut self, observation: &Observation) -> Card;

    /// Called once per seat after settlement with that seat's reward.
    fn end_of_round(&mut self, reward: i64, reveal: &RoundReveal);
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decide(&mut self, observation: &Observation) -> Card {
        (**self).decide(observation)
    }

    fn end_of_round(&mut self, reward: i64, reveal: &RoundReveal) {
        (**self).end_of_round(reward, reveal)
    }
}
