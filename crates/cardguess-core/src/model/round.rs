use crate::model::action::Action;
use crate::model::card::Card;
use crate::model::participant::RoundParticipant;
use crate::model::player::PlayerPosition;
use crate::model::settlement::{RoundRewards, settle};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

/// Default cost of declaring or revising a guess.
pub const ANTE: i64 = 10;

/// Negotiation state of a single round.
///
/// Seats act in strict alternation starting from `first_actor`. Repeating
/// the current declaration passes; a seat is also forced to pass when it can
/// no longer afford an ante, or when it has just taken its one uncontested
/// action after the opponent passed. The round is over once both seats have
/// passed.
#[derive(Debug, Clone)]
pub struct RoundState {
    participants: [RoundParticipant; 2],
    ante: i64,
    first_actor: PlayerPosition,
    next_actor: PlayerPosition,
    decisions: [u32; 2],
    half_turns: u32,
}

impl RoundState {
    pub fn deal(
        cards: [Card; 2],
        funds: [i64; 2],
        ante: i64,
        first_actor: PlayerPosition,
    ) -> Result<Self, ProtocolError> {
        for seat in PlayerPosition::LOOP {
            let available = funds[seat.index()];
            if available < ante {
                return Err(ProtocolError::InsufficientFunds {
                    seat,
                    funds: available,
                    ante,
                });
            }
        }

        Ok(Self {
            participants: [
                RoundParticipant::new(cards[0], funds[0]),
                RoundParticipant::new(cards[1], funds[1]),
            ],
            ante,
            first_actor,
            next_actor: first_actor,
            decisions: [0; 2],
            half_turns: 0,
        })
    }

    pub fn participant(&self, seat: PlayerPosition) -> &RoundParticipant {
        &self.participants[seat.index()]
    }

    pub fn participants(&self) -> &[RoundParticipant; 2] {
        &self.participants
    }

    pub fn ante(&self) -> i64 {
        self.ante
    }

    pub fn first_actor(&self) -> PlayerPosition {
        self.first_actor
    }

    /// Seat expected to act next, or `None` once both seats have passed.
    pub fn current_actor(&self) -> Option<PlayerPosition> {
        if self.is_complete() {
            None
        } else {
            Some(self.next_actor)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.participants.iter().all(RoundParticipant::has_passed)
    }

    pub fn half_turns(&self) -> u32 {
        self.half_turns
    }

    pub fn decisions_made(&self, seat: PlayerPosition) -> u32 {
        self.decisions[seat.index()]
    }

    /// Whether the other seat has changed its declaration during this round.
    pub fn opponent_revised(&self, seat: PlayerPosition) -> bool {
        self.participant(seat.opponent()).has_revised()
    }

    pub fn pot(&self) -> i64 {
        self.participants.iter().map(RoundParticipant::ante_spent).sum()
    }

    pub fn apply_choice(
        &mut self,
        seat: PlayerPosition,
        card: Card,
    ) -> Result<TurnRecord, ProtocolError> {
        if self.is_complete() {
            return Err(ProtocolError::RoundComplete);
        }
        if self.participant(seat).has_passed() {
            return Err(ProtocolError::AlreadyPassed(seat));
        }
        if seat != self.next_actor {
            return Err(ProtocolError::OutOfTurn {
                expected: self.next_actor,
                actual: seat,
            });
        }

        let ante = self.ante;
        let opponent_had_passed = self.participant(seat.opponent()).has_passed();
        let participant = &mut self.participants[seat.index()];

        let action = Action::classify(participant.declared_guess(), card);
        let (turn, ante_paid) = match action {
            None => {
                participant.declare(card, ante);
                (Move::Declare(card), ante)
            }
            Some(Action::Change) => {
                participant.declare(card, ante);
                (Move::Revise(card), ante)
            }
            Some(Action::Pass) => {
                participant.pass();
                (Move::Pass, 0)
            }
        };

        let mut forced_pass = false;
        if !participant.has_passed()
            && (participant.remaining_funds() < ante || opponent_had_passed)
        {
            participant.pass();
            forced_pass = true;
        }

        let record = TurnRecord {
            seat,
            turn,
            guess: card,
            ante_paid,
            forced_pass,
        };

        self.decisions[seat.index()] += 1;
        self.half_turns += 1;
        self.next_actor = seat.opponent();

        if tracing::enabled!(Level::DEBUG) {
            let participant = self.participant(seat);
            event!(
                target: "cardguess_core::round",
                Level::DEBUG,
                seat = %seat,
                turn = ?record.turn,
                guess = %card,
                forced_pass,
                remaining = participant.remaining_funds(),
                pot = self.pot(),
            );
        }

        Ok(record)
    }

    /// Scores the round. Both seats must have passed.
    pub fn settle(&self) -> Result<RoundRewards, ProtocolError> {
        if !self.is_complete() {
            return Err(ProtocolError::RoundNotComplete);
        }
        Ok(settle(&self.participants[0], &self.participants[1]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "card", rename_all = "snake_case")]
pub enum Move {
    Declare(Card),
    Revise(Card),
    Pass,
}

impl Move {
    pub fn action(self) -> Option<Action> {
        match self {
            Move::Declare(_) => None,
            Move::Revise(_) => Some(Action::Change),
            Move::Pass => Some(Action::Pass),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    pub seat: PlayerPosition,
    pub turn: Move,
    pub guess: Card,
    pub ante_paid: i64,
    pub forced_pass: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("{seat} cannot ante {ante} with {funds} available")]
    InsufficientFunds {
        seat: PlayerPosition,
        funds: i64,
        ante: i64,
    },
    #[error("{actual} acted out of turn, expected {expected}")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("{0} has already passed")]
    AlreadyPassed(PlayerPosition),
    #[error("round is already complete")]
    RoundComplete,
    #[error("round cannot be settled before both players pass")]
    RoundNotComplete,
}
