use crate::game::strategy::{Observation, RoundReveal, Strategy};
use crate::model::bankroll::Bankrolls;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::guess::Guess;
use crate::model::player::PlayerPosition;
use crate::model::round::{ANTE, ProtocolError, RoundState, TurnRecord};
use crate::model::settlement::RoundRewards;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level, event};

const DEFAULT_STARTING_BANKROLL: i64 = 100;
const DEFAULT_MAX_ROUNDS: u32 = 1_000;

/// Who opens each round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstActorPolicy {
    /// PlayerOne opens even-indexed rounds, PlayerTwo odd-indexed ones.
    #[default]
    Alternate,
    /// Drawn uniformly from the match RNG before each deal.
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub ante: i64,
    pub starting_bankrolls: [i64; 2],
    pub max_rounds: u32,
    #[serde(default)]
    pub first_actor: FirstActorPolicy,
    #[serde(default)]
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            ante: ANTE,
            starting_bankrolls: [DEFAULT_STARTING_BANKROLL; 2],
            max_rounds: DEFAULT_MAX_ROUNDS,
            first_actor: FirstActorPolicy::Alternate,
            seed: 0,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ante <= 0 {
            return Err(ConfigError::NonPositiveAnte(self.ante));
        }
        if self.ante % 2 != 0 {
            return Err(ConfigError::OddAnte(self.ante));
        }
        for seat in PlayerPosition::LOOP {
            let bankroll = self.starting_bankrolls[seat.index()];
            if bankroll < self.ante {
                return Err(ConfigError::BankrollBelowAnte {
                    seat,
                    bankroll,
                    ante: self.ante,
                });
            }
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        Ok(())
    }
}

/// Plays rounds back to back and owns both bankrolls.
#[derive(Debug, Clone)]
pub struct MatchController {
    config: MatchConfig,
    deck: Deck,
    bankrolls: Bankrolls,
    rounds_played: u32,
    previous_opponent_cards: [Option<Card>; 2],
    rng: StdRng,
}

impl MatchController {
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            deck: Deck::standard(),
            bankrolls: Bankrolls::new(config.starting_bankrolls),
            rounds_played: 0,
            previous_opponent_cards: [None; 2],
            rng: StdRng::seed_from_u64(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn bankrolls(&self) -> &Bankrolls {
        &self.bankrolls
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Final result once a bankroll can no longer cover the ante or the
    /// round budget is exhausted; `None` while play can continue.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if let Some(loser) = self.bankrolls.first_below(self.config.ante) {
            return Some(self.finish(Some(loser.opponent()), Termination::Bankrupt { loser }));
        }
        if self.rounds_played >= self.config.max_rounds {
            return Some(self.finish(
                self.bankrolls.leading_player(),
                Termination::RoundLimit,
            ));
        }
        None
    }

    fn finish(&self, winner: Option<PlayerPosition>, termination: Termination) -> MatchOutcome {
        MatchOutcome {
            winner,
            termination,
            rounds_played: self.rounds_played,
            bankrolls: *self.bankrolls.balances(),
        }
    }

    fn next_first_actor(&mut self) -> PlayerPosition {
        match self.config.first_actor {
            FirstActorPolicy::Alternate => {
                if self.rounds_played % 2 == 0 {
                    PlayerPosition::PlayerOne
                } else {
                    PlayerPosition::PlayerTwo
                }
            }
            FirstActorPolicy::Random => {
                if self.rng.gen_bool(0.5) {
                    PlayerPosition::PlayerOne
                } else {
                    PlayerPosition::PlayerTwo
                }
            }
        }
    }

    /// Deals, negotiates and settles one round.
    pub fn play_round(
        &mut self,
        strategies: &mut [&mut dyn Strategy; 2],
    ) -> Result<RoundReport, MatchError> {
        if let Some(outcome) = self.outcome() {
            return Err(MatchError::Finished(outcome));
        }

        let first_actor = self.next_first_actor();
        let cards = self.deck.deal(&mut self.rng);
        let mut round = RoundState::deal(
            cards,
            *self.bankrolls.balances(),
            self.config.ante,
            first_actor,
        )?;

        let mut turns = Vec::new();
        while let Some(seat) = round.current_actor() {
            let observation =
                Observation::from_round(&round, seat, self.previous_opponent_cards[seat.index()]);
            let card = strategies[seat.index()].decide(&observation);
            turns.push(round.apply_choice(seat, card)?);
        }

        let rewards = round.settle()?;
        self.bankrolls.apply_rewards(&rewards);
        debug_assert!(self.bankrolls.balances().iter().all(|b| *b >= 0));

        for seat in PlayerPosition::LOOP {
            let reveal = RoundReveal::from_round(&round, seat);
            strategies[seat.index()].end_of_round(rewards.reward(seat), &reveal);
            self.previous_opponent_cards[seat.index()] = Some(reveal.opponent_card);
        }

        let report = RoundReport {
            round_index: self.rounds_played,
            first_actor,
            cards,
            final_guesses: PlayerPosition::LOOP.map(|s| round.participant(s).declared_guess()),
            spends: PlayerPosition::LOOP.map(|s| round.participant(s).ante_spent()),
            rewards,
            bankrolls: *self.bankrolls.balances(),
            turns,
        };
        self.rounds_played += 1;

        event!(
            target: "cardguess_core::match",
            Level::DEBUG,
            round = report.round_index,
            first_actor = %first_actor,
            outcome = ?rewards.outcome,
            pot = rewards.pot,
            reward_one = rewards.reward(PlayerPosition::PlayerOne),
            reward_two = rewards.reward(PlayerPosition::PlayerTwo),
            bankroll_one = report.bankrolls[0],
            bankroll_two = report.bankrolls[1],
        );

        Ok(report)
    }

    /// Plays until [`outcome`](Self::outcome) reports a result, handing every
    /// round report to `observer`.
    pub fn run<F>(
        &mut self,
        strategies: &mut [&mut dyn Strategy; 2],
        mut observer: F,
    ) -> Result<MatchOutcome, MatchError>
    where
        F: FnMut(&RoundReport),
    {
        loop {
            if let Some(outcome) = self.outcome() {
                event!(
                    target: "cardguess_core::match",
                    Level::DEBUG,
                    rounds = outcome.rounds_played,
                    winner = ?outcome.winner,
                    termination = ?outcome.termination,
                );
                return Ok(outcome);
            }
            let report = self.play_round(strategies)?;
            observer(&report);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub round_index: u32,
    pub first_actor: PlayerPosition,
    pub cards: [Card; 2],
    pub final_guesses: [Guess; 2],
    pub spends: [i64; 2],
    pub rewards: RoundRewards,
    pub bankrolls: [i64; 2],
    pub turns: Vec<TurnRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    Bankrupt { loser: PlayerPosition },
    RoundLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub winner: Option<PlayerPosition>,
    pub termination: Termination,
    pub rounds_played: u32,
    pub bankrolls: [i64; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("ante must be positive, got {0}")]
    NonPositiveAnte(i64),
    #[error("ante must be even so the pot splits exactly, got {0}")]
    OddAnte(i64),
    #[error("{seat} starts with {bankroll}, below one ante of {ante}")]
    BankrollBelowAnte {
        seat: PlayerPosition,
        bankroll: i64,
        ante: i64,
    },
    #[error("match must allow at least one round")]
    NoRounds,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("match already finished after {} rounds", .0.rounds_played)]
    Finished(MatchOutcome),
}
