mod bayesian;
mod historical;
mod interleaving;
mod reactive;

pub use bayesian::{BayesianStrategy, DEFAULT_APRIORI};
pub use historical::{DEFAULT_LEARNING_TIME, HistoricalStrategy};
pub use interleaving::InterleavingStrategy;
pub use reactive::{ContrarianStrategy, CopyLastGuessStrategy, FixedCardStrategy, RandomStrategy};

use cardguess_core::belief::BeliefError;
use cardguess_core::game::strategy::Strategy;
use cardguess_core::model::card::Card;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MEMBER_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    AlwaysRed,
    AlwaysBlack,
    Contrarian,
    CopyLastGuess,
    Random,
    Bayesian,
    Historical,
    Interleaving,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::AlwaysRed,
        StrategyKind::AlwaysBlack,
        StrategyKind::Contrarian,
        StrategyKind::CopyLastGuess,
        StrategyKind::Random,
        StrategyKind::Bayesian,
        StrategyKind::Historical,
        StrategyKind::Interleaving,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            StrategyKind::AlwaysRed => "always_red",
            StrategyKind::AlwaysBlack => "always_black",
            StrategyKind::Contrarian => "contrarian",
            StrategyKind::CopyLastGuess => "copy_last_guess",
            StrategyKind::Random => "random",
            StrategyKind::Bayesian => "bayesian",
            StrategyKind::Historical => "historical",
            StrategyKind::Interleaving => "interleaving",
        }
    }

    /// Builds a fresh strategy. `seed` feeds every random choice it makes.
    pub fn spawn(
        self,
        params: &StrategyParams,
        seed: u64,
    ) -> Result<Box<dyn Strategy>, SpawnError> {
        let strategy: Box<dyn Strategy> = match self {
            StrategyKind::AlwaysRed => Box::new(FixedCardStrategy::new(Card::Red)),
            StrategyKind::AlwaysBlack => Box::new(FixedCardStrategy::new(Card::Black)),
            StrategyKind::Contrarian => Box::new(ContrarianStrategy),
            StrategyKind::CopyLastGuess => Box::new(CopyLastGuessStrategy),
            StrategyKind::Random => Box::new(RandomStrategy::new(seed)),
            StrategyKind::Bayesian => Box::new(BayesianStrategy::new(params.apriori, seed)?),
            StrategyKind::Historical => Box::new(HistoricalStrategy::new(params.learning_time)),
            StrategyKind::Interleaving => {
                let mut members = Vec::with_capacity(params.members.len());
                for (index, kind) in params.members.iter().copied().enumerate() {
                    if kind == StrategyKind::Interleaving {
                        return Err(SpawnError::NestedInterleaving);
                    }
                    let member_seed =
                        seed.wrapping_add((index as u64 + 1).wrapping_mul(MEMBER_SEED_STRIDE));
                    members.push(kind.spawn(params, member_seed)?);
                }
                Box::new(InterleavingStrategy::new(members, seed).ok_or(SpawnError::NoMembers)?)
            }
        };
        Ok(strategy)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = SpawnError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let kind = match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "always_red" | "red" => StrategyKind::AlwaysRed,
            "always_black" | "black" => StrategyKind::AlwaysBlack,
            "contrarian" => StrategyKind::Contrarian,
            "copy_last_guess" | "copy" => StrategyKind::CopyLastGuess,
            "random" | "baseline" => StrategyKind::Random,
            "bayesian" | "bayes" => StrategyKind::Bayesian,
            "historical" => StrategyKind::Historical,
            "interleaving" | "mixed" => StrategyKind::Interleaving,
            _ => return Err(SpawnError::UnknownKind(raw.to_string())),
        };
        Ok(kind)
    }
}

/// Tunables shared by the strategies that need them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyParams {
    /// Smoothing count for [`BayesianStrategy`].
    pub apriori: u32,
    /// Contrarian decisions before [`HistoricalStrategy`] trusts its table.
    pub learning_time: u64,
    /// Members of an [`InterleavingStrategy`].
    pub members: Vec<StrategyKind>,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            apriori: DEFAULT_APRIORI,
            learning_time: DEFAULT_LEARNING_TIME,
            members: vec![
                StrategyKind::Contrarian,
                StrategyKind::Random,
                StrategyKind::Bayesian,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("unknown strategy kind '{0}'")]
    UnknownKind(String),
    #[error(transparent)]
    Belief(#[from] BeliefError),
    #[error("interleaving strategy needs at least one member")]
    NoMembers,
    #[error("interleaving strategies cannot be nested")]
    NestedInterleaving,
}
