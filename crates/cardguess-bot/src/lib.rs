pub mod strategy;

pub use strategy::{
    BayesianStrategy, ContrarianStrategy, CopyLastGuessStrategy, FixedCardStrategy,
    HistoricalStrategy, InterleavingStrategy, RandomStrategy, SpawnError, StrategyKind,
    StrategyParams,
};
