//! Bayesian opponent modelling from completed rounds.
//!
//! - `counters`: the smoothed 16-cell frequency table and its query context.
//! - `model`: posterior queries over the table.
//! - `telemetry`: summary metrics for logging.

mod counters;
mod model;
pub mod telemetry;

pub use counters::{BeliefContext, BeliefCounters, RoundHistory};
pub use model::{BeliefError, BeliefModel};
