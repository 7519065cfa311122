//! Smoothed frequency table over completed rounds.

use crate::model::card::Card;
use serde::Serialize;

const CELLS: usize = 16;

/// One observed round, as seen from the model owner's seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RoundHistory {
    pub my_card: Card,
    /// Opponent's declaration when the cards were revealed.
    pub opponent_said: Card,
    pub opponent_revised: bool,
    pub opponent_card: Card,
}

impl RoundHistory {
    pub const fn new(
        my_card: Card,
        opponent_said: Card,
        opponent_revised: bool,
        opponent_card: Card,
    ) -> Self {
        Self {
            my_card,
            opponent_said,
            opponent_revised,
            opponent_card,
        }
    }

    pub const fn index(self) -> usize {
        self.my_card.index() * 8
            + self.opponent_said.index() * 4
            + (self.opponent_revised as usize) * 2
            + self.opponent_card.index()
    }

    /// Every one of the sixteen cells, in index order.
    pub fn all() -> impl Iterator<Item = RoundHistory> {
        Card::ALL.into_iter().flat_map(|my_card| {
            Card::ALL.into_iter().flat_map(move |opponent_said| {
                [false, true].into_iter().flat_map(move |opponent_revised| {
                    Card::ALL.into_iter().map(move |opponent_card| {
                        RoundHistory::new(my_card, opponent_said, opponent_revised, opponent_card)
                    })
                })
            })
        })
    }
}

/// Partial view of a round used to query the table. `None` marginalizes the
/// dimension out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BeliefContext {
    pub my_card: Option<Card>,
    pub opponent_said: Option<Card>,
    pub opponent_revised: Option<bool>,
}

impl BeliefContext {
    pub const ANY: BeliefContext = BeliefContext {
        my_card: None,
        opponent_said: None,
        opponent_revised: None,
    };

    pub const fn new(
        my_card: Option<Card>,
        opponent_said: Option<Card>,
        opponent_revised: Option<bool>,
    ) -> Self {
        Self {
            my_card,
            opponent_said,
            opponent_revised,
        }
    }

    pub fn matches(&self, history: RoundHistory) -> bool {
        self.my_card.is_none_or(|card| card == history.my_card)
            && self
                .opponent_said
                .is_none_or(|card| card == history.opponent_said)
            && self
                .opponent_revised
                .is_none_or(|revised| revised == history.opponent_revised)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeliefCounters {
    cells: [u64; CELLS],
}

impl BeliefCounters {
    /// Every cell starts at `apriori`.
    pub fn uniform(apriori: u32) -> Self {
        Self {
            cells: [u64::from(apriori); CELLS],
        }
    }

    pub fn count(&self, history: RoundHistory) -> u64 {
        self.cells[history.index()]
    }

    pub fn increment(&mut self, history: RoundHistory) {
        self.cells[history.index()] += 1;
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    /// Sum of the cells matching `context`, optionally restricted to one
    /// opponent card.
    pub fn sum_matching(&self, context: &BeliefContext, opponent_card: Option<Card>) -> u64 {
        RoundHistory::all()
            .filter(|history| context.matches(*history))
            .filter(|history| opponent_card.is_none_or(|card| card == history.opponent_card))
            .map(|history| self.count(history))
            .sum()
    }

    pub fn cells(&self) -> &[u64; CELLS] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::{BeliefContext, BeliefCounters, RoundHistory};
    use crate::model::card::Card;
    use std::collections::HashSet;

    #[test]
    fn indices_cover_all_sixteen_cells() {
        let indices: HashSet<usize> = RoundHistory::all().map(RoundHistory::index).collect();
        assert_eq!(indices.len(), 16);
        assert!(indices.iter().all(|i| *i < 16));
        for (position, history) in RoundHistory::all().enumerate() {
            assert_eq!(history.index(), position);
        }
    }

    #[test]
    fn marginalized_dimensions_sum_both_values() {
        let counters = BeliefCounters::uniform(3);
        assert_eq!(counters.sum_matching(&BeliefContext::ANY, None), 48);
        assert_eq!(counters.sum_matching(&BeliefContext::ANY, Some(Card::Red)), 24);

        let ctx = BeliefContext::new(Some(Card::Red), None, Some(false));
        assert_eq!(counters.sum_matching(&ctx, None), 12);
        assert_eq!(counters.sum_matching(&ctx, Some(Card::Black)), 6);
    }
}
