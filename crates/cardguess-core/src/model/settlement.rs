//! Zero-sum scoring of a finished round.

use crate::model::participant::RoundParticipant;
use crate::model::player::PlayerPosition;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementOutcome {
    BothCorrect,
    OnlyFirstCorrect,
    OnlySecondCorrect,
    NeitherCorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundRewards {
    pub outcome: SettlementOutcome,
    pub pot: i64,
    rewards: [i64; 2],
}

impl RoundRewards {
    pub fn reward(&self, seat: PlayerPosition) -> i64 {
        self.rewards[seat.index()]
    }

    pub fn as_array(&self) -> [i64; 2] {
        self.rewards
    }
}

/// Scores `first` and `second`, each on guessing the other's dealt card.
///
/// Both players' spends must be multiples of one even ante so that an even
/// split of the pot is exact.
pub fn settle(first: &RoundParticipant, second: &RoundParticipant) -> RoundRewards {
    let first_correct = first.declared_guess().card() == Some(second.dealt_card());
    let second_correct = second.declared_guess().card() == Some(first.dealt_card());
    let pot = first.ante_spent() + second.ante_spent();

    let (outcome, rewards) = match (first_correct, second_correct) {
        (true, true) => (
            SettlementOutcome::BothCorrect,
            [pot / 2 - first.ante_spent(), pot / 2 - second.ante_spent()],
        ),
        (true, false) => (
            SettlementOutcome::OnlyFirstCorrect,
            [pot - first.ante_spent(), -second.ante_spent()],
        ),
        (false, true) => (
            SettlementOutcome::OnlySecondCorrect,
            [-first.ante_spent(), pot - second.ante_spent()],
        ),
        (false, false) => (SettlementOutcome::NeitherCorrect, [0, 0]),
    };

    debug_assert_eq!(rewards[0] + rewards[1], 0, "settlement must be zero-sum");

    RoundRewards {
        outcome,
        pot,
        rewards,
    }
}

#[cfg(test)]
mod tests {
    use super::{SettlementOutcome, settle};
    use crate::model::card::Card;
    use crate::model::guess::Guess;
    use crate::model::participant::RoundParticipant;
    use crate::model::player::PlayerPosition;

    fn finished(card: Card, guess: Card, spent: i64) -> RoundParticipant {
        RoundParticipant::from_parts(card, Guess::from(guess), spent, true)
    }

    #[test]
    fn neither_correct_returns_zero() {
        let a = finished(Card::Red, Card::Red, 10);
        let b = finished(Card::Black, Card::Black, 10);
        let rewards = settle(&a, &b);
        assert_eq!(rewards.outcome, SettlementOutcome::NeitherCorrect);
        assert_eq!(rewards.as_array(), [0, 0]);
        assert_eq!(rewards.pot, 20);
    }

    #[test]
    fn only_first_correct_takes_the_pot() {
        let a = finished(Card::Red, Card::Red, 20);
        let b = finished(Card::Red, Card::Black, 30);
        let rewards = settle(&a, &b);
        assert_eq!(rewards.outcome, SettlementOutcome::OnlyFirstCorrect);
        assert_eq!(rewards.reward(PlayerPosition::PlayerOne), 50 - 20);
        assert_eq!(rewards.reward(PlayerPosition::PlayerTwo), -30);
    }

    #[test]
    fn only_second_correct_is_symmetric() {
        let a = finished(Card::Black, Card::Red, 10);
        let b = finished(Card::Black, Card::Black, 20);
        let rewards = settle(&a, &b);
        assert_eq!(rewards.outcome, SettlementOutcome::OnlySecondCorrect);
        assert_eq!(rewards.as_array(), [-10, 10]);
    }

    #[test]
    fn both_correct_split_the_pot() {
        let a = finished(Card::Red, Card::Black, 30);
        let b = finished(Card::Black, Card::Red, 10);
        let rewards = settle(&a, &b);
        assert_eq!(rewards.outcome, SettlementOutcome::BothCorrect);
        assert_eq!(rewards.as_array(), [-10, 10]);
    }

    #[test]
    fn every_terminal_combination_is_zero_sum() {
        for a_card in Card::ALL {
            for b_card in Card::ALL {
                for a_guess in Card::ALL {
                    for b_guess in Card::ALL {
                        for a_spent in (10..=60).step_by(10) {
                            for b_spent in (10..=60).step_by(10) {
                                let a = finished(a_card, a_guess, a_spent);
                                let b = finished(b_card, b_guess, b_spent);
                                let [ra, rb] = settle(&a, &b).as_array();
                                assert_eq!(ra + rb, 0);
                                assert!(ra >= -a_spent && rb >= -b_spent);
                            }
                        }
                    }
                }
            }
        }
    }
}
