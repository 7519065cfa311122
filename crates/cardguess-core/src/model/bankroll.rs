use crate::model::player::PlayerPosition;
use crate::model::settlement::RoundRewards;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bankrolls {
    balances: [i64; 2],
}

impl Bankrolls {
    pub const fn new(balances: [i64; 2]) -> Self {
        Self { balances }
    }

    pub fn balance(&self, seat: PlayerPosition) -> i64 {
        self.balances[seat.index()]
    }

    pub fn balances(&self) -> &[i64; 2] {
        &self.balances
    }

    pub fn total(&self) -> i64 {
        self.balances.iter().sum()
    }

    pub fn apply_rewards(&mut self, rewards: &RoundRewards) {
        for seat in PlayerPosition::LOOP {
            self.balances[seat.index()] += rewards.reward(seat);
        }
    }

    /// Seat with the strictly larger bankroll, `None` on a tie.
    pub fn leading_player(&self) -> Option<PlayerPosition> {
        let [one, two] = self.balances;
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Some(PlayerPosition::PlayerOne),
            std::cmp::Ordering::Less => Some(PlayerPosition::PlayerTwo),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// First seat whose bankroll cannot cover `ante`.
    pub fn first_below(&self, ante: i64) -> Option<PlayerPosition> {
        PlayerPosition::LOOP
            .iter()
            .copied()
            .find(|seat| self.balance(*seat) < ante)
    }
}
