use cardguess_core::game::strategy::{Observation, RoundReveal, Strategy};
use cardguess_core::model::card::Card;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Hands each round to one member chosen uniformly at random.
///
/// Only the active member sees the round's decisions and its reward, so each
/// member learns from the rounds it actually played.
pub struct InterleavingStrategy {
    members: Vec<Box<dyn Strategy>>,
    active: usize,
    rng: StdRng,
}

impl InterleavingStrategy {
    /// Returns `None` when `members` is empty.
    pub fn new(members: Vec<Box<dyn Strategy>>, seed: u64) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        Some(Self {
            members,
            active: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| member.name())
    }

    pub fn active(&self) -> &str {
        self.members[self.active].name()
    }
}

impl Strategy for InterleavingStrategy {
    fn name(&self) -> &str {
        "interleaving"
    }

    fn decide(&mut self, observation: &Observation) -> Card {
        if observation.first_turn_in_round {
            self.active = self.rng.gen_range(0..self.members.len());
        }
        self.members[self.active].decide(observation)
    }

    fn end_of_round(&mut self, reward: i64, reveal: &RoundReveal) {
        self.members[self.active].end_of_round(reward, reveal);
    }
}
