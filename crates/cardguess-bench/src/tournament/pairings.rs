/// Deterministic round-robin schedule: every unordered pair of agents meets
/// once, in lexicographic order of agent indices.
pub struct Pairings {
    pairs: Vec<[usize; 2]>,
}

impl Pairings {
    pub fn round_robin(agents: usize) -> Self {
        let mut pairs = Vec::with_capacity(agents * agents.saturating_sub(1) / 2);
        for first in 0..agents {
            for second in first + 1..agents {
                pairs.push([first, second]);
            }
        }
        Self { pairs }
    }

    pub fn as_slice(&self) -> &[[usize; 2]] {
        &self.pairs
    }
}

/// Which member of a pair sits in each seat for the `game_index`-th game.
/// Seats swap every game so neither agent keeps the opening advantage.
pub fn seat_slots(game_index: usize) -> [usize; 2] {
    if game_index % 2 == 0 { [0, 1] } else { [1, 0] }
}
