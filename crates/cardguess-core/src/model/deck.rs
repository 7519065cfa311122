use crate::model::card::Card;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// The four-card multiset both hands are drawn from.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: [Card; 4],
}

impl Deck {
    pub const fn standard() -> Self {
        Self {
            cards: [Card::Red, Card::Red, Card::Black, Card::Black],
        }
    }

    /// Draws two cards without replacement, one per seat.
    pub fn deal<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> [Card; 2] {
        let mut cards = self.cards;
        let (drawn, _) = cards.partial_shuffle(rng, 2);
        [drawn[0], drawn[1]]
    }

    pub fn deal_with_seed(&self, seed: u64) -> [Card; 2] {
        let mut rng = StdRng::seed_from_u64(seed);
        self.deal(&mut rng)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::card::Card;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn standard_deck_is_two_of_each_color() {
        let deck = Deck::standard();
        let reds = deck.cards().iter().filter(|c| **c == Card::Red).count();
        assert_eq!(deck.cards().len(), 4);
        assert_eq!(reds, 2);
    }

    #[test]
    fn deal_with_seed_is_deterministic() {
        let deck = Deck::standard();
        assert_eq!(deck.deal_with_seed(42), deck.deal_with_seed(42));
    }

    #[test]
    fn matching_pairs_occur_one_third_of_the_time() {
        let deck = Deck::standard();
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 30_000;
        let matches = (0..trials)
            .filter(|_| {
                let [a, b] = deck.deal(&mut rng);
                a == b
            })
            .count();
        let rate = matches as f64 / trials as f64;
        assert!((rate - 1.0 / 3.0).abs() < 0.02, "match rate {rate}");
    }
}
