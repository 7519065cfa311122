use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Card {
    Red = 0,
    Black = 1,
}

impl Card {
    pub const ALL: [Card; 2] = [Card::Red, Card::Black];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Card::Red),
            1 => Some(Card::Black),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Card {
        match self {
            Card::Red => Card::Black,
            Card::Black => Card::Red,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Card::Red => "RED",
            Card::Black => "BLACK",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::Card;

    #[test]
    fn opposite_flips_color() {
        assert_eq!(Card::Red.opposite(), Card::Black);
        assert_eq!(Card::Black.opposite(), Card::Red);
    }

    #[test]
    fn index_roundtrip() {
        for (i, card) in Card::ALL.iter().enumerate() {
            assert_eq!(Card::from_index(i), Some(*card));
            assert_eq!(card.index(), i);
        }
        assert_eq!(Card::from_index(2), None);
    }

    #[test]
    fn serializes_as_uppercase_label() {
        let json = serde_json::to_string(&Card::Black).unwrap();
        assert_eq!(json, "\"BLACK\"");
        assert_eq!(Card::Red.to_string(), "RED");
    }
}
