use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PlayerPosition {
    PlayerOne = 0,
    PlayerTwo = 1,
}

impl PlayerPosition {
    pub const LOOP: [PlayerPosition; 2] = [PlayerPosition::PlayerOne, PlayerPosition::PlayerTwo];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerPosition::PlayerOne),
            1 => Some(PlayerPosition::PlayerTwo),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opponent(self) -> PlayerPosition {
        match self {
            PlayerPosition::PlayerOne => PlayerPosition::PlayerTwo,
            PlayerPosition::PlayerTwo => PlayerPosition::PlayerOne,
        }
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerPosition::PlayerOne => "PlayerOne",
            PlayerPosition::PlayerTwo => "PlayerTwo",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerPosition;

    #[test]
    fn opponent_is_involution() {
        for seat in PlayerPosition::LOOP {
            assert_ne!(seat.opponent(), seat);
            assert_eq!(seat.opponent().opponent(), seat);
        }
    }

    #[test]
    fn index_roundtrip() {
        for (i, seat) in PlayerPosition::LOOP.iter().enumerate() {
            assert_eq!(PlayerPosition::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
        }
        assert_eq!(PlayerPosition::from_index(2), None);
    }
}
