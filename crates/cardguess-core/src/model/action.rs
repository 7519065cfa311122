use crate::model::card::Card;
use crate::model::guess::Guess;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Pass,
    Change,
}

impl Action {
    /// Classifies a chosen card against the current declaration.
    ///
    /// Returns `None` for the opening declaration of a round, which is neither
    /// a pass nor a revision.
    pub fn classify(current: Guess, chosen: Card) -> Option<Action> {
        match current.card() {
            None => None,
            Some(declared) if declared == chosen => Some(Action::Pass),
            Some(_) => Some(Action::Change),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Pass => "PASS",
            Action::Change => "CHANGE",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Action;
    use crate::model::card::Card;
    use crate::model::guess::Guess;

    #[test]
    fn opening_declaration_is_not_classified() {
        assert_eq!(Action::classify(Guess::AwaitingGuess, Card::Red), None);
    }

    #[test]
    fn repeat_is_pass_and_switch_is_change() {
        assert_eq!(Action::classify(Guess::Red, Card::Red), Some(Action::Pass));
        assert_eq!(
            Action::classify(Guess::Red, Card::Black),
            Some(Action::Change)
        );
    }
}
