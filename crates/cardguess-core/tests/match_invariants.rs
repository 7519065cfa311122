use cardguess_core::game::match_state::{MatchConfig, MatchController, Termination};
use cardguess_core::game::strategy::{Observation, RoundReveal, Strategy};
use cardguess_core::model::bankroll::Bankrolls;
use cardguess_core::model::card::Card;
use cardguess_core::model::player::PlayerPosition::{PlayerOne, PlayerTwo};
use cardguess_core::model::round::{ANTE, RoundState};
use cardguess_core::model::settlement::SettlementOutcome;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct Coin {
    rng: StdRng,
    rewards: i64,
}

impl Coin {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            rewards: 0,
        }
    }
}

impl Strategy for Coin {
    fn name(&self) -> &str {
        "coin"
    }

    fn decide(&mut self, _observation: &Observation) -> Card {
        if self.rng.gen_bool(0.5) {
            Card::Red
        } else {
            Card::Black
        }
    }

    fn end_of_round(&mut self, reward: i64, _reveal: &RoundReveal) {
        self.rewards += reward;
    }
}

#[test]
fn neither_correct_leaves_bankrolls_unchanged() {
    let mut round =
        RoundState::deal([Card::Red, Card::Black], [100, 100], ANTE, PlayerOne).unwrap();
    round.apply_choice(PlayerOne, Card::Red).unwrap();
    round.apply_choice(PlayerTwo, Card::Black).unwrap();
    round.apply_choice(PlayerOne, Card::Red).unwrap();
    round.apply_choice(PlayerTwo, Card::Black).unwrap();
    assert!(round.is_complete());

    let rewards = round.settle().unwrap();
    assert_eq!(rewards.outcome, SettlementOutcome::NeitherCorrect);
    assert_eq!(rewards.as_array(), [0, 0]);

    let mut bankrolls = Bankrolls::new([100, 100]);
    let before = *bankrolls.balances();
    bankrolls.apply_rewards(&rewards);
    for seat in [PlayerOne, PlayerTwo] {
        let delta = bankrolls.balance(seat) - before[seat.index()];
        assert_eq!(delta, rewards.reward(seat));
    }
}

#[test]
fn only_first_correct_wins_opponent_spend() {
    let mut round =
        RoundState::deal([Card::Black, Card::Red], [100, 100], ANTE, PlayerTwo).unwrap();
    round.apply_choice(PlayerTwo, Card::Red).unwrap();
    round.apply_choice(PlayerOne, Card::Black).unwrap();
    round.apply_choice(PlayerTwo, Card::Black).unwrap();
    round.apply_choice(PlayerOne, Card::Red).unwrap();
    round.apply_choice(PlayerTwo, Card::Red).unwrap();
    round.apply_choice(PlayerOne, Card::Red).unwrap();
    assert!(!round.is_complete());
    round.apply_choice(PlayerTwo, Card::Red).unwrap();
    assert!(round.is_complete());

    let spent_one = round.participant(PlayerOne).ante_spent();
    let spent_two = round.participant(PlayerTwo).ante_spent();
    let rewards = round.settle().unwrap();
    assert_eq!(rewards.outcome, SettlementOutcome::OnlyFirstCorrect);
    assert_eq!(rewards.pot, spent_one + spent_two);
    assert_eq!(rewards.reward(PlayerOne), rewards.pot - spent_one);
    assert_eq!(rewards.reward(PlayerTwo), -spent_two);
    assert_eq!(rewards.reward(PlayerOne) + rewards.reward(PlayerTwo), 0);
}

#[test]
fn random_play_respects_match_invariants() {
    for seed in 0..40u64 {
        let config = MatchConfig {
            starting_bankrolls: [30 + 10 * (seed as i64 % 5), 60],
            max_rounds: 400,
            seed,
            ..MatchConfig::default()
        };
        let total = config.starting_bankrolls.iter().sum::<i64>();
        let mut controller = MatchController::new(config).unwrap();
        let mut one = Coin::new(seed * 2 + 1);
        let mut two = Coin::new(seed * 2 + 2);

        let mut previous = *controller.bankrolls().balances();
        let outcome = controller
            .run(&mut [&mut one, &mut two], |report| {
                let [a, b] = report.rewards.as_array();
                assert_eq!(a + b, 0);
                assert!(report.bankrolls.iter().all(|balance| *balance >= 0));
                assert_eq!(report.bankrolls[0] - previous[0], a);
                assert_eq!(report.bankrolls[1] - previous[1], b);

                let min_funds = previous[0].min(previous[1]);
                let bound = 2 * (min_funds / ANTE) as usize + 2;
                assert!(report.turns.len() <= bound);
                previous = report.bankrolls;
            })
            .unwrap();

        assert_eq!(outcome.bankrolls.iter().sum::<i64>(), total);
        assert_eq!(one.rewards + two.rewards, 0);
        match outcome.termination {
            Termination::Bankrupt { loser } => {
                assert!(outcome.bankrolls[loser.index()] < ANTE);
                assert_eq!(outcome.winner, Some(loser.opponent()));
            }
            Termination::RoundLimit => assert_eq!(outcome.rounds_played, 400),
        }
    }
}
