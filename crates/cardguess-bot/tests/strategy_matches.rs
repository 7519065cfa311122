use cardguess_bot::{BayesianStrategy, StrategyKind, StrategyParams};
use cardguess_core::game::match_state::{FirstActorPolicy, MatchConfig, MatchController};
use cardguess_core::game::strategy::Strategy;

fn config(seed: u64) -> MatchConfig {
    MatchConfig {
        max_rounds: 200,
        first_actor: FirstActorPolicy::Random,
        seed,
        ..MatchConfig::default()
    }
}

#[test]
fn every_pairing_completes_a_zero_sum_match() {
    let params = StrategyParams {
        learning_time: 20,
        ..StrategyParams::default()
    };
    for (i, one) in StrategyKind::ALL.iter().enumerate() {
        for (j, two) in StrategyKind::ALL.iter().enumerate() {
            let seed = (i * 8 + j) as u64;
            let mut first = one.spawn(&params, seed).unwrap();
            let mut second = two.spawn(&params, seed + 100).unwrap();
            let mut controller = MatchController::new(config(seed)).unwrap();

            let outcome = controller
                .run(&mut [&mut first, &mut second], |report| {
                    assert_eq!(report.rewards.as_array().iter().sum::<i64>(), 0);
                    assert!(report.bankrolls.iter().all(|b| *b >= 0));
                })
                .unwrap();
            assert_eq!(outcome.bankrolls.iter().sum::<i64>(), 200, "{one} vs {two}");
        }
    }
}

#[test]
fn bayesian_learns_from_every_round() {
    let mut bayes = BayesianStrategy::new(10, 1).unwrap();
    let mut opponent = StrategyKind::Contrarian
        .spawn(&StrategyParams::default(), 2)
        .unwrap();
    let mut controller = MatchController::new(config(9)).unwrap();

    let outcome = controller
        .run(&mut [&mut bayes, &mut opponent], |_| {})
        .unwrap();
    assert_eq!(bayes.model().observations(), u64::from(outcome.rounds_played));
    assert_eq!(bayes.name(), "bayesian");
}

#[test]
fn seeded_strategies_replay_identically() {
    let play = || {
        let params = StrategyParams::default();
        let mut one = StrategyKind::Interleaving.spawn(&params, 5).unwrap();
        let mut two = StrategyKind::Random.spawn(&params, 6).unwrap();
        let mut controller = MatchController::new(config(77)).unwrap();
        let mut reports = Vec::new();
        let outcome = controller
            .run(&mut [&mut one, &mut two], |r| reports.push(r.clone()))
            .unwrap();
        (outcome, reports)
    };
    assert_eq!(play(), play());
}
