use gridworld::{epsilon_greedy, ActionSelector, SelectionPolicy};

#[test]
fn zero_epsilon_always_exploits() {
    let mut rng = fastrand::Rng::with_seed(11);
    let q = [0.3, -1.0, 0.9, 0.1];
    for _ in 0..500 {
        assert_eq!(epsilon_greedy(&q, 0.0, &mut rng), 2);
    }
}

#[test]
fn full_epsilon_spreads_over_all_codes() {
    let selector = ActionSelector::new(SelectionPolicy::EpsilonGreedy, 6);
    let mut rng = fastrand::Rng::with_seed(12);
    let q = [0.0, 0.0, 0.0, 10.0, 0.0, 0.0];
    let mut counts = [0usize; 6];
    for _ in 0..6000 {
        counts[selector.choose(&q, 1.0, &mut rng).unwrap()] += 1;
    }
    for (code, &n) in counts.iter().enumerate() {
        assert!((800..1200).contains(&n), "code {code} drawn {n} times");
    }
}

#[test]
fn softmax_temperature_flattens_choice() {
    let selector = ActionSelector::new(SelectionPolicy::Softmax, 2);
    let mut rng = fastrand::Rng::with_seed(13);
    let q = [0.0, 1.0];
    let hot = (0..2000)
        .filter(|_| selector.choose(&q, 100.0, &mut rng).unwrap() == 1)
        .count();
    assert!((800..1200).contains(&hot), "high temperature picked code 1 {hot} times");
}
