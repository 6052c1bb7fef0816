use ml::{Loss, MlError, OptimizerConfig, QFunction, QNetwork, QNetworkConfig, QTarget};

fn config(seed: u64) -> QNetworkConfig {
    QNetworkConfig {
        hidden: vec![16],
        seed,
        ..QNetworkConfig::default()
    }
}

#[test]
fn outputs_one_value_per_action() {
    let net = QNetwork::new(6, 4, &config(1)).unwrap();
    let q = net.q_values(&[0.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
    assert_eq!(q.len(), 4);
    assert!(q.iter().all(|v| v.is_finite()));
    assert_eq!(net.n_params(), 6 * 16 + 16 + 16 * 4 + 4);
}

#[test]
fn sync_copies_all_parameters() {
    let policy = QNetwork::new(5, 3, &config(1)).unwrap();
    let mut target = QNetwork::new(5, 3, &config(2)).unwrap();
    let state = [1.0, 0.0, 0.5, 0.0, 1.0];
    assert_ne!(policy.q_values(&state), target.q_values(&state));
    target.sync_from(&policy);
    assert_eq!(policy.q_values(&state), target.q_values(&state));
}

#[test]
fn fit_moves_selected_value_towards_target() {
    let cfg = QNetworkConfig {
        optimizer: OptimizerConfig::Sgd {
            lr: 0.05,
            momentum: 0.0,
        },
        loss: Loss::Mse,
        ..config(3)
    };
    let mut net = QNetwork::new(3, 2, &cfg).unwrap();
    let state = [1.0, 0.5, -0.5];
    let batch = [QTarget {
        state: &state,
        action: 1,
        target: 2.0,
    }];

    let first = net.fit(&batch);
    for _ in 0..200 {
        net.fit(&batch);
    }
    let last = net.fit(&batch);
    assert!(last < first * 0.1, "loss went from {first} to {last}");
    assert!((net.q_values(&state)[1] - 2.0).abs() < 0.1);
}

#[test]
fn empty_batch_is_a_no_op() {
    let mut net = QNetwork::new(2, 2, &config(4)).unwrap();
    let before = net.q_values(&[1.0, 1.0]);
    assert_eq!(net.fit(&[]), 0.0);
    assert_eq!(net.q_values(&[1.0, 1.0]), before);
}

#[test]
fn rejects_bad_shapes_and_rates() {
    assert!(matches!(
        QNetwork::new(0, 2, &config(0)),
        Err(MlError::EmptyShape { .. })
    ));
    let zero_width = QNetworkConfig {
        hidden: vec![8, 0],
        ..config(0)
    };
    assert_eq!(zero_width.validate(), Err(MlError::ZeroWidth { index: 1 }));
    let bad_lr = QNetworkConfig {
        optimizer: OptimizerConfig::Adam { lr: 0.0 },
        ..config(0)
    };
    assert!(matches!(bad_lr.validate(), Err(MlError::NotPositive { .. })));
}
