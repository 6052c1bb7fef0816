use gridworld::{
    Action, CanvasMode, Direction, EnvConfig, EnvError, Environment, Finger, Layer, RewardConfig,
    SelectionPolicy, VisitHistory,
};

fn config(dim: usize, max_episode_length: usize) -> EnvConfig {
    EnvConfig {
        obs_dim: dim,
        max_episode_length,
        random_finger_position: false,
        ..EnvConfig::default()
    }
}

fn quiet_rewards() -> RewardConfig {
    RewardConfig {
        bad_label_punishment: false,
        curiosity: false,
        time_penalty: None,
        ..RewardConfig::default()
    }
}

fn code(env: &Environment, action: Action) -> usize {
    env.actions().code(action).unwrap()
}

#[test]
fn finger_stays_inside_grid() {
    let mut env = Environment::new(config(4, 100), quiet_rewards(), 1).unwrap();
    let mut visits = VisitHistory::new();
    env.reset();
    let left = code(
        &env,
        Action::Move {
            finger: Finger::Scene,
            dir: Direction::Left,
        },
    );
    for _ in 0..5 {
        env.apply(left, &mut visits).unwrap();
        assert_eq!(env.scene_finger().position(), (0, 0));
    }
    let down = code(
        &env,
        Action::Move {
            finger: Finger::Scene,
            dir: Direction::Down,
        },
    );
    for _ in 0..10 {
        env.apply(down, &mut visits).unwrap();
    }
    assert_eq!(env.scene_finger().position(), (0, 3));
    assert_eq!(env.state().layer(Layer::SceneFinger)[3], 1.0);
}

#[test]
fn mark_writes_under_repr_finger() {
    let mut env = Environment::new(config(3, 100), quiet_rewards(), 2).unwrap();
    let mut visits = VisitHistory::new();
    env.reset();
    let right = code(
        &env,
        Action::Move {
            finger: Finger::Repr,
            dir: Direction::Right,
        },
    );
    let mark = code(&env, Action::MarkCanvas);
    env.apply(right, &mut visits).unwrap();
    env.apply(mark, &mut visits).unwrap();
    env.apply(mark, &mut visits).unwrap();

    assert_eq!(env.repr_finger().position(), (1, 0));
    assert!(env.canvas().canvas().get(1, 0));
    assert_eq!(env.canvas().canvas().count_ones(), 1);
    assert_eq!(env.state().layer(Layer::Canvas)[3], 1.0);
    // the scene finger did not move
    assert_eq!(env.scene_finger().position(), (0, 0));
}

#[test]
fn toggle_canvas_mode_flips() {
    let cfg = EnvConfig {
        canvas_mode: CanvasMode::Toggle,
        ..config(3, 100)
    };
    let mut env = Environment::new(cfg, quiet_rewards(), 2).unwrap();
    let mut visits = VisitHistory::new();
    env.reset();
    let mark = code(&env, Action::MarkCanvas);
    env.apply(mark, &mut visits).unwrap();
    env.apply(mark, &mut visits).unwrap();
    assert_eq!(env.canvas().canvas().count_ones(), 0);
}

#[test]
fn correct_label_ends_episode() {
    let mut env = Environment::new(config(5, 50), quiet_rewards(), 3).unwrap();
    let mut visits = VisitHistory::new();
    env.reset();
    let label = env.label();
    let outcome = env
        .apply(code(&env, Action::SubmitLabel(label)), &mut visits)
        .unwrap();
    assert!(outcome.done);
    assert!(outcome.correct_label);
    assert!(outcome.next_state.is_none());
    assert_eq!(outcome.reward, 1.0);
    assert!(env.first_correct_label());
    assert_eq!(
        env.apply(0, &mut visits).unwrap_err(),
        EnvError::EpisodeDone
    );

    env.reset();
    assert!(!env.is_done());
    assert!(!env.first_correct_label());
    assert_eq!(env.step_counter(), 0);
}

#[test]
fn wrong_label_continues_until_length_limit() {
    let rewards = RewardConfig {
        bad_label_punishment: true,
        ..quiet_rewards()
    };
    let cfg = EnvConfig {
        generate_random_nobj: false,
        max_object_size: 1,
        ..config(5, 3)
    };
    let mut env = Environment::new(cfg, rewards, 4).unwrap();
    let mut visits = VisitHistory::new();
    env.reset();
    assert_eq!(env.label(), 3);
    let wrong = code(&env, Action::SubmitLabel(1));

    let first = env.apply(wrong, &mut visits).unwrap();
    assert_eq!(first.reward, -0.5);
    assert!(!first.done);
    assert!(first.next_state.is_some());
    env.apply(wrong, &mut visits).unwrap();
    let last = env.apply(wrong, &mut visits).unwrap();
    assert!(last.done);
    assert!(!last.correct_label);
    assert_eq!(env.step_counter(), 3);
}

#[test]
fn greedy_step_picks_argmax() {
    let cfg = EnvConfig {
        exponential_decay: false,
        default_eps: 0.0,
        ..config(4, 10)
    };
    let mut env = Environment::new(cfg, quiet_rewards(), 5).unwrap();
    let mut visits = VisitHistory::new();
    env.reset();
    let mut q = vec![0.0; env.action_size()];
    let mark = code(&env, Action::MarkCanvas);
    q[mark] = 3.0;
    let outcome = env.step(&q, 0, &mut visits).unwrap();
    assert_eq!(outcome.action, mark);
    assert_eq!(outcome.decoded, Action::MarkCanvas);
}

#[test]
fn softmax_rejects_negative_temperature() {
    let cfg = EnvConfig {
        selection_policy: SelectionPolicy::Softmax,
        ..config(4, 10)
    };
    let mut env = Environment::new(cfg, quiet_rewards(), 6).unwrap();
    let mut visits = VisitHistory::new();
    env.reset();
    let q = vec![0.0; env.action_size()];
    assert!(matches!(
        env.step_with_exploration(&q, -1.0, &mut visits),
        Err(EnvError::Select(_))
    ));
    assert_eq!(env.step_counter(), 0);
}

#[test]
fn curiosity_counts_states_across_resets() {
    let rewards = RewardConfig {
        curiosity: true,
        ..quiet_rewards()
    };
    let cfg = EnvConfig {
        generate_random_nobj: false,
        random_object_size: false,
        max_object_size: 1,
        max_episode_objects: 1,
        ..config(1, 10)
    }
    .with_label_space(1);
    let mut env = Environment::new(cfg, rewards, 7).unwrap();
    let mut visits = VisitHistory::new();
    let left = code(
        &env,
        Action::Move {
            finger: Finger::Scene,
            dir: Direction::Left,
        },
    );

    // a 1x1 world has a single scene, so the pre-action state repeats exactly
    env.reset();
    let first = env.apply(left, &mut visits).unwrap();
    assert!((first.reward - 0.1).abs() < 1e-6);
    let second = env.apply(left, &mut visits).unwrap();
    assert!((second.reward - 0.4 / 1.4 * 0.1).abs() < 1e-6);
    env.reset();
    let third = env.apply(left, &mut visits).unwrap();
    assert!((third.reward - 0.4 / 2.4 * 0.1).abs() < 1e-6);
    assert_eq!(visits.len(), 1);
}

#[test]
fn state_tensor_has_four_layers() {
    let mut env = Environment::new(config(5, 10), quiet_rewards(), 8).unwrap();
    let state = env.reset();
    assert_eq!(state.shape(), [1, 4, 5, 5]);
    assert_eq!(env.obs_size(), 100);
    let scene_ones = state.layer(Layer::Scene).iter().filter(|&&v| v == 1.0).count();
    assert_eq!(scene_ones, env.scene().grid.count_ones());
    assert_eq!(state.layer(Layer::SceneFinger)[0], 1.0);
    assert_eq!(state.layer(Layer::ReprFinger)[0], 1.0);
    assert!(state.layer(Layer::Canvas).iter().all(|&v| v == 0.0));
    assert!(env.to_string().starts_with(&format!("label={}", env.label())));
}
