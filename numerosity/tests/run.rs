use numerosity::{app, ExperimentConfig};
use rl::MemorySink;
use std::path::Path;

fn tiny() -> ExperimentConfig {
    let mut config = ExperimentConfig {
        min_cl_objects: 1,
        eval_episodes: 10,
        ..ExperimentConfig::default()
    };
    config.env.obs_dim = 3;
    config.env.max_object_size = 1;
    config.env.n_episodes_per_phase = 20;
    config.trainer.batch_size = 8;
    config.network.hidden = vec![8];
    config
}

#[test]
fn tiny_experiment_runs_every_phase() {
    let mut sink = MemorySink::new();
    let summary = app::run(&tiny(), &mut sink).unwrap();

    assert_eq!(summary.phases.len(), 3);
    assert_eq!(summary.global_step, 60);
    assert_eq!(summary.evaluation.episodes, 10);
    assert_eq!(sink.series("episode/length").len(), 60);
    // optimisation starts once the memory holds a batch
    assert_eq!(sink.series("loss/train").len(), 60 - 7);
    assert!(sink.series("loss/train").iter().all(|(_, l)| l.is_finite()));
}

#[test]
fn same_seed_same_run() {
    let mut config = tiny();
    config.set_seed(11);
    let mut first = MemorySink::new();
    let mut second = MemorySink::new();
    app::run(&config, &mut first).unwrap();
    app::run(&config, &mut second).unwrap();
    assert_eq!(first.records(), second.records());
}

#[test]
fn bundled_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../configs/quick.json");
    let config = ExperimentConfig::load(&path).unwrap();
    assert_eq!(config.min_cl_objects, 1);
    assert_eq!(config.env.obs_dim, 4);
    assert_eq!(config.reward.time_penalty, None);
    assert_eq!(config.curriculum().len(), 3);
}

#[test]
fn missing_file_reports_path() {
    let err = ExperimentConfig::load(Path::new("does/not/exist.json")).unwrap_err();
    assert!(format!("{err:#}").contains("does/not/exist.json"));
}
