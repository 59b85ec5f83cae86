use pd_results::*;
use pd_sim::{PendulumModel, PendulumState, PhysicalParameters, Simulator};

fn manifest(run_id: &str, project_name: &str, timestamp: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        project_name: project_name.to_string(),
        timestamp: timestamp.to_string(),
        run_type: RunType::Interactive {
            dt_s: 0.01,
            t_end_s: 0.1,
            steps: 10,
            record_every: 1,
        },
        integrator: "DormandPrince".to_string(),
        solver_version: "v1".to_string(),
    }
}

#[test]
fn save_and_load_run() {
    let temp_dir = std::env::temp_dir().join("pd_results_test");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();

    let model = PendulumModel::new(PhysicalParameters::default());
    let mut sim = Simulator::new(model, PendulumState::new(1.0, 0.0)).unwrap();
    for _ in 0..10 {
        sim.advance(0.01).unwrap();
    }
    let records = records_from_samples(sim.history(), &model);
    assert_eq!(records.len(), 11);

    let manifest = manifest("test_run_123", "demo", "2026-02-25T12:00:00Z");
    store.save_run(&manifest, &records).unwrap();
    assert!(store.has_run("test_run_123"));

    let (loaded_manifest, loaded_records) = store.load_run("test_run_123").unwrap();
    assert_eq!(loaded_manifest, manifest);
    assert_eq!(loaded_records, records);
    assert_eq!(loaded_records[0].time_s, 0.0);
    assert_eq!(loaded_records[0].energy_j, model.mechanical_energy(&sim.initial_state()));
}

#[test]
fn list_runs_by_project() {
    let temp_dir = std::env::temp_dir().join("pd_results_test_list");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    store
        .save_run(&manifest("run1", "demo", "2026-02-25T12:00:00Z"), &[])
        .unwrap();
    store
        .save_run(&manifest("run2", "demo", "2026-02-25T13:00:00Z"), &[])
        .unwrap();
    store
        .save_run(&manifest("run3", "other", "2026-02-25T14:00:00Z"), &[])
        .unwrap();

    let runs = store.list_runs("demo").unwrap();
    let ids: Vec<&str> = runs.iter().map(|m| m.run_id.as_str()).collect();
    assert_eq!(ids, vec!["run2", "run1"]);

    store.delete_run("run2").unwrap();
    assert!(!store.has_run("run2"));
    assert_eq!(store.list_runs("demo").unwrap().len(), 1);
}

#[test]
fn missing_run_is_reported() {
    let temp_dir = std::env::temp_dir().join("pd_results_test_missing");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir).unwrap();
    assert!(matches!(
        store.load_manifest("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
    assert!(matches!(
        store.load_trajectory("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn store_for_project_lives_next_to_config() {
    let temp_dir = std::env::temp_dir().join("pd_results_test_project");
    let _ = std::fs::remove_dir_all(&temp_dir);
    std::fs::create_dir_all(&temp_dir).unwrap();

    let store = RunStore::for_project(&temp_dir.join("pendulum.yaml")).unwrap();
    assert_eq!(store.root_dir(), temp_dir.join(".pendulum").join("runs"));
    assert!(store.root_dir().is_dir());
}
