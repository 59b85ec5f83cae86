use std::path::Path;

use pd_project::AngleUnit;

#[test]
fn demos_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let demos = ["real_damping.yaml", "small_swing_rk4.yaml"];

    for name in demos {
        let path = root.join(name);
        let project = pd_project::load_yaml(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        pd_project::validate_project(&project)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
        pd_project::build_simulator(&project)
            .unwrap_or_else(|e| panic!("Failed to build {}: {}", name, e));
    }
}

#[test]
fn real_damping_demo_uses_degrees() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/real_damping.yaml");
    let project = pd_project::load_project(&path).unwrap();
    assert_eq!(project.initial.unit, AngleUnit::Degrees);

    let state = pd_project::initial_state(&project);
    assert!((state.theta - 60f64.to_radians()).abs() < 1e-12);
    assert!((state.omega - 100f64.to_radians()).abs() < 1e-12);
}

#[test]
fn omitted_fields_take_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/small_swing_rk4.yaml");
    let project = pd_project::load_yaml(&path).unwrap();
    assert_eq!(project.pendulum.gravity_mps2, 9.81);
    assert_eq!(project.initial.unit, AngleUnit::Radians);
    assert_eq!(project.solver.name(), "RK4");
}
