//! Integration test: damped pendulum behaviour.
//!
//! Scenario: 1 kg, 1 m rod, g = 9.81, c1 = c2 = 0.1, released at π/3.
//! Checks damping of the oscillation, monotone energy decay, determinism,
//! and construction/argument errors.

use pd_sim::{
    DormandPrince, IntegratorType, PendulumModel, PendulumState, PhysicalParameters, RK4,
    SimError, Simulator, SimulatorOptions,
};
use std::f64::consts::FRAC_PI_3;

fn damped_model() -> PendulumModel {
    PendulumModel::new(PhysicalParameters::new(1.0, 1.0, 9.81, 0.1, 0.1).unwrap())
}

fn damped_sim() -> Simulator {
    Simulator::new(damped_model(), PendulumState::new(FRAC_PI_3, 0.0)).unwrap()
}

#[test]
fn damping_reduces_amplitude_over_ten_seconds() {
    let mut sim = damped_sim();
    let dt = 0.01;

    let mut peak_omega_first_2s: f64 = 0.0;
    for step in 1..=1000 {
        sim.advance(dt).expect("step should succeed");
        if step <= 200 {
            peak_omega_first_2s = peak_omega_first_2s.max(sim.current_angular_velocity().abs());
        }
    }

    assert!((sim.elapsed_time() - 10.0).abs() < 1e-9);
    assert!(
        sim.current_angle().abs() < FRAC_PI_3,
        "theta(10) = {} should be closer to 0 than π/3",
        sim.current_angle()
    );
    assert!(
        sim.current_angular_velocity().abs() < peak_omega_first_2s,
        "|omega(10)| = {} should be below early peak {}",
        sim.current_angular_velocity().abs(),
        peak_omega_first_2s
    );
    assert_eq!(sim.history().len(), 1001);
}

#[test]
fn energy_never_increases_under_drag() {
    for (c1, c2) in [(0.1, 0.0), (0.0, 0.1), (0.1, 0.1)] {
        let model = PendulumModel::new(PhysicalParameters::new(1.0, 1.0, 9.81, c1, c2).unwrap());
        let mut sim = Simulator::new(model, PendulumState::new(FRAC_PI_3, 1.0)).unwrap();

        let e0 = sim.energy();
        let mut prev = e0;
        for _ in 0..500 {
            sim.advance(0.01).unwrap();
            let e = sim.energy();
            assert!(
                e <= prev + 1e-6,
                "energy increased from {prev} to {e} (c1={c1}, c2={c2})"
            );
            prev = e;
        }
        assert!(prev < 0.9 * e0, "energy should decay noticeably (c1={c1}, c2={c2})");
    }
}

#[test]
fn identical_inputs_give_identical_results() {
    for integrator in [
        IntegratorType::DormandPrince(DormandPrince::default()),
        IntegratorType::RK4(RK4::default()),
    ] {
        let options = SimulatorOptions {
            integrator,
            record_history: true,
        };
        let start = PendulumState::new(1.2, -0.4);
        let mut a = Simulator::with_options(damped_model(), start, options).unwrap();
        let mut b = Simulator::with_options(damped_model(), start, options).unwrap();

        for _ in 0..50 {
            let sa = a.advance(1.0 / 30.0).unwrap();
            let sb = b.advance(1.0 / 30.0).unwrap();
            assert!((sa.theta - sb.theta).abs() <= 1e-9);
            assert!((sa.omega - sb.omega).abs() <= 1e-9);
        }
        assert_eq!(a.history(), b.history());
    }
}

#[test]
fn zero_dt_is_invalid_argument() {
    let mut sim = damped_sim();
    assert!(matches!(sim.advance(0.0), Err(SimError::InvalidArg { .. })));
}

#[test]
fn negative_mass_or_length_is_configuration_error() {
    assert!(matches!(
        PhysicalParameters::new(-1.0, 1.0, 9.81, 0.1, 0.1),
        Err(SimError::InvalidConfig { .. })
    ));
    assert!(matches!(
        PhysicalParameters::new(1.0, -1.0, 9.81, 0.1, 0.1),
        Err(SimError::InvalidConfig { .. })
    ));
}

#[test]
fn retry_with_smaller_dt_after_failure() {
    let options = SimulatorOptions {
        integrator: IntegratorType::DormandPrince(DormandPrince {
            max_steps: 3,
            ..DormandPrince::default()
        }),
        record_history: true,
    };
    let mut sim =
        Simulator::with_options(damped_model(), PendulumState::new(FRAC_PI_3, 0.0), options)
            .unwrap();

    let err = sim.advance(2.0).unwrap_err();
    assert!(err.is_integration_failure());
    assert_eq!(sim.elapsed_time(), 0.0);
    assert_eq!(sim.state(), PendulumState::new(FRAC_PI_3, 0.0));

    // Caller-driven retry: smaller dt succeeds from the untouched state
    sim.advance(0.001).expect("small step should succeed");
    assert!((sim.elapsed_time() - 0.001).abs() < 1e-15);
}

#[test]
fn quadratic_drag_damps_both_swing_directions() {
    let model = PendulumModel::new(PhysicalParameters::new(1.0, 1.0, 0.0, 0.0, 0.5).unwrap());

    // With gravity off the only torque is drag: |omega| must shrink whatever its sign
    for omega0 in [4.0, -4.0] {
        let mut sim = Simulator::new(model, PendulumState::new(0.0, omega0)).unwrap();
        sim.advance(0.5).unwrap();
        let omega = sim.current_angular_velocity();
        assert!(omega.abs() < omega0.abs());
        assert_eq!(omega.signum(), omega0.signum());
        // dω/dt = -c2·ω|ω| has the closed form ω0 / (1 + c2·|ω0|·t)
        let exact = omega0 / (1.0 + 0.5 * omega0.abs() * 0.5);
        assert!((omega - exact).abs() < 1e-7, "omega={omega} exact={exact}");
    }
}
