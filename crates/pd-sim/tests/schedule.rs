//! Integration test: batch schedules versus interactive stepping.

use pd_sim::{
    CancelToken, PendulumModel, PendulumState, PhysicalParameters, SimError, SimOptions,
    Simulator, run_sim, uniform_schedule,
};
use std::f64::consts::FRAC_PI_3;

fn sim() -> Simulator {
    let model = PendulumModel::new(PhysicalParameters::new(1.0, 1.0, 9.81, 0.1, 0.1).unwrap());
    Simulator::new(model, PendulumState::new(FRAC_PI_3, 0.0)).unwrap()
}

#[test]
fn two_advances_match_one_schedule_segment() {
    let (dt1, dt2) = (0.013, 0.021);

    let mut stepped = sim();
    stepped.advance(dt1).unwrap();
    stepped.advance(dt2).unwrap();

    let batch = sim().solve_over_schedule(&[0.0, dt1 + dt2]).unwrap();
    let end = batch.last().unwrap();

    assert!((end.theta - stepped.current_angle()).abs() < 1e-7);
    assert!((end.omega - stepped.current_angular_velocity()).abs() < 1e-7);
    assert!((end.time - stepped.elapsed_time()).abs() < 1e-12);
}

#[test]
fn batch_and_interactive_agree_over_two_seconds() {
    let dt = 0.01;
    let points = uniform_schedule(dt, 2.0).unwrap();
    let batch = sim().solve_over_schedule(&points).unwrap();
    assert_eq!(batch.len(), points.len());

    let mut interactive = sim();
    let record = run_sim(
        &mut interactive,
        &SimOptions {
            dt,
            t_end: 2.0,
            max_steps: 10_000,
            record_every: 1,
        },
    )
    .unwrap();
    assert_eq!(record.len(), batch.len());

    for (sample, state) in batch.iter().zip(&record.x) {
        assert!((sample.theta - state.theta).abs() < 1e-7, "t={}", sample.time);
        assert!((sample.omega - state.omega).abs() < 1e-7, "t={}", sample.time);
    }
}

#[test]
fn cancellation_between_points_from_another_thread() {
    let simulator = sim();
    let token = CancelToken::new();
    let remote = token.clone();

    let handle = std::thread::spawn(move || remote.cancel());
    handle.join().unwrap();

    let points = uniform_schedule(0.01, 100.0).unwrap();
    match simulator.solve_over_schedule_cancellable(&points, &token) {
        Err(SimError::Cancelled { completed, total }) => {
            assert_eq!(total, points.len());
            assert!(completed < total);
        }
        other => panic!("expected cancellation, got {other:?}"),
    }
}

#[test]
fn uncancelled_token_solves_whole_schedule() {
    let points = uniform_schedule(0.1, 1.0).unwrap();
    let traj = sim()
        .solve_over_schedule_cancellable(&points, &CancelToken::new())
        .unwrap();
    assert_eq!(traj.times(), points);
    assert!(traj.stats().accepted >= points.len() - 1);
}
