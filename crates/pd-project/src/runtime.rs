//! Turning a validated project into simulator objects.

use pd_sim::{
    PendulumModel, PendulumState, PhysicalParameters, Projection, SimOptions, Simulator,
    SimulatorOptions,
};

use crate::ProjectResult;
use crate::schema::{AngleUnit, Project};
use crate::validate::validate_project;

pub fn build_parameters(project: &Project) -> ProjectResult<PhysicalParameters> {
    let p = &project.pendulum;
    Ok(PhysicalParameters::new(
        p.mass_kg,
        p.length_m,
        p.gravity_mps2,
        p.linear_drag,
        p.quadratic_drag,
    )?)
}

/// Initial state in radians, converting from degrees when the file says so.
pub fn initial_state(project: &Project) -> PendulumState {
    let init = &project.initial;
    match init.unit {
        AngleUnit::Radians => PendulumState::new(init.theta, init.omega),
        AngleUnit::Degrees => PendulumState::from_degrees(init.theta, init.omega),
    }
}

pub fn sim_options(project: &Project) -> SimOptions {
    SimOptions {
        dt: project.run.dt_s,
        t_end: project.run.t_end_s,
        record_every: project.run.record_every,
        ..SimOptions::default()
    }
}

pub fn projection(project: &Project) -> Projection {
    let [x, y] = project.display.origin;
    Projection::new(x, y, project.display.scale)
}

/// Validate and build a ready-to-step simulator.
pub fn build_simulator(project: &Project) -> ProjectResult<Simulator> {
    validate_project(project)?;
    let model = PendulumModel::new(build_parameters(project)?);
    let options = SimulatorOptions {
        integrator: project.solver,
        record_history: true,
    };
    Ok(Simulator::with_options(
        model,
        initial_state(project),
        options,
    )?)
}
