//! Project validation logic.

use crate::schema::{DisplayDef, InitialStateDef, PendulumDef, Project, RunDef};

/// Newest schema version this crate reads.
pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid solver settings: {0}")]
    Solver(String),

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn require_positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite and positive"))
    }
}

fn require_non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite and non-negative"))
    }
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    if project.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }

    validate_pendulum(&project.pendulum)?;
    validate_initial(&project.initial)?;
    validate_run(&project.run)?;
    validate_display(&project.display)?;
    project
        .solver
        .validate()
        .map_err(|e| ValidationError::Solver(e.to_string()))?;

    Ok(())
}

fn validate_pendulum(p: &PendulumDef) -> Result<(), ValidationError> {
    require_positive("pendulum.mass_kg", p.mass_kg)?;
    require_positive("pendulum.length_m", p.length_m)?;
    require_non_negative("pendulum.gravity_mps2", p.gravity_mps2)?;
    require_non_negative("pendulum.linear_drag", p.linear_drag)?;
    require_non_negative("pendulum.quadratic_drag", p.quadratic_drag)?;
    Ok(())
}

fn validate_initial(init: &InitialStateDef) -> Result<(), ValidationError> {
    if !init.theta.is_finite() {
        return Err(invalid("initial.theta", init.theta, "must be finite"));
    }
    if !init.omega.is_finite() {
        return Err(invalid("initial.omega", init.omega, "must be finite"));
    }
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    require_positive("run.dt_s", run.dt_s)?;
    require_non_negative("run.t_end_s", run.t_end_s)?;
    if run.record_every == 0 {
        return Err(invalid("run.record_every", 0, "must be at least 1"));
    }
    Ok(())
}

fn validate_display(display: &DisplayDef) -> Result<(), ValidationError> {
    if display.origin.iter().any(|v| !v.is_finite()) {
        return Err(invalid(
            "display.origin",
            format!("{:?}", display.origin),
            "must be finite",
        ));
    }
    require_positive("display.scale", display.scale)
}
