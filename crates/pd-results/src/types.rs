//! Result data types.

use pd_sim::{PendulumModel, TrajectorySample};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub project_name: String,
    pub timestamp: String,
    pub run_type: RunType,
    pub integrator: String,
    pub solver_version: String,
}

impl RunManifest {
    /// Manifest stamped with the current UTC time.
    pub fn new(
        run_id: RunId,
        project_name: &str,
        run_type: RunType,
        integrator: &str,
        solver_version: &str,
    ) -> Self {
        Self {
            run_id,
            project_name: project_name.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            run_type,
            integrator: integrator.to_string(),
            solver_version: solver_version.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunType {
    /// Repeated fixed-dt `advance` calls, as a frame loop would drive it.
    Interactive {
        dt_s: f64,
        t_end_s: f64,
        steps: usize,
        record_every: usize,
    },
    /// One batch solve over a uniform schedule.
    Schedule { points: usize, t_end_s: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrajectoryRecord {
    pub time_s: f64,
    pub theta_rad: f64,
    pub omega_rad_s: f64,
    pub energy_j: f64,
}

impl TrajectoryRecord {
    pub fn from_sample(sample: &TrajectorySample, model: &PendulumModel) -> Self {
        let state = sample.state();
        Self {
            time_s: sample.time,
            theta_rad: sample.theta,
            omega_rad_s: sample.omega,
            energy_j: model.mechanical_energy(&state),
        }
    }
}

/// Convert simulator samples, attaching mechanical energy to each.
pub fn records_from_samples<'a>(
    samples: impl IntoIterator<Item = &'a TrajectorySample>,
    model: &PendulumModel,
) -> Vec<TrajectoryRecord> {
    samples
        .into_iter()
        .map(|s| TrajectoryRecord::from_sample(s, model))
        .collect()
}
