//! Pendulum state and time-stamped trajectories.

use pd_core::units::{deg_to_rad, rad_to_deg};

use crate::integrator::StepStats;

/// Angular state of the pendulum at one instant.
///
/// `theta` is measured from the downward vertical and is never wrapped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PendulumState {
    /// Angle (rad)
    pub theta: f64,
    /// Angular velocity (rad/s)
    pub omega: f64,
}

impl PendulumState {
    pub fn new(theta: f64, omega: f64) -> Self {
        Self { theta, omega }
    }

    /// Build a state from degrees and degrees per second.
    pub fn from_degrees(theta_deg: f64, omega_deg_s: f64) -> Self {
        Self {
            theta: deg_to_rad(theta_deg),
            omega: deg_to_rad(omega_deg_s),
        }
    }

    /// `(theta_deg, omega_deg_s)` for display.
    pub fn to_degrees(&self) -> (f64, f64) {
        (rad_to_deg(self.theta), rad_to_deg(self.omega))
    }

    pub fn is_finite(&self) -> bool {
        self.theta.is_finite() && self.omega.is_finite()
    }
}

/// One `(time, theta, omega)` record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    /// Simulation time (s)
    pub time: f64,
    /// Angle (rad)
    pub theta: f64,
    /// Angular velocity (rad/s)
    pub omega: f64,
}

impl TrajectorySample {
    pub fn new(time: f64, state: PendulumState) -> Self {
        Self {
            time,
            theta: state.theta,
            omega: state.omega,
        }
    }

    pub fn state(&self) -> PendulumState {
        PendulumState::new(self.theta, self.omega)
    }
}

/// Result of a batch solve: one sample per requested time point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
    stats: StepStats,
}

impl Trajectory {
    pub(crate) fn new(samples: Vec<TrajectorySample>, stats: StepStats) -> Self {
        Self { samples, stats }
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<TrajectorySample> {
        self.samples
    }

    /// Solver work summed over every segment of the schedule.
    pub fn stats(&self) -> StepStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrajectorySample> {
        self.samples.iter()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn thetas(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.theta).collect()
    }

    pub fn omegas(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.omega).collect()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectorySample;
    type IntoIter = std::slice::Iter<'a, TrajectorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
