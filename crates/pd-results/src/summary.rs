//! Summaries of stored trajectories.

use crate::types::TrajectoryRecord;
use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub max_abs_theta_rad: f64,
    pub max_abs_omega_rad_s: f64,
    pub initial_energy_j: f64,
    pub final_energy_j: f64,
}

impl RunSummary {
    /// Fraction of the starting energy dissipated by the end of the run.
    pub fn energy_loss_fraction(&self) -> f64 {
        if self.initial_energy_j > 0.0 {
            (self.initial_energy_j - self.final_energy_j) / self.initial_energy_j
        } else {
            0.0
        }
    }
}

pub fn summarize(run_id: &str, records: &[TrajectoryRecord]) -> ResultsResult<RunSummary> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Err(ResultsError::EmptyRun {
            run_id: run_id.to_string(),
        });
    };

    let max_abs_theta_rad = records.iter().map(|r| r.theta_rad.abs()).fold(0.0, f64::max);
    let max_abs_omega_rad_s = records
        .iter()
        .map(|r| r.omega_rad_s.abs())
        .fold(0.0, f64::max);

    Ok(RunSummary {
        time_range: (first.time_s, last.time_s),
        record_count: records.len(),
        max_abs_theta_rad,
        max_abs_omega_rad_s,
        initial_energy_j: first.energy_j,
        final_energy_j: last.energy_j,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(time_s: f64, theta_rad: f64, omega_rad_s: f64, energy_j: f64) -> TrajectoryRecord {
        TrajectoryRecord {
            time_s,
            theta_rad,
            omega_rad_s,
            energy_j,
        }
    }

    #[test]
    fn summary_of_records() {
        let records = [
            rec(0.0, 1.0, 0.0, 4.0),
            rec(0.5, -0.2, -3.0, 3.0),
            rec(1.0, -0.8, 0.5, 1.0),
        ];
        let s = summarize("r", &records).unwrap();
        assert_eq!(s.time_range, (0.0, 1.0));
        assert_eq!(s.record_count, 3);
        assert_eq!(s.max_abs_theta_rad, 1.0);
        assert_eq!(s.max_abs_omega_rad_s, 3.0);
        assert!((s.energy_loss_fraction() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn empty_run_is_an_error() {
        assert!(matches!(
            summarize("r", &[]),
            Err(ResultsError::EmptyRun { .. })
        ));
    }
}
