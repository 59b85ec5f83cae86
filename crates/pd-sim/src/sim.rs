//! Batch runner and result recording.

use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::integrator::StepStats;
use crate::simulator::Simulator;
use crate::state::PendulumState;

/// Options for fixed-dt simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Physical time step per `advance` (seconds)
    pub dt: f64,
    /// Duration to simulate from the simulator's current clock (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 30.0,
            t_end: 10.0,
            max_steps: 1_000_000,
            record_every: 1,
        }
    }
}

impl SimOptions {
    /// Number of `advance` calls needed to cover `t_end`, before `max_steps`.
    pub fn step_count(&self) -> usize {
        // Guard against 10.0 / 0.01 landing a hair above 1000
        (self.t_end / self.dt - 1e-9).ceil().max(0.0) as usize
    }

    fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.t_end.is_finite() && self.t_end >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// Progress snapshot emitted after each step.
#[derive(Clone, Copy, Debug)]
pub struct SimProgress {
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub step: usize,
}

/// Record of simulation results.
#[derive(Clone, Debug, Default)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<PendulumState>,
    /// Solver work summed over the run
    pub stats: StepStats,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Drive `sim` with repeated `advance(dt)` calls.
pub fn run_sim(sim: &mut Simulator, opts: &SimOptions) -> SimResult<SimRecord> {
    run_sim_with_progress(sim, opts, None)
}

/// Drive `sim` with repeated `advance(dt)` calls, reporting progress.
///
/// The initial and final states are always recorded; intermediate states
/// every `record_every` steps. On error the simulator keeps the state of the
/// last successful step.
pub fn run_sim_with_progress(
    sim: &mut Simulator,
    opts: &SimOptions,
    mut progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<SimRecord> {
    opts.validate()?;

    let steps = opts.step_count().min(opts.max_steps);
    let t_start = sim.elapsed_time();
    debug!(
        dt = opts.dt,
        t_end = opts.t_end,
        steps,
        integrator = sim.options().integrator.name(),
        "starting pendulum run"
    );

    let mut record = SimRecord {
        t: vec![t_start],
        x: vec![sim.state()],
        stats: StepStats::default(),
    };

    for step in 1..=steps {
        let state = sim.advance(opts.dt)?;
        record.stats.merge(sim.last_stats());

        // Record if decimation matches
        if step % opts.record_every == 0 || step == steps {
            record.t.push(sim.elapsed_time());
            record.x.push(state);
        }

        if let Some(cb) = progress.as_mut() {
            let sim_time_s = sim.elapsed_time() - t_start;
            cb(SimProgress {
                sim_time_s,
                t_end_s: opts.t_end,
                fraction_complete: (step as f64 / steps as f64).min(1.0),
                step,
            });
        }
    }

    debug!(
        steps,
        records = record.len(),
        rhs_evals = record.stats.rhs_evals,
        rejected = record.stats.rejected,
        "pendulum run finished"
    );

    Ok(record)
}

/// Uniform batch schedule `0, dt, 2·dt, …` up to and including `t_end`
/// when it lies on the grid.
///
/// Points are computed as `i·dt`, not by accumulation.
pub fn uniform_schedule(dt: f64, t_end: f64) -> SimResult<Vec<f64>> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SimError::InvalidArg {
            what: "dt must be positive",
        });
    }
    if !(t_end.is_finite() && t_end >= 0.0) {
        return Err(SimError::InvalidArg {
            what: "t_end must be non-negative",
        });
    }
    let n = (t_end / dt + 1e-9).floor() as usize;
    Ok((0..=n).map(|i| i as f64 * dt).collect())
}
