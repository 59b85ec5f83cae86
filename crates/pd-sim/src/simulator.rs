//! Stateful pendulum simulator.

use tracing::{trace, warn};

use crate::cancel::CancelToken;
use crate::error::{SimError, SimResult};
use crate::geometry::Projection;
use crate::integrator::{Integrator, IntegratorType, StepStats};
use crate::pendulum::PendulumModel;
use crate::state::{PendulumState, Trajectory, TrajectorySample};

/// Options fixed at simulator construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulatorOptions {
    /// Integrator used by both `advance` and batch schedules (default: Dormand-Prince)
    pub integrator: IntegratorType,
    /// Append one history sample per accepted `advance` (default: true)
    pub record_history: bool,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            integrator: IntegratorType::default(),
            record_history: true,
        }
    }
}

/// Owns the pendulum state and simulation clock.
///
/// The only mutating operations are [`advance`](Self::advance) and
/// [`reset`](Self::reset). A failed `advance` leaves state, clock and
/// history exactly as they were, so a caller may retry with a smaller `dt`.
#[derive(Clone, Debug)]
pub struct Simulator {
    model: PendulumModel,
    options: SimulatorOptions,
    initial: PendulumState,
    state: PendulumState,
    time_elapsed: f64,
    history: Vec<TrajectorySample>,
    last_stats: StepStats,
}

impl Simulator {
    /// Create a simulator with default options.
    ///
    /// # Errors
    /// `SimError::InvalidConfig` if the initial state is not finite.
    pub fn new(model: PendulumModel, initial: PendulumState) -> SimResult<Self> {
        Self::with_options(model, initial, SimulatorOptions::default())
    }

    /// Create a simulator with explicit integrator and history settings.
    pub fn with_options(
        model: PendulumModel,
        initial: PendulumState,
        options: SimulatorOptions,
    ) -> SimResult<Self> {
        if !initial.is_finite() {
            return Err(SimError::InvalidConfig {
                what: format!(
                    "initial state must be finite, got theta={} omega={}",
                    initial.theta, initial.omega
                ),
            });
        }
        options.integrator.validate()?;

        let history = if options.record_history {
            vec![TrajectorySample::new(0.0, initial)]
        } else {
            Vec::new()
        };

        Ok(Self {
            model,
            options,
            initial,
            state: initial,
            time_elapsed: 0.0,
            history,
            last_stats: StepStats::default(),
        })
    }

    /// Advance the state by `dt` seconds of simulated time.
    ///
    /// # Errors
    /// - `SimError::InvalidArg` if `dt` is not finite and positive
    /// - an integration failure from the solver; nothing is modified
    pub fn advance(&mut self, dt: f64) -> SimResult<PendulumState> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be finite and positive",
            });
        }

        let outcome = self
            .options
            .integrator
            .step(&self.model, self.time_elapsed, &self.state, dt)
            .inspect_err(|e| {
                warn!(t = self.time_elapsed, dt, error = %e, "pendulum step failed");
            })?;

        self.state = outcome.state;
        self.time_elapsed += dt;
        self.last_stats = outcome.stats;
        if self.options.record_history {
            self.history
                .push(TrajectorySample::new(self.time_elapsed, self.state));
        }

        trace!(
            t = self.time_elapsed,
            theta = self.state.theta,
            omega = self.state.omega,
            substeps = outcome.stats.accepted,
            rejected = outcome.stats.rejected,
            "advanced pendulum"
        );

        Ok(self.state)
    }

    /// Integrate from the initial state through a schedule of absolute times.
    ///
    /// `time_points` must start at `0.0` and be strictly increasing. The
    /// returned trajectory has one sample per point, the first being
    /// `(0, initial_state)`. Independent of any previous `advance` calls; the
    /// simulator itself is not modified.
    pub fn solve_over_schedule(&self, time_points: &[f64]) -> SimResult<Trajectory> {
        self.solve_schedule(0.0, self.initial, time_points, None)
    }

    /// Like [`solve_over_schedule`](Self::solve_over_schedule), checking
    /// `cancel` before each segment.
    ///
    /// # Errors
    /// `SimError::Cancelled` with the number of points already solved.
    pub fn solve_over_schedule_cancellable(
        &self,
        time_points: &[f64],
        cancel: &CancelToken,
    ) -> SimResult<Trajectory> {
        self.solve_schedule(0.0, self.initial, time_points, Some(cancel))
    }

    /// Look ahead from the current state without committing anything.
    ///
    /// `time_points` are offsets from the current clock (starting at `0.0`);
    /// samples are stamped with `elapsed_time() + t_i`.
    pub fn continue_over_schedule(&self, time_points: &[f64]) -> SimResult<Trajectory> {
        self.solve_schedule(self.time_elapsed, self.state, time_points, None)
    }

    fn solve_schedule(
        &self,
        t0: f64,
        start: PendulumState,
        time_points: &[f64],
        cancel: Option<&CancelToken>,
    ) -> SimResult<Trajectory> {
        validate_schedule(time_points)?;

        let mut state = start;
        let mut stats = StepStats::default();
        let mut samples = Vec::with_capacity(time_points.len());
        samples.push(TrajectorySample::new(t0, state));

        for window in time_points.windows(2) {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(SimError::Cancelled {
                    completed: samples.len(),
                    total: time_points.len(),
                });
            }

            let (from, to) = (window[0], window[1]);
            let outcome = self
                .options
                .integrator
                .step(&self.model, t0 + from, &state, to - from)?;
            state = outcome.state;
            stats.merge(outcome.stats);
            samples.push(TrajectorySample::new(t0 + to, state));
        }

        Ok(Trajectory::new(samples, stats))
    }

    /// Return to the initial state with a zeroed clock and fresh history.
    pub fn reset(&mut self) {
        self.state = self.initial;
        self.time_elapsed = 0.0;
        self.last_stats = StepStats::default();
        self.history.clear();
        if self.options.record_history {
            self.history.push(TrajectorySample::new(0.0, self.initial));
        }
    }

    pub fn current_angle(&self) -> f64 {
        self.state.theta
    }

    pub fn current_angular_velocity(&self) -> f64 {
        self.state.omega
    }

    pub fn elapsed_time(&self) -> f64 {
        self.time_elapsed
    }

    pub fn state(&self) -> PendulumState {
        self.state
    }

    pub fn initial_state(&self) -> PendulumState {
        self.initial
    }

    pub fn model(&self) -> &PendulumModel {
        &self.model
    }

    pub fn options(&self) -> &SimulatorOptions {
        &self.options
    }

    /// One sample at construction plus one per accepted `advance`.
    pub fn history(&self) -> &[TrajectorySample] {
        &self.history
    }

    /// Solver work done by the most recent successful `advance`.
    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    /// Current mechanical energy (J).
    pub fn energy(&self) -> f64 {
        self.model.mechanical_energy(&self.state)
    }

    /// Bob position in metres relative to `(origin_x, origin_y)`.
    pub fn position(&self, origin_x: f64, origin_y: f64) -> (f64, f64) {
        self.project(&Projection::new(origin_x, origin_y, 1.0))
    }

    /// Bob position under an arbitrary projection.
    pub fn project(&self, projection: &Projection) -> (f64, f64) {
        projection.bob(self.model.params().length(), self.state.theta)
    }
}

fn validate_schedule(time_points: &[f64]) -> SimResult<()> {
    match time_points.first() {
        None => {
            return Err(SimError::InvalidArg {
                what: "schedule must contain at least one time point",
            });
        }
        Some(&first) if first != 0.0 => {
            return Err(SimError::InvalidArg {
                what: "schedule must start at 0",
            });
        }
        Some(_) => {}
    }
    if time_points.iter().any(|t| !t.is_finite()) {
        return Err(SimError::InvalidArg {
            what: "schedule time points must be finite",
        });
    }
    if time_points.windows(2).any(|w| w[1] <= w[0]) {
        return Err(SimError::InvalidArg {
            what: "schedule must be strictly increasing",
        });
    }
    Ok(())
}
