//! Damped physical pendulum dynamics and time integration.
//!
//! Provides:
//! - Physical parameters and the rigid-rod equation of motion with linear and
//!   quadratic drag
//! - Model-agnostic integrators (adaptive Dormand-Prince 5(4), fixed-step RK4)
//! - A stateful simulator for per-frame stepping and batch schedules
//! - Geometry projection for renderers
//! - A batch runner with decimated recording and progress reporting

pub mod cancel;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod model;
pub mod params;
pub mod pendulum;
pub mod sim;
pub mod simulator;
pub mod state;

// Re-exports for public API
pub use cancel::CancelToken;
pub use error::{SimError, SimResult};
pub use geometry::Projection;
pub use integrator::{DormandPrince, Integrator, IntegratorType, RK4, StepOutcome, StepStats};
pub use model::TransientModel;
pub use params::PhysicalParameters;
pub use pendulum::PendulumModel;
pub use sim::{SimOptions, SimProgress, SimRecord, run_sim, run_sim_with_progress, uniform_schedule};
pub use simulator::{Simulator, SimulatorOptions};
pub use state::{PendulumState, Trajectory, TrajectorySample};
