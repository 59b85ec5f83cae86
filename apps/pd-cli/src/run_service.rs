//! Run execution and caching.

use std::path::Path;

use pd_core::timing::{PerfStats, Timer};
use pd_project::Project;
use pd_results::{RunManifest, RunStore, RunType, TrajectoryRecord, records_from_samples};
use pd_sim::{
    CancelToken, SimProgress, Simulator, TrajectorySample, run_sim_with_progress, uniform_schedule,
};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Version stamped into run ids; bumping it invalidates the cache.
pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy)]
pub enum RunMode {
    /// Fixed `dt` frame loop from the project's `run` section.
    Interactive,
    /// Batch solve over `points` evenly spaced times in `[0, t_end]`,
    /// or the `dt` grid when `points` is `None`.
    Schedule { points: Option<usize> },
}

pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub mode: RunMode,
    pub use_cache: bool,
    pub cancel: Option<CancelToken>,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub project: Project,
    pub records: Vec<TrajectoryRecord>,
    pub loaded_from_cache: bool,
    pub perf: PerfStats,
}

/// Execute or load a run, streaming per-step progress for interactive runs.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    progress: Option<&mut dyn FnMut(SimProgress)>,
) -> AppResult<RunResponse> {
    let mut perf = PerfStats::default();

    let build = Timer::start("build");
    let project = pd_project::load_project(request.project_path)?;
    let sim = pd_project::build_simulator(&project)?;
    perf.build_time_s = build.elapsed_s();

    let schedule = match request.mode {
        RunMode::Interactive => None,
        RunMode::Schedule { points } => Some(build_schedule(&project, points)?),
    };
    let run_type = match &schedule {
        None => {
            let opts = pd_project::sim_options(&project);
            RunType::Interactive {
                dt_s: opts.dt,
                t_end_s: opts.t_end,
                steps: opts.step_count().min(opts.max_steps),
                record_every: opts.record_every,
            }
        }
        Some(points) => RunType::Schedule {
            points: points.len(),
            t_end_s: points.last().copied().unwrap_or(0.0),
        },
    };

    let run_id = pd_results::compute_run_id(&project, &run_type, SOLVER_VERSION);
    let store = RunStore::for_project(request.project_path)?;

    if request.use_cache && store.has_run(&run_id) {
        let load = Timer::start("load");
        let (manifest, records) = store.load_run(&run_id)?;
        perf.load_time_s = load.elapsed_s();
        debug!(run_id = %run_id, records = records.len(), "loaded cached run");

        return Ok(RunResponse {
            run_id,
            manifest,
            project,
            records,
            loaded_from_cache: true,
            perf,
        });
    }

    let solve = Timer::start("solve");
    let records = match &schedule {
        None => run_interactive(sim, &project, progress, &mut perf)?,
        Some(points) => run_schedule(&sim, points, request.cancel.as_ref(), &mut perf)?,
    };
    perf.solve_time_s = solve.elapsed_s();

    let manifest = RunManifest::new(
        run_id.clone(),
        &project.name,
        run_type,
        project.solver.name(),
        SOLVER_VERSION,
    );

    let save = Timer::start("save");
    store.save_run(&manifest, &records)?;
    perf.save_time_s = save.elapsed_s();
    info!(run_id = %run_id, records = records.len(), "run saved");

    Ok(RunResponse {
        run_id,
        manifest,
        project,
        records,
        loaded_from_cache: false,
        perf,
    })
}

fn build_schedule(project: &Project, points: Option<usize>) -> AppResult<Vec<f64>> {
    match points {
        None => Ok(uniform_schedule(project.run.dt_s, project.run.t_end_s)?),
        Some(n) if n < 2 => Err(AppError::InvalidInput(format!(
            "a schedule needs at least 2 points, got {}",
            n
        ))),
        Some(n) => {
            let t_end = project.run.t_end_s;
            let last = (n - 1) as f64;
            Ok((0..n).map(|i| t_end * i as f64 / last).collect())
        }
    }
}

fn run_interactive(
    mut sim: Simulator,
    project: &Project,
    progress: Option<&mut dyn FnMut(SimProgress)>,
    perf: &mut PerfStats,
) -> AppResult<Vec<TrajectoryRecord>> {
    let opts = pd_project::sim_options(project);
    let record = run_sim_with_progress(&mut sim, &opts, progress)?;

    perf.steps = opts.step_count().min(opts.max_steps);
    perf.rhs_evals = record.stats.rhs_evals;
    perf.rejected_steps = record.stats.rejected;

    let samples: Vec<TrajectorySample> = record
        .t
        .iter()
        .zip(&record.x)
        .map(|(&t, &x)| TrajectorySample::new(t, x))
        .collect();
    Ok(records_from_samples(&samples, sim.model()))
}

fn run_schedule(
    sim: &Simulator,
    points: &[f64],
    cancel: Option<&CancelToken>,
    perf: &mut PerfStats,
) -> AppResult<Vec<TrajectoryRecord>> {
    let trajectory = match cancel {
        Some(token) => sim.solve_over_schedule_cancellable(points, token)?,
        None => sim.solve_over_schedule(points)?,
    };

    let stats = trajectory.stats();
    perf.steps = stats.accepted;
    perf.rhs_evals = stats.rhs_evals;
    perf.rejected_steps = stats.rejected;

    Ok(records_from_samples(&trajectory, sim.model()))
}

/// Cached runs for the project at `project_path`.
pub fn list_runs(project_path: &Path) -> AppResult<Vec<RunManifest>> {
    let project = pd_project::load_project(project_path)?;
    let store = RunStore::for_project(project_path)?;
    Ok(store.list_runs(&project.name)?)
}

pub fn load_run(
    project_path: &Path,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TrajectoryRecord>)> {
    let store = RunStore::for_project(project_path)?;
    Ok(store.load_run(run_id)?)
}
