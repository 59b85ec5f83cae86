mod error;
mod overlay;
mod run_service;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use pd_core::timing::{PerfStats, enable_timing};
use pd_sim::{CancelToken, SimProgress};
use tracing_subscriber::EnvFilter;

use error::AppResult;
use run_service::{RunMode, RunRequest, RunResponse};

#[derive(Parser)]
#[command(name = "pd-cli")]
#[command(about = "Damped physical pendulum simulator", long_about = None)]
struct Cli {
    /// Print a wall-clock timing summary after runs
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a pendulum configuration file
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Step the pendulum frame by frame with the configured dt
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Print the overlay text for the first N recorded frames
        #[arg(long, default_value_t = 0)]
        frames: usize,
    },
    /// Solve over a uniform time schedule in one batch
    Solve {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Number of evenly spaced points in [0, t_end] (defaults to the dt grid)
        #[arg(long)]
        points: Option<usize>,
        /// Abandon the solve after this many wall-clock seconds
        #[arg(long)]
        timeout_s: Option<f64>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Output CSV file path (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List cached runs for a project
    Runs {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export the trajectory of a run as CSV
    ExportSeries {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.timing {
        enable_timing();
    }

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Run {
            project_path,
            no_cache,
            frames,
        } => cmd_run(&project_path, !no_cache, frames),
        Commands::Solve {
            project_path,
            points,
            timeout_s,
            no_cache,
            output,
        } => cmd_solve(&project_path, points, timeout_s, !no_cache, output.as_deref()),
        Commands::Runs { project_path } => cmd_runs(&project_path),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
        Commands::ExportSeries {
            project_path,
            run_id,
            output,
        } => cmd_export_series(&project_path, &run_id, output.as_deref()),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = pd_project::load_project(project_path)?;
    pd_project::build_simulator(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_run(project_path: &Path, use_cache: bool, frames: usize) -> AppResult<()> {
    println!("Running pendulum: {}", project_path.display());

    let request = RunRequest {
        project_path,
        mode: RunMode::Interactive,
        use_cache,
        cancel: None,
    };

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |p: SimProgress| {
            let emit_now = (p.fraction_complete - last_fraction).abs() >= 0.005
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&p);
                last_fraction = p.fraction_complete;
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    print_run_header(&response);

    if frames > 0 {
        let projection = pd_project::projection(&response.project);
        let length = response.project.pendulum.length_m;
        println!();
        for record in response.records.iter().take(frames) {
            println!("{}", overlay::frame_line(record, length, &projection));
        }
    }

    print_summary(&response.run_id, &response.records)?;
    print_timing_summary(&response.perf);
    Ok(())
}

fn cmd_solve(
    project_path: &Path,
    points: Option<usize>,
    timeout_s: Option<f64>,
    use_cache: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    println!("Solving schedule: {}", project_path.display());

    let cancel = CancelToken::new();
    if let Some(secs) = timeout_s {
        let duration = Duration::try_from_secs_f64(secs).map_err(|_| {
            error::AppError::InvalidInput(format!("invalid timeout: {}", secs))
        })?;
        let token = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(duration);
            token.cancel();
        });
    }

    let request = RunRequest {
        project_path,
        mode: RunMode::Schedule { points },
        use_cache,
        cancel: Some(cancel),
    };
    let response = run_service::ensure_run_with_progress(&request, None)?;

    print_run_header(&response);
    print_summary(&response.run_id, &response.records)?;

    if let Some(path) = output {
        let file = std::fs::File::create(path)?;
        pd_results::export_csv(&response.records, io::BufWriter::new(file))?;
        println!(
            "✓ Exported {} data points to {}",
            response.records.len(),
            path.display()
        );
    }

    print_timing_summary(&response.perf);
    Ok(())
}

fn print_run_header(response: &RunResponse) {
    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
    }
    println!("  Integrator: {}", response.manifest.integrator);
}

fn print_summary(run_id: &str, records: &[pd_results::TrajectoryRecord]) -> AppResult<()> {
    let summary = pd_results::summarize(run_id, records)?;
    println!("  Time points: {}", summary.record_count);
    println!(
        "  Time range: {:.3} - {:.3} s",
        summary.time_range.0, summary.time_range.1
    );
    println!("  Peak |theta|: {:.4} rad", summary.max_abs_theta_rad);
    println!("  Peak |omega|: {:.4} rad/s", summary.max_abs_omega_rad_s);
    println!(
        "  Energy: {:.6} J -> {:.6} J ({:.2}% dissipated)",
        summary.initial_energy_j,
        summary.final_energy_j,
        100.0 * summary.energy_loss_fraction()
    );
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(p: &SimProgress) {
    let width = 28usize;
    let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  t={:.3}/{:.3}s  step={}",
        bar,
        p.fraction_complete * 100.0,
        p.sim_time_s,
        p.t_end_s,
        p.step
    );
    let _ = io::stdout().flush();
}

fn print_timing_summary(perf: &PerfStats) {
    let lines = perf.summary_lines();
    if !lines.is_empty() {
        println!();
        for line in lines {
            println!("{}", line);
        }
    }
}

fn cmd_runs(project_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(project_path)?;

    if runs.is_empty() {
        println!("No cached runs found for {}", project_path.display());
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} ({}, {})",
                manifest.run_id, manifest.timestamp, manifest.integrator
            );
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, records) = run_service::load_run(project_path, run_id)?;

    println!("\nRun Summary:");
    println!("  Project: {}", manifest.project_name);
    println!("  Created: {}", manifest.timestamp);
    println!(
        "  Solver: {} (v{})",
        manifest.integrator, manifest.solver_version
    );
    match manifest.run_type {
        pd_results::RunType::Interactive {
            dt_s,
            t_end_s,
            steps,
            record_every,
        } => println!(
            "  Interactive: dt = {} s, t_end = {} s, {} steps, every {} recorded",
            dt_s, t_end_s, steps, record_every
        ),
        pd_results::RunType::Schedule { points, t_end_s } => {
            println!("  Schedule: {} points over {} s", points, t_end_s)
        }
    }
    print_summary(run_id, &records)
}

fn cmd_export_series(project_path: &Path, run_id: &str, output: Option<&Path>) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(project_path, run_id)?;

    if let Some(path) = output {
        let file = std::fs::File::create(path)?;
        pd_results::export_csv(&records, io::BufWriter::new(file))?;
        println!(
            "✓ Exported {} data points to {}",
            records.len(),
            path.display()
        );
    } else {
        pd_results::export_csv(&records, io::stdout().lock())?;
    }

    Ok(())
}
