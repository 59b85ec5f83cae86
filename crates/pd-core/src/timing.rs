//! Lightweight wall-clock timing for run summaries.
//!
//! Can be enabled/disabled via the `PD_TIMING` environment variable or
//! programmatically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable performance timing globally.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Disable performance timing globally.
pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("PD_TIMING").is_ok()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Elapsed seconds since start, always measured.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Wall-clock breakdown of one CLI run.
#[derive(Debug, Clone, Default)]
pub struct PerfStats {
    pub build_time_s: f64,
    pub solve_time_s: f64,
    pub save_time_s: f64,
    pub load_time_s: f64,
    pub steps: usize,
    pub rhs_evals: usize,
    pub rejected_steps: usize,
}

impl PerfStats {
    pub fn total_time_s(&self) -> f64 {
        self.build_time_s + self.solve_time_s + self.save_time_s + self.load_time_s
    }

    /// Formatted summary lines, empty when timing is disabled.
    pub fn summary_lines(&self) -> Vec<String> {
        if !is_enabled() {
            return Vec::new();
        }

        let mut lines = vec!["=== Performance Summary ===".to_string()];
        if self.build_time_s > 0.0 {
            lines.push(format!("Build time:          {:.3}s", self.build_time_s));
        }
        if self.solve_time_s > 0.0 {
            lines.push(format!("Solve time:          {:.3}s", self.solve_time_s));
            if self.steps > 0 {
                lines.push(format!("  Steps:             {}", self.steps));
                lines.push(format!(
                    "  Avg step time:     {:.6}s",
                    self.solve_time_s / self.steps as f64
                ));
            }
            lines.push(format!("  RHS evaluations:   {}", self.rhs_evals));
            lines.push(format!("  Rejected substeps: {}", self.rejected_steps));
        }
        if self.save_time_s > 0.0 {
            lines.push(format!("Run save time:       {:.3}s", self.save_time_s));
        }
        if self.load_time_s > 0.0 {
            lines.push(format!("Run load time:       {:.3}s", self.load_time_s));
        }
        lines.push(format!("Total:               {:.3}s", self.total_time_s()));
        lines
    }
}
