//! Content-based hashing for run IDs.

use pd_project::schema::Project;
use sha2::{Digest, Sha256};

/// Hash of everything that determines a trajectory.
///
/// Name and display settings are left out so renaming a project or moving
/// the pivot on screen still hits the cache.
pub fn compute_run_id(
    project: &Project,
    run_type: &crate::types::RunType,
    solver_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    let physics_json =
        serde_json::to_string(&(&project.pendulum, &project.initial)).unwrap_or_default();
    hasher.update(physics_json.as_bytes());

    let solver_json = serde_json::to_string(&project.solver).unwrap_or_default();
    hasher.update(solver_json.as_bytes());

    let run_type_json = serde_json::to_string(run_type).unwrap_or_default();
    hasher.update(run_type_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
