//! Run storage API.
//!
//! Layout under the store root:
//!
//! ```text
//! <run_id>/manifest.json     pretty JSON RunManifest
//! <run_id>/trajectory.jsonl  one TrajectoryRecord per line
//! ```

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::{RunManifest, TrajectoryRecord};
use crate::{ResultsError, ResultsResult};

const MANIFEST_FILE: &str = "manifest.json";
const TRAJECTORY_FILE: &str = "trajectory.jsonl";

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    /// Open (creating if needed) a store rooted at `root_dir`.
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    /// Store under `<project dir>/.pendulum/runs`.
    pub fn for_project(project_path: &Path) -> ResultsResult<Self> {
        let Some(project_dir) = project_path.parent() else {
            return Err(ResultsError::InvalidPath {
                message: format!("{} has no parent directory", project_path.display()),
            });
        };
        Self::new(project_dir.join(".pendulum").join("runs"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn manifest_path(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id).join(MANIFEST_FILE)
    }

    fn trajectory_path(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id).join(TRAJECTORY_FILE)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.manifest_path(run_id).is_file()
    }

    /// Write the trajectory, then the manifest. A run only counts as stored
    /// once its manifest exists.
    pub fn save_run(
        &self,
        manifest: &RunManifest,
        records: &[TrajectoryRecord],
    ) -> ResultsResult<()> {
        fs::create_dir_all(self.root_dir.join(&manifest.run_id))?;
        write_jsonl(&self.trajectory_path(&manifest.run_id), records)?;
        fs::write(
            self.manifest_path(&manifest.run_id),
            serde_json::to_string_pretty(manifest)?,
        )?;
        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let path = existing(self.manifest_path(run_id), run_id)?;
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    pub fn load_trajectory(&self, run_id: &str) -> ResultsResult<Vec<TrajectoryRecord>> {
        read_jsonl(&existing(self.trajectory_path(run_id), run_id)?)
    }

    pub fn load_run(&self, run_id: &str) -> ResultsResult<(RunManifest, Vec<TrajectoryRecord>)> {
        Ok((self.load_manifest(run_id)?, self.load_trajectory(run_id)?))
    }

    /// Runs recorded for `project_name`, most recent first. Directories
    /// without a readable manifest are skipped.
    pub fn list_runs(&self, project_name: &str) -> ResultsResult<Vec<RunManifest>> {
        if !self.root_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            let Some(run_id) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Ok(manifest) = self.load_manifest(run_id)
                && manifest.project_name == project_name
            {
                runs.push(manifest);
            }
        }

        runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(runs)
    }

    /// Remove a run; missing runs are not an error.
    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let dir = self.root_dir.join(run_id);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}

fn existing(path: PathBuf, run_id: &str) -> ResultsResult<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ResultsError::RunNotFound {
            run_id: run_id.to_string(),
        })
    }
}

fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> ResultsResult<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut out, item)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> ResultsResult<Vec<T>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut items = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            items.push(serde_json::from_str(&line)?);
        }
    }
    Ok(items)
}
