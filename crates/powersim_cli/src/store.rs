//! JSON file store for simulation records.
//!
//! Layout under the output directory:
//!
//! ```text
//! <output_dir>/manifest.json
//! <output_dir>/<family>/round_0000.json
//! <output_dir>/<family>/round_0001.json
//! ```
//!
//! Every record file holds one pretty-printed `{ "params": ..., "samples": ... }`
//! object.

use std::fs;
use std::path::{Path, PathBuf};

use powersim_core::runner::RecordSink;
use powersim_core::types::{SimError, SimulationRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{CliError, Result};

/// Name of the run manifest file.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Summary of a run, written next to its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Stream seed
    pub seed: u64,
    /// Rounds per family
    pub num_rounds: usize,
    /// Families, in run order
    pub families: Vec<String>,
    /// powersim version that wrote the records
    pub version: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl RunManifest {
    /// Create a manifest stamped with the current time
    pub fn new(seed: u64, num_rounds: usize, families: Vec<String>) -> Self {
        Self {
            seed,
            num_rounds,
            families,
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// File-backed record sink
#[derive(Debug)]
pub struct JsonStore {
    /// Output directory
    root: PathBuf,
    /// Records written by this store
    written: usize,
}

impl JsonStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root, written: 0 })
    }

    /// Open an existing output directory for reading
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(CliError::FileNotFound(root.display().to_string()));
        }
        Ok(Self { root, written: 0 })
    }

    /// Get output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of records written through this store
    pub fn written(&self) -> usize {
        self.written
    }

    /// Path of the record for `round` of `family`
    pub fn record_path(&self, family: &str, round: usize) -> PathBuf {
        self.root.join(family).join(format!("round_{:04}.json", round))
    }

    /// Read one record back
    pub fn load(&self, family: &str, round: usize) -> Result<SimulationRecord> {
        let path = self.record_path(family, round);
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the run manifest
    pub fn write_manifest(&self, manifest: &RunManifest) -> Result<PathBuf> {
        let path = self.root.join(MANIFEST_FILE);
        fs::write(&path, serde_json::to_string_pretty(manifest)?)?;

        info!(
            path = %path.display(),
            seed = manifest.seed,
            families = manifest.families.len(),
            "Manifest written"
        );
        Ok(path)
    }

    /// Read the run manifest
    pub fn load_manifest(&self) -> Result<RunManifest> {
        let path = self.root.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        Ok(serde_json::from_str(&fs::read_to_string(&path)?)?)
    }

    fn write_record(
        &self,
        family: &str,
        round: usize,
        record: &SimulationRecord,
    ) -> Result<PathBuf> {
        let path = self.record_path(family, round);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string_pretty(record)?)?;
        Ok(path)
    }
}

impl RecordSink for JsonStore {
    fn persist(
        &mut self,
        family: &str,
        round: usize,
        record: &SimulationRecord,
    ) -> powersim_core::types::Result<()> {
        let path = self
            .write_record(family, round, record)
            .map_err(|e| SimError::Persistence(e.to_string()))?;
        self.written += 1;
        debug!(path = %path.display(), "Record written");
        Ok(())
    }
}
