//! Inspect command implementation
//!
//! Loads one persisted record and prints its realized parameters, the shape
//! of its samples and, where one exists, its ground-truth effect size.

use powersim_core::effect::record_effect_size;
use powersim_core::types::{SimError, SimulationRecord};
use tracing::info;

use crate::config::SimConfig;
use crate::store::JsonStore;
use crate::{CliError, Result};

/// Run the inspect command
pub fn run(config: &SimConfig, family: &str, round: usize, x0: f64) -> Result<()> {
    if !x0.is_finite() {
        return Err(CliError::invalid_argument(format!("x0 must be finite, got {}", x0)));
    }
    let store = JsonStore::open(&config.output_dir)?;
    info!("Loading {}", store.record_path(family, round).display());
    let record = store.load(family, round)?;

    println!("Family: {} (round {})", family, round);
    match store.load_manifest() {
        Ok(manifest) => println!(
            "Run: seed {}, {} rounds, written {} by powersim {}",
            manifest.seed, manifest.num_rounds, manifest.created_at, manifest.version
        ),
        Err(CliError::FileNotFound(path)) => info!("No run manifest at {}", path),
        Err(e) => return Err(e),
    }
    println!("Params:");
    println!("{}", serde_json::to_string_pretty(&record.params)?);
    println!(
        "Samples: {} ({} observations)",
        record.samples.shape(),
        record.samples.num_observations()
    );
    match effect_size(&record, x0)? {
        Some(effect) => println!("Effect size: {:.6}", effect),
        None => println!("Effect size: n/a for {} samples", record.samples.shape()),
    }
    Ok(())
}

/// Effect size of a record, `None` for sample shapes without one.
fn effect_size(record: &SimulationRecord, x0: f64) -> Result<Option<f64>> {
    match record_effect_size(record, x0) {
        Ok(effect) => Ok(Some(effect)),
        Err(SimError::IncompatibleSamples { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands;

    #[test]
    fn test_inspect_after_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimConfig {
            num_rounds: 1,
            output_dir: dir.path().to_path_buf(),
            ..SimConfig::default()
        };
        let families = ["ttest_ind".to_string(), "permanova".to_string()];
        commands::run::run(&config, &families).unwrap();

        assert!(run(&config, "ttest_ind", 0, 0.0).is_ok());
        assert!(run(&config, "permanova", 0, 0.0).is_ok());
        assert!(matches!(
            run(&config, "ttest_ind", 5, 0.0),
            Err(CliError::FileNotFound(_))
        ));
        assert!(matches!(
            run(&config, "ttest_ind", 0, f64::NAN),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_manifest_missing_or_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimConfig {
            num_rounds: 1,
            output_dir: dir.path().to_path_buf(),
            ..SimConfig::default()
        };
        commands::run::run(&config, &["ttest_1".to_string()]).unwrap();
        let manifest = dir.path().join(crate::store::MANIFEST_FILE);

        std::fs::remove_file(&manifest).unwrap();
        assert!(run(&config, "ttest_1", 0, 0.0).is_ok());

        std::fs::write(&manifest, "{ not json").unwrap();
        assert!(matches!(
            run(&config, "ttest_1", 0, 0.0),
            Err(CliError::Json(_))
        ));
    }

    #[test]
    fn test_effect_size_by_shape() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimConfig {
            num_rounds: 1,
            output_dir: dir.path().to_path_buf(),
            ..SimConfig::default()
        };
        commands::run::run(&config, &["pearson".to_string(), "mantel".to_string()]).unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let pearson = store.load("pearson", 0).unwrap();
        let r = effect_size(&pearson, 0.0).unwrap().unwrap();
        assert!((-1.0..=1.0).contains(&r));

        let mantel = store.load("mantel", 0).unwrap();
        assert_eq!(effect_size(&mantel, 0.0).unwrap(), None);
    }
}
