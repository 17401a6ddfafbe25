//! Simulation configuration management.
//!
//! Loads `powersim.toml` with environment variable override support.
//! Precedence, lowest first: built-in defaults, the TOML file, `POWERSIM_*`
//! environment variables, command-line flags.
//!
//! ```toml
//! seed = 42
//! num_rounds = 100
//! output_dir = "simulations"
//! log_level = "info"
//!
//! [[families]]
//! name = "anova_4"
//! generator = "k_group"
//! groups = 4
//! mu_lim = [0.0, 10.0]
//! sigma_lim = [1.0, 5.0]
//! count_lim = [5, 40]
//! ```

use std::path::{Path, PathBuf};

use powersim_core::registry::{Registry, RegistryEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `seed`.
pub const ENV_SEED: &str = "POWERSIM_SEED";
/// Environment variable overriding `num_rounds`.
pub const ENV_ROUNDS: &str = "POWERSIM_ROUNDS";
/// Environment variable overriding `output_dir`.
pub const ENV_OUTPUT_DIR: &str = "POWERSIM_OUTPUT_DIR";
/// Environment variable overriding `log_level`.
pub const ENV_LOG_LEVEL: &str = "POWERSIM_LOG_LEVEL";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Seed of the single random stream
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Rounds per family
    #[serde(default = "default_num_rounds")]
    pub num_rounds: usize,

    /// Root directory for simulation records
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Families to simulate; empty selects the built-in registry
    #[serde(default)]
    pub families: Vec<RegistryEntry>,
}

fn default_seed() -> u64 {
    42
}

fn default_num_rounds() -> usize {
    100
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("simulations")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            num_rounds: default_num_rounds(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
            families: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `POWERSIM_*` environment variable overrides
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = parse_override(ENV_SEED, &seed)?;
        }

        if let Some(rounds) = lookup(ENV_ROUNDS) {
            self.num_rounds = parse_override(ENV_ROUNDS, &rounds)?;
        }

        if let Some(output_dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(output_dir);
        }

        if let Some(log_level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = log_level;
        }

        Ok(self)
    }

    /// Apply command-line flags; a flag that is present wins.
    pub fn with_flags(
        mut self,
        seed: Option<u64>,
        num_rounds: Option<usize>,
        output_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(seed) = seed {
            self.seed = seed;
        }
        if let Some(num_rounds) = num_rounds {
            self.num_rounds = num_rounds;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
        self
    }

    /// The registry this configuration describes.
    pub fn registry(&self) -> powersim_core::types::Result<Registry> {
        if self.families.is_empty() {
            Registry::builtin()
        } else {
            Registry::new(self.families.clone())
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if self.num_rounds == 0 {
            errors.push("num_rounds must be greater than 0".to_string());
        }

        if self.output_dir.as_os_str().is_empty() {
            errors.push("output_dir cannot be empty".to_string());
        }

        if let Err(e) = self.registry() {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::Parse(format!("{}='{}': {}", key, value, e)))
}

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file or override
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
