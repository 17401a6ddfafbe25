//! Simulation registry: named families and their fixed Bound configuration.
//!
//! A [`Registry`] is built once, validated, and then only read. Iteration
//! order is insertion order, which fixes the order in which a run consumes
//! the random stream.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::generators::{
    k_group, linear, lognormal, mantel, one_sample, permanova, two_sample, uniform,
    KGroupConfig, LinearConfig, NormalConfig, PermanovaConfig, UniformConfig,
};
use crate::types::{Bound, Result, SimError, SimulationRecord};

/// Generator selection plus its Bound configuration.
///
/// Serialised with a `generator` tag next to the Bound fields:
///
/// ```toml
/// generator = "k_group"
/// groups = 3
/// mu_lim = [0.0, 10.0]
/// sigma_lim = [1.0, 5.0]
/// count_lim = [10, 40]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "generator", rename_all = "snake_case")]
pub enum FamilyConfig {
    /// One normal sample.
    OneSample(NormalConfig),
    /// Two independent normal samples.
    TwoSample(NormalConfig),
    /// `k` independent normal samples.
    KGroup(KGroupConfig),
    /// Two independent lognormal samples.
    LogNormal(NormalConfig),
    /// Two independent uniform samples.
    Uniform(UniformConfig),
    /// Linear predictor/response pair.
    Linear(LinearConfig),
    /// Grouped distance matrix.
    Permanova(PermanovaConfig),
    /// Predictor/response distance matrices.
    Mantel(LinearConfig),
}

impl FamilyConfig {
    /// Runs the selected generator once.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SimulationRecord> {
        match self {
            Self::OneSample(c) => one_sample(c, rng),
            Self::TwoSample(c) => two_sample(c, rng),
            Self::KGroup(c) => k_group(c, rng),
            Self::LogNormal(c) => lognormal(c, rng),
            Self::Uniform(c) => uniform(c, rng),
            Self::Linear(c) => linear(c, rng),
            Self::Permanova(c) => permanova(c, rng),
            Self::Mantel(c) => mantel(c, rng),
        }
    }

    /// Checks the Bound configuration without drawing anything.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::OneSample(c) | Self::TwoSample(c) | Self::LogNormal(c) => c.validate(),
            Self::KGroup(c) => c.validate(),
            Self::Uniform(c) => c.validate(),
            Self::Linear(c) => c.validate(1),
            Self::Permanova(c) => c.validate(),
            Self::Mantel(c) => c.validate(2),
        }
    }

    /// Generator tag, as serialised.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OneSample(_) => "one_sample",
            Self::TwoSample(_) => "two_sample",
            Self::KGroup(_) => "k_group",
            Self::LogNormal(_) => "log_normal",
            Self::Uniform(_) => "uniform",
            Self::Linear(_) => "linear",
            Self::Permanova(_) => "permanova",
            Self::Mantel(_) => "mantel",
        }
    }
}

/// One named family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Family name; also the directory records are stored under.
    pub name: String,
    /// Generator and Bounds.
    #[serde(flatten)]
    pub config: FamilyConfig,
}

impl RegistryEntry {
    /// Creates an entry.
    pub fn new(name: impl Into<String>, config: FamilyConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Ordered, immutable list of families with unique names.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Builds a registry, validating names and every family's Bounds.
    ///
    /// # Errors
    /// `InvalidConfig` if the list is empty, a name is empty, repeated or not
    /// made of `[A-Za-z0-9_-]`, or a family's Bounds are unusable.
    pub fn new(entries: Vec<RegistryEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(SimError::InvalidConfig("registry has no families".to_string()));
        }
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            check_name(&entry.name)?;
            if !seen.insert(entry.name.as_str()) {
                return Err(SimError::InvalidConfig(format!(
                    "duplicate family name '{}'",
                    entry.name
                )));
            }
            entry.config.validate().map_err(|e| {
                SimError::InvalidConfig(format!("family '{}': {}", entry.name, e))
            })?;
        }
        Ok(Self { entries })
    }

    /// The families of the reference power study, validated like any other
    /// list.
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_entries()?)
    }

    #[cfg(test)]
    pub(crate) fn from_entries_unchecked(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }

    /// Looks up a family by name.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Families in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Family names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of families.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sub-registry holding only `names`, kept in registry order.
    ///
    /// An empty selection keeps every family.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        for name in names {
            if self.get(name.as_ref()).is_none() {
                return Err(SimError::InvalidConfig(format!(
                    "unknown family '{}'",
                    name.as_ref()
                )));
            }
        }
        let entries = self
            .entries
            .iter()
            .filter(|e| names.iter().any(|n| n.as_ref() == e.name))
            .cloned()
            .collect();
        Ok(Self { entries })
    }
}

fn check_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "family name '{}' must be non-empty and use only [A-Za-z0-9_-]",
            name
        )))
    }
}

fn anova(groups: usize) -> Result<FamilyConfig> {
    Ok(FamilyConfig::KGroup(KGroupConfig {
        groups,
        mu_lim: Bound::new(0.0, 10.0)?,
        sigma_lim: Bound::new(1.0, 5.0)?,
        count_lim: Bound::new(5, 40)?,
    }))
}

fn builtin_entries() -> Result<Vec<RegistryEntry>> {
    let normal = NormalConfig {
        mu_lim: Bound::new(0.0, 10.0)?,
        sigma_lim: Bound::new(1.0, 5.0)?,
        count_lim: Bound::new(5, 100)?,
    };
    let relationship = LinearConfig {
        slope_lim: Bound::new(-2.0, 2.0)?,
        intercept_lim: Bound::new(-5.0, 5.0)?,
        sigma_lim: Bound::new(1.0, 5.0)?,
        count_lim: Bound::new(5, 100)?,
        x_lim: Bound::new(-10.0, 10.0)?,
    };

    Ok(vec![
        RegistryEntry::new("ttest_1", FamilyConfig::OneSample(normal.clone())),
        RegistryEntry::new("ttest_ind", FamilyConfig::TwoSample(normal)),
        RegistryEntry::new("anova_3", anova(3)?),
        RegistryEntry::new("anova_8", anova(8)?),
        RegistryEntry::new("anova_20", anova(20)?),
        RegistryEntry::new(
            "mannwhitney_lognormal",
            FamilyConfig::LogNormal(NormalConfig {
                mu_lim: Bound::new(0.0, 2.0)?,
                sigma_lim: Bound::new(0.25, 1.0)?,
                count_lim: Bound::new(5, 100)?,
            }),
        ),
        RegistryEntry::new(
            "mannwhitney_uniform",
            FamilyConfig::Uniform(UniformConfig {
                range_lim: Bound::new(0.0, 10.0)?,
                delta_lim: Bound::new(1.0, 5.0)?,
                count_lim: Bound::new(5, 100)?,
            }),
        ),
        RegistryEntry::new("pearson", FamilyConfig::Linear(relationship.clone())),
        RegistryEntry::new(
            "permanova",
            FamilyConfig::Permanova(PermanovaConfig {
                num_samples: None,
                count_lim: Some(Bound::new(10, 50)?),
                group2: None,
                wdist: Bound::new(0.2, 0.5)?,
                wspread: Bound::new(0.05, 0.2)?,
                bdist: Bound::new(0.3, 0.8)?,
                bspread: Bound::new(0.05, 0.2)?,
            }),
        ),
        RegistryEntry::new(
            "mantel",
            FamilyConfig::Mantel(LinearConfig {
                count_lim: Bound::new(10, 50)?,
                x_lim: Bound::new(0.0, 10.0)?,
                ..relationship
            }),
        ),
    ])
}
