//! Simulation runner: repeated draws per family, handed to a record sink.
//!
//! The runner is thin orchestration. It walks the registry in order, calls
//! each family's generator `num_rounds` times on the shared stream, and
//! persists every record keyed by (family, round). The first failure aborts
//! the run and is returned tagged with its family and round; nothing is
//! retried or skipped.

use rand::Rng;
use tracing::{debug, info};

use crate::registry::{Registry, RegistryEntry};
use crate::types::{Result, SimError, SimulationRecord};

/// Destination for simulation records.
pub trait RecordSink {
    /// Stores the record of `round` (zero-based) of `family`.
    fn persist(&mut self, family: &str, round: usize, record: &SimulationRecord) -> Result<()>;
}

/// Keeps every record in memory, in persistence order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<(String, usize, SimulationRecord)>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored `(family, round, record)` triples.
    pub fn records(&self) -> &[(String, usize, SimulationRecord)] {
        &self.records
    }

    /// The record of one round, if stored.
    pub fn get(&self, family: &str, round: usize) -> Option<&SimulationRecord> {
        self.records
            .iter()
            .find(|(f, r, _)| f == family && *r == round)
            .map(|(_, _, record)| record)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSink for MemorySink {
    fn persist(&mut self, family: &str, round: usize, record: &SimulationRecord) -> Result<()> {
        self.records.push((family.to_string(), round, record.clone()));
        Ok(())
    }
}

/// Rounds completed for one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySummary {
    /// Family name.
    pub name: String,
    /// Generator tag.
    pub generator: &'static str,
    /// Rounds persisted.
    pub rounds: usize,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Per-family results, in registry order.
    pub families: Vec<FamilySummary>,
}

impl RunSummary {
    /// Total records persisted.
    pub fn total_records(&self) -> usize {
        self.families.iter().map(|f| f.rounds).sum()
    }
}

/// Drives `num_rounds` independent draws of every registered family.
#[derive(Debug, Clone)]
pub struct Runner {
    registry: Registry,
    num_rounds: usize,
}

impl Runner {
    /// Creates a runner over `registry`. `num_rounds` must be positive.
    pub fn new(registry: Registry, num_rounds: usize) -> Result<Self> {
        if num_rounds == 0 {
            return Err(SimError::InvalidConfig(
                "number of rounds must be positive".to_string(),
            ));
        }
        Ok(Self {
            registry,
            num_rounds,
        })
    }

    /// The families this runner iterates.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Rounds per family.
    pub fn num_rounds(&self) -> usize {
        self.num_rounds
    }

    /// Runs every family in registry order on one stream.
    ///
    /// # Errors
    /// The first generator or sink failure, wrapped in `SimError::Round`.
    pub fn run<R, S>(&self, rng: &mut R, sink: &mut S) -> Result<RunSummary>
    where
        R: Rng + ?Sized,
        S: RecordSink + ?Sized,
    {
        let mut summary = RunSummary::default();
        for entry in self.registry.iter() {
            let rounds = self.run_family(entry, rng, sink)?;
            summary.families.push(FamilySummary {
                name: entry.name.clone(),
                generator: entry.config.kind(),
                rounds,
            });
        }
        info!(
            families = summary.families.len(),
            records = summary.total_records(),
            "Run complete"
        );
        Ok(summary)
    }

    /// Runs all rounds of one family and returns the number persisted.
    pub fn run_family<R, S>(
        &self,
        entry: &RegistryEntry,
        rng: &mut R,
        sink: &mut S,
    ) -> Result<usize>
    where
        R: Rng + ?Sized,
        S: RecordSink + ?Sized,
    {
        info!(
            family = %entry.name,
            generator = entry.config.kind(),
            rounds = self.num_rounds,
            "Simulating family"
        );
        for round in 0..self.num_rounds {
            let record = entry
                .config
                .generate(rng)
                .map_err(|e| e.in_round(&entry.name, round))?;
            sink.persist(&entry.name, round, &record)
                .map_err(|e| e.in_round(&entry.name, round))?;
            debug!(
                family = %entry.name,
                round,
                observations = record.samples.num_observations(),
                "Round persisted"
            );
        }
        Ok(self.num_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::NormalConfig;
    use crate::registry::FamilyConfig;
    use crate::rng::SimRng;
    use crate::types::Bound;

    /// Fails on a chosen call.
    struct FailingSink {
        calls: usize,
        fail_at: usize,
    }

    impl RecordSink for FailingSink {
        fn persist(&mut self, _: &str, _: usize, _: &SimulationRecord) -> Result<()> {
            self.calls += 1;
            if self.calls > self.fail_at {
                Err(SimError::Persistence("disk full".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn small_registry() -> Registry {
        Registry::builtin().unwrap().select(&["ttest_1", "pearson", "permanova"]).unwrap()
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(matches!(
            Runner::new(small_registry(), 0),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_persists_every_round() {
        let runner = Runner::new(small_registry(), 4).unwrap();
        let mut rng = SimRng::from_seed(42);
        let mut sink = MemorySink::new();
        let summary = runner.run(&mut rng, &mut sink).unwrap();

        assert_eq!(summary.total_records(), 12);
        assert_eq!(sink.len(), 12);
        let keys: Vec<(&str, usize)> = sink
            .records()
            .iter()
            .map(|(f, r, _)| (f.as_str(), *r))
            .collect();
        assert_eq!(keys[0], ("ttest_1", 0));
        assert_eq!(keys[3], ("ttest_1", 3));
        assert_eq!(keys[4], ("pearson", 0));
        assert_eq!(keys[11], ("permanova", 3));
    }

    #[test]
    fn test_rounds_are_independent_draws() {
        let runner = Runner::new(small_registry(), 2).unwrap();
        let mut rng = SimRng::from_seed(7);
        let mut sink = MemorySink::new();
        runner.run(&mut rng, &mut sink).unwrap();
        assert_ne!(sink.get("ttest_1", 0), sink.get("ttest_1", 1));
    }

    #[test]
    fn test_sink_failure_is_tagged() {
        let runner = Runner::new(small_registry(), 3).unwrap();
        let mut rng = SimRng::from_seed(1);
        let mut sink = FailingSink {
            calls: 0,
            fail_at: 4,
        };
        let err = runner.run(&mut rng, &mut sink).unwrap_err();
        match err {
            SimError::Round {
                family,
                round,
                source,
            } => {
                assert_eq!(family, "pearson");
                assert_eq!(round, 1);
                assert!(matches!(*source, SimError::Persistence(_)));
            }
            other => panic!("Expected a round error, got {:?}", other),
        }
        assert_eq!(sink.calls, 5);
    }

    #[test]
    fn test_generator_failure_aborts_run() {
        // Skips Registry::new so the bad bound reaches the generator.
        let entries = small_registry()
            .iter()
            .cloned()
            .map(|mut e| {
                if e.name == "ttest_1" {
                    e.config = FamilyConfig::OneSample(NormalConfig {
                        mu_lim: Bound::new(0.0, 1.0).unwrap(),
                        sigma_lim: Bound::new(-1.0, 1.0).unwrap(),
                        count_lim: Bound::new(5, 5).unwrap(),
                    });
                }
                e
            })
            .collect();
        let registry = Registry::from_entries_unchecked(entries);
        let runner = Runner::new(registry, 2).unwrap();
        let mut rng = SimRng::from_seed(1);
        let mut sink = MemorySink::new();
        let err = runner.run(&mut rng, &mut sink).unwrap_err();
        assert!(matches!(err, SimError::Round { round: 0, .. }));
        assert!(sink.is_empty());
    }
}
