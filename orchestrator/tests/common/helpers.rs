//! Test helpers and builder patterns for orchestrator tests
//!
//! The builder wires a real in-memory record store to mockall seams
//! with non-panicking defaults, so each test only configures the
//! collaborator it actually cares about.

use orchestrator::services::MemoryStore;
use orchestrator::traits::{MockScaffolder, MockSignalSource, Record, RecordStore, ScaffoldReceipt};
use orchestrator::{Orchestrator, OrchestratorConfig};

pub type TestOrchestrator = Orchestrator<MemoryStore, MockSignalSource, MockScaffolder>;

/// Builder for test orchestrators with sensible defaults
pub struct FactoryBuilder {
    config: OrchestratorConfig,
    signals: MockSignalSource,
    scaffolder: MockScaffolder,
    seed: Vec<Record>,
}

impl FactoryBuilder {
    pub fn new() -> Self {
        let mut signals = MockSignalSource::new();
        let mut scaffolder = MockScaffolder::new();

        // Defaults that keep unconfigured seams from panicking
        signals.expect_discover().returning(|_| Ok(vec![])).times(0..);
        scaffolder
            .expect_request_scaffold()
            .returning(|_, _| {
                Ok(ScaffoldReceipt {
                    accepted: true,
                    reference: Some("venture/test".to_string()),
                })
            })
            .times(0..);

        Self {
            config: OrchestratorConfig::default(),
            signals,
            scaffolder,
            seed: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the signal source mock entirely
    pub fn with_signals<F>(mut self, setup: F) -> Self
    where
        F: FnOnce() -> MockSignalSource,
    {
        self.signals = setup();
        self
    }

    /// Replace the scaffolder mock entirely
    pub fn with_scaffolder<F>(mut self, setup: F) -> Self
    where
        F: FnOnce() -> MockScaffolder,
    {
        self.scaffolder = setup();
        self
    }

    /// Records committed to the store before the test body runs
    pub fn seeded_with(mut self, records: Vec<Record>) -> Self {
        self.seed.extend(records);
        self
    }

    pub async fn build(self) -> TestOrchestrator {
        let store = MemoryStore::new();
        if !self.seed.is_empty() {
            store
                .commit(self.seed)
                .await
                .expect("seeding the in-memory store cannot fail");
        }
        Orchestrator::new(store, self.signals, self.scaffolder, self.config)
    }
}

impl Default for FactoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
