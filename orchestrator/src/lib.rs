//! Venture factory orchestration engine
//!
//! Coordinates the candidate→venture lifecycle: discovery of candidate
//! opportunities, concurrent scoring pipelines feeding a Go/NoGo
//! decision, venture launch with external code-generation scaffolding,
//! and periodic trend/kill-criteria monitoring. External calls are
//! serialized through a rate-limited FIFO gate, and every state change
//! is paired atomically with an audit entry.

pub mod config;
pub mod error;
pub mod gate;
pub mod monitor;
pub mod orchestrator;
pub mod pipeline;
pub mod services;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, OrchestratorResult};
pub use gate::{CallFailure, CallGate, GateConfig};
pub use monitor::{FleetSummary, MonitorThresholds, VentureMonitor};
pub use orchestrator::{
    DiscoveryOutcome, MonitoringOutcome, Orchestrator, SkipReason, ValidationOutcome,
};
pub use pipeline::ScoringRunner;
pub use traits::{RecordStore, Scaffolder, ScaffoldReceipt, SignalSource};
