//! Trait definitions with mockall annotations for testing
//!
//! These are the orchestrator's seams to its collaborators: the record
//! store, the discovery source, and the code-generation scaffolder.
//! All three are injected, so tests swap in mocks or the in-memory
//! store.

use crate::error::OrchestratorResult;
use shared::{
    AuditEntry, Blueprint, Candidate, CandidateId, CandidateStatus, Decision, DecisionId,
    MonitorReport, ProcessState, Venture, VentureId, VentureStatus,
};

/// One record to be written by an atomic [`RecordStore::commit`] batch
#[derive(Clone, Debug)]
pub enum Record {
    Candidate(Candidate),
    Decision(Decision),
    Venture(Venture),
    Report(MonitorReport),
    Audit(AuditEntry),
    State(ProcessState),
}

/// Keyed record store abstraction
///
/// Five append-mostly collections plus one singleton process-state
/// document. `commit` applies a batch as one logical transaction: a
/// venture transition and its audit entry either both land or neither
/// does.
#[mockall::automock]
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn candidate(&self, id: &CandidateId) -> OrchestratorResult<Option<Candidate>>;

    async fn decision(&self, id: &DecisionId) -> OrchestratorResult<Option<Decision>>;

    async fn venture(&self, id: &VentureId) -> OrchestratorResult<Option<Venture>>;

    /// List candidates, optionally filtered by status
    async fn list_candidates(
        &self,
        status: Option<CandidateStatus>,
    ) -> OrchestratorResult<Vec<Candidate>>;

    /// List ventures, optionally filtered by status
    async fn list_ventures(
        &self,
        status: Option<VentureStatus>,
    ) -> OrchestratorResult<Vec<Venture>>;

    /// Most recent monitor report for a venture, if any
    async fn latest_report(&self, venture: &VentureId)
        -> OrchestratorResult<Option<MonitorReport>>;

    /// Audit trail, optionally narrowed to one venture, oldest first
    async fn audit_trail(&self, venture: Option<VentureId>)
        -> OrchestratorResult<Vec<AuditEntry>>;

    /// The singleton process-state document, if one has been committed
    async fn process_state(&self) -> OrchestratorResult<Option<ProcessState>>;

    /// Apply a batch of writes atomically
    async fn commit(&self, records: Vec<Record>) -> OrchestratorResult<()>;
}

/// Discovery source abstraction
///
/// Produces candidate opportunities; how they are found (feeds,
/// scraping, a manual inbox) is the implementation's business.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SignalSource: Send + Sync {
    /// Discover up to `max` new candidates
    async fn discover(&self, max: u32) -> OrchestratorResult<Vec<Candidate>>;
}

/// Receipt returned by the code-generation collaborator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScaffoldReceipt {
    pub accepted: bool,
    /// Collaborator-side reference (branch, run id) when accepted
    pub reference: Option<String>,
}

/// Code-generation collaborator abstraction
///
/// Fire-and-forget from the orchestrator's perspective: a failed
/// scaffold request is logged, never rolled back into venture state.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Scaffolder: Send + Sync {
    async fn request_scaffold(
        &self,
        venture: &Venture,
        blueprint: &Blueprint,
    ) -> OrchestratorResult<ScaffoldReceipt>;
}
