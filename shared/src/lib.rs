//! Shared vocabulary for the venture factory
//!
//! Contains the domain identifiers, persisted record types, and
//! logging utilities used by the orchestration engine. Engine-internal
//! types (pipeline internals, guard outcomes) stay in the orchestrator
//! crate.

pub mod errors;
pub mod logging;
pub mod records;
pub mod types;

pub use errors::*;
pub use types::*;

// Re-export the persisted record types
pub use records::{
    slugify, AskingPrice, AssessedRisk, Audience, AuditEntry, AuditPayload, Blueprint, Candidate,
    CompetitionAnalysis, CompetitorAssessment, CompetitorNote, CriteriaFlags, Decision,
    KillCriteriaSet, MandatoryCriteria, MarketAnalysis, MetricsSnapshot, MonitorReport,
    OptionalCriteria, PricingAnalysis, PricingPlan, ProcessState, RiskAnalysis, RiskNote,
    TargetMetrics, TechnicalAnalysis, TrendSet, Venture, VerdictSet,
};
