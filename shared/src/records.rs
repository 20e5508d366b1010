//! Persisted domain records
//!
//! Every record the engine reads or writes through the record store
//! lives here: candidates, decisions, ventures, monitor reports, the
//! audit trail, and the singleton process-state document. Records are
//! plain serde data; all mutation policy stays in the orchestrator.

use crate::types::{
    Actor, AuditId, CandidateId, CandidateStatus, DecisionId, Outcome, PriceCadence, Probability,
    Provenance, Recommendation, ReportId, ReportKind, Severity, Track, TrendDirection, VentureId,
    VentureStatus, Verdict,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Candidate
// ============================================================================

/// A discovered, not-yet-accepted opportunity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub discovered_at: DateTime<Utc>,
    pub source: Provenance,
    pub source_url: String,
    /// 0-100, derived from the criteria flags
    pub confidence_score: u8,

    pub problem: String,
    pub target_audience: String,
    /// One-paragraph MVP description
    pub pitch: String,
    pub price: AskingPrice,
    pub track: Track,
    pub key_features: Vec<String>,
    pub competitors: Vec<CompetitorNote>,
    pub advantage: String,
    pub criteria: CriteriaFlags,
    pub risks: Vec<RiskNote>,

    pub status: CandidateStatus,
    pub decision_id: Option<DecisionId>,
}

/// Proposed price attached to a candidate
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AskingPrice {
    pub amount: f64,
    pub cadence: PriceCadence,
}

/// A competitor observed during discovery
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompetitorNote {
    pub name: String,
    pub description: String,
    pub free: bool,
}

/// A risk recorded at discovery time, graded by likelihood
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskNote {
    pub description: String,
    pub probability: Probability,
    pub mitigation: String,
}

/// Mandatory/optional screening criteria checked by the discovery step
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CriteriaFlags {
    pub mandatory: MandatoryCriteria,
    pub optional: OptionalCriteria,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct MandatoryCriteria {
    /// Mentioned independently at least three times
    pub repeatability: bool,
    /// Target audience above 10k people
    pub audience_size: bool,
    pub payment_willingness: bool,
    /// Buildable within the track's time budget
    pub feasibility: bool,
    pub no_free_alternatives: bool,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct OptionalCriteria {
    pub urgency: bool,
    pub simple_mvp: bool,
    pub viral_potential: bool,
    pub recurring_revenue: bool,
    pub low_competition: bool,
}

impl CriteriaFlags {
    /// Confidence score: 12 points per mandatory flag (max 60),
    /// 8 points per optional flag (max 40).
    pub fn confidence_score(&self) -> u8 {
        let m = &self.mandatory;
        let o = &self.optional;
        let mandatory = [
            m.repeatability,
            m.audience_size,
            m.payment_willingness,
            m.feasibility,
            m.no_free_alternatives,
        ]
        .iter()
        .filter(|f| **f)
        .count() as u8;
        let optional = [
            o.urgency,
            o.simple_mvp,
            o.viral_potential,
            o.recurring_revenue,
            o.low_competition,
        ]
        .iter()
        .filter(|f| **f)
        .count() as u8;
        mandatory * 12 + optional * 8
    }
}

// ============================================================================
// Decision
// ============================================================================

/// The immutable output of one scoring-pipeline run against one candidate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    pub candidate_id: CandidateId,
    pub created_at: DateTime<Utc>,
    pub outcome: Outcome,

    pub verdicts: VerdictSet,

    pub market: MarketAnalysis,
    pub competition: CompetitionAnalysis,
    pub technical: TechnicalAnalysis,
    pub pricing: PricingAnalysis,
    pub risk: RiskAnalysis,

    /// Present iff `outcome == Go`
    pub blueprint: Option<Blueprint>,
}

impl Decision {
    /// Blueprint-presence invariant: a Go decision carries a blueprint,
    /// a NoGo decision never does.
    pub fn blueprint_invariant_holds(&self) -> bool {
        match self.outcome {
            Outcome::Go => self.blueprint.is_some(),
            Outcome::NoGo => self.blueprint.is_none(),
        }
    }
}

/// One verdict per pipeline, in pipeline order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictSet {
    pub market: Verdict,
    pub competition: Verdict,
    pub technical: Verdict,
    pub pricing: Verdict,
    pub risk: Verdict,
}

impl VerdictSet {
    pub fn as_array(&self) -> [Verdict; 5] {
        [
            self.market,
            self.competition,
            self.technical,
            self.pricing,
            self.risk,
        ]
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.as_array().iter().filter(|v| **v == verdict).count()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub market_size: String,
    pub audience_estimate: u64,
    pub verdict: Verdict,
    pub reasoning: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompetitionAnalysis {
    pub assessed: Vec<CompetitorAssessment>,
    pub advantage: String,
    pub verdict: Verdict,
    pub reasoning: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompetitorAssessment {
    pub name: String,
    pub free: bool,
    pub weakness: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    pub estimated_days: u32,
    pub complexity: String,
    pub blockers: Vec<String>,
    pub verdict: Verdict,
    pub reasoning: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingAnalysis {
    pub ltv_estimate: f64,
    pub cac_estimate: f64,
    pub ltv_cac_ratio: f64,
    pub cadence: PriceCadence,
    pub verdict: Verdict,
    pub reasoning: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub risks: Vec<AssessedRisk>,
    pub critical_count: usize,
    pub medium_count: usize,
    pub verdict: Verdict,
    pub reasoning: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssessedRisk {
    pub description: String,
    pub severity: Severity,
    pub probability: Probability,
    pub mitigation: String,
}

// ============================================================================
// Blueprint
// ============================================================================

/// The accepted venture specification embedded in a Go decision
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Blueprint {
    pub name: String,
    /// Deterministically derived from `name`, see [`slugify`]
    pub slug: String,
    pub tagline: String,
    pub description: String,
    pub audience: Audience,
    pub features: Vec<String>,
    pub pricing: PricingPlan,
    pub targets: TargetMetrics,
    pub risks: Vec<RiskNote>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Audience {
    pub who: String,
    pub problem: String,
    pub size: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingPlan {
    pub cadence: PriceCadence,
    pub amount: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetMetrics {
    pub track: Track,
    pub target_mrr: f64,
    pub target_users: u64,
    pub conversion_rate: f64,
    pub kill_criteria: Vec<String>,
}

/// Lowercase, non-alphanumeric runs collapsed to single hyphens,
/// no leading/trailing hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true; // suppress a leading hyphen
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

// ============================================================================
// Venture
// ============================================================================

/// Point-in-time business metrics for a venture
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub mrr: f64,
    pub total_revenue: f64,
    pub total_users: u64,
    pub daily_visits: u64,
    pub conversion_rate: f64,
    pub churn_rate: f64,
}

impl MetricsSnapshot {
    pub fn zeroed() -> Self {
        Self::default()
    }
}

/// A live product instance under lifecycle management
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Venture {
    pub id: VentureId,
    pub name: String,
    pub slug: String,

    pub status: VentureStatus,
    pub track: Track,

    pub created_at: DateTime<Utc>,
    pub launched_at: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub killed_at: Option<DateTime<Utc>>,

    pub metrics: MetricsSnapshot,

    pub candidate_id: CandidateId,
    pub decision_id: DecisionId,
    pub blueprint: Blueprint,

    pub pause_reason: Option<String>,
    pub kill_reason: Option<String>,
}

impl Venture {
    /// Whole days elapsed since creation
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days()
    }
}

// ============================================================================
// Monitor report
// ============================================================================

/// One trend direction per tracked metric
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSet {
    pub visits: TrendDirection,
    pub purchases: TrendDirection,
    pub revenue: TrendDirection,
    pub mrr: TrendDirection,
}

impl TrendSet {
    pub fn all_stable() -> Self {
        Self {
            visits: TrendDirection::Stable,
            purchases: TrendDirection::Stable,
            revenue: TrendDirection::Stable,
            mrr: TrendDirection::Stable,
        }
    }

    pub fn down_count(&self) -> usize {
        [self.visits, self.purchases, self.revenue, self.mrr]
            .iter()
            .filter(|t| **t == TrendDirection::Down)
            .count()
    }

    pub fn up_count(&self) -> usize {
        [self.visits, self.purchases, self.revenue, self.mrr]
            .iter()
            .filter(|t| **t == TrendDirection::Up)
            .count()
    }
}

/// Five independent kill-criteria checks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillCriteriaSet {
    pub zero_transactions: bool,
    pub low_traffic: bool,
    pub negative_economics: bool,
    /// Supplied externally; the analyzer never infers it
    pub critical_bugs: bool,
    pub no_growth: bool,
}

impl KillCriteriaSet {
    pub fn triggered_count(&self) -> usize {
        [
            self.zero_transactions,
            self.low_traffic,
            self.negative_economics,
            self.critical_bugs,
            self.no_growth,
        ]
        .iter()
        .filter(|f| **f)
        .count()
    }

    /// Names of the triggered criteria, for reasoning text
    pub fn triggered_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.zero_transactions {
            names.push("zero_transactions");
        }
        if self.low_traffic {
            names.push("low_traffic");
        }
        if self.negative_economics {
            names.push("negative_economics");
        }
        if self.critical_bugs {
            names.push("critical_bugs");
        }
        if self.no_growth {
            names.push("no_growth");
        }
        names
    }
}

/// One immutable health assessment of one venture
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorReport {
    pub id: ReportId,
    pub venture_id: VentureId,
    pub kind: ReportKind,
    pub created_at: DateTime<Utc>,

    pub metrics: MetricsSnapshot,
    pub trends: TrendSet,
    pub kill_criteria: KillCriteriaSet,

    pub recommendation: Recommendation,
    pub reasoning: String,
    pub action_items: Vec<String>,

    pub next_check: DateTime<Utc>,
}

// ============================================================================
// Audit trail
// ============================================================================

/// Append-only record of a state-changing action
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditId,
    pub timestamp: DateTime<Utc>,
    pub venture_id: Option<VentureId>,
    pub actor: Actor,
    /// One-line human summary
    pub result: String,
    pub payload: AuditPayload,
}

impl AuditEntry {
    pub fn action(&self) -> &'static str {
        self.payload.action()
    }
}

/// Typed per-action audit payload
///
/// Tagged by action name so audit queries stay schema-checked instead
/// of digging through an untyped blob.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum AuditPayload {
    #[serde(rename = "signal_found")]
    SignalsDiscovered {
        found: usize,
        persisted: usize,
        confidence_threshold: u8,
    },
    #[serde(rename = "validation_completed")]
    ValidationCompleted {
        candidate_id: CandidateId,
        decision_id: DecisionId,
        verdicts: VerdictSet,
        outcome: Outcome,
    },
    #[serde(rename = "venture_launched")]
    VentureLaunched {
        venture_id: VentureId,
        name: String,
        track: Track,
    },
    #[serde(rename = "venture_status_changed")]
    VentureStatusChanged {
        venture_id: VentureId,
        from: VentureStatus,
        to: VentureStatus,
        reason: Option<String>,
        recommendation: Option<Recommendation>,
    },
    #[serde(rename = "monitoring_completed")]
    MonitoringCompleted {
        ventures_checked: usize,
        healthy: usize,
        warnings: usize,
        critical: usize,
        total_mrr: f64,
        total_revenue: f64,
    },
}

impl AuditPayload {
    pub fn action(&self) -> &'static str {
        match self {
            AuditPayload::SignalsDiscovered { .. } => "signal_found",
            AuditPayload::ValidationCompleted { .. } => "validation_completed",
            AuditPayload::VentureLaunched { .. } => "venture_launched",
            AuditPayload::VentureStatusChanged { .. } => "venture_status_changed",
            AuditPayload::MonitoringCompleted { .. } => "monitoring_completed",
        }
    }
}

// ============================================================================
// Process state (singleton)
// ============================================================================

/// Singleton process-wide counters and last-run timestamps
///
/// Persisted through the store so guard checks survive restarts;
/// read-modify-written once per orchestrator operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessState {
    pub last_discovery_run: Option<DateTime<Utc>>,
    pub last_validation_run: Option<DateTime<Utc>>,
    pub last_monitoring_run: Option<DateTime<Utc>>,

    pub budget_spent: f64,
    pub budget_last_reset: DateTime<Utc>,

    /// Next venture sequence is `venture_sequence + 1`; never reused
    pub venture_sequence: u32,
}

impl ProcessState {
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            last_discovery_run: None,
            last_validation_run: None,
            last_monitoring_run: None,
            budget_spent: 0.0,
            budget_last_reset: now,
            venture_sequence: 0,
        }
    }
}
