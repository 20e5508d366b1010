//! Core shared identifiers and vocabulary enums
//!
//! Domain ids keep the human-readable formats the rest of the system
//! (store layout, audit trail, reports) is keyed by, so they are thin
//! newtypes over formatted strings rather than raw UUIDs.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a discovered market candidate: `SIGNAL-YYYY-MM-DD-HH-MM-SS`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn mint(at: DateTime<Utc>) -> Self {
        Self(format!("SIGNAL-{}", at.format("%Y-%m-%d-%H-%M-%S")))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for one scoring-pipeline run: `VALIDATION-YYYY-MM-DD-HH-MM-SS`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(String);

impl DecisionId {
    pub fn mint(at: DateTime<Utc>) -> Self {
        Self(format!("VALIDATION-{}", at.format("%Y-%m-%d-%H-%M-%S")))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a launched venture: `V-<year>-<NNN>-<slug>`
///
/// The sequence number is monotonic per factory lifetime and is never
/// reused, even after earlier ventures are killed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VentureId(String);

impl VentureId {
    pub fn mint(at: DateTime<Utc>, sequence: u32, slug: &str) -> Self {
        Self(format!("V-{}-{:03}-{}", at.year(), sequence, slug))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VentureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for one monitor report: `MONITOR-<KIND>-<venture>-<date>`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    pub fn mint(kind: ReportKind, venture: &VentureId, at: DateTime<Utc>) -> Self {
        Self(format!(
            "MONITOR-{}-{}-{}",
            kind.as_str().to_uppercase(),
            venture,
            at.format("%Y-%m-%d")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for an append-only audit entry
///
/// A short random suffix keeps ids unique when several state changes
/// land within the same second.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditId(String);

impl AuditId {
    pub fn mint(at: DateTime<Utc>) -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "AUDIT-{}-{}",
            at.format("%Y-%m-%d-%H-%M-%S"),
            &suffix[..8]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a candidate was discovered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Reddit,
    HackerNews,
    Twitter,
    ProductHunt,
    Telegram,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provenance::Reddit => "Reddit",
            Provenance::HackerNews => "HackerNews",
            Provenance::Twitter => "Twitter",
            Provenance::ProductHunt => "ProductHunt",
            Provenance::Telegram => "Telegram",
        };
        write!(f, "{name}")
    }
}

/// Delivery track for a venture: Fast (≤7 days to MVP) or Long (up to 3 months)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Track {
    Fast,
    Long,
}

impl Track {
    /// Default MRR target used when building a blueprint
    pub fn target_mrr(self) -> f64 {
        match self {
            Track::Fast => 10_000.0,
            Track::Long => 50_000.0,
        }
    }

    /// Default user-count target used when building a blueprint
    pub fn target_users(self) -> u64 {
        match self {
            Track::Fast => 100,
            Track::Long => 500,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Fast => write!(f, "FAST"),
            Track::Long => write!(f, "LONG"),
        }
    }
}

/// Candidate lifecycle status
///
/// `Validated` and `Rejected` are terminal; a candidate is decided at
/// most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    PendingValidation,
    Validated,
    Rejected,
}

impl CandidateStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, CandidateStatus::PendingValidation)
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateStatus::PendingValidation => write!(f, "pending_validation"),
            CandidateStatus::Validated => write!(f, "validated"),
            CandidateStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Graded result of one scoring pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Green => write!(f, "GREEN"),
            Verdict::Yellow => write!(f, "YELLOW"),
            Verdict::Red => write!(f, "RED"),
        }
    }
}

/// Binary outcome of a scoring run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "NO-GO")]
    NoGo,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Go => write!(f, "GO"),
            Outcome::NoGo => write!(f, "NO-GO"),
        }
    }
}

/// Venture lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VentureStatus {
    Validating,
    Building,
    Active,
    Launched,
    Paused,
    Killed,
}

impl VentureStatus {
    /// Whether a transition to `next` is an allowed state-machine edge.
    ///
    /// `Killed` is terminal; everything else may move forward or be
    /// paused/resumed.
    pub fn can_transition(self, next: VentureStatus) -> bool {
        use VentureStatus::*;
        match (self, next) {
            (Killed, _) => false,
            (_, Killed) => true,
            (Validating, Building | Active) => true,
            (Building, Active | Launched | Paused) => true,
            (Active, Launched | Paused) => true,
            (Launched, Active | Paused) => true,
            (Paused, Active) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, VentureStatus::Killed)
    }
}

impl fmt::Display for VentureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VentureStatus::Validating => "validating",
            VentureStatus::Building => "building",
            VentureStatus::Active => "active",
            VentureStatus::Launched => "launched",
            VentureStatus::Paused => "paused",
            VentureStatus::Killed => "killed",
        };
        write!(f, "{name}")
    }
}

/// Period-over-period direction of a tracked metric
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Graded recommendation produced by the monitor analyzer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Continue,
    Warning,
    Pivot,
    Kill,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Recommendation::Continue => "CONTINUE",
            Recommendation::Warning => "WARNING",
            Recommendation::Pivot => "PIVOT",
            Recommendation::Kill => "KILL",
        };
        write!(f, "{name}")
    }
}

/// Cadence of a monitor report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Daily,
    Weekly,
    Monthly,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Weekly => "weekly",
            ReportKind::Monthly => "monthly",
        }
    }
}

/// System role responsible for a state-changing action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Scout,
    Validator,
    Launcher,
    Monitor,
    Orchestrator,
    User,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Actor::Scout => "scout",
            Actor::Validator => "validator",
            Actor::Launcher => "launcher",
            Actor::Monitor => "monitor",
            Actor::Orchestrator => "orchestrator",
            Actor::User => "user",
        };
        write!(f, "{name}")
    }
}

/// Severity grade of an assessed risk
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Likelihood grade attached to a risk note at discovery time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Probability {
    Low,
    Medium,
    High,
}

/// Billing cadence behind an asking price
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceCadence {
    OneTime,
    Monthly,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn venture_id_format_pads_sequence() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let id = VentureId::mint(at, 7, "habit-tracker");
        assert_eq!(id.as_str(), "V-2026-007-habit-tracker");
    }

    #[test]
    fn killed_is_terminal() {
        assert!(!VentureStatus::Killed.can_transition(VentureStatus::Active));
        assert!(VentureStatus::Active.can_transition(VentureStatus::Killed));
        assert!(VentureStatus::Paused.can_transition(VentureStatus::Active));
        assert!(!VentureStatus::Paused.can_transition(VentureStatus::Launched));
    }

    #[test]
    fn track_targets_fast_below_long() {
        assert!(Track::Fast.target_mrr() < Track::Long.target_mrr());
        assert!(Track::Fast.target_users() < Track::Long.target_users());
    }
}
