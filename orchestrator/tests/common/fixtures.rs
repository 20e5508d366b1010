//! Test fixtures and data for orchestrator tests
//!
//! Consistent candidates and ventures used across the integration
//! suites. Strong candidates pass every scoring pipeline; weak ones
//! fail the risk pipeline.

use chrono::{DateTime, Duration, TimeZone, Utc};
use shared::{
    AskingPrice, Audience, Blueprint, Candidate, CandidateId, CandidateStatus, CompetitorNote,
    CriteriaFlags, DecisionId, MandatoryCriteria, MetricsSnapshot, OptionalCriteria, PriceCadence,
    PricingPlan, Probability, Provenance, RiskNote, TargetMetrics, Track, Venture, VentureId,
    VentureStatus,
};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub fn discovery_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 9, 30, 0).unwrap()
    }

    /// 5 mandatory + 3 optional criteria = confidence 84
    pub fn quality_criteria() -> CriteriaFlags {
        CriteriaFlags {
            mandatory: MandatoryCriteria {
                repeatability: true,
                audience_size: true,
                payment_willingness: true,
                feasibility: true,
                no_free_alternatives: true,
            },
            optional: OptionalCriteria {
                urgency: true,
                simple_mvp: true,
                viral_potential: false,
                recurring_revenue: true,
                low_competition: false,
            },
        }
    }

    /// A candidate every scoring pipeline grades Green
    pub fn strong_candidate(discovered_at: DateTime<Utc>) -> Candidate {
        Candidate {
            id: CandidateId::mint(discovered_at),
            discovered_at,
            source: Provenance::Reddit,
            source_url: "https://reddit.com/r/SaaS/comments/abc".to_string(),
            confidence_score: Self::quality_criteria().confidence_score(),
            problem: "Freelancers lose hours chasing unpaid invoices.".to_string(),
            target_audience: "Solo freelancers and small agencies".to_string(),
            pitch: "Invoice Chaser. Automated, polite payment reminders over email.".to_string(),
            price: AskingPrice {
                amount: 990.0,
                cadence: PriceCadence::Monthly,
            },
            track: Track::Fast,
            key_features: vec![
                "Reminder schedules".to_string(),
                "Payment links".to_string(),
                "Aging dashboard".to_string(),
            ],
            competitors: vec![CompetitorNote {
                name: "SpreadsheetTemplates Inc".to_string(),
                description: "Manual templates".to_string(),
                free: true,
            }],
            advantage: "Fully automated follow-up".to_string(),
            criteria: Self::quality_criteria(),
            risks: vec![RiskNote {
                description: "Email deliverability".to_string(),
                probability: Probability::Low,
                mitigation: "Use an established sending provider".to_string(),
            }],
            status: CandidateStatus::PendingValidation,
            decision_id: None,
        }
    }

    /// Too many medium risks: the risk pipeline grades Red
    pub fn risky_candidate(discovered_at: DateTime<Utc>) -> Candidate {
        let mut candidate = Self::strong_candidate(discovered_at);
        candidate.risks = (0..3)
            .map(|i| RiskNote {
                description: format!("Operational risk {i}"),
                probability: Probability::Medium,
                mitigation: "Monitor closely".to_string(),
            })
            .collect();
        candidate
    }

    /// Confidence below the default persistence threshold (70)
    pub fn low_confidence_candidate(discovered_at: DateTime<Utc>) -> Candidate {
        let mut candidate = Self::strong_candidate(discovered_at);
        candidate.criteria = CriteriaFlags {
            mandatory: MandatoryCriteria {
                repeatability: true,
                audience_size: true,
                payment_willingness: false,
                feasibility: true,
                no_free_alternatives: false,
            },
            optional: OptionalCriteria::default(),
        };
        candidate.confidence_score = candidate.criteria.confidence_score();
        candidate
    }

    /// An Active venture created `days_old` days before `now`
    pub fn active_venture(sequence: u32, days_old: i64, now: DateTime<Utc>) -> Venture {
        let created_at = now - Duration::days(days_old);
        let blueprint = Blueprint {
            name: "Invoice Chaser".to_string(),
            slug: "invoice-chaser".to_string(),
            tagline: "Stop chasing invoices".to_string(),
            description: "Automated payment reminders".to_string(),
            audience: Audience {
                who: "Freelancers".to_string(),
                problem: "Unpaid invoices".to_string(),
                size: 50_000,
            },
            features: vec!["Reminder schedules".to_string()],
            pricing: PricingPlan {
                cadence: PriceCadence::Monthly,
                amount: 990.0,
            },
            targets: TargetMetrics {
                track: Track::Fast,
                target_mrr: Track::Fast.target_mrr(),
                target_users: Track::Fast.target_users(),
                conversion_rate: 1.0,
                kill_criteria: vec![],
            },
            risks: vec![],
        };

        Venture {
            id: VentureId::mint(created_at, sequence, &blueprint.slug),
            name: blueprint.name.clone(),
            slug: blueprint.slug.clone(),
            status: VentureStatus::Active,
            track: Track::Fast,
            created_at,
            launched_at: None,
            paused_at: None,
            killed_at: None,
            metrics: MetricsSnapshot::zeroed(),
            candidate_id: CandidateId::mint(created_at),
            decision_id: DecisionId::mint(created_at),
            blueprint,
            pause_reason: None,
            kill_reason: None,
        }
    }
}
