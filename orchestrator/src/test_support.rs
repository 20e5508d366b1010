//! Fixtures shared by unit tests inside the crate

use chrono::{DateTime, Utc};
use shared::{
    Audience, Blueprint, Candidate, CandidateId, CandidateStatus, CompetitorNote, CriteriaFlags,
    DecisionId, MetricsSnapshot, PriceCadence, PricingPlan, Probability, Provenance, RiskNote,
    AskingPrice, TargetMetrics, Track, Venture, VentureId, VentureStatus,
};

pub(crate) fn candidate_fixture(now: DateTime<Utc>) -> Candidate {
    Candidate {
        id: CandidateId::mint(now),
        discovered_at: now,
        source: Provenance::Reddit,
        source_url: "https://reddit.com/r/SaaS/comments/fixture".to_string(),
        confidence_score: 84,
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
        criteria: CriteriaFlags::default(),
        risks: vec![RiskNote {
            description: "Email deliverability".to_string(),
            probability: Probability::Low,
            mitigation: "Use an established sending provider".to_string(),
        }],
        status: CandidateStatus::PendingValidation,
        decision_id: None,
    }
}

pub(crate) fn venture_fixture(now: DateTime<Utc>) -> Venture {
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
        id: VentureId::mint(now, 1, &blueprint.slug),
        name: blueprint.name.clone(),
        slug: blueprint.slug.clone(),
        status: VentureStatus::Active,
        track: Track::Fast,
        created_at: now,
        launched_at: None,
        paused_at: None,
        killed_at: None,
        metrics: MetricsSnapshot::zeroed(),
        candidate_id: CandidateId::mint(now),
        decision_id: DecisionId::mint(now),
        blueprint,
        pause_reason: None,
        kill_reason: None,
    }
}
