//! End-to-end tests for the venture factory lifecycle
//!
//! Each test drives the orchestrator through its public operations
//! against a real in-memory store, then inspects the persisted
//! records and the audit trail.

use chrono::{Duration, Utc};
use orchestrator::traits::{MockScaffolder, MockSignalSource, Record};
use orchestrator::{
    DiscoveryOutcome, MonitoringOutcome, OrchestratorConfig, OrchestratorError, SkipReason,
};
use orchestrator::traits::RecordStore;
use shared::{CandidateStatus, Outcome, ProcessState, Recommendation, Verdict, VentureStatus};

mod common;
use common::{FactoryBuilder, TestFixtures};

// ============================================================================
// Discovery
// ============================================================================

#[tokio::test]
async fn discovery_persists_quality_candidates_and_audits_counts() {
    // Arrange: one candidate above the confidence threshold, one below
    let factory = FactoryBuilder::new()
        .with_signals(|| {
            let mut signals = MockSignalSource::new();
            signals.expect_discover().times(1).returning(|_| {
                let at = TestFixtures::discovery_time();
                Ok(vec![
                    TestFixtures::strong_candidate(at),
                    TestFixtures::low_confidence_candidate(at + Duration::seconds(1)),
                ])
            });
            signals
        })
        .build()
        .await;

    // Act
    let outcome = factory.run_discovery().await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        DiscoveryOutcome::Completed {
            found: 2,
            persisted: 1,
        }
    );

    let persisted = factory.store().list_candidates(None).await.unwrap();
    assert_eq!(persisted.len(), 1);
    assert!(persisted[0].confidence_score >= 70);

    let trail = factory.store().audit_trail(None).await.unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action(), "signal_found");

    let state = factory.store().process_state().await.unwrap().unwrap();
    assert!(state.last_discovery_run.is_some());
}

#[tokio::test]
async fn discovery_is_idempotent_within_the_run_interval() {
    let factory = FactoryBuilder::new()
        .with_signals(|| {
            let mut signals = MockSignalSource::new();
            // the interval guard must keep the second run from reaching
            // the signal source at all
            signals.expect_discover().times(1).returning(|_| Ok(vec![]));
            signals
        })
        .build()
        .await;

    let first = factory.run_discovery().await.unwrap();
    let second = factory.run_discovery().await.unwrap();

    assert!(matches!(first, DiscoveryOutcome::Completed { .. }));
    assert!(matches!(
        second,
        DiscoveryOutcome::Skipped(SkipReason::IntervalNotElapsed { .. })
    ));
}

#[tokio::test]
async fn discovery_refuses_to_run_past_the_budget() {
    let mut exhausted = ProcessState::fresh(Utc::now());
    exhausted.budget_spent = 60_000.0;

    let factory = FactoryBuilder::new()
        .seeded_with(vec![Record::State(exhausted)])
        .build()
        .await;

    let outcome = factory.run_discovery().await.unwrap();

    assert_eq!(
        outcome,
        DiscoveryOutcome::Skipped(SkipReason::BudgetExceeded {
            spent: 60_000.0,
            limit: 50_000.0,
        })
    );
    assert!(factory.store().audit_trail(None).await.unwrap().is_empty());
}

// ============================================================================
// Validation
// ============================================================================

/// A strong candidate sails through all five pipelines: Go decision,
/// blueprint attached, candidate Validated, one audit entry.
#[tokio::test]
async fn validation_of_strong_candidate_is_go() {
    let candidate = TestFixtures::strong_candidate(TestFixtures::discovery_time());
    let factory = FactoryBuilder::new()
        .seeded_with(vec![Record::Candidate(candidate.clone())])
        .build()
        .await;

    let outcome = factory.run_validation(&candidate.id).await.unwrap();

    assert_eq!(outcome.decision.outcome, Outcome::Go);
    assert_eq!(outcome.decision.verdicts.as_array(), [Verdict::Green; 5]);
    assert!(outcome.decision.blueprint.is_some());
    // default config leaves launching to the operator
    assert!(outcome.venture.is_none());

    let stored = factory
        .store()
        .candidate(&candidate.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, CandidateStatus::Validated);
    assert_eq!(stored.decision_id.as_ref(), Some(&outcome.decision.id));

    let trail = factory.store().audit_trail(None).await.unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action(), "validation_completed");
    assert_eq!(trail[0].result, "GO");
}

/// Three medium risks turn the risk pipeline Red: NoGo, candidate
/// Rejected, no blueprint, no venture.
#[tokio::test]
async fn validation_of_risky_candidate_is_no_go() {
    let candidate = TestFixtures::risky_candidate(TestFixtures::discovery_time());
    let factory = FactoryBuilder::new()
        .seeded_with(vec![Record::Candidate(candidate.clone())])
        .build()
        .await;

    let outcome = factory.run_validation(&candidate.id).await.unwrap();

    assert_eq!(outcome.decision.outcome, Outcome::NoGo);
    assert_eq!(outcome.decision.verdicts.risk, Verdict::Red);
    assert!(outcome.decision.blueprint.is_none());

    let stored = factory
        .store()
        .candidate(&candidate.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, CandidateStatus::Rejected);
    assert!(factory
        .store()
        .list_ventures(None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn decided_candidates_cannot_be_revalidated() {
    let candidate = TestFixtures::strong_candidate(TestFixtures::discovery_time());
    let factory = FactoryBuilder::new()
        .seeded_with(vec![Record::Candidate(candidate.clone())])
        .build()
        .await;

    factory.run_validation(&candidate.id).await.unwrap();
    let err = factory.run_validation(&candidate.id).await.unwrap_err();

    assert!(matches!(
        err,
        OrchestratorError::CandidateAlreadyDecided { .. }
    ));
    // the decision stayed immutable: still exactly one audit entry
    let trail = factory.store().audit_trail(None).await.unwrap();
    assert_eq!(trail.len(), 1);
}

// ============================================================================
// Launch
// ============================================================================

#[tokio::test]
async fn auto_launch_mints_venture_and_requests_scaffold() {
    let candidate = TestFixtures::strong_candidate(TestFixtures::discovery_time());
    let factory = FactoryBuilder::new()
        .with_config(OrchestratorConfig::autonomous())
        .with_scaffolder(|| {
            let mut scaffolder = MockScaffolder::new();
            scaffolder
                .expect_request_scaffold()
                .times(1)
                .returning(|venture, _| {
                    Ok(orchestrator::ScaffoldReceipt {
                        accepted: true,
                        reference: Some(format!("venture/{}", venture.slug)),
                    })
                });
            scaffolder
        })
        .seeded_with(vec![Record::Candidate(candidate.clone())])
        .build()
        .await;

    let outcome = factory.run_validation(&candidate.id).await.unwrap();

    let venture = outcome.venture.expect("Go + auto-launch must create a venture");
    assert!(venture.id.as_str().contains("-001-invoice-chaser"));
    assert_eq!(venture.status, VentureStatus::Active);
    assert_eq!(venture.metrics, shared::MetricsSnapshot::zeroed());

    let actions: Vec<&str> = factory
        .store()
        .audit_trail(None)
        .await
        .unwrap()
        .iter()
        .map(|a| a.action())
        .collect();
    assert_eq!(actions, vec!["validation_completed", "venture_launched"]);
}

#[tokio::test]
async fn venture_sequence_is_monotonic_and_never_reused() {
    let at = TestFixtures::discovery_time();
    let first = TestFixtures::strong_candidate(at);
    let second = TestFixtures::strong_candidate(at + Duration::seconds(1));
    let third = TestFixtures::strong_candidate(at + Duration::seconds(2));

    let factory = FactoryBuilder::new()
        .with_config(OrchestratorConfig::autonomous())
        .seeded_with(vec![
            Record::Candidate(first.clone()),
            Record::Candidate(second.clone()),
            Record::Candidate(third.clone()),
        ])
        .build()
        .await;

    let v1 = factory
        .run_validation(&first.id)
        .await
        .unwrap()
        .venture
        .unwrap();
    let v2 = factory
        .run_validation(&second.id)
        .await
        .unwrap()
        .venture
        .unwrap();

    // killing an earlier venture must not free its sequence number
    factory.kill_venture(&v1.id, "test cleanup").await.unwrap();

    let v3 = factory
        .run_validation(&third.id)
        .await
        .unwrap()
        .venture
        .unwrap();

    assert!(v1.id.as_str().contains("-001-"));
    assert!(v2.id.as_str().contains("-002-"));
    assert!(v3.id.as_str().contains("-003-"));
}

/// Both launches read and bump the sequence counter; the counter
/// update must be serialized or they mint the same venture id.
#[tokio::test]
async fn concurrent_launches_mint_distinct_sequence_numbers() {
    let at = TestFixtures::discovery_time();
    let runner = orchestrator::ScoringRunner::new();
    let first = runner
        .evaluate(&TestFixtures::strong_candidate(at), at)
        .await
        .unwrap();
    let second = runner
        .evaluate(
            &TestFixtures::strong_candidate(at + Duration::seconds(1)),
            at + Duration::seconds(1),
        )
        .await
        .unwrap();

    let factory = FactoryBuilder::new().build().await;

    let (a, b) = tokio::join!(
        factory.launch_venture(&first),
        factory.launch_venture(&second)
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.id, b.id);
    let ventures = factory.store().list_ventures(None).await.unwrap();
    assert_eq!(ventures.len(), 2);
    let state = factory.store().process_state().await.unwrap().unwrap();
    assert_eq!(state.venture_sequence, 2);
}

/// With approval required, a Go decision validates the candidate but
/// leaves the launch to the operator even in auto-launch mode.
#[tokio::test]
async fn approval_gate_blocks_auto_launch() {
    let candidate = TestFixtures::strong_candidate(TestFixtures::discovery_time());
    let mut config = OrchestratorConfig::autonomous();
    config.launch.require_approval = true;

    let factory = FactoryBuilder::new()
        .with_config(config)
        .seeded_with(vec![Record::Candidate(candidate.clone())])
        .build()
        .await;

    let outcome = factory.run_validation(&candidate.id).await.unwrap();

    assert_eq!(outcome.decision.outcome, Outcome::Go);
    assert!(outcome.venture.is_none());
    assert!(factory.store().list_ventures(None).await.unwrap().is_empty());
}

/// The scaffold request is fire-and-forget: its failure never rolls
/// back the venture.
#[tokio::test]
async fn scaffold_failure_does_not_roll_back_the_launch() {
    let candidate = TestFixtures::strong_candidate(TestFixtures::discovery_time());
    let factory = FactoryBuilder::new()
        .with_config(OrchestratorConfig::autonomous())
        .with_scaffolder(|| {
            let mut scaffolder = MockScaffolder::new();
            scaffolder.expect_request_scaffold().times(1).returning(|_, _| {
                Err(OrchestratorError::DependencyFailure {
                    message: "github is down".to_string(),
                })
            });
            scaffolder
        })
        .seeded_with(vec![Record::Candidate(candidate.clone())])
        .build()
        .await;

    let outcome = factory.run_validation(&candidate.id).await.unwrap();

    let venture = outcome.venture.unwrap();
    let stored = factory
        .store()
        .venture(&venture.id)
        .await
        .unwrap()
        .expect("venture must survive a failed scaffold request");
    assert_eq!(stored.status, VentureStatus::Active);
}

// ============================================================================
// Monitoring
// ============================================================================

#[tokio::test]
async fn monitoring_auto_kills_a_stale_venture_with_paired_audit() {
    // day 20, zero metrics: zero_transactions + low_traffic + no_growth
    let venture = TestFixtures::active_venture(1, 20, Utc::now());
    let factory = FactoryBuilder::new()
        .with_config(OrchestratorConfig::autonomous())
        .seeded_with(vec![Record::Venture(venture.clone())])
        .build()
        .await;

    let outcome = factory.run_monitoring().await.unwrap();

    let MonitoringOutcome::Completed(summary) = outcome else {
        panic!("monitoring should have run");
    };
    assert_eq!(summary.checked, 1);
    assert_eq!(summary.critical, 1);

    let stored = factory
        .store()
        .venture(&venture.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, VentureStatus::Killed);
    assert!(stored.killed_at.is_some());
    assert!(stored.kill_reason.is_some());

    let report = factory
        .store()
        .latest_report(&venture.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.recommendation, Recommendation::Kill);

    // the transition and its audit entry land together
    let venture_trail = factory
        .store()
        .audit_trail(Some(venture.id.clone()))
        .await
        .unwrap();
    assert_eq!(venture_trail.len(), 1);
    assert_eq!(venture_trail[0].action(), "venture_status_changed");

    let all_actions: Vec<&str> = factory
        .store()
        .audit_trail(None)
        .await
        .unwrap()
        .iter()
        .map(|a| a.action())
        .collect();
    assert!(all_actions.contains(&"monitoring_completed"));
}

#[tokio::test]
async fn monitoring_without_auto_kill_only_reports() {
    let venture = TestFixtures::active_venture(1, 20, Utc::now());
    let factory = FactoryBuilder::new()
        .seeded_with(vec![Record::Venture(venture.clone())])
        .build()
        .await;

    let outcome = factory.run_monitoring().await.unwrap();

    assert!(matches!(outcome, MonitoringOutcome::Completed(_)));
    let stored = factory
        .store()
        .venture(&venture.id)
        .await
        .unwrap()
        .unwrap();
    // the KILL recommendation is recorded but not applied
    assert_eq!(stored.status, VentureStatus::Active);
    let report = factory
        .store()
        .latest_report(&venture.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.recommendation, Recommendation::Kill);
}

#[tokio::test]
async fn monitoring_skips_inside_its_run_interval() {
    let factory = FactoryBuilder::new().build().await;

    let first = factory.run_monitoring().await.unwrap();
    let second = factory.run_monitoring().await.unwrap();

    assert!(matches!(first, MonitoringOutcome::Completed(_)));
    assert!(matches!(
        second,
        MonitoringOutcome::Skipped(SkipReason::IntervalNotElapsed { .. })
    ));
}

// ============================================================================
// Manual lifecycle operations
// ============================================================================

#[tokio::test]
async fn pause_and_resume_round_trip_with_audits() {
    let venture = TestFixtures::active_venture(1, 3, Utc::now());
    let factory = FactoryBuilder::new()
        .seeded_with(vec![Record::Venture(venture.clone())])
        .build()
        .await;

    let paused = factory
        .pause_venture(&venture.id, "seasonal demand dip")
        .await
        .unwrap();
    assert_eq!(paused.status, VentureStatus::Paused);
    assert_eq!(paused.pause_reason.as_deref(), Some("seasonal demand dip"));
    assert!(paused.paused_at.is_some());

    let resumed = factory.resume_venture(&venture.id).await.unwrap();
    assert_eq!(resumed.status, VentureStatus::Active);
    assert_eq!(resumed.pause_reason, None);

    let trail = factory
        .store()
        .audit_trail(Some(venture.id.clone()))
        .await
        .unwrap();
    assert_eq!(trail.len(), 2);
    assert!(trail.iter().all(|a| a.action() == "venture_status_changed"));
}

#[tokio::test]
async fn killed_ventures_reject_further_transitions() {
    let venture = TestFixtures::active_venture(1, 3, Utc::now());
    let factory = FactoryBuilder::new()
        .seeded_with(vec![Record::Venture(venture.clone())])
        .build()
        .await;

    factory
        .kill_venture(&venture.id, "pivoting the whole factory")
        .await
        .unwrap();
    let err = factory.resume_venture(&venture.id).await.unwrap_err();

    assert!(matches!(err, OrchestratorError::IllegalTransition { .. }));
}
