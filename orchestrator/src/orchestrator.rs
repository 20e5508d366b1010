//! Lifecycle orchestrator
//!
//! Top-level coordinator for the candidate→venture lifecycle. Owns the
//! guard checks (budget, run intervals), drives the scoring runner and
//! the venture monitor, and pairs every state change with exactly one
//! audit entry in the same store commit.

use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::monitor::{FleetSummary, VentureMonitor};
use crate::pipeline::ScoringRunner;
use crate::traits::{Record, RecordStore, Scaffolder, SignalSource};
use chrono::{DateTime, Datelike, Utc};
use tokio::sync::Mutex;
use shared::{
    actor_info, actor_warn, AuditEntry, AuditId, AuditPayload, Actor, Candidate, CandidateId,
    Decision, MetricsSnapshot, Outcome, ProcessState, Recommendation, Venture, VentureId,
    VentureStatus,
};

/// Why a guarded stage declined to run.
///
/// Skips are ordinary outcomes, not errors: a scheduler probing every
/// tick is expected to hit them most of the time.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    Disabled,
    BudgetExceeded { spent: f64, limit: f64 },
    IntervalNotElapsed { hours_since: f64, required: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiscoveryOutcome {
    Completed { found: usize, persisted: usize },
    Skipped(SkipReason),
}

#[derive(Debug)]
pub struct ValidationOutcome {
    pub decision: Decision,
    /// Present when the decision was Go and auto-launch is configured
    pub venture: Option<Venture>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MonitoringOutcome {
    Completed(FleetSummary),
    Skipped(SkipReason),
}

/// The venture factory's coordinating component.
///
/// Generic over its three injected seams so tests run against mocks
/// and the in-memory store.
pub struct Orchestrator<S, D, G> {
    store: S,
    signals: D,
    scaffolder: G,
    config: OrchestratorConfig,
    runner: ScoringRunner,
    monitor: VentureMonitor,
    /// Serializes read-modify-write of the singleton process state, so
    /// concurrent stages cannot both read sequence N and mint the same
    /// venture id or lose a counter update.
    state_lock: Mutex<()>,
}

impl<S, D, G> Orchestrator<S, D, G>
where
    S: RecordStore,
    D: SignalSource,
    G: Scaffolder,
{
    pub fn new(store: S, signals: D, scaffolder: G, config: OrchestratorConfig) -> Self {
        Self {
            store,
            signals,
            scaffolder,
            config,
            runner: ScoringRunner::new(),
            monitor: VentureMonitor::default(),
            state_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Discovery stage: pull candidates from the signal source,
    /// keep the ones above the confidence threshold, audit the counts.
    pub async fn run_discovery(&self) -> OrchestratorResult<DiscoveryOutcome> {
        let now = Utc::now();
        actor_info!(Actor::Scout, "🔍 Running discovery stage");

        if !self.config.discovery.enabled {
            return Ok(DiscoveryOutcome::Skipped(SkipReason::Disabled));
        }

        let state_guard = self.state_lock.lock().await;
        let mut state = self.load_state(now).await?;

        if self.config.budget.stop_when_exceeded
            && state.budget_spent >= self.config.budget.monthly_limit
        {
            actor_warn!(
                Actor::Scout,
                "⚠️ Budget exceeded ({:.0}/{:.0}), discovery skipped",
                state.budget_spent,
                self.config.budget.monthly_limit
            );
            return Ok(DiscoveryOutcome::Skipped(SkipReason::BudgetExceeded {
                spent: state.budget_spent,
                limit: self.config.budget.monthly_limit,
            }));
        }

        if let Some(last_run) = state.last_discovery_run {
            let hours_since = hours_between(last_run, now);
            if hours_since < self.config.discovery.run_interval_hours {
                actor_warn!(
                    Actor::Scout,
                    "⚠️ Discovery ran {:.1}h ago, skipping",
                    hours_since
                );
                return Ok(DiscoveryOutcome::Skipped(SkipReason::IntervalNotElapsed {
                    hours_since,
                    required: self.config.discovery.run_interval_hours,
                }));
            }
        }

        let found = self
            .signals
            .discover(self.config.discovery.max_candidates_per_run)
            .await?;
        let threshold = self.config.discovery.confidence_threshold;
        let quality: Vec<Candidate> = found
            .iter()
            .filter(|c| c.confidence_score >= threshold)
            .cloned()
            .collect();

        actor_info!(
            Actor::Scout,
            "✅ Discovery found {} candidates, {} above threshold ({})",
            found.len(),
            quality.len(),
            threshold
        );

        state.last_discovery_run = Some(now);

        let mut records: Vec<Record> = quality.iter().cloned().map(Record::Candidate).collect();
        records.push(Record::State(state));
        records.push(Record::Audit(AuditEntry {
            id: AuditId::mint(now),
            timestamp: now,
            venture_id: None,
            actor: Actor::Scout,
            result: format!("{} candidates persisted", quality.len()),
            payload: AuditPayload::SignalsDiscovered {
                found: found.len(),
                persisted: quality.len(),
                confidence_threshold: threshold,
            },
        }));
        self.store.commit(records).await?;
        // released before auto-validation, which re-enters the lock
        drop(state_guard);

        if self.config.validation.auto_validate {
            actor_info!(Actor::Scout, "🔄 Auto-validation enabled");
            for candidate in &quality {
                if let Err(err) = self.run_validation(&candidate.id).await {
                    // one bad candidate must not stall the rest of the batch
                    shared::logging::log_error(Actor::Validator, "Auto-validation failed", &err);
                }
            }
        }

        Ok(DiscoveryOutcome::Completed {
            found: found.len(),
            persisted: quality.len(),
        })
    }

    /// Validation stage: score one pending candidate and record the
    /// decision. Terminal candidates are refused; decisions are
    /// immutable.
    pub async fn run_validation(
        &self,
        candidate_id: &CandidateId,
    ) -> OrchestratorResult<ValidationOutcome> {
        let now = Utc::now();
        actor_info!(Actor::Validator, "🔬 Validating candidate {}", candidate_id);

        if !self.config.validation.enabled {
            return Err(OrchestratorError::StageDisabled { stage: "validation" });
        }

        let mut candidate = self.store.candidate(candidate_id).await?.ok_or_else(|| {
            OrchestratorError::NotFound {
                kind: "candidate",
                id: candidate_id.to_string(),
            }
        })?;

        if candidate.status.is_terminal() {
            return Err(OrchestratorError::CandidateAlreadyDecided {
                id: candidate_id.to_string(),
                status: candidate.status.to_string(),
            });
        }

        let decision = self.runner.evaluate(&candidate, now).await?;
        if !decision.blueprint_invariant_holds() {
            return Err(OrchestratorError::invariant(format!(
                "decision {} carries a blueprint/outcome mismatch",
                decision.id
            )));
        }

        candidate.status = match decision.outcome {
            Outcome::Go => shared::CandidateStatus::Validated,
            Outcome::NoGo => shared::CandidateStatus::Rejected,
        };
        candidate.decision_id = Some(decision.id.clone());

        let state_guard = self.state_lock.lock().await;
        let mut state = self.load_state(now).await?;
        state.last_validation_run = Some(now);

        self.store
            .commit(vec![
                Record::Decision(decision.clone()),
                Record::Candidate(candidate.clone()),
                Record::State(state),
                Record::Audit(AuditEntry {
                    id: AuditId::mint(now),
                    timestamp: now,
                    venture_id: None,
                    actor: Actor::Validator,
                    result: decision.outcome.to_string(),
                    payload: AuditPayload::ValidationCompleted {
                        candidate_id: candidate.id.clone(),
                        decision_id: decision.id.clone(),
                        verdicts: decision.verdicts,
                        outcome: decision.outcome,
                    },
                }),
            ])
            .await?;
        // released before auto-launch, which re-enters the lock
        drop(state_guard);

        actor_info!(
            Actor::Validator,
            "✅ Validation complete: {}",
            decision.outcome
        );

        let venture = if decision.outcome == Outcome::Go
            && self.config.launch.auto_launch
            && !self.config.launch.require_approval
        {
            actor_info!(Actor::Launcher, "🚀 Auto-launch enabled, creating venture");
            Some(self.launch_venture(&decision).await?)
        } else {
            None
        };

        Ok(ValidationOutcome { decision, venture })
    }

    /// Look up a decision by id and launch from it.
    pub async fn launch_from_decision(
        &self,
        decision_id: &shared::DecisionId,
    ) -> OrchestratorResult<Venture> {
        let decision = self.store.decision(decision_id).await?.ok_or_else(|| {
            OrchestratorError::NotFound {
                kind: "decision",
                id: decision_id.to_string(),
            }
        })?;
        self.launch_venture(&decision).await
    }

    /// Launch stage: mint the venture from a Go decision's blueprint,
    /// then hand the blueprint to the code-generation collaborator.
    /// The scaffold request is fire-and-forget: its failure is logged
    /// and never rolls back the venture.
    pub async fn launch_venture(&self, decision: &Decision) -> OrchestratorResult<Venture> {
        let now = Utc::now();

        if !self.config.launch.enabled {
            return Err(OrchestratorError::StageDisabled { stage: "launch" });
        }

        let blueprint = match (&decision.outcome, &decision.blueprint) {
            (Outcome::Go, Some(blueprint)) => blueprint.clone(),
            _ => {
                return Err(OrchestratorError::invariant(format!(
                    "decision {} is not launchable",
                    decision.id
                )))
            }
        };

        actor_info!(Actor::Launcher, "🚀 Launching venture: {}", blueprint.name);

        // sequence minting and the state write must be one critical
        // section, or two concurrent launches reuse a sequence number
        let state_guard = self.state_lock.lock().await;
        let mut state = self.load_state(now).await?;
        state.venture_sequence += 1;
        let venture_id = VentureId::mint(now, state.venture_sequence, &blueprint.slug);

        let venture = Venture {
            id: venture_id.clone(),
            name: blueprint.name.clone(),
            slug: blueprint.slug.clone(),
            status: VentureStatus::Active,
            track: blueprint.targets.track,
            created_at: now,
            launched_at: None,
            paused_at: None,
            killed_at: None,
            metrics: MetricsSnapshot::zeroed(),
            candidate_id: decision.candidate_id.clone(),
            decision_id: decision.id.clone(),
            blueprint: blueprint.clone(),
            pause_reason: None,
            kill_reason: None,
        };

        self.store
            .commit(vec![
                Record::Venture(venture.clone()),
                Record::State(state),
                Record::Audit(AuditEntry {
                    id: AuditId::mint(now),
                    timestamp: now,
                    venture_id: Some(venture_id.clone()),
                    actor: Actor::Launcher,
                    result: venture_id.to_string(),
                    payload: AuditPayload::VentureLaunched {
                        venture_id: venture_id.clone(),
                        name: venture.name.clone(),
                        track: venture.track,
                    },
                }),
            ])
            .await?;
        drop(state_guard);

        actor_info!(Actor::Launcher, "✅ Venture {} created", venture_id);

        match self.scaffolder.request_scaffold(&venture, &blueprint).await {
            Ok(receipt) if receipt.accepted => {
                actor_info!(
                    Actor::Launcher,
                    "🤖 Scaffold request accepted: {}",
                    receipt.reference.as_deref().unwrap_or("no reference")
                );
            }
            Ok(_) => {
                actor_warn!(Actor::Launcher, "⚠️ Scaffold request not accepted");
            }
            Err(err) => {
                shared::logging::log_error(Actor::Launcher, "Scaffold request failed", &err);
            }
        }

        Ok(venture)
    }

    /// Monitoring stage: analyze every Active venture against its last
    /// report and, when auto-kill is armed, apply the recommendation.
    pub async fn run_monitoring(&self) -> OrchestratorResult<MonitoringOutcome> {
        let now = Utc::now();
        actor_info!(Actor::Monitor, "📊 Running monitoring stage");

        if !self.config.monitoring.enabled {
            return Ok(MonitoringOutcome::Skipped(SkipReason::Disabled));
        }

        // held across the whole sweep so a concurrent launch cannot be
        // overwritten by the stale state committed at the end
        let _state_guard = self.state_lock.lock().await;
        let mut state = self.load_state(now).await?;
        if let Some(last_run) = state.last_monitoring_run {
            let hours_since = hours_between(last_run, now);
            if hours_since < self.config.monitoring.run_interval_hours {
                actor_warn!(
                    Actor::Monitor,
                    "⚠️ Monitoring ran {:.1}h ago, skipping",
                    hours_since
                );
                return Ok(MonitoringOutcome::Skipped(SkipReason::IntervalNotElapsed {
                    hours_since,
                    required: self.config.monitoring.run_interval_hours,
                }));
            }
        }

        let active = self.store.list_ventures(Some(VentureStatus::Active)).await?;
        actor_info!(Actor::Monitor, "Monitoring {} active ventures", active.len());

        let mut reports = Vec::with_capacity(active.len());
        for venture in &active {
            let previous = self
                .store
                .latest_report(&venture.id)
                .await?
                .map(|r| r.metrics);
            let report = self
                .monitor
                .analyze(venture, previous.as_ref(), false, now);

            let mut records = vec![Record::Report(report.clone())];
            if self.config.monitoring.auto_kill {
                match report.recommendation {
                    Recommendation::Kill => {
                        let (killed, audit) = transition(
                            venture.clone(),
                            VentureStatus::Killed,
                            Actor::Monitor,
                            Some(report.reasoning.clone()),
                            Some(Recommendation::Kill),
                            now,
                        )?;
                        actor_warn!(
                            Actor::Monitor,
                            "💀 Auto-kill applied to venture {}",
                            venture.id
                        );
                        records.push(Record::Venture(killed));
                        records.push(Record::Audit(audit));
                    }
                    Recommendation::Pivot => {
                        // a pivot flags the venture, it does not stop it
                        let mut flagged = venture.clone();
                        flagged.pause_reason = Some(report.reasoning.clone());
                        records.push(Record::Venture(flagged));
                        records.push(Record::Audit(AuditEntry {
                            id: AuditId::mint(now),
                            timestamp: now,
                            venture_id: Some(venture.id.clone()),
                            actor: Actor::Monitor,
                            result: Recommendation::Pivot.to_string(),
                            payload: AuditPayload::VentureStatusChanged {
                                venture_id: venture.id.clone(),
                                from: venture.status,
                                to: venture.status,
                                reason: Some(report.reasoning.clone()),
                                recommendation: Some(Recommendation::Pivot),
                            },
                        }));
                    }
                    Recommendation::Warning | Recommendation::Continue => {}
                }
            }
            self.store.commit(records).await?;
            reports.push(report);
        }

        let summary = FleetSummary::tally(&reports);
        state.last_monitoring_run = Some(now);
        self.store
            .commit(vec![
                Record::State(state),
                Record::Audit(AuditEntry {
                    id: AuditId::mint(now),
                    timestamp: now,
                    venture_id: None,
                    actor: Actor::Monitor,
                    result: format!(
                        "{} checked, {} healthy, {} warnings, {} critical, {:.0} MRR",
                        summary.checked,
                        summary.healthy,
                        summary.warnings,
                        summary.critical,
                        summary.total_mrr
                    ),
                    payload: AuditPayload::MonitoringCompleted {
                        ventures_checked: summary.checked,
                        healthy: summary.healthy,
                        warnings: summary.warnings,
                        critical: summary.critical,
                        total_mrr: summary.total_mrr,
                        total_revenue: summary.total_revenue,
                    },
                }),
            ])
            .await?;

        actor_info!(
            Actor::Monitor,
            "✅ Monitoring complete: {}/{} healthy",
            summary.healthy,
            summary.checked
        );
        Ok(MonitoringOutcome::Completed(summary))
    }

    /// Manually pause a venture.
    pub async fn pause_venture(
        &self,
        id: &VentureId,
        reason: impl Into<String>,
    ) -> OrchestratorResult<Venture> {
        let now = Utc::now();
        let venture = self.require_venture(id).await?;
        let (paused, audit) = transition(
            venture,
            VentureStatus::Paused,
            Actor::User,
            Some(reason.into()),
            None,
            now,
        )?;
        self.store
            .commit(vec![Record::Venture(paused.clone()), Record::Audit(audit)])
            .await?;
        actor_info!(Actor::Orchestrator, "⏸️ Venture {} paused", id);
        Ok(paused)
    }

    /// Manually resume a paused venture.
    pub async fn resume_venture(&self, id: &VentureId) -> OrchestratorResult<Venture> {
        let now = Utc::now();
        let venture = self.require_venture(id).await?;
        let (resumed, audit) = transition(
            venture,
            VentureStatus::Active,
            Actor::User,
            None,
            None,
            now,
        )?;
        self.store
            .commit(vec![Record::Venture(resumed.clone()), Record::Audit(audit)])
            .await?;
        actor_info!(Actor::Orchestrator, "▶️ Venture {} resumed", id);
        Ok(resumed)
    }

    /// Manually kill a venture. Terminal.
    pub async fn kill_venture(
        &self,
        id: &VentureId,
        reason: impl Into<String>,
    ) -> OrchestratorResult<Venture> {
        let now = Utc::now();
        let venture = self.require_venture(id).await?;
        let (killed, audit) = transition(
            venture,
            VentureStatus::Killed,
            Actor::User,
            Some(reason.into()),
            None,
            now,
        )?;
        self.store
            .commit(vec![Record::Venture(killed.clone()), Record::Audit(audit)])
            .await?;
        actor_info!(Actor::Orchestrator, "💀 Venture {} killed", id);
        Ok(killed)
    }

    async fn require_venture(&self, id: &VentureId) -> OrchestratorResult<Venture> {
        self.store
            .venture(id)
            .await?
            .ok_or_else(|| OrchestratorError::NotFound {
                kind: "venture",
                id: id.to_string(),
            })
    }

    /// Load the process state, seeding a fresh document on first run
    /// and rolling the budget over when the calendar month changed.
    async fn load_state(&self, now: DateTime<Utc>) -> OrchestratorResult<ProcessState> {
        let mut state = self
            .store
            .process_state()
            .await?
            .unwrap_or_else(|| ProcessState::fresh(now));

        let reset = state.budget_last_reset;
        if (now.year(), now.month()) != (reset.year(), reset.month()) {
            actor_info!(
                Actor::Orchestrator,
                "💰 New month, resetting budget spend ({:.0} spent last month)",
                state.budget_spent
            );
            state.budget_spent = 0.0;
            state.budget_last_reset = now;
        }
        Ok(state)
    }
}

/// Apply a status transition and produce its paired audit entry.
///
/// The venture and the entry must be committed in one batch; callers
/// never persist one without the other.
fn transition(
    mut venture: Venture,
    to: VentureStatus,
    actor: Actor,
    reason: Option<String>,
    recommendation: Option<Recommendation>,
    now: DateTime<Utc>,
) -> OrchestratorResult<(Venture, AuditEntry)> {
    let from = venture.status;
    if !from.can_transition(to) {
        return Err(OrchestratorError::IllegalTransition {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    venture.status = to;
    match to {
        VentureStatus::Paused => {
            venture.paused_at = Some(now);
            venture.pause_reason = reason.clone();
        }
        VentureStatus::Killed => {
            venture.killed_at = Some(now);
            venture.kill_reason = reason.clone();
        }
        VentureStatus::Active if from == VentureStatus::Paused => {
            venture.pause_reason = None;
        }
        _ => {}
    }

    let audit = AuditEntry {
        id: AuditId::mint(now),
        timestamp: now,
        venture_id: Some(venture.id.clone()),
        actor,
        result: format!("{from} -> {to}"),
        payload: AuditPayload::VentureStatusChanged {
            venture_id: venture.id.clone(),
            from,
            to,
            reason,
            recommendation,
        },
    };

    Ok((venture, audit))
}

fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 3_600_000.0
}
