//! Trend and kill-criteria analyzer
//!
//! Produces one [`MonitorReport`] per venture from its current metrics
//! and the previous report's snapshot. The analysis is a pure function
//! of its inputs; persistence and status transitions stay with the
//! orchestrator.

use chrono::{DateTime, Duration, Utc};
use shared::{
    KillCriteriaSet, MetricsSnapshot, MonitorReport, Recommendation, ReportId, ReportKind,
    TrendDirection, TrendSet, Venture,
};

/// Health thresholds for the kill-criteria checks.
///
/// Hard-coded in the sense that nothing recomputes them at runtime,
/// but kept as configuration so operators can tune per deployment.
#[derive(Clone, Copy, Debug)]
pub struct MonitorThresholds {
    /// Daily visits below this trip `low_traffic`
    pub min_daily_visits: u64,
    /// Churn above this percentage trips `negative_economics`
    pub max_churn_rate: f64,
    /// Conversion below this percentage trips `negative_economics`
    /// once the venture has revenue
    pub min_conversion_rate: f64,
}

impl Default for MonitorThresholds {
    fn default() -> Self {
        Self {
            min_daily_visits: 10,
            max_churn_rate: 20.0,
            min_conversion_rate: 0.5,
        }
    }
}

/// Stateless venture health analyzer
#[derive(Clone, Copy, Debug, Default)]
pub struct VentureMonitor {
    thresholds: MonitorThresholds,
}

impl VentureMonitor {
    pub fn new(thresholds: MonitorThresholds) -> Self {
        Self { thresholds }
    }

    /// Analyze one venture.
    ///
    /// `previous` is the metrics snapshot from the last report, absent
    /// on the first check. `critical_bugs` is supplied by the caller;
    /// the analyzer never infers it from metrics.
    pub fn analyze(
        &self,
        venture: &Venture,
        previous: Option<&MetricsSnapshot>,
        critical_bugs: bool,
        now: DateTime<Utc>,
    ) -> MonitorReport {
        let metrics = venture.metrics;
        let trends = compute_trends(&metrics, previous);
        let kill_criteria = self.check_kill_criteria(venture, &metrics, critical_bugs, now);
        let (recommendation, reasoning, action_items) =
            self.recommend(venture, &metrics, &trends, &kill_criteria);

        MonitorReport {
            id: ReportId::mint(ReportKind::Daily, &venture.id, now),
            venture_id: venture.id.clone(),
            kind: ReportKind::Daily,
            created_at: now,
            metrics,
            trends,
            kill_criteria,
            recommendation,
            reasoning,
            action_items,
            next_check: now + Duration::hours(24),
        }
    }

    fn check_kill_criteria(
        &self,
        venture: &Venture,
        metrics: &MetricsSnapshot,
        critical_bugs: bool,
        now: DateTime<Utc>,
    ) -> KillCriteriaSet {
        let age_days = venture.age_days(now);
        // total_users stands in for purchases until real checkout
        // events are wired through
        let purchases = metrics.total_users;

        KillCriteriaSet {
            zero_transactions: age_days > 7 && purchases == 0 && metrics.total_revenue == 0.0,
            low_traffic: metrics.daily_visits < self.thresholds.min_daily_visits,
            negative_economics: metrics.churn_rate > self.thresholds.max_churn_rate
                || (metrics.mrr > 0.0
                    && metrics.conversion_rate < self.thresholds.min_conversion_rate),
            critical_bugs,
            no_growth: age_days > 14 && metrics.mrr == 0.0,
        }
    }

    /// Recommendation precedence, first match wins:
    /// KILL, then PIVOT, then WARNING, then CONTINUE.
    fn recommend(
        &self,
        venture: &Venture,
        metrics: &MetricsSnapshot,
        trends: &TrendSet,
        kill_criteria: &KillCriteriaSet,
    ) -> (Recommendation, String, Vec<String>) {
        let triggered = kill_criteria.triggered_count();

        if kill_criteria.critical_bugs || triggered >= 2 {
            let names = kill_criteria.triggered_names().join(", ");
            return (
                Recommendation::Kill,
                format!(
                    "{triggered} kill criteria triggered: {names}. \
                     Close the venture and move on to the next idea."
                ),
                vec![
                    "Run a post-mortem analysis".to_string(),
                    "Document the learnings".to_string(),
                    "Close the venture".to_string(),
                ],
            );
        }

        if triggered == 1
            || (trends.mrr == TrendDirection::Down && trends.revenue == TrendDirection::Down)
        {
            let issue = kill_criteria
                .triggered_names()
                .first()
                .copied()
                .unwrap_or("declining metrics");
            return (
                Recommendation::Pivot,
                format!("Problem detected: {issue}. The current strategy is not working."),
                vec![
                    "Run customer interviews to understand the causes".to_string(),
                    "Re-examine the value proposition and positioning".to_string(),
                    "Test alternative pricing".to_string(),
                ],
            );
        }

        if trends.down_count() >= 2 {
            let mut action_items = Vec::new();
            if trends.visits == TrendDirection::Down {
                action_items.push("Increase marketing activity".to_string());
            }
            if trends.revenue == TrendDirection::Down {
                action_items.push("Inspect the sales funnel for drop-off points".to_string());
            }
            if trends.mrr == TrendDirection::Down {
                action_items.push("Run a retention campaign for existing customers".to_string());
            }
            return (
                Recommendation::Warning,
                "Several metrics are trending down. Needs attention, \
                 but not yet critical."
                    .to_string(),
                action_items,
            );
        }

        let reasoning = if trends.up_count() >= 2 {
            "The venture shows positive momentum. Keep going in the same direction.".to_string()
        } else {
            "The venture is stable. Continue the current strategy.".to_string()
        };

        let mut action_items = Vec::new();
        if metrics.mrr < venture.blueprint.targets.target_mrr {
            action_items.push("Keep working on MRR growth".to_string());
        }
        if metrics.conversion_rate < 2.0 {
            action_items.push("Optimize the conversion rate".to_string());
        }
        if metrics.daily_visits < 100 {
            action_items.push("Grow traffic through content marketing".to_string());
        }
        if action_items.is_empty() {
            action_items.push("Maintain the current course".to_string());
            action_items.push("Look for scaling opportunities".to_string());
        }

        (Recommendation::Continue, reasoning, action_items)
    }
}

fn compute_trends(current: &MetricsSnapshot, previous: Option<&MetricsSnapshot>) -> TrendSet {
    let Some(previous) = previous else {
        return TrendSet::all_stable();
    };

    TrendSet {
        visits: trend(current.daily_visits as f64, previous.daily_visits as f64),
        purchases: trend(current.total_users as f64, previous.total_users as f64),
        revenue: trend(current.total_revenue, previous.total_revenue),
        mrr: trend(current.mrr, previous.mrr),
    }
}

fn trend(current: f64, previous: f64) -> TrendDirection {
    if previous == 0.0 {
        return if current > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Stable
        };
    }
    let change_percent = (current - previous) / previous * 100.0;
    if change_percent > 5.0 {
        TrendDirection::Up
    } else if change_percent < -5.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

/// Rollup of one monitoring pass over the active fleet
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FleetSummary {
    pub checked: usize,
    pub healthy: usize,
    pub warnings: usize,
    pub critical: usize,
    /// Combined MRR across every checked venture
    pub total_mrr: f64,
    pub total_revenue: f64,
}

impl FleetSummary {
    pub fn tally(reports: &[MonitorReport]) -> Self {
        let mut summary = Self {
            checked: reports.len(),
            ..Self::default()
        };
        for report in reports {
            match report.recommendation {
                Recommendation::Continue => summary.healthy += 1,
                Recommendation::Warning => summary.warnings += 1,
                Recommendation::Pivot | Recommendation::Kill => summary.critical += 1,
            }
            summary.total_mrr += report.metrics.mrr;
            summary.total_revenue += report.metrics.total_revenue;
        }
        summary
    }
}
