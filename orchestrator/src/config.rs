//! Orchestrator configuration
//!
//! Immutable per run. Defaults mirror the manual-gated "phase 1" mode:
//! discovery and monitoring run at most once a day, validation and
//! launch wait for an operator, and the budget guard is armed.

use serde::{Deserialize, Serialize};

/// Process-wide configuration for all orchestrator stages
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub discovery: DiscoveryConfig,
    pub validation: ValidationConfig,
    pub launch: LaunchConfig,
    pub monitoring: MonitoringConfig,
    pub budget: BudgetConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub enabled: bool,
    /// Minimum hours between discovery runs
    pub run_interval_hours: f64,
    pub max_candidates_per_run: u32,
    /// Candidates below this confidence are dropped, not persisted
    pub confidence_threshold: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub enabled: bool,
    /// Validate freshly discovered candidates without waiting for a command
    pub auto_validate: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub enabled: bool,
    /// Launch a venture immediately on a Go decision
    pub auto_launch: bool,
    pub require_approval: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    /// Minimum hours between monitoring sweeps
    pub run_interval_hours: f64,
    /// Apply Kill recommendations to venture status automatically
    pub auto_kill: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub monthly_limit: f64,
    pub stop_when_exceeded: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig {
                enabled: true,
                run_interval_hours: 24.0,
                max_candidates_per_run: 10,
                confidence_threshold: 70,
            },
            validation: ValidationConfig {
                enabled: true,
                auto_validate: false,
            },
            launch: LaunchConfig {
                enabled: true,
                auto_launch: false,
                require_approval: true,
            },
            monitoring: MonitoringConfig {
                enabled: true,
                run_interval_hours: 24.0,
                auto_kill: false,
            },
            budget: BudgetConfig {
                monthly_limit: 50_000.0,
                stop_when_exceeded: true,
            },
        }
    }
}

impl OrchestratorConfig {
    /// Fully automatic mode: every stage chained, kill decisions applied.
    pub fn autonomous() -> Self {
        let mut config = Self::default();
        config.validation.auto_validate = true;
        config.launch.auto_launch = true;
        config.launch.require_approval = false;
        config.monitoring.auto_kill = true;
        config
    }
}
