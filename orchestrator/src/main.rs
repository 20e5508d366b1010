//! Main entry point for the venture factory binary
//!
//! Wires the real service implementations into the orchestrator and
//! exposes each lifecycle stage as a subcommand.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use orchestrator::{
    services::{GithubScaffolder, InboxSignalSource, JsonFileStore},
    DiscoveryOutcome, MonitoringOutcome, Orchestrator, OrchestratorConfig, OrchestratorResult,
    SkipReason,
};
use shared::{actor_info, actor_warn, logging, Actor, CandidateId, DecisionId, VentureId};

/// Venture factory orchestrator
#[derive(Parser)]
#[command(name = "orchestrator")]
#[command(about = "Discovers, validates, launches and monitors micro-ventures")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Data directory for the JSON record store
    #[arg(long, default_value = "./factory")]
    data_dir: PathBuf,

    /// Inbox directory holding candidate draft files
    #[arg(long, default_value = "./factory/inbox")]
    inbox_dir: PathBuf,

    /// Run fully autonomously: auto-validate, auto-launch, auto-kill
    #[arg(long)]
    autonomous: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the discovery stage over the inbox
    Discover,
    /// Validate one pending candidate
    Validate {
        /// Candidate id (SIGNAL-...)
        candidate_id: String,
    },
    /// Launch a venture from a Go decision
    Launch {
        /// Decision id (VALIDATION-...)
        decision_id: String,
    },
    /// Run the monitoring sweep over active ventures
    Monitor,
    /// Run one full tick: discovery, then monitoring
    Run,
    /// Pause an active venture
    Pause {
        venture_id: String,
        #[arg(long, default_value = "paused by operator")]
        reason: String,
    },
    /// Resume a paused venture
    Resume { venture_id: String },
    /// Kill a venture (terminal)
    Kill {
        venture_id: String,
        #[arg(long, default_value = "killed by operator")]
        reason: String,
    },
}

#[tokio::main]
async fn main() -> OrchestratorResult<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    let config = if args.autonomous {
        OrchestratorConfig::autonomous()
    } else {
        OrchestratorConfig::default()
    };

    let store = JsonFileStore::new(args.data_dir.clone());
    let signals = InboxSignalSource::new(args.inbox_dir.clone());
    let scaffolder = GithubScaffolder::from_env();
    if !scaffolder.is_configured() {
        actor_warn!(
            Actor::Orchestrator,
            "⚠️ GITHUB_REPOSITORY/GITHUB_TOKEN not set, scaffolding disabled"
        );
    }

    let orchestrator = Orchestrator::new(store, signals, scaffolder, config);
    logging::log_startup(Actor::Orchestrator, "venture factory");

    match args.command {
        Command::Discover => {
            report_discovery(orchestrator.run_discovery().await?);
        }
        Command::Validate { candidate_id } => {
            let id = CandidateId::from_string(candidate_id);
            let outcome = orchestrator.run_validation(&id).await?;
            actor_info!(
                Actor::Orchestrator,
                "Decision {}: {}",
                outcome.decision.id,
                outcome.decision.outcome
            );
        }
        Command::Launch { decision_id } => {
            let id = DecisionId::from_string(decision_id);
            let venture = orchestrator.launch_from_decision(&id).await?;
            actor_info!(Actor::Orchestrator, "Venture {} launched", venture.id);
        }
        Command::Monitor => {
            report_monitoring(orchestrator.run_monitoring().await?);
        }
        Command::Run => {
            report_discovery(orchestrator.run_discovery().await?);
            report_monitoring(orchestrator.run_monitoring().await?);
        }
        Command::Pause { venture_id, reason } => {
            let id = VentureId::from_string(venture_id);
            orchestrator.pause_venture(&id, reason).await?;
        }
        Command::Resume { venture_id } => {
            let id = VentureId::from_string(venture_id);
            orchestrator.resume_venture(&id).await?;
        }
        Command::Kill { venture_id, reason } => {
            let id = VentureId::from_string(venture_id);
            orchestrator.kill_venture(&id, reason).await?;
        }
    }

    logging::log_shutdown(Actor::Orchestrator, "command complete");
    Ok(())
}

fn report_discovery(outcome: DiscoveryOutcome) {
    match outcome {
        DiscoveryOutcome::Completed { found, persisted } => {
            logging::log_success(
                Actor::Scout,
                &format!("discovery: {found} found, {persisted} persisted"),
            );
        }
        DiscoveryOutcome::Skipped(reason) => report_skip("discovery", &reason),
    }
}

fn report_monitoring(outcome: MonitoringOutcome) {
    match outcome {
        MonitoringOutcome::Completed(summary) => {
            logging::log_success(
                Actor::Monitor,
                &format!(
                    "monitoring: {} checked, {} healthy, {} warnings, {} critical, {:.0} total MRR",
                    summary.checked,
                    summary.healthy,
                    summary.warnings,
                    summary.critical,
                    summary.total_mrr
                ),
            );
        }
        MonitoringOutcome::Skipped(reason) => report_skip("monitoring", &reason),
    }
}

fn report_skip(stage: &str, reason: &SkipReason) {
    match reason {
        SkipReason::Disabled => {
            actor_warn!(Actor::Orchestrator, "{stage} is disabled");
        }
        SkipReason::BudgetExceeded { spent, limit } => {
            actor_warn!(
                Actor::Orchestrator,
                "{stage} skipped: budget exceeded ({spent:.0}/{limit:.0})"
            );
        }
        SkipReason::IntervalNotElapsed {
            hours_since,
            required,
        } => {
            actor_warn!(
                Actor::Orchestrator,
                "{stage} skipped: ran {hours_since:.1}h ago (interval {required:.0}h)"
            );
        }
    }
}
