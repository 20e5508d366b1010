//! Shared logging utilities for consistent tracing across the factory
//!
//! Log lines carry the acting system role (scout, validator, launcher,
//! monitor, orchestrator) so a single process log reads like the audit
//! trail does.

use crate::types::Actor;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Initialize the tracing subscriber with an optional base log level.
///
/// `RUST_LOG` overrides the computed filter when set.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let base_level = log_level.unwrap_or("info");
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("orchestrator={base_level},shared={base_level},reqwest=warn"));

    fmt()
        .with_env_filter(EnvFilter::new(&filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for actor-aware info logging
#[macro_export]
macro_rules! actor_info {
    ($actor:expr, $($arg:tt)*) => {
        tracing::info!(
            actor = %$actor,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for actor-aware warning logging
#[macro_export]
macro_rules! actor_warn {
    ($actor:expr, $($arg:tt)*) => {
        tracing::warn!(
            actor = %$actor,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for actor-aware error logging
#[macro_export]
macro_rules! actor_error {
    ($actor:expr, $($arg:tt)*) => {
        tracing::error!(
            actor = %$actor,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for actor-aware debug logging
#[macro_export]
macro_rules! actor_debug {
    ($actor:expr, $($arg:tt)*) => {
        tracing::debug!(
            actor = %$actor,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(actor: Actor, details: &str) {
    info!(
        actor = %actor,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(actor: Actor, reason: &str) {
    info!(
        actor = %actor,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for success messages
pub fn log_success(actor: Actor, details: &str) {
    info!(
        actor = %actor,
        timestamp = format_timestamp(),
        "✅ {}",
        details
    );
}

/// Contextual logging helper for error reporting
pub fn log_error(actor: Actor, context: &str, err: &dyn std::error::Error) {
    error!(
        actor = %actor,
        timestamp = format_timestamp(),
        "❌ {}: {}",
        context,
        err
    );
}
