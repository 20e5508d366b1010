//! Rate-limited call gate for the external dependency
//!
//! Serializes all outbound calls through a single FIFO queue, spaces
//! dispatches to respect a per-minute cap, and retries throttled calls
//! in place with a bounded per-item counter. One item's failure always
//! advances the queue; the gate never wedges.
//!
//! The queue is a fair async mutex: lock acquisition order equals
//! submission order, only one dispatch is in flight at a time, and a
//! caller that drops its future before acquiring the lock leaves the
//! queue without disturbing anyone else.

use crate::error::OrchestratorError;
use std::future::Future;
use std::sync::{Mutex as StdMutex, OnceLock};
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Gate tuning knobs
#[derive(Clone, Copy, Debug)]
pub struct GateConfig {
    pub max_requests_per_minute: u32,
    /// Fixed wait after a throttling signal before re-attempting
    pub retry_after: Duration,
    /// Total attempts allowed per item, including the first
    pub max_retries: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_requests_per_minute: 50,
            retry_after: Duration::from_secs(5),
            max_retries: 3,
        }
    }
}

/// Failure reported by a unit of work submitted to the gate
#[derive(Debug)]
pub enum CallFailure {
    /// Backpressure signal from the dependency; retried by the gate
    Throttled,
    /// Any other failure; surfaced to the caller unchanged
    Failed(anyhow::Error),
}

/// Terminal gate-side failure for one enqueued item
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("max retries ({attempts}) exceeded")]
    MaxRetriesExceeded { attempts: u32 },
    #[error(transparent)]
    Dependency(anyhow::Error),
}

impl From<GateError> for OrchestratorError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::MaxRetriesExceeded { attempts } => {
                OrchestratorError::MaxRetriesExceeded { attempts }
            }
            GateError::Dependency(source) => OrchestratorError::DependencyFailure {
                message: source.to_string(),
            },
        }
    }
}

/// Rolling one-minute window, measured from first use
#[derive(Debug, Default)]
struct WindowState {
    window_start: Option<Instant>,
    requests_this_minute: u32,
    last_dispatch: Option<Instant>,
}

const WINDOW: Duration = Duration::from_secs(60);
/// Small cushion past the window edge before dispatching again
const WINDOW_BUFFER: Duration = Duration::from_millis(100);

impl WindowState {
    fn roll(&mut self, now: Instant) {
        match self.window_start {
            None => self.window_start = Some(now),
            Some(start) if now.duration_since(start) >= WINDOW => {
                self.window_start = Some(now);
                self.requests_this_minute = 0;
            }
            Some(_) => {}
        }
    }

    /// Delay required before the next dispatch may leave, if any
    fn required_delay(&self, config: &GateConfig, now: Instant) -> Option<Duration> {
        if self.requests_this_minute >= config.max_requests_per_minute {
            let start = self.window_start.expect("window rolled before delay check");
            let until_reset = WINDOW.saturating_sub(now.duration_since(start));
            return Some(until_reset + WINDOW_BUFFER);
        }

        let min_spacing = Duration::from_millis(60_000 / u64::from(config.max_requests_per_minute));
        match self.last_dispatch {
            Some(last) => {
                let since = now.duration_since(last);
                (since < min_spacing).then(|| min_spacing - since)
            }
            None => None,
        }
    }

    fn record_dispatch(&mut self, now: Instant) {
        self.requests_this_minute += 1;
        self.last_dispatch = Some(now);
    }
}

/// Snapshot of the gate's current window, for diagnostics
#[derive(Clone, Copy, Debug)]
pub struct GateStatus {
    pub requests_this_minute: u32,
    pub can_dispatch: bool,
}

/// FIFO throttle in front of one rate-limited external dependency
pub struct CallGate {
    config: GateConfig,
    /// Fair queue: held for the whole dispatch (including spacing sleep
    /// and in-place retries), so items cannot overtake each other.
    dispatch: Mutex<()>,
    /// Window accounting, readable without joining the queue
    window: StdMutex<WindowState>,
}

impl CallGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            dispatch: Mutex::new(()),
            window: StdMutex::new(WindowState::default()),
        }
    }

    /// Process-wide gate for the code-generation dependency.
    ///
    /// Created on first use, lives until process shutdown.
    pub fn shared() -> &'static CallGate {
        static SHARED: OnceLock<CallGate> = OnceLock::new();
        SHARED.get_or_init(|| CallGate::new(GateConfig::default()))
    }

    /// Submit a unit of work and wait for its result.
    ///
    /// `work` must be re-invocable: on a throttling signal the same
    /// item is re-attempted (after `retry_after`) without advancing the
    /// queue, up to `max_retries` total attempts. Any other failure
    /// fails the item immediately and the queue moves on.
    pub async fn enqueue<T, F, Fut>(&self, mut work: F) -> Result<T, GateError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CallFailure>>,
    {
        let _slot = self.dispatch.lock().await;

        let mut attempts = 0u32;
        loop {
            self.pace().await;
            attempts += 1;

            match work().await {
                Ok(value) => return Ok(value),
                Err(CallFailure::Throttled) => {
                    if attempts >= self.config.max_retries {
                        return Err(GateError::MaxRetriesExceeded { attempts });
                    }
                    tracing::warn!(
                        attempts,
                        "⏳ dependency throttled, retrying in {:?}",
                        self.config.retry_after
                    );
                    sleep(self.config.retry_after).await;
                }
                Err(CallFailure::Failed(source)) => return Err(GateError::Dependency(source)),
            }
        }
    }

    /// Sleep until the window and spacing rules allow a dispatch, then
    /// record it.
    async fn pace(&self) {
        loop {
            let delay = {
                let mut window = self.window.lock().expect("gate window poisoned");
                let now = Instant::now();
                window.roll(now);
                match window.required_delay(&self.config, now) {
                    None => {
                        window.record_dispatch(now);
                        None
                    }
                    Some(delay) => Some(delay),
                }
            };
            match delay {
                None => return,
                Some(delay) => sleep(delay).await,
            }
        }
    }

    pub fn status(&self) -> GateStatus {
        let mut window = self.window.lock().expect("gate window poisoned");
        window.roll(Instant::now());
        GateStatus {
            requests_this_minute: window.requests_this_minute,
            can_dispatch: window.requests_this_minute < self.config.max_requests_per_minute,
        }
    }
}
