//! Telemetry feed: polls the stats endpoint and derives gauge values
//!
//! A new snapshot replaces the previous one atomically on every tick.
//! When a fetch fails the previous raw sample is kept (stale over
//! blank) and the error is recorded in the snapshot; gauges for which
//! no raw data exists fall back to synthesized placeholder values, so
//! a consumer never sees a blank or NaN gauge. There is no backoff: a
//! down endpoint is retried every interval.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::Rng;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::services::StatsApi;

/// Placeholder link quality reported while interface data is present
/// but no real calculation exists yet
const NETWORK_MEASURED_STATUS: f64 = 90.0;
/// Composite status shown before any raw data has arrived
const SYSTEM_STATUS_FALLBACK: f64 = 85.0;
/// Security has no data source in scope; fixed placeholder
const SECURITY_LEVEL: f64 = 75.0;

/// Error string stored in the snapshot on any failed fetch
const FETCH_ERROR_MESSAGE: &str = "Failed to fetch system stats";

/// Raw sample from the stats endpoint. Every section is optional and
/// the derivation rules fall back per field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStats {
    #[serde(default)]
    pub cpu: Option<Vec<CoreStat>>,
    #[serde(default)]
    pub memory: Option<MemoryStats>,
    #[serde(default)]
    pub network_interfaces: Option<serde_json::Value>,
    #[serde(default)]
    pub uptime: Option<f64>,
    /// Fields the derivation rules do not consume, kept verbatim so a
    /// consumer can still inspect them
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-core usage sample
#[derive(Debug, Clone, Deserialize)]
pub struct CoreStat {
    pub usage: f64,
    /// Clock speed in MHz, when reported
    #[serde(default)]
    pub speed: Option<f64>,
}

/// Memory section of a raw sample, byte counts plus usage percent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryStats {
    #[serde(default)]
    pub usage: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub free: Option<f64>,
    #[serde(default)]
    pub used: Option<f64>,
}

/// A derived gauge value tagged by provenance, so consumers can tell a
/// real reading from a placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Measured(f64),
    Synthesized(f64),
}

impl Metric {
    pub fn value(&self) -> f64 {
        match self {
            Metric::Measured(v) | Metric::Synthesized(v) => *v,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, Metric::Synthesized(_))
    }

    fn measured(value: f64) -> Self {
        Metric::Measured(clamp_percent(value))
    }

    fn synthesized(range: std::ops::Range<f64>) -> Self {
        Metric::Synthesized(clamp_percent(rand::rng().random_range(range)))
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Latest derived telemetry. Replaced wholesale on every poll tick.
#[derive(Debug, Clone)]
pub struct TelemetrySnapshot {
    pub cpu_usage: Metric,
    pub memory_usage: Metric,
    pub network_status: Metric,
    pub system_status: Metric,
    pub security_level: Metric,
    /// Last successfully fetched raw sample, kept across failed fetches
    pub raw: Option<RawStats>,
    /// Timestamp of the last successful fetch
    pub fetched_at: Option<DateTime<Utc>>,
    /// Message from the last failed fetch, cleared on success
    pub error: Option<String>,
}

impl TelemetrySnapshot {
    /// Initial snapshot before any fetch: all gauges synthesized
    pub fn placeholder() -> Self {
        Self::derive(None, None, None)
    }

    fn derive(
        raw: Option<RawStats>,
        fetched_at: Option<DateTime<Utc>>,
        error: Option<String>,
    ) -> Self {
        let cpu_usage = raw
            .as_ref()
            .and_then(|r| r.cpu.as_deref())
            .filter(|cores| !cores.is_empty())
            .map(|cores| {
                let sum: f64 = cores.iter().map(|c| c.usage).sum();
                Metric::measured(sum / cores.len() as f64)
            })
            .unwrap_or_else(|| Metric::synthesized(30.0..60.0));

        let memory_usage = raw
            .as_ref()
            .and_then(|r| r.memory.as_ref())
            .and_then(|m| m.usage)
            .map(Metric::measured)
            .unwrap_or_else(|| Metric::synthesized(60.0..80.0));

        let network_status = match raw.as_ref().and_then(|r| r.network_interfaces.as_ref()) {
            Some(_) => Metric::measured(NETWORK_MEASURED_STATUS),
            None => Metric::synthesized(80.0..95.0),
        };

        // The composite inherits the weaker provenance of its inputs:
        // a mean over a synthesized gauge is itself synthesized.
        let system_status = if raw.is_some() {
            let mean = (cpu_usage.value() + memory_usage.value()) / 2.0;
            if cpu_usage.is_synthesized() || memory_usage.is_synthesized() {
                Metric::Synthesized(clamp_percent(mean))
            } else {
                Metric::measured(mean)
            }
        } else {
            Metric::Synthesized(SYSTEM_STATUS_FALLBACK)
        };

        let security_level = Metric::Synthesized(SECURITY_LEVEL);

        Self {
            cpu_usage,
            memory_usage,
            network_status,
            system_status,
            security_level,
            raw,
            fetched_at,
            error,
        }
    }
}

struct FeedState {
    snapshot: TelemetrySnapshot,
    is_fetching: bool,
}

/// Polling feed over a stats service. One poll timer at most; `stop`
/// invalidates any fetch still in flight so a late response is
/// discarded instead of applied.
pub struct TelemetryFeed {
    stats: Arc<dyn StatsApi>,
    state: Arc<Mutex<FeedState>>,
    epoch: Arc<AtomicU64>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl TelemetryFeed {
    pub fn new(stats: Arc<dyn StatsApi>) -> Self {
        Self {
            stats,
            state: Arc::new(Mutex::new(FeedState {
                snapshot: TelemetrySnapshot::placeholder(),
                is_fetching: false,
            })),
            epoch: Arc::new(AtomicU64::new(0)),
            poller: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.state.lock().snapshot.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.state.lock().is_fetching
    }

    /// Fetch immediately, then repeat every `interval` until `stop`.
    /// Starting an already running feed restarts its timer.
    pub fn start(&self, interval: Duration) {
        self.stop();

        let epoch = self.epoch.load(Ordering::SeqCst);
        let stats = Arc::clone(&self.stats);
        let state = Arc::clone(&self.state);
        let epoch_counter = Arc::clone(&self.epoch);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                fetch_and_apply(stats.as_ref(), &state, &epoch_counter, epoch).await;
            }
        });

        *self.poller.lock() = Some(handle);
    }

    /// Cancel the poll timer. A fetch already in flight is left to
    /// finish but its result is discarded. Safe when already stopped.
    pub fn stop(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.poller.lock().take() {
            handle.abort();
        }
    }

    /// Single fetch outside the poll loop
    pub async fn fetch_once(&self) {
        let epoch = self.epoch.load(Ordering::SeqCst);
        fetch_and_apply(self.stats.as_ref(), &self.state, &self.epoch, epoch).await;
    }
}

impl Drop for TelemetryFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn fetch_and_apply(
    stats: &dyn StatsApi,
    state: &Mutex<FeedState>,
    epoch_counter: &AtomicU64,
    epoch: u64,
) {
    state.lock().is_fetching = true;
    let result = stats.get_system_stats().await;

    let mut guard = state.lock();
    guard.is_fetching = false;

    // A stop() issued while the request was in flight invalidates it
    if epoch_counter.load(Ordering::SeqCst) != epoch {
        return;
    }

    guard.snapshot = match result {
        Ok(raw) => TelemetrySnapshot::derive(Some(raw), Some(Utc::now()), None),
        Err(err) => {
            debug!("stats fetch failed: {err}");
            TelemetrySnapshot::derive(
                guard.snapshot.raw.clone(),
                guard.snapshot.fetched_at,
                Some(FETCH_ERROR_MESSAGE.to_string()),
            )
        }
    };
}
