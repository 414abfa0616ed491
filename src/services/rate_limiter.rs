// src/services/rate_limiter.rs - Sliding-window throttle for lead submissions
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use log::debug;
use serde::Serialize;

pub const DEFAULT_WINDOW_MS: u64 = 600_000;
pub const DEFAULT_MAX_REQUESTS: u32 = 2;

/// Source of "now" in milliseconds since the Unix epoch
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by chrono
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Per-call overrides; `None` falls back to the store defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitOptions {
    pub window_ms: Option<u64>,
    pub max_requests: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub limited: bool,
    pub retry_after_ms: u64,
    pub remaining: u32,
    pub window_ms: u64,
    pub max_requests: u32,
}

impl RateLimitDecision {
    /// Whole seconds for a `Retry-After` header, never below one
    pub fn retry_after_secs(&self) -> u64 {
        self.retry_after_ms.div_ceil(1000).max(1)
    }
}

/// Process-scoped map from client identifier to the request timestamps seen
/// inside the current window. Nothing is persisted.
pub struct RateLimitStore {
    entries: DashMap<String, Vec<i64>>,
    clock: Arc<dyn Clock>,
    default_window_ms: u64,
    default_max_requests: u32,
}

impl RateLimitStore {
    pub fn new(default_window_ms: u64, default_max_requests: u32) -> Self {
        Self::with_clock(default_window_ms, default_max_requests, Arc::new(SystemClock))
    }

    pub fn with_clock(
        default_window_ms: u64,
        default_max_requests: u32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            default_window_ms,
            default_max_requests,
        }
    }

    /// Records a request for `identifier` and decides whether it is over the limit.
    ///
    /// Rejected attempts are recorded too, so hammering the endpoint keeps the
    /// window full.
    pub fn check_rate_limit(&self, identifier: &str, options: RateLimitOptions) -> RateLimitDecision {
        let window_ms = options.window_ms.unwrap_or(self.default_window_ms);
        let max_requests = options.max_requests.unwrap_or(self.default_max_requests);

        let now = self.clock.now_ms();
        let window_start = now.saturating_sub(window_ms as i64);

        // The shard lock is held for the whole read-modify-write. A timestamp
        // exactly `window_ms` old has left the window.
        let mut entry = self.entries.entry(identifier.to_string()).or_default();
        entry.retain(|ts| *ts > window_start);
        entry.push(now);

        let count = entry.len();
        let oldest = entry.first().copied().unwrap_or(now);
        drop(entry);

        let limited = count > max_requests as usize;
        let retry_after_ms = if limited {
            (window_ms as i64 - (now - oldest)).max(0) as u64
        } else {
            0
        };
        let remaining = if limited {
            0
        } else {
            max_requests.saturating_sub(count as u32)
        };

        if limited {
            debug!(
                "Rate limit hit for '{}': {} requests in {}ms window",
                identifier, count, window_ms
            );
        }

        RateLimitDecision {
            limited,
            retry_after_ms,
            remaining,
            window_ms,
            max_requests,
        }
    }

    /// Prunes every identifier against the default window and removes the
    /// ones left with no timestamps. Checks always append, so this sweep is the
    /// only place a sequence can become empty.
    ///
    /// ### Returns
    /// * `usize` - the number of identifiers removed
    pub fn purge_expired(&self) -> usize {
        let window_start = self
            .clock
            .now_ms()
            .saturating_sub(self.default_window_ms as i64);
        let before = self.entries.len();
        self.entries.retain(|_, timestamps| {
            timestamps.retain(|ts| *ts > window_start);
            !timestamps.is_empty()
        });
        before.saturating_sub(self.entries.len())
    }

    #[cfg(test)]
    pub fn tracked_identifiers(&self) -> usize {
        self.entries.len()
    }
}

impl Default for RateLimitStore {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS, DEFAULT_MAX_REQUESTS)
    }
}
