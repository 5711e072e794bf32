//! Fixed-Window Rate Limiter
//!
//! Per-(identity, endpoint) request counters over discrete, non-overlapping
//! windows. The whole read-check-increment sequence runs under one lock so
//! two concurrent requests can never both observe a pre-increment count as
//! fitting under the limit. Stale records may be swept opportunistically;
//! correctness never depends on eviction.

use crate::types::{CheckKind, CheckResult, RiskLevel};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct RateRecord {
    count: u32,
    window_reset_at: Instant,
}

/// Fixed-window counters keyed by `(identity, endpoint)`
pub struct RateLimiter {
    records: Mutex<HashMap<(String, String), RateRecord>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request and report whether it fits under `max_requests`
    /// for the current window of length `window`.
    pub fn check(
        &self,
        identity: &str,
        endpoint: &str,
        max_requests: u32,
        window: Duration,
    ) -> CheckResult {
        self.check_at(identity, endpoint, max_requests, window, Instant::now())
    }

    /// Window boundaries are exact: a request arriving at the reset instant
    /// starts a fresh window.
    fn check_at(
        &self,
        identity: &str,
        endpoint: &str,
        max_requests: u32,
        window: Duration,
        now: Instant,
    ) -> CheckResult {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            // Poisoned lock: deny rather than wave requests through
            Err(_) => {
                return CheckResult::fail(
                    CheckKind::RateLimit,
                    RiskLevel::Medium,
                    "Rate limiter state unavailable",
                );
            }
        };

        let key = (identity.to_string(), endpoint.to_string());
        let record = records.entry(key).or_insert_with(|| RateRecord {
            count: 0,
            window_reset_at: now + window,
        });

        if now >= record.window_reset_at {
            record.count = 0;
            record.window_reset_at = now + window;
        }

        record.count += 1;

        let reset_in_ms = record
            .window_reset_at
            .saturating_duration_since(now)
            .as_millis() as u64;
        let details = json!({
            "count": record.count,
            "max_requests": max_requests,
            "reset_in_ms": reset_in_ms,
        });

        if record.count > max_requests {
            CheckResult::fail(
                CheckKind::RateLimit,
                RiskLevel::Medium,
                format!(
                    "Rate limit exceeded for {} on {}: {} of {} requests",
                    identity, endpoint, record.count, max_requests
                ),
            )
            .with_details(details)
        } else {
            CheckResult::pass(CheckKind::RateLimit, RiskLevel::None, "Within rate limit")
                .with_details(details)
        }
    }

    /// Drop records whose window has already ended. Returns how many were
    /// removed.
    pub fn sweep_stale(&self) -> usize {
        let now = Instant::now();
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(_) => return 0,
        };
        let before = records.len();
        records.retain(|_, record| now < record.window_reset_at);
        before - records.len()
    }

    /// Number of live keys, for monitoring
    pub fn tracked_keys(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
