//! Periodic consistency check between the UI mode and the compositor.
//!
//! The UI reports its mode over a fire-and-forget channel that can drop or
//! reorder messages. At a bounded rate the shell therefore pulls the mode
//! straight from the chrome and, if the fresh answer claims the whole
//! content area while surfaces are still inserted, evicts them. Only the
//! pulled answer is judged; an answer overtaken by a newer push is dropped.
//! This is a safety net: attach/detach/hide stay correct without it.

use std::time::{Duration, Instant};

use wtstation_common::UiMode;
use wtstation_config::schema::ConsistencyConfig;

/// Script the shell evaluates in the chrome to pull the current mode.
pub const ACTIVE_VIEW_QUERY: &str = "window.__wtstationActiveView || null";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Consistent,
    /// A content-claiming mode is showing while `attached` surfaces remain.
    Violation { attached: usize },
}

/// Pure comparison of a reported mode against the compositor's count.
pub fn evaluate(reported: UiMode, attached: usize) -> Verdict {
    if reported.claims_content_area() && attached > 0 {
        Verdict::Violation { attached }
    } else {
        Verdict::Consistent
    }
}

#[derive(Debug)]
pub struct ConsistencyMonitor {
    interval: Duration,
    recheck_delay: Duration,
    last_check: Option<Instant>,
    mode: Option<UiMode>,
    recheck_at: Option<Instant>,
    /// Bumped on every pushed mode.
    pushes: u64,
    /// Push count when the outstanding query went out.
    query: Option<u64>,
}

impl ConsistencyMonitor {
    pub fn new(interval: Duration, recheck_delay: Duration) -> Self {
        Self {
            interval,
            recheck_delay,
            last_check: None,
            mode: None,
            recheck_at: None,
            pushes: 0,
            query: None,
        }
    }

    pub fn from_config(config: &ConsistencyConfig) -> Self {
        Self::new(
            Duration::from_millis(config.check_interval_ms),
            Duration::from_millis(config.recheck_delay_ms),
        )
    }

    /// Last mode pushed by the UI or accepted from a query.
    pub fn mode(&self) -> Option<UiMode> {
        self.mode
    }

    /// Record a mode pushed by the UI. Returns `true` when the mode claims
    /// the content area; a re-verification is then scheduled.
    pub fn report_mode(&mut self, mode: UiMode, now: Instant) -> bool {
        self.mode = Some(mode);
        self.pushes += 1;
        if mode.claims_content_area() {
            self.recheck_at = Some(now + self.recheck_delay);
            true
        } else {
            self.recheck_at = None;
            false
        }
    }

    /// Whether a periodic check should run now. Marks the check as done.
    pub fn due(&mut self, now: Instant) -> bool {
        let due = self
            .last_check
            .map_or(true, |last| now.duration_since(last) >= self.interval);
        if due {
            self.last_check = Some(now);
        }
        due
    }

    /// Note that a mode query was sent to the chrome. Replaces any query
    /// still outstanding.
    pub fn begin_query(&mut self) {
        self.query = Some(self.pushes);
    }

    /// Take the chrome's answer to the outstanding query.
    ///
    /// Returns the mode to judge, or `None` when there is no query
    /// outstanding, the chrome did not say, or the UI pushed a mode after
    /// the query went out.
    pub fn accept_answer(&mut self, answer: Option<UiMode>) -> Option<UiMode> {
        let issued_at = self.query.take()?;
        if issued_at != self.pushes {
            return None;
        }
        let mode = answer?;
        self.mode = Some(mode);
        Some(mode)
    }

    /// Whether the scheduled post-settings re-verification is due. Consumes it.
    pub fn take_recheck(&mut self, now: Instant) -> bool {
        match self.recheck_at {
            Some(at) if at <= now => {
                self.recheck_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Parse the JSON result of [`ACTIVE_VIEW_QUERY`].
pub fn parse_reported_mode(raw: &str) -> Option<UiMode> {
    serde_json::from_str::<Option<UiMode>>(raw).ok().flatten()
}
