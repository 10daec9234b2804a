//! Pacing limiter: rate windows, session cap, repetition streaks and the
//! failure streak.
//!
//! The limiter is owned by exactly one session and mutated through `&mut self`,
//! so recording an action is atomic with respect to the next evaluation.

use crate::window::RollingWindow;
use pacer_core::config::LimitsConfig;
use pacer_core::Reason;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Result of a capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// A rolling window is full. Back off briefly and try again later.
    WindowFull { reason: Reason, retry_after: Option<Duration> },
    /// The session cap is reached. Cool down, then call
    /// [`PacingLimiter::reset_session`].
    SessionCap { cooldown: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }

    pub fn reason(&self) -> Reason {
        match self {
            Admission::Admitted => Reason::Admitted,
            Admission::WindowFull { reason, .. } => *reason,
            Admission::SessionCap { .. } => Reason::SessionCap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorVerdict {
    Proceed,
    /// Too many consecutive items from this author; drop the item.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVerdict {
    Proceed,
    /// Too many consecutive items on this page. The streak has already been
    /// reset to 1; cool down for the given duration, then carry on.
    Cooldown(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureVerdict {
    Continue,
    /// Threshold reached. The streak has already been reset to 0.
    Cooldown(Duration),
}

/// Consecutive-occurrence counter keyed by the last seen value.
#[derive(Debug, Clone, Default)]
pub struct Streak {
    last: Option<String>,
    count: usize,
}

impl Streak {
    /// Count `key`. An empty key is "unknown" and never extends a streak.
    pub fn observe(&mut self, key: &str) -> usize {
        if !key.is_empty() && self.last.as_deref() == Some(key) {
            self.count += 1;
        } else {
            self.last = Some(key.to_string());
            self.count = 1;
        }
        self.count
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    fn restart(&mut self) {
        self.count = 1;
    }
}

/// Per-session limiter bookkeeping.
#[derive(Debug, Clone)]
pub struct LimiterState {
    pub short_window: RollingWindow,
    pub long_window: RollingWindow,
    pub session_actions: usize,
    pub author: Streak,
    pub page: Streak,
    pub failures: usize,
}

/// Point-in-time view of the counters, for logs and status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LimiterSnapshot {
    pub short_window: usize,
    pub long_window: usize,
    pub session_actions: usize,
    pub author_streak: usize,
    pub page_streak: usize,
    pub failure_streak: usize,
}

pub struct PacingLimiter {
    limits: LimitsConfig,
    state: LimiterState,
}

impl PacingLimiter {
    pub fn new(limits: LimitsConfig) -> Self {
        let state = LimiterState {
            short_window: RollingWindow::new(limits.short_window(), limits.short_window_cap),
            long_window: RollingWindow::new(limits.long_window(), limits.long_window_cap),
            session_actions: 0,
            author: Streak::default(),
            page: Streak::default(),
            failures: 0,
        };
        Self { limits, state }
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    pub fn state(&self) -> &LimiterState {
        &self.state
    }

    /// Prune both windows, then test short window, long window and session
    /// cap, in that order.
    pub fn check_capacity(&mut self, now: Instant) -> Admission {
        self.state.short_window.prune(now);
        self.state.long_window.prune(now);

        if self.state.short_window.is_full() {
            return Admission::WindowFull {
                reason: Reason::ShortWindow,
                retry_after: self.state.short_window.time_until_slot(now),
            };
        }
        if self.state.long_window.is_full() {
            return Admission::WindowFull {
                reason: Reason::LongWindow,
                retry_after: self.state.long_window.time_until_slot(now),
            };
        }
        if self.state.session_actions >= self.limits.session_cap {
            return Admission::SessionCap {
                cooldown: self.limits.session_cooldown(),
            };
        }
        Admission::Admitted
    }

    pub fn observe_author(&mut self, author: &str) -> AuthorVerdict {
        let count = self.state.author.observe(author);
        if count > self.limits.author_repeat_cap {
            tracing::debug!(author, count, "author repeat cap exceeded");
            AuthorVerdict::Skip
        } else {
            AuthorVerdict::Proceed
        }
    }

    pub fn observe_page(&mut self, page: &str) -> PageVerdict {
        let count = self.state.page.observe(page);
        if count > self.limits.page_repeat_cap {
            tracing::debug!(page, count, "page repeat cap exceeded");
            self.state.page.restart();
            PageVerdict::Cooldown(self.limits.page_cooldown())
        } else {
            PageVerdict::Proceed
        }
    }

    /// Record a completed action in both windows and the session counter.
    /// A success also ends the current failure streak.
    pub fn record_action(&mut self, now: Instant) {
        self.state.short_window.record(now);
        self.state.long_window.record(now);
        self.state.session_actions += 1;
        self.state.failures = 0;
    }

    pub fn record_failure(&mut self) -> FailureVerdict {
        self.state.failures += 1;
        if self.state.failures >= self.limits.failure_threshold {
            tracing::debug!(failures = self.state.failures, "failure streak threshold reached");
            self.state.failures = 0;
            FailureVerdict::Cooldown(self.limits.failure_cooldown())
        } else {
            FailureVerdict::Continue
        }
    }

    /// Called after the session-cap cooldown.
    pub fn reset_session(&mut self) {
        self.state.session_actions = 0;
    }

    pub fn snapshot(&self) -> LimiterSnapshot {
        LimiterSnapshot {
            short_window: self.state.short_window.len(),
            long_window: self.state.long_window.len(),
            session_actions: self.state.session_actions,
            author_streak: self.state.author.count(),
            page_streak: self.state.page.count(),
            failure_streak: self.state.failures,
        }
    }
}
