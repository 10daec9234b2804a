//! Rolling time window with a capacity cap.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Timestamps of completed actions younger than `duration`.
///
/// Pruning is lazy: callers prune before reading the size.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    duration: Duration,
    cap: usize,
    events: VecDeque<Instant>,
}

impl RollingWindow {
    pub fn new(duration: Duration, cap: usize) -> Self {
        Self {
            duration,
            cap,
            events: VecDeque::with_capacity(cap),
        }
    }

    /// Drop every event whose age is at least the window duration.
    pub fn prune(&mut self, now: Instant) {
        let duration = self.duration;
        self.events
            .retain(|t| now.saturating_duration_since(*t) < duration);
    }

    pub fn record(&mut self, at: Instant) {
        self.events.push_back(at);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True once the (already pruned) window holds `cap` events.
    pub fn is_full(&self) -> bool {
        self.events.len() >= self.cap
    }

    /// Time until the oldest event ages out, if any.
    pub fn time_until_slot(&self, now: Instant) -> Option<Duration> {
        self.events
            .front()
            .map(|oldest| (*oldest + self.duration).saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MIN: Duration = Duration::from_secs(300);

    #[test]
    fn test_prune_boundary() {
        let now = Instant::now() + Duration::from_secs(3600);
        let mut w = RollingWindow::new(FIVE_MIN, 10);
        w.record(now - Duration::from_secs(301)); // 5m01s ago
        w.record(now - Duration::from_secs(299)); // 4m59s ago
        w.prune(now);
        assert_eq!(w.len(), 1);
        assert_eq!(w.time_until_slot(now), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_event_exactly_window_old_is_pruned() {
        let now = Instant::now() + Duration::from_secs(3600);
        let mut w = RollingWindow::new(FIVE_MIN, 10);
        w.record(now - FIVE_MIN);
        w.prune(now);
        assert!(w.is_empty());
    }

    #[test]
    fn test_is_full_at_cap() {
        let now = Instant::now();
        let mut w = RollingWindow::new(FIVE_MIN, 2);
        w.record(now);
        assert!(!w.is_full());
        w.record(now);
        assert!(w.is_full());
        w.prune(now + FIVE_MIN);
        assert!(!w.is_full());
        assert_eq!(w.time_until_slot(now), None);
    }
}
