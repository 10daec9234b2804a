//! Run flag and interruptible waits.
//!
//! Every wait in a session races the timer against the run flag, so a stop
//! request ends the wait immediately and no wait ever outlasts its duration.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Owner side of a session's "still running" flag.
#[derive(Debug, Clone)]
pub struct RunFlag {
    tx: Arc<watch::Sender<bool>>,
}

impl RunFlag {
    /// A flag that starts in the running state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx: Arc::new(tx) }
    }

    pub fn signal(&self) -> RunSignal {
        RunSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn stop(&self) {
        self.tx.send_replace(false);
    }

    pub fn is_running(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a [`RunFlag`]. Dropping every `RunFlag` counts as a stop.
#[derive(Debug, Clone)]
pub struct RunSignal {
    rx: watch::Receiver<bool>,
}

impl RunSignal {
    pub fn is_running(&self) -> bool {
        *self.rx.borrow() && self.rx.has_changed().is_ok()
    }

    /// Resolve once the flag is cleared or its owner is gone.
    pub async fn stopped(&mut self) {
        let _ = self.rx.wait_for(|running| !running).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Completed,
    Interrupted,
}

impl WaitOutcome {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, WaitOutcome::Interrupted)
    }
}

/// Sleep for `duration` unless the run flag drops first.
pub async fn interruptible_sleep(duration: Duration, signal: &mut RunSignal) -> WaitOutcome {
    if !signal.is_running() {
        return WaitOutcome::Interrupted;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => WaitOutcome::Completed,
        _ = signal.stopped() => WaitOutcome::Interrupted,
    }
}

/// An enforced pause before further actions, logged under `label`.
pub async fn cooldown(duration: Duration, label: &str, signal: &mut RunSignal) -> WaitOutcome {
    tracing::info!(
        "Cooldown ({}): {:.0}s",
        label,
        duration.as_secs_f64()
    );
    let outcome = interruptible_sleep(duration, signal).await;
    match outcome {
        WaitOutcome::Completed => tracing::info!("Cooldown ({}) finished", label),
        WaitOutcome::Interrupted => tracing::info!("Cooldown ({}) interrupted by stop", label),
    }
    outcome
}
