use anyhow::Result;
use async_trait::async_trait;
use pacer_core::{Classification, ContentItem};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Performs the external action for an admitted item.
///
/// Any error is treated as a transient failure by the session.
#[async_trait]
pub trait ActionSink: Send + Sync {
    async fn perform(
        &self,
        item: &ContentItem,
        classification: &Classification,
        comment: &str,
    ) -> Result<()>;
}

/// Logs what would be done and touches nothing.
#[derive(Debug, Default)]
pub struct DryRunSink {
    performed: AtomicUsize,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn performed(&self) -> usize {
        self.performed.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ActionSink for DryRunSink {
    async fn perform(
        &self,
        item: &ContentItem,
        classification: &Classification,
        comment: &str,
    ) -> Result<()> {
        self.performed.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            item = %item.id,
            reaction = %classification.reaction,
            category = %classification.category,
            "dry-run: {}",
            comment
        );
        Ok(())
    }
}
