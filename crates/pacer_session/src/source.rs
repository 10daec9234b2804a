use anyhow::{Context, Result};
use async_trait::async_trait;
use pacer_core::ContentItem;
use std::collections::VecDeque;
use std::path::Path;
use tokio::sync::Mutex;

/// Supplier of feed items for a session.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Identifier used in logs (e.g., "jsonl:feed.jsonl").
    fn name(&self) -> &str;

    /// Up to `limit` items. An empty batch means nothing is available right now.
    async fn next_batch(&self, limit: usize) -> Result<Vec<ContentItem>>;
}

/// In-memory queue of items, drained front to back.
pub struct VecSource {
    name: String,
    items: Mutex<VecDeque<ContentItem>>,
}

impl VecSource {
    pub fn new(name: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            name: name.into(),
            items: Mutex::new(items.into()),
        }
    }

    /// Read one JSON object per non-blank line.
    pub fn from_jsonl<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feed file: {}", path.display()))?;
        let items = parse_jsonl(&content)
            .with_context(|| format!("Invalid feed file: {}", path.display()))?;
        tracing::info!("Loaded {} items from {}", items.len(), path.display());
        Ok(Self::new(format!("jsonl:{}", path.display()), items))
    }
}

pub fn parse_jsonl(content: &str) -> Result<Vec<ContentItem>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", i + 1))
        })
        .collect()
}

#[async_trait]
impl ContentSource for VecSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_batch(&self, limit: usize) -> Result<Vec<ContentItem>> {
        let mut items = self.items.lock().await;
        let n = limit.min(items.len());
        Ok(items.drain(..n).collect())
    }
}
