//! Response template pack and placeholder rendering.
//!
//! A pack is a JSON object mapping category names to template lists:
//!
//! ```json
//! { "general": ["Nice one {EMOJI} {TIME}"], "empathy": ["Thinking of you {EMOJI}"] }
//! ```

use crate::classifier::TemplateCategory;
use crate::config::CommentConfig;
use anyhow::{Context, Result};
use chrono::{NaiveTime, Timelike};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Used when neither the requested category nor `general` has templates.
pub const FALLBACK_TEMPLATE: &str = "{EMOJI} {TIME}";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `HHMMSS`
    #[default]
    #[serde(rename = "hhmmss")]
    Compact,
    /// `HH:MM:SS`
    #[serde(rename = "hh:mm:ss")]
    Colon,
}

impl TimeFormat {
    pub fn format(&self, time: NaiveTime) -> String {
        let (h, m, s) = (time.hour(), time.minute(), time.second());
        match self {
            TimeFormat::Compact => format!("{:02}{:02}{:02}", h, m, s),
            TimeFormat::Colon => format!("{:02}:{:02}:{:02}", h, m, s),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TemplatePack {
    categories: HashMap<String, Vec<String>>,
}

impl TemplatePack {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read template pack: {}", path.as_ref().display())
        })?;
        let pack = Self::from_json(&content)
            .with_context(|| format!("Invalid template pack: {}", path.as_ref().display()))?;
        tracing::info!(
            "Loaded {} templates across {} categories",
            pack.len(),
            pack.categories.len()
        );
        Ok(pack)
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, category: impl Into<String>, templates: Vec<String>) {
        self.categories.insert(category.into(), templates);
    }

    /// Total number of templates in the pack.
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pick a random template for `category`, falling back to `general`
    /// and then to [`FALLBACK_TEMPLATE`].
    pub fn pick<R: Rng + ?Sized>(&self, category: TemplateCategory, rng: &mut R) -> &str {
        let candidates = self
            .categories
            .get(category.as_str())
            .filter(|v| !v.is_empty())
            .or_else(|| self.categories.get(TemplateCategory::General.as_str()));

        candidates
            .and_then(|v| v.choose(rng))
            .map(String::as_str)
            .unwrap_or(FALLBACK_TEMPLATE)
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub emoji_pool: Vec<String>,
    pub emoji_min: usize,
    pub emoji_max: usize,
    pub time_format: TimeFormat,
    pub prefix: String,
}

impl From<&CommentConfig> for RenderOptions {
    fn from(cfg: &CommentConfig) -> Self {
        Self {
            emoji_pool: cfg
                .emoji_pool
                .iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            emoji_min: cfg.emoji_min,
            emoji_max: cfg.emoji_max,
            time_format: cfg.time_format,
            prefix: cfg.prefix.trim().to_string(),
        }
    }
}

/// Draw between `emoji_min` and `emoji_max` distinct emoji (at least one).
pub fn pick_emoji<R: Rng + ?Sized>(opts: &RenderOptions, rng: &mut R) -> Vec<String> {
    let lo = opts.emoji_min.max(1);
    let hi = opts.emoji_max.max(lo);
    let n = rng.gen_range(lo..=hi);
    opts.emoji_pool
        .choose_multiple(rng, n)
        .cloned()
        .collect()
}

/// Fill `{EMOJI}` and `{TIME}`, drop `{LINK}`, collapse whitespace and
/// prepend the prefix.
pub fn render<R: Rng + ?Sized>(
    template: &str,
    opts: &RenderOptions,
    rng: &mut R,
    now: NaiveTime,
) -> String {
    let emoji = pick_emoji(opts, rng).join(" ");
    let filled = template
        .replace("{LINK}", "")
        .replace("{EMOJI}", &emoji)
        .replace("{TIME}", &opts.time_format.format(now));

    let body = filled.split_whitespace().collect::<Vec<_>>().join(" ");
    if opts.prefix.is_empty() {
        body
    } else {
        format!("{} {}", opts.prefix, body).trim().to_string()
    }
}
