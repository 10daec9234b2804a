use crate::error::PacerError;
use crate::reaction::ReactionMode;
use crate::templates::TimeFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PacerConfig {
    pub limits: LimitsConfig,
    pub pacing: PacingConfig,
    pub reactions: ReactionConfig,
    pub comments: CommentConfig,
}

impl PacerConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// Env var overrides are applied before validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: PacerConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return
    /// defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                if let Err(e) = cfg.validate() {
                    tracing::warn!("Ignoring env overrides: {}", e);
                    cfg = Self::default();
                }
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("PACER_SHORT_WINDOW_CAP") {
            if let Ok(n) = v.parse() {
                self.limits.short_window_cap = n;
            }
        }
        if let Ok(v) = std::env::var("PACER_LONG_WINDOW_CAP") {
            if let Ok(n) = v.parse() {
                self.limits.long_window_cap = n;
            }
        }
        if let Ok(v) = std::env::var("PACER_SESSION_CAP") {
            if let Ok(n) = v.parse() {
                self.limits.session_cap = n;
            }
        }
        if let Ok(v) = std::env::var("PACER_REACTION_MODE") {
            match v.parse() {
                Ok(mode) => self.reactions.mode = mode,
                Err(e) => tracing::warn!("PACER_REACTION_MODE ignored: {}", e),
            }
        }
        if let Ok(v) = std::env::var("PACER_TEMPLATES") {
            self.comments.templates_path = Some(PathBuf::from(v));
        }
    }

    /// Reject settings that would make the limiter or the renderer misbehave.
    pub fn validate(&self) -> std::result::Result<(), PacerError> {
        let l = &self.limits;
        for (name, value) in [
            ("short_window_cap", l.short_window_cap),
            ("long_window_cap", l.long_window_cap),
            ("session_cap", l.session_cap),
            ("author_repeat_cap", l.author_repeat_cap),
            ("page_repeat_cap", l.page_repeat_cap),
            ("failure_threshold", l.failure_threshold),
        ] {
            if value == 0 {
                return Err(PacerError::InvalidConfig(format!("{} must be at least 1", name)));
            }
        }
        if l.short_window_secs == 0 || l.long_window_secs == 0 {
            return Err(PacerError::InvalidConfig(
                "window durations must be non-zero".to_string(),
            ));
        }

        let p = &self.pacing;
        if p.delay_min_secs > p.delay_max_secs {
            return Err(PacerError::InvalidConfig(format!(
                "delay_min_secs ({}) exceeds delay_max_secs ({})",
                p.delay_min_secs, p.delay_max_secs
            )));
        }
        if p.soft_wait_min_ms > p.soft_wait_max_ms {
            return Err(PacerError::InvalidConfig(format!(
                "soft_wait_min_ms ({}) exceeds soft_wait_max_ms ({})",
                p.soft_wait_min_ms, p.soft_wait_max_ms
            )));
        }
        if p.batch_size == 0 {
            return Err(PacerError::InvalidConfig("batch_size must be at least 1".to_string()));
        }

        if let ReactionMode::Fixed(r) = self.reactions.mode {
            if !r.is_allowed() {
                return Err(PacerError::DisallowedReaction(r));
            }
        }

        let c = &self.comments;
        if c.emoji_min > c.emoji_max {
            return Err(PacerError::InvalidConfig(format!(
                "emoji_min ({}) exceeds emoji_max ({})",
                c.emoji_min, c.emoji_max
            )));
        }
        if c.emoji_pool.iter().all(|e| e.trim().is_empty()) {
            return Err(PacerError::InvalidConfig("emoji_pool is empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

/// Caps and cooldowns enforced by the pacing limiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub short_window_secs: u64,
    pub short_window_cap: usize,
    pub long_window_secs: u64,
    pub long_window_cap: usize,
    pub session_cap: usize,
    pub session_cooldown_secs: u64,
    /// Items from the same author beyond this count are skipped.
    pub author_repeat_cap: usize,
    /// Items on the same page beyond this count trigger a cooldown.
    pub page_repeat_cap: usize,
    pub page_cooldown_secs: u64,
    pub failure_threshold: usize,
    pub failure_cooldown_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            short_window_secs: 5 * 60,
            short_window_cap: 4,
            long_window_secs: 60 * 60,
            long_window_cap: 40,
            session_cap: 60,
            session_cooldown_secs: 30 * 60,
            author_repeat_cap: 2,
            page_repeat_cap: 20,
            page_cooldown_secs: 60 * 60,
            failure_threshold: 5,
            failure_cooldown_secs: 20 * 60,
        }
    }
}

impl LimitsConfig {
    pub fn short_window(&self) -> Duration {
        Duration::from_secs(self.short_window_secs)
    }

    pub fn long_window(&self) -> Duration {
        Duration::from_secs(self.long_window_secs)
    }

    pub fn session_cooldown(&self) -> Duration {
        Duration::from_secs(self.session_cooldown_secs)
    }

    pub fn page_cooldown(&self) -> Duration {
        Duration::from_secs(self.page_cooldown_secs)
    }

    pub fn failure_cooldown(&self) -> Duration {
        Duration::from_secs(self.failure_cooldown_secs)
    }
}

/// What to do after the short random wait that follows a window denial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftWaitPolicy {
    /// Evaluate the windows again; keep waiting until admitted or stopped.
    #[default]
    Recheck,
    /// Go ahead with the action after a single wait.
    Proceed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub delay_min_secs: u64,
    pub delay_max_secs: u64,
    pub soft_wait_min_ms: u64,
    pub soft_wait_max_ms: u64,
    pub soft_wait_policy: SoftWaitPolicy,
    /// Items with fewer characters of text are skipped without counting as failures.
    pub min_text_chars: usize,
    pub max_read_secs: u64,
    pub batch_size: usize,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            delay_min_secs: 20,
            delay_max_secs: 30,
            soft_wait_min_ms: 4000,
            soft_wait_max_ms: 7000,
            soft_wait_policy: SoftWaitPolicy::Recheck,
            min_text_chars: 10,
            max_read_secs: 30,
            batch_size: 2,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionConfig {
    pub mode: ReactionMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    /// When false every item uses the `general` template category.
    pub context_aware: bool,
    pub emoji_pool: Vec<String>,
    pub emoji_min: usize,
    pub emoji_max: usize,
    pub time_format: TimeFormat,
    pub prefix: String,
    pub templates_path: Option<PathBuf>,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            context_aware: true,
            emoji_pool: ["🙂", "🔥", "✅", "🚀", "✨", "👍"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            emoji_min: 2,
            emoji_max: 3,
            time_format: TimeFormat::Compact,
            prefix: String::new(),
            templates_path: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::Reaction;

    #[test]
    fn test_default_config() {
        let cfg = PacerConfig::default();
        assert_eq!(cfg.limits.short_window_cap, 4);
        assert_eq!(cfg.limits.long_window_cap, 40);
        assert_eq!(cfg.limits.session_cap, 60);
        assert_eq!(cfg.limits.short_window(), Duration::from_secs(300));
        assert_eq!(cfg.pacing.soft_wait_policy, SoftWaitPolicy::Recheck);
        assert_eq!(cfg.reactions.mode, ReactionMode::Random);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[limits]
short_window_cap = 2
"#;
        let cfg: PacerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.limits.short_window_cap, 2);
        // Defaults for unspecified fields
        assert_eq!(cfg.limits.long_window_cap, 40);
        assert_eq!(cfg.pacing.batch_size, 2);
        assert!(cfg.comments.context_aware);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[limits]
short_window_secs = 120
short_window_cap = 3
long_window_secs = 1800
long_window_cap = 20
session_cap = 30
session_cooldown_secs = 600
author_repeat_cap = 1
page_repeat_cap = 5
page_cooldown_secs = 300
failure_threshold = 3
failure_cooldown_secs = 900

[pacing]
delay_min_secs = 5
delay_max_secs = 8
soft_wait_policy = "proceed"
min_text_chars = 20

[reactions]
mode = "love"

[comments]
context_aware = false
emoji_pool = ["A", "B"]
emoji_min = 1
emoji_max = 2
time_format = "hh:mm:ss"
prefix = ">>"
templates_path = "pack.json"
"#;
        let cfg: PacerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.limits.page_cooldown(), Duration::from_secs(300));
        assert_eq!(cfg.limits.failure_threshold, 3);
        assert_eq!(cfg.pacing.soft_wait_policy, SoftWaitPolicy::Proceed);
        assert_eq!(cfg.pacing.min_text_chars, 20);
        assert_eq!(cfg.reactions.mode, ReactionMode::Fixed(Reaction::Love));
        assert!(!cfg.comments.context_aware);
        assert_eq!(cfg.comments.time_format, TimeFormat::Colon);
        assert_eq!(cfg.comments.templates_path, Some(PathBuf::from("pack.json")));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_angry_override_rejected() {
        let cfg: PacerConfig = toml::from_str("[reactions]\nmode = \"angry\"\n").unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(PacerError::DisallowedReaction(Reaction::Angry))
        ));
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let mut cfg = PacerConfig::default();
        cfg.pacing.delay_min_secs = 40;
        assert!(cfg.validate().is_err());

        let mut cfg = PacerConfig::default();
        cfg.comments.emoji_min = 5;
        assert!(cfg.validate().is_err());

        let mut cfg = PacerConfig::default();
        cfg.limits.session_cap = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_env_overrides_and_defaults() {
        std::env::set_var("PACER_SESSION_CAP", "7");
        std::env::set_var("PACER_REACTION_MODE", "wow");

        let mut cfg = PacerConfig::default();
        cfg.apply_env_overrides();
        assert_eq!(cfg.limits.session_cap, 7);
        assert_eq!(cfg.reactions.mode, ReactionMode::Fixed(Reaction::Wow));

        std::env::remove_var("PACER_SESSION_CAP");
        std::env::remove_var("PACER_REACTION_MODE");

        let cfg = PacerConfig::load_or_default("/nonexistent/pacer.toml");
        assert_eq!(cfg.limits.session_cap, 60);
    }
}
