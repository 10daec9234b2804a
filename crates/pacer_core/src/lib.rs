pub mod classifier;
pub mod config;
pub mod error;
pub mod reaction;
pub mod sentiment;
pub mod templates;
pub mod topic;

pub use classifier::{choose_template_category, classify, Classification, TemplateCategory};
pub use config::PacerConfig;
pub use error::PacerError;
pub use reaction::{decide_reaction, reaction_weights, Reaction, ReactionMode};
pub use sentiment::sentiment_score;
pub use templates::{RenderOptions, TemplatePack, TimeFormat};
pub use topic::{detect_topic, Topic};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of feed content offered to the driver loop.
///
/// `id` is the deduplication key; `author` and `page` feed the repetition
/// streaks in the limiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub page: String,
}

impl ContentItem {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        author: impl Into<String>,
        page: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            author: author.into(),
            page: page.into(),
        }
    }
}

/// Why an item was admitted or held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    ShortWindow,
    LongWindow,
    SessionCap,
    /// Item skipped for good, no cooldown.
    AuthorCap,
    /// Cooldown, then processing continues.
    PageCap,
    FailureStreak,
    Admitted,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::ShortWindow => "short-window",
            Reason::LongWindow => "long-window",
            Reason::SessionCap => "session-cap",
            Reason::AuthorCap => "author-cap",
            Reason::PageCap => "page-cap",
            Reason::FailureStreak => "failure-streak",
            Reason::Admitted => "admitted",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-item output of the driver: what it chose and whether it was let through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub category: TemplateCategory,
    pub reaction: Reaction,
    pub admitted: bool,
    pub reason: Reason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_tags() {
        assert_eq!(Reason::ShortWindow.to_string(), "short-window");
        assert_eq!(Reason::FailureStreak.to_string(), "failure-streak");
        let json = serde_json::to_string(&Reason::PageCap).unwrap();
        assert_eq!(json, "\"page-cap\"");
    }

    #[test]
    fn test_content_item_defaults_author_and_page() {
        let item: ContentItem = serde_json::from_str(r#"{"id":"p1","text":"hello"}"#).unwrap();
        assert_eq!(item.author, "");
        assert_eq!(item.page, "");
    }
}
