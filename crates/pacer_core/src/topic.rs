//! Ordered, first-match-wins topic detection.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Hiring,
    Launch,
    Tips,
    Question,
    Event,
    Update,
    Congrats,
    Insight,
    Support,
    General,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Hiring => "hiring",
            Topic::Launch => "launch",
            Topic::Tips => "tips",
            Topic::Question => "question",
            Topic::Event => "event",
            Topic::Update => "update",
            Topic::Congrats => "congrats",
            Topic::Insight => "insight",
            Topic::Support => "support",
            Topic::General => "general",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Order is significant: earlier rules shadow later ones.
static TOPIC_RULES: LazyLock<Vec<(Regex, Topic)>> = LazyLock::new(|| {
    [
        (r"hiring|we are hiring|apply|job|career|opening|recruit", Topic::Hiring),
        (r"launch|released|rolling out|now live|new feature|v\d", Topic::Launch),
        (r"tips|guide|how to|lesson|thread|steps|tutorial|checklist", Topic::Tips),
        (r"\?|what do you think|curious|thoughts", Topic::Question),
        (r"event|webinar|conference|workshop", Topic::Event),
        (r"update|changelog|improvement|fix|patch", Topic::Update),
        (r"thanks|gratitude", Topic::Congrats),
        (r"insight|perspective", Topic::Insight),
        (r"help|support", Topic::Support),
    ]
    .into_iter()
    .map(|(pattern, topic)| (Regex::new(pattern).unwrap(), topic))
    .collect()
});

/// Return the tag of the first rule matching the lowercased text, or
/// [`Topic::General`] when none do.
pub fn detect_topic(text: &str) -> Topic {
    let lowered = text.to_lowercase();
    TOPIC_RULES
        .iter()
        .find(|(re, _)| re.is_match(&lowered))
        .map(|(_, topic)| *topic)
        .unwrap_or(Topic::General)
}
