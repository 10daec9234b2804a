//! Text → (sentiment, topic, template category, reaction).

use crate::reaction::{draw_weighted, reaction_weights, Reaction, ReactionMode};
use crate::sentiment::sentiment_score;
use crate::topic::{detect_topic, Topic};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket used to pick a response template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Empathy,
    Launch,
    Hiring,
    Update,
    Congrats,
    Positive,
    Tips,
    Question,
    Event,
    Insight,
    Support,
    General,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Empathy => "empathy",
            TemplateCategory::Launch => "launch",
            TemplateCategory::Hiring => "hiring",
            TemplateCategory::Update => "update",
            TemplateCategory::Congrats => "congrats",
            TemplateCategory::Positive => "positive",
            TemplateCategory::Tips => "tips",
            TemplateCategory::Question => "question",
            TemplateCategory::Event => "event",
            TemplateCategory::Insight => "insight",
            TemplateCategory::Support => "support",
            TemplateCategory::General => "general",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combine a sentiment score and topic into a template category.
///
/// Negative sentiment always maps to [`TemplateCategory::Empathy`].
pub fn category_for(sentiment: i32, topic: Topic) -> TemplateCategory {
    if sentiment < 0 {
        return TemplateCategory::Empathy;
    }
    if sentiment > 0 {
        return match topic {
            Topic::Launch => TemplateCategory::Launch,
            Topic::Hiring => TemplateCategory::Hiring,
            Topic::Update => TemplateCategory::Update,
            Topic::Congrats => TemplateCategory::Congrats,
            _ => TemplateCategory::Positive,
        };
    }
    match topic {
        Topic::Tips => TemplateCategory::Tips,
        Topic::Question => TemplateCategory::Question,
        Topic::Event => TemplateCategory::Event,
        Topic::Insight => TemplateCategory::Insight,
        Topic::Support => TemplateCategory::Support,
        _ => TemplateCategory::General,
    }
}

pub fn choose_template_category(text: &str) -> TemplateCategory {
    category_for(sentiment_score(text), detect_topic(text))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub sentiment: i32,
    pub topic: Topic,
    pub category: TemplateCategory,
    pub reaction: Reaction,
}

/// Classify `text` in one pass over the keyword and topic rules.
pub fn classify<R: Rng + ?Sized>(text: &str, mode: ReactionMode, rng: &mut R) -> Classification {
    let sentiment = sentiment_score(text);
    let topic = detect_topic(text);
    let reaction = match mode {
        ReactionMode::Fixed(r) => r,
        ReactionMode::Random => draw_weighted(&reaction_weights(sentiment, topic), rng),
    };

    Classification {
        sentiment,
        topic,
        category: category_for(sentiment, topic),
        reaction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_negative_launch_is_empathy() {
        // launch (+1), sad (-1), bug (-1)
        let text = "Sad to see the launch hit a bug";
        assert!(sentiment_score(text) < 0);
        assert_eq!(category_for(-2, Topic::Launch), TemplateCategory::Empathy);
        assert_eq!(choose_template_category(text), TemplateCategory::Empathy);
    }

    #[test]
    fn test_positive_topics() {
        assert_eq!(category_for(2, Topic::Launch), TemplateCategory::Launch);
        assert_eq!(category_for(1, Topic::Hiring), TemplateCategory::Hiring);
        assert_eq!(category_for(1, Topic::Update), TemplateCategory::Update);
        assert_eq!(category_for(1, Topic::Congrats), TemplateCategory::Congrats);
        assert_eq!(category_for(1, Topic::Tips), TemplateCategory::Positive);
        assert_eq!(category_for(1, Topic::General), TemplateCategory::Positive);
    }

    #[test]
    fn test_neutral_pass_through() {
        assert_eq!(category_for(0, Topic::Tips), TemplateCategory::Tips);
        assert_eq!(category_for(0, Topic::Question), TemplateCategory::Question);
        assert_eq!(category_for(0, Topic::Event), TemplateCategory::Event);
        assert_eq!(category_for(0, Topic::Insight), TemplateCategory::Insight);
        assert_eq!(category_for(0, Topic::Support), TemplateCategory::Support);
        assert_eq!(category_for(0, Topic::Launch), TemplateCategory::General);
        assert_eq!(category_for(0, Topic::Hiring), TemplateCategory::General);
        assert_eq!(category_for(0, Topic::General), TemplateCategory::General);
    }

    #[test]
    fn test_classify_fills_every_field() {
        let mut rng = StdRng::seed_from_u64(5);
        let c = classify(
            "Proud to share our new feature is now live",
            ReactionMode::Random,
            &mut rng,
        );
        assert!(c.sentiment > 0);
        assert_eq!(c.topic, Topic::Launch);
        assert_eq!(c.category, TemplateCategory::Launch);
        assert_ne!(c.reaction, Reaction::Sad);
        assert_ne!(c.reaction, Reaction::Angry);
    }

    #[test]
    fn test_classify_fixed_reaction() {
        let mut rng = StdRng::seed_from_u64(5);
        let c = classify("anything at all", ReactionMode::Fixed(Reaction::Care), &mut rng);
        assert_eq!(c.reaction, Reaction::Care);
    }
}
