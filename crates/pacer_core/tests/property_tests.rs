//! Property-based tests for pacer_core.
//!
//! Sentiment sign, category derivation and the no-Angry rule must hold for
//! every input, not only hand-picked sentences.

use pacer_core::classifier::category_for;
use pacer_core::reaction::{decide_reaction, reaction_weights, Reaction, ReactionMode};
use pacer_core::sentiment::{negative_keywords, positive_keywords, sentiment_score};
use pacer_core::topic::{detect_topic, Topic};
use pacer_core::TemplateCategory;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const ALL_TOPICS: [Topic; 10] = [
    Topic::Hiring,
    Topic::Launch,
    Topic::Tips,
    Topic::Question,
    Topic::Event,
    Topic::Update,
    Topic::Congrats,
    Topic::Insight,
    Topic::Support,
    Topic::General,
];

// ============================================================================
// Strategies
// ============================================================================

// Negative keywords that contain no positive keyword and vice versa, so a
// text built only from one list scores strictly on one side.
fn arb_positive_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(positive_keywords().to_vec()), 1..6)
        .prop_map(|words| words.join(" "))
}

fn arb_negative_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(negative_keywords().to_vec()), 1..6)
        .prop_map(|words| words.join(" "))
}

/// Digits and punctuation never contain a keyword.
fn arb_keyword_free_text() -> impl Strategy<Value = String> {
    "[0-9 .,;:!-]{0,80}"
}

fn arb_topic() -> impl Strategy<Value = Topic> {
    prop::sample::select(ALL_TOPICS.to_vec())
}

// ============================================================================
// Sentiment
// ============================================================================

proptest! {
    #[test]
    fn positive_only_text_scores_above_zero(text in arb_positive_text()) {
        prop_assert!(sentiment_score(&text) > 0, "text: {}", text);
    }

    #[test]
    fn negative_only_text_scores_below_zero(text in arb_negative_text()) {
        prop_assert!(sentiment_score(&text) < 0, "text: {}", text);
    }

    #[test]
    fn keyword_free_text_scores_zero(text in arb_keyword_free_text()) {
        prop_assert_eq!(sentiment_score(&text), 0);
    }

    #[test]
    fn sentiment_ignores_case(text in "[a-zA-Z ]{0,60}") {
        prop_assert_eq!(sentiment_score(&text), sentiment_score(&text.to_uppercase()));
    }

    #[test]
    fn topic_detection_never_panics(text in ".{0,200}") {
        let _ = detect_topic(&text);
    }
}

// ============================================================================
// Category
// ============================================================================

proptest! {
    #[test]
    fn negative_sentiment_is_always_empathy(score in -50i32..0, topic in arb_topic()) {
        prop_assert_eq!(category_for(score, topic), TemplateCategory::Empathy);
    }

    #[test]
    fn positive_sentiment_never_uses_neutral_buckets(score in 1i32..50, topic in arb_topic()) {
        let category = category_for(score, topic);
        prop_assert!(matches!(
            category,
            TemplateCategory::Launch
                | TemplateCategory::Hiring
                | TemplateCategory::Update
                | TemplateCategory::Congrats
                | TemplateCategory::Positive
        ));
    }
}

// ============================================================================
// Reactions
// ============================================================================

#[test]
fn random_reaction_is_never_angry() {
    let texts = [
        "sorry for the loss",
        "",
        "congrats on the launch",
        "awesome, we are hiring",
        "great update to the changelog",
        "proud of this milestone",
        "a few tips for you",
        "what do you think?",
        "see you at the conference",
        "an insight worth sharing",
        "happy to help",
    ];
    let mut rng = StdRng::seed_from_u64(42);
    for text in texts {
        for _ in 0..10_000 {
            let r = decide_reaction(text, ReactionMode::Random, &mut rng);
            assert_ne!(r, Reaction::Angry, "text: {text}");
        }
    }
}

#[test]
fn angry_has_no_weight_in_any_table() {
    for sentiment in [-5, -1, 0, 1, 5] {
        for topic in ALL_TOPICS {
            let weights = reaction_weights(sentiment, topic);
            assert!(weights
                .iter()
                .all(|(r, w)| *r != Reaction::Angry || *w == 0));
        }
    }
}

proptest! {
    #[test]
    fn negative_text_never_draws_joy(text in arb_negative_text(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let r = decide_reaction(&text, ReactionMode::Random, &mut rng);
        prop_assert!(!matches!(r, Reaction::Love | Reaction::Haha | Reaction::Angry));
    }
}
