//! Keyword-based sentiment scoring for feed text.
//!
//! Shared by the topic/category/reaction heuristics so the word lists live
//! in one place.

const POSITIVE: &[&str] = &[
    "congrats",
    "congrat",
    "great",
    "awesome",
    "amazing",
    "love",
    "proud",
    "launch",
    "win",
    "promotion",
    "milestone",
    "success",
];

const NEGATIVE: &[&str] = &[
    "sad",
    "sorry",
    "loss",
    "issue",
    "problem",
    "bug",
    "down",
    "concern",
    "frustrat",
    "heartbroken",
];

/// Score text by keyword presence, case-insensitive.
///
/// Each keyword contributes at most once: +1 for every positive keyword found,
/// -1 for every negative one. Overlapping keywords ("congrats" also contains
/// "congrat") each count. No normalization is applied.
pub fn sentiment_score(text: &str) -> i32 {
    let lowered = text.to_lowercase();
    let pos = POSITIVE.iter().filter(|w| lowered.contains(*w)).count() as i32;
    let neg = NEGATIVE.iter().filter(|w| lowered.contains(*w)).count() as i32;
    pos - neg
}

/// Positive keyword list, exposed for property tests.
pub fn positive_keywords() -> &'static [&'static str] {
    POSITIVE
}

/// Negative keyword list, exposed for property tests.
pub fn negative_keywords() -> &'static [&'static str] {
    NEGATIVE
}
