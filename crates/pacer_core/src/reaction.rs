//! Reaction selection from sentiment and topic.
//!
//! `Angry` exists so it can be named (and refused) in configuration, but it
//! never enters a weighted pool.

use crate::sentiment::sentiment_score;
use crate::topic::{detect_topic, Topic};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
    Like,
    Love,
    Care,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl Reaction {
    pub const ALL: [Reaction; 7] = [
        Reaction::Like,
        Reaction::Love,
        Reaction::Care,
        Reaction::Haha,
        Reaction::Wow,
        Reaction::Sad,
        Reaction::Angry,
    ];

    pub fn is_allowed(&self) -> bool {
        !matches!(self, Reaction::Angry)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Like => "Like",
            Reaction::Love => "Love",
            Reaction::Care => "Care",
            Reaction::Haha => "Haha",
            Reaction::Wow => "Wow",
            Reaction::Sad => "Sad",
            Reaction::Angry => "Angry",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reaction::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown reaction '{}'", s))
    }
}

/// How the reaction is chosen: weighted draw or a fixed override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionMode {
    #[default]
    Random,
    Fixed(Reaction),
}

impl FromStr for ReactionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("random") {
            Ok(ReactionMode::Random)
        } else {
            s.parse().map(ReactionMode::Fixed)
        }
    }
}

impl fmt::Display for ReactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionMode::Random => f.write_str("random"),
            ReactionMode::Fixed(r) => write!(f, "{}", r),
        }
    }
}

impl Serialize for ReactionMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReactionMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Weight table for a (sentiment, topic) pair. `Angry` is always zero.
pub fn reaction_weights(sentiment: i32, topic: Topic) -> [(Reaction, u32); 7] {
    let [like, love, care, haha, wow, sad] = if sentiment < 0 {
        [1, 0, 5, 0, 1, 4]
    } else if sentiment > 0 {
        match topic {
            Topic::Launch | Topic::Update => [2, 4, 1, 1, 3, 0],
            Topic::Hiring => [3, 2, 1, 0, 2, 0],
            _ => [3, 3, 1, 1, 2, 0],
        }
    } else {
        match topic {
            Topic::Tips | Topic::Insight => [4, 2, 0, 1, 2, 0],
            Topic::Question => [4, 1, 0, 0, 2, 0],
            _ => [3, 2, 0, 1, 1, 0],
        }
    };

    [
        (Reaction::Like, like),
        (Reaction::Love, love),
        (Reaction::Care, care),
        (Reaction::Haha, haha),
        (Reaction::Wow, wow),
        (Reaction::Sad, sad),
        (Reaction::Angry, 0),
    ]
}

/// Uniform draw over the expanded pool: a reaction of weight `w` appears `w`
/// times. Falls back to `Like` when the pool is empty.
pub fn draw_weighted<R: Rng + ?Sized>(weights: &[(Reaction, u32)], rng: &mut R) -> Reaction {
    let pool: Vec<Reaction> = weights
        .iter()
        .filter(|(r, _)| r.is_allowed())
        .flat_map(|(r, w)| std::iter::repeat(*r).take(*w as usize))
        .collect();

    if pool.is_empty() {
        return Reaction::Like;
    }
    pool[rng.gen_range(0..pool.len())]
}

/// Pick a reaction for `text`. A fixed mode bypasses every heuristic.
pub fn decide_reaction<R: Rng + ?Sized>(text: &str, mode: ReactionMode, rng: &mut R) -> Reaction {
    if let ReactionMode::Fixed(reaction) = mode {
        return reaction;
    }
    let weights = reaction_weights(sentiment_score(text), detect_topic(text));
    draw_weighted(&weights, rng)
}
