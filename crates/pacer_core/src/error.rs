use crate::reaction::Reaction;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PacerError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("reaction {0} may not be used as a fixed override")]
    DisallowedReaction(Reaction),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PacerError>;
