//! Session driver for the feed pacer.
//!
//! A [`Session`] pulls items from a [`ContentSource`], classifies them, asks
//! its own [`pacer_limiter::PacingLimiter`] for permission and hands admitted
//! items to an [`ActionSink`]. One item is in flight at a time; the only
//! suspension points are the read pause, back-off waits, cooldowns and the
//! spacing between items, all of which end early when the run flag drops.

pub mod pacing;
mod session;
pub mod sink;
pub mod source;

pub use session::{ItemOutcome, ItemReport, Session, SessionSummary, SkipReason};
pub use sink::{ActionSink, DryRunSink};
pub use source::{ContentSource, VecSource};
