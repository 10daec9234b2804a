//! # Pacer Limiter
//!
//! Decides whether a session may act right now. Five independent concerns are
//! evaluated per attempt:
//!
//! - **Rolling windows**: a short and a long window, each with a cap. A full
//!   window is a soft denial (brief back-off, then retry).
//! - **Session cap**: actions since the last reset. Reaching it requires a
//!   cooldown followed by [`PacingLimiter::reset_session`].
//! - **Author streak**: consecutive items from one author beyond the cap are
//!   skipped outright.
//! - **Page streak**: consecutive items on one page beyond the cap trigger a
//!   cooldown, after which processing continues.
//! - **Failure streak**: reaching the threshold triggers a cooldown.
//!
//! All waits go through [`cooldown`], which returns as soon as the session's
//! [`RunFlag`] is cleared.

mod cooldown;
pub mod limiter;
pub mod window;

pub use cooldown::{cooldown, interruptible_sleep, RunFlag, RunSignal, WaitOutcome};
pub use limiter::{
    Admission, AuthorVerdict, FailureVerdict, LimiterSnapshot, LimiterState, PacingLimiter,
    PageVerdict, Streak,
};
pub use window::RollingWindow;
