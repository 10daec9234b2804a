//! Human-scale delays: read time and randomized spacing.

use rand::Rng;
use std::time::Duration;

const BASE_READ: Duration = Duration::from_secs(3);
const PER_CHUNK: Duration = Duration::from_secs(2);
const CHUNK_CHARS: usize = 120;

/// Time to spend on an item before acting: 3s plus 2s per started block of
/// 120 characters, capped at `max`.
pub fn read_delay(text: &str, max: Duration) -> Duration {
    let chars = text.chars().count();
    let chunks = chars.div_ceil(CHUNK_CHARS) as u32;
    (BASE_READ + PER_CHUNK * chunks).min(max)
}

/// [`read_delay`] with ±20% jitter, still capped at `max`.
pub fn jittered_read_delay<R: Rng + ?Sized>(text: &str, max: Duration, rng: &mut R) -> Duration {
    let jitter = rng.gen_range(0.8..1.2);
    read_delay(text, max).mul_f64(jitter).min(max)
}

/// Uniform duration in `[min, max]` at millisecond resolution.
pub fn random_between<R: Rng + ?Sized>(min: Duration, max: Duration, rng: &mut R) -> Duration {
    let lo = min.as_millis() as u64;
    let hi = (max.as_millis() as u64).max(lo);
    Duration::from_millis(rng.gen_range(lo..=hi))
}
