//! Time sources for request signing.
//!
//! Every signed request carries a `timestamp` (Unix seconds) and a `noncestr`
//! derived from the same instant. The clock is injected through [`Clock`] so
//! tests can sign with fixed, reproducible inputs.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current time as **seconds** since Unix epoch.
    fn now_secs(&self) -> u64;
}

/// Wall clock backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Clock frozen at a given Unix second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    #[inline]
    fn now_secs(&self) -> u64 {
        self.0
    }
}

/// Format the UTC time-of-day of `epoch_secs` as `HHMMSS`.
///
/// Used as the request nonce. Always UTC, so the value differs from a
/// local-time `HHMMSS` outside UTC; the gateway treats it as opaque. Not
/// random: two requests within the same second share a nonce.
pub fn nonce_from_secs(epoch_secs: u64) -> String {
    let day_secs = epoch_secs % 86_400;
    format!(
        "{:02}{:02}{:02}",
        day_secs / 3_600,
        (day_secs % 3_600) / 60,
        day_secs % 60
    )
}
