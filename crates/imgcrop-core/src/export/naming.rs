//! Output file naming.
//!
//! Files are named `img-<millis>.png`. Two exports inside the same
//! millisecond (or after the wall clock steps backwards) would collide, so
//! the namer never hands out a timestamp at or below the previous one.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// [`Clock`] backed by [`SystemTime`].
///
/// Not usable on `wasm32-unknown-unknown`; browser callers supply their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl<F: Fn() -> u64> Clock for F {
    fn now_millis(&self) -> u64 {
        self()
    }
}

/// Hands out strictly increasing `img-<millis>.png` names.
#[derive(Debug, Clone, Default)]
pub struct FileNamer {
    last: Option<u64>,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name for an export happening at `now_millis`.
    pub fn next_name(&mut self, now_millis: u64) -> String {
        let stamp = match self.last {
            Some(last) if now_millis <= last => last.saturating_add(1),
            _ => now_millis,
        };
        self.last = Some(stamp);
        format!("img-{}.png", stamp)
    }
}
