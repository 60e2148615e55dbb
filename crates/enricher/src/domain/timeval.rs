#![forbid(unsafe_code)]

use std::time::{SystemTime, UNIX_EPOCH};

const MICROS_PER_SEC: i64 = 1_000_000;

/// A wall-clock instant split into whole seconds and microseconds since the
/// Unix epoch, the way crash handlers report process start and snapshot
/// times.
///
/// `micros` is not required to be normalized into `0..1_000_000`; elapsed
/// time is computed from both components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timeval {
    pub secs: i64,
    pub micros: i64,
}

impl Timeval {
    pub const fn new(secs: i64, micros: i64) -> Self {
        Self { secs, micros }
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since) => Self::new(since.as_secs() as i64, since.subsec_micros() as i64),
            Err(err) => {
                let before = err.duration();
                Self::new(-(before.as_secs() as i64), -(before.subsec_micros() as i64))
            }
        }
    }

    /// Microseconds elapsed from `earlier` to `self`. Negative when `earlier`
    /// is actually later.
    pub fn micros_since(&self, earlier: &Timeval) -> i64 {
        self.secs
            .saturating_sub(earlier.secs)
            .saturating_mul(MICROS_PER_SEC)
            .saturating_add(self.micros.saturating_sub(earlier.micros))
    }
}
