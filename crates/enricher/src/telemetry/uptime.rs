#![forbid(unsafe_code)]

use crate::domain::Timeval;

const MICROS_PER_MILLI: i64 = 1_000;
const MICROS_PER_SEC: i64 = 1_000_000;

/// Format the time between `start` and `end` using a single truncated unit:
/// `us` below a millisecond, `ms` below a second, `s` otherwise.
///
/// ```
/// # use enricher::domain::Timeval;
/// # use enricher::telemetry::format_uptime;
/// assert_eq!(format_uptime(Timeval::new(10, 0), Timeval::new(10, 500)), "500us");
/// assert_eq!(format_uptime(Timeval::new(10, 0), Timeval::new(75, 0)), "65s");
/// assert_eq!(format_uptime(Timeval::new(10, 0), Timeval::new(9, 0)), "0us");
/// ```
pub fn format_uptime(start: Timeval, end: Timeval) -> String {
    format_elapsed(end.micros_since(&start))
}

pub fn format_elapsed(micros: i64) -> String {
    if micros <= 0 {
        "0us".to_string()
    } else if micros < MICROS_PER_MILLI {
        format!("{micros}us")
    } else if micros < MICROS_PER_SEC {
        format!("{}ms", micros / MICROS_PER_MILLI)
    } else {
        format!("{}s", micros / MICROS_PER_SEC)
    }
}
