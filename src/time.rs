//! Platform-agnostic time sources
//!
//! `now_ms` feeds the scheduler and monitor; `now_wall_instant` feeds the
//! difference engine with local calendar fields.

use crate::core::{CalendarError, CalendarInstant};

/// Milliseconds since an arbitrary origin, suitable for interval arithmetic.
///
/// Falls back from `performance.now()` to `Date.now()` when the Performance
/// API is absent.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// The current wall-clock instant in the observer's local calendar.
#[cfg(target_arch = "wasm32")]
pub fn now_wall_instant() -> Result<CalendarInstant, CalendarError> {
    let date = js_sys::Date::new_0();
    if !date.get_time().is_finite() {
        return Err(CalendarError::NonFiniteEpoch);
    }
    CalendarInstant::new(
        date.get_full_year() as i32,
        date.get_month(),
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds(),
        date.get_milliseconds(),
    )
}

/// Native builds have no host timezone database wired in; wall time is read
/// in UTC.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_wall_instant() -> Result<CalendarInstant, CalendarError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(f64::NAN);
    CalendarInstant::from_epoch_ms(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_ms_is_monotonic_enough() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }

    #[test]
    fn wall_instant_is_valid() {
        let i = now_wall_instant().unwrap();
        assert!(i.year >= 2024);
        assert!(i.month < 12);
    }
}
