//! Calendar difference engine
//!
//! Pure computation of the component-wise elapsed time between a fixed start
//! instant and a current instant, with mixed-radix borrowing across
//! variable-length months and leap years.

use serde::Serialize;

use super::calendar::{days_in_month, CalendarError, CalendarInstant};
use super::errors::{ErrorKind, ErrorLog};

/// The hard-coded historical start: 2020-10-05T12:00:00.000 local time.
pub const DEFAULT_START: CalendarInstant = CalendarInstant {
    year: 2020,
    month: 9,
    day: 5,
    hour: 12,
    minute: 0,
    second: 0,
    millisecond: 0,
};

/// Display labels for the seven units, most significant first.
pub const UNIT_LABELS: [&str; 7] = ["年", "月", "日", "时", "分", "秒", "毫秒"];

/// Seven-field non-negative calendar delta.
///
/// Produced fresh on every computation; fields compare by value. `days` is
/// bounded by the actual length of the borrowed-from month (28-31), the
/// fixed-radix fields by their natural modulus, `years` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DifferenceRecord {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
}

impl DifferenceRecord {
    /// Fields in display order, most significant first.
    pub fn fields(&self) -> [u32; 7] {
        [
            self.years,
            self.months,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
            self.milliseconds,
        ]
    }
}

/// Computes the calendar difference against one fixed start instant.
///
/// The start instant is set at construction and never mutated afterwards.
pub struct DifferenceEngine {
    start: CalendarInstant,
}

impl DifferenceEngine {
    pub fn new(start: CalendarInstant) -> Self {
        Self { start }
    }

    pub fn start(&self) -> &CalendarInstant {
        &self.start
    }

    /// Component-wise difference `current - start`, borrowed and clamped.
    ///
    /// Borrows propagate least-significant-first. The day borrow pulls from
    /// the month immediately preceding the *current* instant's month, so
    /// December→January and leap-February each use the correct day count.
    /// A current instant earlier than the start yields clamped (non-negative)
    /// fields rather than an error.
    pub fn compute_difference(&self, current: &CalendarInstant) -> DifferenceRecord {
        let start = &self.start;

        let mut years = current.year as i64 - start.year as i64;
        let mut months = current.month as i64 - start.month as i64;
        let mut days = current.day as i64 - start.day as i64;
        let mut hours = current.hour as i64 - start.hour as i64;
        let mut minutes = current.minute as i64 - start.minute as i64;
        let mut seconds = current.second as i64 - start.second as i64;
        let mut milliseconds = current.millisecond as i64 - start.millisecond as i64;

        if milliseconds < 0 {
            milliseconds += 1000;
            seconds -= 1;
        }
        if seconds < 0 {
            seconds += 60;
            minutes -= 1;
        }
        if minutes < 0 {
            minutes += 60;
            hours -= 1;
        }
        if hours < 0 {
            hours += 24;
            days -= 1;
        }
        if days < 0 {
            let (prev_year, prev_month) = if current.month == 0 {
                (current.year - 1, 11)
            } else {
                (current.year, current.month - 1)
            };
            days += days_in_month(prev_year, prev_month) as i64;
            months -= 1;
        }
        if months < 0 {
            months += 12;
            years -= 1;
        }

        // Residual negatives (current earlier than start) clamp to zero.
        DifferenceRecord {
            years: years.max(0) as u32,
            months: months.max(0) as u32,
            days: days.max(0) as u32,
            hours: hours.max(0) as u32,
            minutes: minutes.max(0) as u32,
            seconds: seconds.max(0) as u32,
            milliseconds: milliseconds.max(0) as u32,
        }
    }

    /// Fail-closed variant for instants read from a fallible source.
    ///
    /// An invalid instant yields the all-zero record; the failure is reported
    /// to the error log instead of surfacing to the caller.
    pub fn compute_checked(
        &self,
        current: Result<CalendarInstant, CalendarError>,
        errors: &mut ErrorLog,
        now_ms: f64,
    ) -> DifferenceRecord {
        match current {
            Ok(instant) => self.compute_difference(&instant),
            Err(e) => {
                errors.report(ErrorKind::InvalidInstant, e.to_string(), now_ms);
                DifferenceRecord::default()
            }
        }
    }
}

impl Default for DifferenceEngine {
    fn default() -> Self {
        Self::new(DEFAULT_START)
    }
}

/// Render a record as `"{y}年{mo}月{d}日{h}时{mi}分{s}秒{ms}毫秒"`.
pub fn format_time_display(record: &DifferenceRecord) -> String {
    format!(
        "{}年{}月{}日{}时{}分{}秒{}毫秒",
        record.years,
        record.months,
        record.days,
        record.hours,
        record.minutes,
        record.seconds,
        record.milliseconds
    )
}

/// Render a possibly partial or malformed record (e.g. one reconstructed
/// from JSON). Each field is sanitized independently: missing, non-numeric
/// and non-finite values render as 0.
pub fn format_time_display_loose(record: &serde_json::Value) -> String {
    let field = |key: &str| -> i64 {
        let v = match record.get(key) {
            Some(v) => v,
            None => return 0,
        };
        let n = match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match n {
            Some(n) if n.is_finite() => n as i64,
            _ => 0,
        }
    };

    format!(
        "{}年{}月{}日{}时{}分{}秒{}毫秒",
        field("years"),
        field("months"),
        field("days"),
        field("hours"),
        field("minutes"),
        field("seconds"),
        field("milliseconds")
    )
}
