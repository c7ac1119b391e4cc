//! Proleptic Gregorian calendar fields and conversions
//!
//! `CalendarInstant` is the seven-field decomposition of an absolute point in
//! time (millisecond resolution) that the difference engine operates on.
//! Fields are validated at construction; an instant is immutable once built.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Milliseconds per civil day.
const MS_PER_DAY: i64 = 86_400_000;

/// Calendar conversion / validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalendarError {
    #[error("epoch milliseconds not finite")]
    NonFiniteEpoch,
    #[error("month index {0} out of range 0-11")]
    MonthOutOfRange(u32),
    #[error("day {day} out of range for {year}-{month:02}", month = month0 + 1)]
    DayOutOfRange { year: i32, month0: u32, day: u32 },
    #[error("time component out of range: {0}")]
    TimeOutOfRange(&'static str),
    #[error("unparseable date string: {0:?}")]
    Unparseable(String),
}

/// Leap year test: divisible by 4 and not by 100, or divisible by 400.
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Day count of a month, `month0` zero-based as in the rest of the crate.
///
/// Equivalent to taking the last day of the target month in the proleptic
/// Gregorian calendar.
pub const fn days_in_month(year: i32, month0: u32) -> u32 {
    match month0 {
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// An absolute point in time decomposed into local calendar fields.
///
/// `month` is zero-based (0 = January, 11 = December); `day` is one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarInstant {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl CalendarInstant {
    /// Build a validated instant. Fails closed on any out-of-range field.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Result<Self, CalendarError> {
        if month > 11 {
            return Err(CalendarError::MonthOutOfRange(month));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(CalendarError::DayOutOfRange {
                year,
                month0: month,
                day,
            });
        }
        if hour > 23 {
            return Err(CalendarError::TimeOutOfRange("hour"));
        }
        if minute > 59 {
            return Err(CalendarError::TimeOutOfRange("minute"));
        }
        if second > 59 {
            return Err(CalendarError::TimeOutOfRange("second"));
        }
        if millisecond > 999 {
            return Err(CalendarError::TimeOutOfRange("millisecond"));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        })
    }

    /// Decompose epoch milliseconds (UTC) into calendar fields.
    ///
    /// Non-finite input is the classic "unparseable date" case and is
    /// rejected rather than wrapped around.
    pub fn from_epoch_ms(ms: f64) -> Result<Self, CalendarError> {
        if !ms.is_finite() {
            return Err(CalendarError::NonFiniteEpoch);
        }
        let ms = ms.floor() as i64;
        let days = ms.div_euclid(MS_PER_DAY);
        let msod = ms.rem_euclid(MS_PER_DAY);

        let (year, month, day) = civil_from_days(days);
        Ok(Self {
            year,
            month,
            day,
            hour: (msod / 3_600_000) as u32,
            minute: (msod / 60_000 % 60) as u32,
            second: (msod / 1_000 % 60) as u32,
            millisecond: (msod % 1_000) as u32,
        })
    }
}

impl fmt::Display for CalendarInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year,
            self.month + 1,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.millisecond
        )
    }
}

impl FromStr for CalendarInstant {
    type Err = CalendarError;

    /// Parse `YYYY-MM-DD[THH:MM[:SS[.mmm]]]` (a space also separates date and
    /// time). Month in the string is one-based.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || CalendarError::Unparseable(s.to_string());

        let s = s.trim();
        let (date, time) = match s.split_once(['T', ' ']) {
            Some((d, t)) => (d, Some(t)),
            None => (s, None),
        };

        let mut date_parts = date.splitn(3, '-');
        let year: i32 = date_parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(unparseable)?;
        let month1: u32 = date_parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(unparseable)?;
        let day: u32 = date_parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(unparseable)?;
        if month1 == 0 {
            return Err(CalendarError::MonthOutOfRange(0));
        }

        let (mut hour, mut minute, mut second, mut millisecond) = (0u32, 0u32, 0u32, 0u32);
        if let Some(time) = time {
            let (hms, ms) = match time.split_once('.') {
                Some((hms, frac)) => {
                    // Millisecond resolution only - longer fractions are truncated.
                    // get() keeps a multibyte character at the cut from slicing
                    // mid-char; non-digits fail the parse below either way.
                    let frac = if frac.len() > 3 {
                        frac.get(..3).ok_or_else(unparseable)?
                    } else {
                        frac
                    };
                    let scale = 10u32.pow(3 - frac.len() as u32);
                    let parsed: u32 = frac.parse().map_err(|_| unparseable())?;
                    (hms, parsed * scale)
                }
                None => (time, 0),
            };
            millisecond = ms;

            let mut time_parts = hms.splitn(3, ':');
            hour = time_parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(unparseable)?;
            minute = time_parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(unparseable)?;
            if let Some(sec) = time_parts.next() {
                second = sec.parse().map_err(|_| unparseable())?;
            }
        }

        Self::new(year, month1 - 1, day, hour, minute, second, millisecond)
    }
}

/// Days-since-epoch to (year, month0, day), proleptic Gregorian.
fn civil_from_days(z: i64) -> (i32, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month1 = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = if month1 <= 2 { y + 1 } else { y } as i32;
    (year, month1 - 1, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_rules() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2021));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(1600));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2023, 0), 31);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(2020, 1), 29);
        assert_eq!(days_in_month(2023, 3), 30);
        assert_eq!(days_in_month(2023, 11), 31);
        assert_eq!(days_in_month(2100, 1), 28);
    }

    #[test]
    fn construction_validates_fields() {
        assert!(CalendarInstant::new(2020, 9, 5, 12, 0, 0, 0).is_ok());
        assert!(matches!(
            CalendarInstant::new(2020, 12, 5, 0, 0, 0, 0),
            Err(CalendarError::MonthOutOfRange(12))
        ));
        assert!(matches!(
            CalendarInstant::new(2021, 1, 29, 0, 0, 0, 0),
            Err(CalendarError::DayOutOfRange { .. })
        ));
        // Feb 29 is fine on a leap year
        assert!(CalendarInstant::new(2020, 1, 29, 0, 0, 0, 0).is_ok());
        assert!(CalendarInstant::new(2020, 0, 1, 24, 0, 0, 0).is_err());
        assert!(CalendarInstant::new(2020, 0, 1, 0, 60, 0, 0).is_err());
        assert!(CalendarInstant::new(2020, 0, 1, 0, 0, 0, 1000).is_err());
    }

    #[test]
    fn epoch_zero_is_unix_origin() {
        let i = CalendarInstant::from_epoch_ms(0.0).unwrap();
        assert_eq!(i, CalendarInstant::new(1970, 0, 1, 0, 0, 0, 0).unwrap());
    }

    #[test]
    fn epoch_roundtrip_known_points() {
        // 2020-10-05T12:00:00 UTC
        let i = CalendarInstant::from_epoch_ms(1_601_899_200_000.0).unwrap();
        assert_eq!(i, CalendarInstant::new(2020, 9, 5, 12, 0, 0, 0).unwrap());

        // 2020-02-29T23:59:59.999 UTC (leap day)
        let i = CalendarInstant::from_epoch_ms(1_583_020_799_999.0).unwrap();
        assert_eq!(i, CalendarInstant::new(2020, 1, 29, 23, 59, 59, 999).unwrap());
    }

    #[test]
    fn epoch_rejects_non_finite() {
        assert_eq!(
            CalendarInstant::from_epoch_ms(f64::NAN),
            Err(CalendarError::NonFiniteEpoch)
        );
        assert_eq!(
            CalendarInstant::from_epoch_ms(f64::INFINITY),
            Err(CalendarError::NonFiniteEpoch)
        );
    }

    #[test]
    fn parse_date_only() {
        let i: CalendarInstant = "2020-10-05".parse().unwrap();
        assert_eq!(i, CalendarInstant::new(2020, 9, 5, 0, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_full_timestamp() {
        let i: CalendarInstant = "2020-10-05T12:34:56.789".parse().unwrap();
        assert_eq!(i, CalendarInstant::new(2020, 9, 5, 12, 34, 56, 789).unwrap());

        // Space separator and short fraction
        let i: CalendarInstant = "2021-01-02 03:04:05.7".parse().unwrap();
        assert_eq!(i, CalendarInstant::new(2021, 0, 2, 3, 4, 5, 700).unwrap());

        // No seconds
        let i: CalendarInstant = "2021-01-02T03:04".parse().unwrap();
        assert_eq!(i, CalendarInstant::new(2021, 0, 2, 3, 4, 0, 0).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("not a date".parse::<CalendarInstant>().is_err());
        assert!("2020-13-01".parse::<CalendarInstant>().is_err());
        assert!("2020-00-01".parse::<CalendarInstant>().is_err());
        assert!("2021-02-29".parse::<CalendarInstant>().is_err());
        assert!("".parse::<CalendarInstant>().is_err());
    }

    #[test]
    fn parse_fraction_handles_non_ascii_and_overlong_input() {
        // Multibyte characters in the fraction must come back as a parse
        // error, including one straddling the truncation point.
        assert!(matches!(
            "2020-01-01T00:00:00.éé".parse::<CalendarInstant>(),
            Err(CalendarError::Unparseable(_))
        ));
        assert!(matches!(
            "2020-01-01T00:00:00.1é".parse::<CalendarInstant>(),
            Err(CalendarError::Unparseable(_))
        ));
        assert!(matches!(
            "2020-01-01T00:00:00.12格3".parse::<CalendarInstant>(),
            Err(CalendarError::Unparseable(_))
        ));

        // An over-long digit fraction truncates to millisecond resolution.
        let i: CalendarInstant = "2020-01-01T00:00:00.123456".parse().unwrap();
        assert_eq!(i.millisecond, 123);
    }

    #[test]
    fn display_roundtrip() {
        let i = CalendarInstant::new(2020, 9, 5, 12, 0, 0, 7).unwrap();
        assert_eq!(i.to_string(), "2020-10-05T12:00:00.007");
        assert_eq!(i.to_string().parse::<CalendarInstant>().unwrap(), i);
    }
}
