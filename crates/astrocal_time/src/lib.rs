//! Time support for the event pipeline: Julian Date ↔ calendar
//! conversions, sidereal time, and minute-resolution helpers.
//!
//! Every computation in the pipeline runs on a single time scale:
//! Julian Dates in UTC (`jd_utc`). Conversion to calendar date-times
//! happens only at the serialization boundary, via [`jd_to_datetime`].

pub mod sidereal;

use chrono::{DateTime, TimeZone, Utc};

pub use sidereal::{earth_rotation_angle_rad, gmst_rad, local_sidereal_time_rad};

/// Julian Date of the J2000.0 epoch (2000-Jan-01 12:00).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of the Unix epoch (1970-Jan-01 00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Minutes per day.
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// One minute expressed in days — the pipeline's localization tolerance.
pub const MINUTE_DAYS: f64 = 1.0 / MINUTES_PER_DAY;

/// Convert a calendar date to a Julian Date.
///
/// `day` carries the time of day as a fraction (e.g. `1.5` = the 1st,
/// 12:00). Valid for all dates in the Gregorian calendar.
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month > 2 {
        (year as f64, month as f64)
    } else {
        (year as f64 - 1.0, month as f64 + 12.0)
    };
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day + b - 1524.5
}

/// Convert a Julian Date to `(year, month, day_fraction)`.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let jd = jd + 0.5;
    let z = jd.floor();
    let f = jd - z;

    let a = if z < 2_299_161.0 {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    (year as i32, month as u32, day)
}

/// Julian Date of 00:00 UTC on January 1 of the given year.
pub fn year_start_jd(year: i32) -> f64 {
    calendar_to_jd(year, 1, 1.0)
}

/// Convert a Julian Date (UTC) to a chrono `DateTime<Utc>`,
/// rounded to the nearest second.
pub fn jd_to_datetime(jd_utc: f64) -> DateTime<Utc> {
    let unix_seconds = (jd_utc - UNIX_EPOCH_JD) * SECONDS_PER_DAY;
    Utc.timestamp_opt(unix_seconds.round() as i64, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Convert a chrono `DateTime<Utc>` to a Julian Date (UTC).
pub fn datetime_to_jd(dt: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_JD + dt.timestamp() as f64 / SECONDS_PER_DAY
}

/// Index of the UTC minute containing this instant.
///
/// Two instants share an index exactly when they fall in the same
/// minute, which is how the pipeline's deterministic tie-break is
/// expressed.
pub fn minute_index(jd_utc: f64) -> i64 {
    (jd_utc * MINUTES_PER_DAY).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_round_trip() {
        let jd = calendar_to_jd(2000, 1, 1.5);
        assert!((jd - J2000_JD).abs() < 1e-9);
        let (y, m, d) = jd_to_calendar(J2000_JD);
        assert_eq!((y, m), (2000, 1));
        assert!((d - 1.5).abs() < 1e-9);
    }

    #[test]
    fn known_date_meeus() {
        // Meeus example 7.a: 1957-Oct-4.81 → JD 2436116.31
        let jd = calendar_to_jd(1957, 10, 4.81);
        assert!((jd - 2_436_116.31).abs() < 1e-6);
    }

    #[test]
    fn calendar_round_trip_across_years() {
        for &(y, m, d) in &[(1972, 6, 30.5), (2024, 2, 29.25), (2099, 12, 31.999)] {
            let jd = calendar_to_jd(y, m, d);
            let (y2, m2, d2) = jd_to_calendar(jd);
            assert_eq!((y, m), (y2, m2));
            assert!((d - d2).abs() < 1e-8, "day mismatch: {d} vs {d2}");
        }
    }

    #[test]
    fn year_start_is_midnight() {
        let jd = year_start_jd(2024);
        let (y, m, d) = jd_to_calendar(jd);
        assert_eq!((y, m), (2024, 1));
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unix_epoch_matches_chrono() {
        let dt = jd_to_datetime(UNIX_EPOCH_JD);
        assert_eq!(dt.timestamp(), 0);
        assert!((datetime_to_jd(dt) - UNIX_EPOCH_JD).abs() < 1e-9);
    }

    #[test]
    fn datetime_round_trip_minute_precision() {
        let jd = calendar_to_jd(2024, 4, 8.75); // 2024-Apr-08 18:00 UTC
        let dt = jd_to_datetime(jd);
        assert_eq!(dt.to_rfc3339(), "2024-04-08T18:00:00+00:00");
        assert!((datetime_to_jd(dt) - jd).abs() < 1e-9);
    }

    #[test]
    fn minute_index_separates_minutes() {
        let jd = calendar_to_jd(2024, 1, 1.0);
        assert_eq!(minute_index(jd), minute_index(jd + 0.4 * MINUTE_DAYS));
        assert_ne!(minute_index(jd), minute_index(jd + 1.1 * MINUTE_DAYS));
    }
}
