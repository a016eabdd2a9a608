//! Greenwich Mean Sidereal Time and Earth Rotation Angle.
//!
//! Needed by the altitude adapter to convert equatorial RA/Dec into
//! local hour angle for a given observer.
//!
//! Functions take UTC Julian Dates. The UTC/UT1 offset is under a
//! second, far below the pipeline's minute-level reporting precision,
//! so no Earth-orientation table is carried.
//!
//! Sources: ERA from IERS Conventions 2010 Eq. 5.15; GMST polynomial
//! from Capitaine et al. 2003, Table 2.

use std::f64::consts::{PI, TAU};

use crate::J2000_JD;

/// Arcseconds to radians: 1″ = π / (180 × 3600).
const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Earth Rotation Angle at a given UTC Julian Date.
///
/// θ = 2π × (0.7790572732640 + 1.00273781191135448 × Du),
/// Du = JD − 2451545.0. Returns radians in [0, 2π).
pub fn earth_rotation_angle_rad(jd_utc: f64) -> f64 {
    let du = jd_utc - J2000_JD;
    let theta = TAU * (0.779_057_273_264_0 + 1.002_737_811_911_354_6 * du);
    theta.rem_euclid(TAU)
}

/// Greenwich Mean Sidereal Time at a given UTC Julian Date.
///
/// GMST = ERA + polynomial(T), T in Julian centuries from J2000.0.
/// Returns radians in [0, 2π).
pub fn gmst_rad(jd_utc: f64) -> f64 {
    let era = earth_rotation_angle_rad(jd_utc);
    let t = (jd_utc - J2000_JD) / 36_525.0;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let poly_arcsec = 0.014506 + 4612.156534 * t + 1.3915817 * t2
        - 0.00000044 * t3
        - 0.000029956 * t4
        - 0.0000000368 * t5;

    (era + poly_arcsec * ARCSEC_TO_RAD).rem_euclid(TAU)
}

/// Local Sidereal Time from GMST and observer east longitude.
///
/// LST = GMST + longitude_east. Returns radians in [0, 2π).
pub fn local_sidereal_time_rad(gmst: f64, longitude_east_rad: f64) -> f64 {
    (gmst + longitude_east_rad).rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar_to_jd;

    #[test]
    fn gmst_in_range() {
        for offset in 0..10 {
            let jd = J2000_JD + offset as f64 * 37.3;
            let g = gmst_rad(jd);
            assert!((0.0..TAU).contains(&g), "gmst out of range: {g}");
        }
    }

    #[test]
    fn gmst_gains_a_turn_over_365_days() {
        // 365 solar days ≈ 366 sidereal turns: GMST at the same clock
        // time lands within a fraction of a degree of where it started.
        let jd0 = calendar_to_jd(2024, 3, 1.0);
        let g0 = gmst_rad(jd0);
        let g1 = gmst_rad(jd0 + 365.0);
        let diff = (g1 - g0).rem_euclid(TAU);
        let diff = diff.min(TAU - diff);
        assert!(diff < 0.01, "gmst drift over 365 days: {diff}");
    }

    #[test]
    fn gmst_known_value() {
        // Meeus example 12.b: 1987-Apr-10 19:21:00 UT → GMST 8h34m57.0896s
        let jd = calendar_to_jd(1987, 4, 10.0) + (19.0 + 21.0 / 60.0) / 24.0;
        let expected_rad = (8.0 + 34.0 / 60.0 + 57.0896 / 3600.0) / 24.0 * TAU;
        let got = gmst_rad(jd);
        assert!(
            (got - expected_rad).abs() < 1e-4,
            "gmst {got} vs expected {expected_rad}"
        );
    }

    #[test]
    fn lst_wraps_longitude() {
        let g = 1.0;
        assert!((local_sidereal_time_rad(g, 0.0) - 1.0).abs() < 1e-12);
        let east = local_sidereal_time_rad(g, PI / 2.0);
        assert!((east - (1.0 + PI / 2.0)).abs() < 1e-12);
        let wrapped = local_sidereal_time_rad(TAU - 0.1, 0.2);
        assert!((wrapped - 0.1).abs() < 1e-12);
    }
}
