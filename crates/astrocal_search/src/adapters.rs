//! Sampled-function adapters.
//!
//! Thin query helpers that reduce an [`EphemerisProvider`] answer to the
//! single scalar a search needs. Classifiers wrap these in closures and
//! hand them to [`crate::locate::locate`].

use astrocal_ephem::{Body, EphemerisProvider, Frame};
use astrocal_time::{gmst_rad, local_sidereal_time_rad};

use crate::almanac_types::GeoLocation;
use crate::error::SearchError;

/// Ecliptic longitude of `body` in degrees [0, 360).
pub fn ecliptic_longitude(
    provider: &dyn EphemerisProvider,
    body: Body,
    frame: Frame,
    jd_utc: f64,
) -> Result<f64, SearchError> {
    Ok(provider.position(body, jd_utc, frame)?.lon_deg)
}

/// Geocentric ecliptic latitude of `body` in degrees.
pub fn ecliptic_latitude(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_utc: f64,
) -> Result<f64, SearchError> {
    Ok(provider.position(body, jd_utc, Frame::Geocentric)?.lat_deg)
}

/// Geocentric declination of `body` in degrees.
pub fn declination(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_utc: f64,
) -> Result<f64, SearchError> {
    Ok(provider.position(body, jd_utc, Frame::Geocentric)?.dec_deg)
}

/// Geocentric distance of `body` in km.
pub fn distance_km(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_utc: f64,
) -> Result<f64, SearchError> {
    Ok(provider
        .position(body, jd_utc, Frame::Geocentric)?
        .distance_km)
}

/// Signed longitude separation `lon(a) - lon(b)` in degrees [0, 360).
///
/// This is the circular quantity aspect searches cross against their
/// target angles; symmetric pairs mirror through `360 - x`.
pub fn pair_separation(
    provider: &dyn EphemerisProvider,
    body_a: Body,
    body_b: Body,
    frame: Frame,
    jd_utc: f64,
) -> Result<f64, SearchError> {
    let lon_a = ecliptic_longitude(provider, body_a, frame, jd_utc)?;
    let lon_b = ecliptic_longitude(provider, body_b, frame, jd_utc)?;
    Ok((lon_a - lon_b).rem_euclid(360.0))
}

/// Moon−Sun elongation in degrees [0, 360).
///
/// 0 at New Moon, 180 at Full Moon; increases monotonically through
/// the synodic month.
pub fn elongation(provider: &dyn EphemerisProvider, jd_utc: f64) -> Result<f64, SearchError> {
    let moon = ecliptic_longitude(provider, Body::Moon, Frame::Geocentric, jd_utc)?;
    let sun = ecliptic_longitude(provider, Body::Sun, Frame::Geocentric, jd_utc)?;
    Ok((moon - sun).rem_euclid(360.0))
}

/// True (great-circle) angular separation between two bodies in
/// degrees, from their geocentric ecliptic positions.
pub fn angular_separation(
    provider: &dyn EphemerisProvider,
    body_a: Body,
    body_b: Body,
    jd_utc: f64,
) -> Result<f64, SearchError> {
    let a = provider.position(body_a, jd_utc, Frame::Geocentric)?;
    let b = provider.position(body_b, jd_utc, Frame::Geocentric)?;
    Ok(separation_between(a.lon_deg, a.lat_deg, b.lon_deg, b.lat_deg))
}

/// Great-circle separation between two ecliptic directions, degrees.
pub(crate) fn separation_between(
    lon_a_deg: f64,
    lat_a_deg: f64,
    lon_b_deg: f64,
    lat_b_deg: f64,
) -> f64 {
    let (la, ba) = (lon_a_deg.to_radians(), lat_a_deg.to_radians());
    let (lb, bb) = (lon_b_deg.to_radians(), lat_b_deg.to_radians());
    let cos_sep = ba.sin() * bb.sin() + ba.cos() * bb.cos() * (la - lb).cos();
    cos_sep.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Topocentric-style altitude of `body` above the horizon in degrees,
/// for an observer at `location`.
///
/// Standard horizontal-coordinate transform:
/// sin h = sin φ sin δ + cos φ cos δ cos H, with the hour angle H from
/// local sidereal time and the body's right ascension. Parallax is
/// ignored; the rise/set thresholds absorb the Moon's mean parallax.
pub fn altitude_deg(
    provider: &dyn EphemerisProvider,
    body: Body,
    location: &GeoLocation,
    jd_utc: f64,
) -> Result<f64, SearchError> {
    let pos = provider.position(body, jd_utc, Frame::Geocentric)?;
    let phi = location.latitude_rad();
    let dec = pos.dec_deg.to_radians();
    let ra = pos.ra_deg.to_radians();

    let lst = local_sidereal_time_rad(gmst_rad(jd_utc), location.longitude_rad());
    let ha = lst - ra;

    let sin_alt = phi.sin() * dec.sin() + phi.cos() * dec.cos() * ha.cos();
    Ok(sin_alt.clamp(-1.0, 1.0).asin().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrocal_ephem::SyntheticProvider;
    use astrocal_time::{J2000_JD, calendar_to_jd};

    const P: SyntheticProvider = SyntheticProvider;

    #[test]
    fn separation_symmetric_up_to_mirror() {
        for k in 0..12 {
            let jd = J2000_JD + k as f64 * 31.7;
            let ab = pair_separation(&P, Body::Mars, Body::Jupiter, Frame::Geocentric, jd).unwrap();
            let ba = pair_separation(&P, Body::Jupiter, Body::Mars, Frame::Geocentric, jd).unwrap();
            let mirrored = (360.0 - ab).rem_euclid(360.0);
            assert!(
                (ba - mirrored).abs() < 1e-9,
                "asymmetric separation at jd {jd}: {ab} vs {ba}"
            );
        }
    }

    #[test]
    fn angular_separation_is_symmetric() {
        let jd = J2000_JD + 500.0;
        let ab = angular_separation(&P, Body::Venus, Body::Saturn, jd).unwrap();
        let ba = angular_separation(&P, Body::Saturn, Body::Venus, jd).unwrap();
        assert!((ab - ba).abs() < 1e-12);
        assert!((0.0..=180.0).contains(&ab));
    }

    #[test]
    fn elongation_in_range_and_advancing() {
        let jd = calendar_to_jd(2024, 3, 1.0);
        let e0 = elongation(&P, jd).unwrap();
        let e1 = elongation(&P, jd + 1.0).unwrap();
        assert!((0.0..360.0).contains(&e0));
        // ~12.2°/day mean advance.
        let delta = (e1 - e0).rem_euclid(360.0);
        assert!((10.0..15.0).contains(&delta), "daily elongation {delta}");
    }

    #[test]
    fn separation_between_poles() {
        assert!((separation_between(0.0, 90.0, 0.0, -90.0) - 180.0).abs() < 1e-9);
        assert!((separation_between(10.0, 0.0, 40.0, 0.0) - 30.0).abs() < 1e-9);
        assert!(separation_between(5.0, 2.0, 5.0, 2.0).abs() < 1e-9);
    }

    #[test]
    fn altitude_bounded_by_colatitude() {
        let nyc = GeoLocation::new(40.7128, -74.0060);
        for k in 0..24 {
            let jd = calendar_to_jd(2024, 6, 1.0) + k as f64 / 24.0;
            let alt = altitude_deg(&P, Body::Sun, &nyc, jd).unwrap();
            assert!((-90.0..=90.0).contains(&alt));
        }
    }

    #[test]
    fn sun_high_at_local_noon() {
        // Greenwich, June: the Sun should be well above the horizon at
        // 12:00 UT and below it at midnight.
        let greenwich = GeoLocation::new(51.4769, 0.0);
        let noon = calendar_to_jd(2024, 6, 21.5);
        let midnight = calendar_to_jd(2024, 6, 21.0);
        let alt_noon = altitude_deg(&P, Body::Sun, &greenwich, noon).unwrap();
        let alt_midnight = altitude_deg(&P, Body::Sun, &greenwich, midnight).unwrap();
        assert!(alt_noon > 50.0, "noon altitude {alt_noon}");
        assert!(alt_midnight < -10.0, "midnight altitude {alt_midnight}");
    }
}
