//! Deterministic low-fidelity ephemeris.
//!
//! Truncated analytic series for the Sun and Moon (standard
//! low-precision expansions, good to ~0.01° and ~0.3° respectively)
//! and mean circular heliocentric orbits for the planets. That is
//! enough to exercise every classifier with realistic behavior —
//! apparent retrograde loops, node crossings, eclipse seasons, real
//! equinox dates — without any kernel files.
//!
//! This is a stand-in for a real ephemeris, not a model of one: tests,
//! benches, and the demo CLI use it; production callers implement
//! [`EphemerisProvider`] over their own ephemeris.

use astrocal_time::J2000_JD;

use crate::{Body, BodyPosition, EphemerisProvider, Frame, ProviderError};

/// Astronomical unit in km (IAU 2012).
const AU_KM: f64 = 149_597_870.7;

/// Mean obliquity of the ecliptic at J2000, degrees.
const OBLIQUITY_DEG: f64 = 23.439_291;

/// Mean orbital elements: semi-major axis (au), mean longitude at
/// J2000 (deg), orbital period (days).
const PLANET_ELEMENTS: [(Body, f64, f64, f64); 8] = [
    (Body::Mercury, 0.387_098, 252.250_906, 87.9691),
    (Body::Venus, 0.723_330, 181.979_801, 224.7008),
    (Body::Mars, 1.523_679, 355.433_275, 686.9796),
    (Body::Jupiter, 5.202_603, 34.351_484, 4_332.8201),
    (Body::Saturn, 9.554_909, 50.077_471, 10_755.6996),
    (Body::Uranus, 19.218_446, 314.055_005, 30_687.153),
    (Body::Neptune, 30.110_387, 304.348_665, 60_190.03),
    (Body::Pluto, 39.481_687, 238.928_81, 90_560.0),
];

/// Earth's mean elements, used as the observation point.
const EARTH_A_AU: f64 = 1.000_001;
const EARTH_L0_DEG: f64 = 100.466_457;
const EARTH_PERIOD_DAYS: f64 = 365.256_363;

/// Deterministic analytic ephemeris provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }
}

fn sin_deg(d: f64) -> f64 {
    d.to_radians().sin()
}

fn cos_deg(d: f64) -> f64 {
    d.to_radians().cos()
}

/// Geocentric solar position: apparent ecliptic longitude (deg),
/// latitude (deg, ≈0), distance (km). Low-precision series, ~0.01°.
fn sun_geocentric(jd: f64) -> (f64, f64, f64) {
    let t = (jd - J2000_JD) / 36_525.0;

    let l0 = 280.46646 + 36_000.76983 * t + 0.0003032 * t * t;
    let m = 357.52911 + 35_999.05029 * t - 0.0001537 * t * t;
    let e = 0.016708634 - 0.000042037 * t;

    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * sin_deg(m)
        + (0.019993 - 0.000101 * t) * sin_deg(2.0 * m)
        + 0.000289 * sin_deg(3.0 * m);

    let true_lon = l0 + c;
    let nu = m + c;
    let r_au = 1.000001018 * (1.0 - e * e) / (1.0 + e * cos_deg(nu));

    // Constant aberration correction gives the apparent longitude.
    let apparent = (true_lon - 0.00569).rem_euclid(360.0);
    (apparent, 0.0, r_au * AU_KM)
}

/// Geocentric lunar position: ecliptic longitude (deg), latitude (deg),
/// distance (km). Largest terms of the standard lunar series.
fn moon_geocentric(jd: f64) -> (f64, f64, f64) {
    let t = (jd - J2000_JD) / 36_525.0;

    let lp = 218.3164477 + 481_267.88123421 * t; // mean longitude
    let d = 297.8501921 + 445_267.1114034 * t; // mean elongation
    let m = 357.5291092 + 35_999.0502909 * t; // Sun mean anomaly
    let mp = 134.9633964 + 477_198.8675055 * t; // Moon mean anomaly
    let f = 93.2720950 + 483_202.0175233 * t; // argument of latitude

    let lon = lp
        + 6.288774 * sin_deg(mp)
        + 1.274027 * sin_deg(2.0 * d - mp)
        + 0.658314 * sin_deg(2.0 * d)
        + 0.213618 * sin_deg(2.0 * mp)
        - 0.185116 * sin_deg(m)
        - 0.114332 * sin_deg(2.0 * f)
        + 0.058793 * sin_deg(2.0 * d - 2.0 * mp)
        + 0.057066 * sin_deg(2.0 * d - m - mp)
        + 0.053322 * sin_deg(2.0 * d + mp)
        + 0.045758 * sin_deg(2.0 * d - m);

    let lat = 5.128122 * sin_deg(f)
        + 0.280602 * sin_deg(mp + f)
        + 0.277693 * sin_deg(mp - f)
        + 0.173237 * sin_deg(2.0 * d - f)
        + 0.055413 * sin_deg(2.0 * d - mp + f)
        + 0.046271 * sin_deg(2.0 * d - mp - f);

    let dist = 385_000.56 - 20_905.355 * cos_deg(mp) - 3_699.111 * cos_deg(2.0 * d - mp)
        - 2_955.968 * cos_deg(2.0 * d)
        - 569.925 * cos_deg(2.0 * mp);

    (lon.rem_euclid(360.0), lat, dist)
}

/// Heliocentric ecliptic x/y (au) on a mean circular orbit.
fn circular_xy(a_au: f64, l0_deg: f64, period_days: f64, jd: f64) -> (f64, f64) {
    let rate = 360.0 / period_days;
    let l = (l0_deg + rate * (jd - J2000_JD)).to_radians();
    (a_au * l.cos(), a_au * l.sin())
}

fn earth_xy(jd: f64) -> (f64, f64) {
    circular_xy(EARTH_A_AU, EARTH_L0_DEG, EARTH_PERIOD_DAYS, jd)
}

fn planet_elements(body: Body) -> Option<(f64, f64, f64)> {
    PLANET_ELEMENTS
        .iter()
        .find(|(b, ..)| *b == body)
        .map(|&(_, a, l0, p)| (a, l0, p))
}

/// Ecliptic lon/lat → equatorial RA/Dec, all degrees.
fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let eps = OBLIQUITY_DEG.to_radians();
    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();

    let sin_dec = lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin();
    let dec = sin_dec.clamp(-1.0, 1.0).asin();
    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());

    (ra.to_degrees().rem_euclid(360.0), dec.to_degrees())
}

fn position_from_ecliptic(lon_deg: f64, lat_deg: f64, distance_km: f64) -> BodyPosition {
    let (ra_deg, dec_deg) = ecliptic_to_equatorial(lon_deg, lat_deg);
    BodyPosition {
        lon_deg,
        lat_deg,
        ra_deg,
        dec_deg,
        distance_km,
    }
}

/// Ecliptic-plane x/y (au) of a body's geocentric lon/lat/dist.
fn geo_to_xy(lon_deg: f64, dist_km: f64) -> (f64, f64) {
    let lon = lon_deg.to_radians();
    let r = dist_km / AU_KM;
    (r * lon.cos(), r * lon.sin())
}

impl EphemerisProvider for SyntheticProvider {
    fn position(
        &self,
        body: Body,
        jd_utc: f64,
        frame: Frame,
    ) -> Result<BodyPosition, ProviderError> {
        if !jd_utc.is_finite() {
            return Err(ProviderError::EpochOutOfRange { jd_utc });
        }

        match (body, frame) {
            (Body::Sun, Frame::Heliocentric) => Err(ProviderError::UndefinedQuery(
                "Sun has no heliocentric position",
            )),
            (Body::Sun, Frame::Geocentric) => {
                let (lon, lat, dist) = sun_geocentric(jd_utc);
                Ok(position_from_ecliptic(lon, lat, dist))
            }
            (Body::Moon, Frame::Geocentric) => {
                let (lon, lat, dist) = moon_geocentric(jd_utc);
                Ok(position_from_ecliptic(lon, lat, dist))
            }
            (Body::Moon, Frame::Heliocentric) => {
                let (ex, ey) = earth_xy(jd_utc);
                let (lon, _, dist) = moon_geocentric(jd_utc);
                let (mx, my) = geo_to_xy(lon, dist);
                let (x, y) = (ex + mx, ey + my);
                let lon = y.atan2(x).to_degrees().rem_euclid(360.0);
                let r = (x * x + y * y).sqrt();
                Ok(position_from_ecliptic(lon, 0.0, r * AU_KM))
            }
            (planet, Frame::Heliocentric) => {
                let (a, l0, period) = planet_elements(planet)
                    .ok_or(ProviderError::UndefinedQuery("unknown planet elements"))?;
                let (x, y) = circular_xy(a, l0, period, jd_utc);
                let lon = y.atan2(x).to_degrees().rem_euclid(360.0);
                Ok(position_from_ecliptic(lon, 0.0, a * AU_KM))
            }
            (planet, Frame::Geocentric) => {
                let (a, l0, period) = planet_elements(planet)
                    .ok_or(ProviderError::UndefinedQuery("unknown planet elements"))?;
                let (px, py) = circular_xy(a, l0, period, jd_utc);
                let (ex, ey) = earth_xy(jd_utc);
                let (x, y) = (px - ex, py - ey);
                let lon = y.atan2(x).to_degrees().rem_euclid(360.0);
                let r = (x * x + y * y).sqrt();
                Ok(position_from_ecliptic(lon, 0.0, r * AU_KM))
            }
        }
    }
}
