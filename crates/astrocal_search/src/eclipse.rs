//! Eclipse search: lunar (penumbral/partial/total) and geocentric
//! solar (partial/annular/total).
//!
//! Built on the phase search: every New Moon is a solar candidate,
//! every Full Moon a lunar candidate. Candidates pass a Moon-latitude
//! filter, then exact geometry classifies them:
//!
//! Solar: apparent Sun and Moon radii from their distances; the
//! minimum separation against the radius sum/difference decides
//! partial vs central, and lunar vs solar radius decides total vs
//! annular. Contacts C1–C4 are separation threshold crossings.
//!
//! Lunar: Earth shadow radii at the Moon's distance by the Danjon
//! augmented method (geometric shadow enlarged 2% for the atmosphere);
//! the Moon's offset from the shadow axis against the penumbral/umbral
//! radii classifies the eclipse, and contacts P1/U1–U4/P4 are offset
//! threshold crossings for the matching limb.

use astrocal_ephem::{Body, EphemerisProvider, Frame};

use crate::adapters::{angular_separation, distance_km, separation_between};
use crate::eclipse_types::{
    EclipseConfig, LunarEclipse, LunarEclipseKind, SolarEclipse, SolarEclipseKind,
};
use crate::error::SearchError;
use crate::locate::{ConditionSpec, Direction, RefineFailure, SearchWindow, locate};
use crate::moon_phase::{MoonPhase, search_moon_phases};

// ---------------------------------------------------------------------------
// Constants (IAU 2015 nominal values)
// ---------------------------------------------------------------------------

/// Earth equatorial radius in km.
const EARTH_RADIUS_KM: f64 = 6_378.137;

/// Sun nominal radius in km.
const SUN_RADIUS_KM: f64 = 696_000.0;

/// Moon mean radius in km.
const MOON_RADIUS_KM: f64 = 1_737.4;

/// Danjon atmospheric enlargement factor for Earth's shadow.
const DANJON_ENLARGEMENT: f64 = 1.02;

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// Earth shadow radii at the Moon's distance: `(penumbral, umbral)`
/// angular radii in degrees.
fn shadow_radii_deg(sun_dist_km: f64, moon_dist_km: f64) -> (f64, f64) {
    let pi_sun = (EARTH_RADIUS_KM / sun_dist_km).asin();
    let pi_moon = (EARTH_RADIUS_KM / moon_dist_km).asin();
    let s_sun = (SUN_RADIUS_KM / sun_dist_km).asin();

    let penumbral = DANJON_ENLARGEMENT * (pi_moon + pi_sun + s_sun);
    let umbral = DANJON_ENLARGEMENT * (pi_moon + pi_sun - s_sun);
    (penumbral.to_degrees(), umbral.to_degrees())
}

/// Moon's apparent angular radius in degrees.
fn moon_angular_radius_deg(moon_dist_km: f64) -> f64 {
    (MOON_RADIUS_KM / moon_dist_km).asin().to_degrees()
}

/// Sun's apparent angular radius in degrees.
fn sun_angular_radius_deg(sun_dist_km: f64) -> f64 {
    (SUN_RADIUS_KM / sun_dist_km).asin().to_degrees()
}

/// Angular offset of the Moon from the shadow axis (the anti-solar
/// point), degrees.
fn moon_shadow_offset_deg(
    provider: &dyn EphemerisProvider,
    jd_utc: f64,
) -> Result<f64, SearchError> {
    let sun = provider.position(Body::Sun, jd_utc, Frame::Geocentric)?;
    let moon = provider.position(Body::Moon, jd_utc, Frame::Geocentric)?;
    let shadow_lon = (sun.lon_deg + 180.0).rem_euclid(360.0);
    let shadow_lat = -sun.lat_deg;
    Ok(separation_between(
        moon.lon_deg,
        moon.lat_deg,
        shadow_lon,
        shadow_lat,
    ))
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a lunar eclipse from the shadow geometry at greatest
/// eclipse, or `None` when the Moon misses the penumbra entirely.
fn classify_lunar(
    shadow_offset_deg: f64,
    moon_radius_deg: f64,
    umbral_radius_deg: f64,
    penumbral_radius_deg: f64,
) -> Option<LunarEclipseKind> {
    let near_edge = shadow_offset_deg - moon_radius_deg;
    let far_edge = shadow_offset_deg + moon_radius_deg;

    if near_edge >= penumbral_radius_deg {
        None
    } else if far_edge <= umbral_radius_deg {
        Some(LunarEclipseKind::Total)
    } else if near_edge < umbral_radius_deg {
        Some(LunarEclipseKind::Partial)
    } else {
        Some(LunarEclipseKind::Penumbral)
    }
}

/// Classify a geocentric solar eclipse, or `None` when the disks never
/// overlap.
fn classify_solar(
    sun_radius_deg: f64,
    moon_radius_deg: f64,
    min_separation_deg: f64,
) -> Option<SolarEclipseKind> {
    if min_separation_deg >= sun_radius_deg + moon_radius_deg {
        return None;
    }
    if min_separation_deg < (moon_radius_deg - sun_radius_deg).abs() {
        if moon_radius_deg >= sun_radius_deg {
            Some(SolarEclipseKind::Total)
        } else {
            Some(SolarEclipseKind::Annular)
        }
    } else {
        Some(SolarEclipseKind::Partial)
    }
}

// ---------------------------------------------------------------------------
// Contact search
// ---------------------------------------------------------------------------

/// Locate the contact where `f` crosses zero on the given side of the
/// greatest eclipse. `before` selects the falling crossing on the
/// approach, otherwise the rising crossing on the recession.
fn find_contact<F>(
    f: &F,
    greatest_jd: f64,
    before: bool,
    config: &EclipseConfig,
    failures: &mut Vec<RefineFailure>,
) -> Result<Option<f64>, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    let (lo, hi) = if before {
        (greatest_jd - config.contact_window_days, greatest_jd)
    } else {
        (greatest_jd, greatest_jd + config.contact_window_days)
    };

    let located = locate(
        f,
        &ConditionSpec::zero_crossing(),
        &SearchWindow::new(lo, hi, config.contact_step_days),
        &config.locate,
    )?;
    failures.extend_from_slice(&located.failures);

    let wanted = if before {
        Direction::Falling
    } else {
        Direction::Rising
    };
    let mut matching = located.events.iter().filter(|ev| ev.direction == wanted);
    Ok(if before {
        matching.last().map(|ev| ev.jd_utc)
    } else {
        matching.next().map(|ev| ev.jd_utc)
    })
}

// ---------------------------------------------------------------------------
// Lunar eclipses
// ---------------------------------------------------------------------------

/// Everything the lunar eclipse search produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LunarEclipseOutcome {
    pub eclipses: Vec<LunarEclipse>,
    pub failures: Vec<RefineFailure>,
}

/// Search all lunar eclipses in the range.
pub fn search_lunar_eclipses(
    provider: &dyn EphemerisProvider,
    jd_start: f64,
    jd_end: f64,
    config: &EclipseConfig,
) -> Result<LunarEclipseOutcome, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let phases = search_moon_phases(provider, jd_start, jd_end, &config.phase)?;
    let mut outcome = LunarEclipseOutcome {
        failures: phases.failures.clone(),
        ..LunarEclipseOutcome::default()
    };

    for phase in &phases.events {
        if phase.phase != MoonPhase::Full {
            continue;
        }
        if let Some(eclipse) =
            compute_lunar_eclipse(provider, phase.jd_utc, config, &mut outcome.failures)?
        {
            outcome.eclipses.push(eclipse);
        }
    }
    Ok(outcome)
}

/// Evaluate one Full Moon as a lunar eclipse candidate.
fn compute_lunar_eclipse(
    provider: &dyn EphemerisProvider,
    full_moon_jd: f64,
    config: &EclipseConfig,
    failures: &mut Vec<RefineFailure>,
) -> Result<Option<LunarEclipse>, SearchError> {
    let moon = provider.position(Body::Moon, full_moon_jd, Frame::Geocentric)?;
    if moon.lat_deg.abs() > config.lat_threshold_deg {
        return Ok(None);
    }

    let sun_dist = distance_km(provider, Body::Sun, full_moon_jd)?;
    let (penumbral_radius, umbral_radius) = shadow_radii_deg(sun_dist, moon.distance_km);
    let moon_radius = moon_angular_radius_deg(moon.distance_km);
    let offset = moon_shadow_offset_deg(provider, full_moon_jd)?;

    let Some(kind) = classify_lunar(offset, moon_radius, umbral_radius, penumbral_radius) else {
        return Ok(None);
    };
    if kind == LunarEclipseKind::Penumbral && !config.include_penumbral {
        return Ok(None);
    }

    let umbral_magnitude = (umbral_radius - offset + moon_radius) / (2.0 * moon_radius);
    let penumbral_magnitude = (penumbral_radius - offset + moon_radius) / (2.0 * moon_radius);

    // Contact functions: signed distance of the relevant limb from the
    // boundary. Negative while inside.
    let limb_crossing = |boundary: f64, limb_sign: f64| {
        move |jd: f64| -> Result<f64, SearchError> {
            let offset = moon_shadow_offset_deg(provider, jd)?;
            let moon_dist = distance_km(provider, Body::Moon, jd)?;
            Ok(offset + limb_sign * moon_angular_radius_deg(moon_dist) - boundary)
        }
    };

    // Outer limb against the penumbra: first and last touch.
    let outer_pen = limb_crossing(penumbral_radius, 1.0);
    let p1_jd = find_contact(&outer_pen, full_moon_jd, true, config, failures)?;
    let p4_jd = find_contact(&outer_pen, full_moon_jd, false, config, failures)?;

    // Outer limb against the umbra: partial phase bounds.
    let (u1_jd, u4_jd) = if kind != LunarEclipseKind::Penumbral {
        let outer_umb = limb_crossing(umbral_radius, 1.0);
        (
            find_contact(&outer_umb, full_moon_jd, true, config, failures)?,
            find_contact(&outer_umb, full_moon_jd, false, config, failures)?,
        )
    } else {
        (None, None)
    };

    // Inner limb against the umbra: totality bounds. Total requires
    // this core-shadow bracket on top of the outer one.
    let (u2_jd, u3_jd) = if kind == LunarEclipseKind::Total {
        let inner_umb = limb_crossing(umbral_radius, -1.0);
        (
            find_contact(&inner_umb, full_moon_jd, true, config, failures)?,
            find_contact(&inner_umb, full_moon_jd, false, config, failures)?,
        )
    } else {
        (None, None)
    };

    Ok(Some(LunarEclipse {
        kind,
        greatest_jd: full_moon_jd,
        umbral_magnitude,
        penumbral_magnitude,
        p1_jd,
        p4_jd,
        u1_jd,
        u4_jd,
        u2_jd,
        u3_jd,
        moon_lat_deg: moon.lat_deg,
    }))
}

// ---------------------------------------------------------------------------
// Solar eclipses (geocentric)
// ---------------------------------------------------------------------------

/// Everything the solar eclipse search produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolarEclipseOutcome {
    pub eclipses: Vec<SolarEclipse>,
    pub failures: Vec<RefineFailure>,
}

/// Search all geocentric solar eclipses in the range.
pub fn search_solar_eclipses(
    provider: &dyn EphemerisProvider,
    jd_start: f64,
    jd_end: f64,
    config: &EclipseConfig,
) -> Result<SolarEclipseOutcome, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let phases = search_moon_phases(provider, jd_start, jd_end, &config.phase)?;
    let mut outcome = SolarEclipseOutcome {
        failures: phases.failures.clone(),
        ..SolarEclipseOutcome::default()
    };

    for phase in &phases.events {
        if phase.phase != MoonPhase::New {
            continue;
        }
        if let Some(eclipse) =
            compute_solar_eclipse(provider, phase.jd_utc, config, &mut outcome.failures)?
        {
            outcome.eclipses.push(eclipse);
        }
    }
    Ok(outcome)
}

/// Evaluate one New Moon as a solar eclipse candidate.
fn compute_solar_eclipse(
    provider: &dyn EphemerisProvider,
    new_moon_jd: f64,
    config: &EclipseConfig,
    failures: &mut Vec<RefineFailure>,
) -> Result<Option<SolarEclipse>, SearchError> {
    let moon = provider.position(Body::Moon, new_moon_jd, Frame::Geocentric)?;
    if moon.lat_deg.abs() > config.lat_threshold_deg {
        return Ok(None);
    }

    let sun_dist = distance_km(provider, Body::Sun, new_moon_jd)?;
    let sun_radius = sun_angular_radius_deg(sun_dist);
    let moon_radius = moon_angular_radius_deg(moon.distance_km);
    let min_sep = angular_separation(provider, Body::Sun, Body::Moon, new_moon_jd)?;

    let Some(kind) = classify_solar(sun_radius, moon_radius, min_sep) else {
        return Ok(None);
    };

    let magnitude = moon_radius / sun_radius;

    let separation_minus = |target: f64| {
        move |jd: f64| -> Result<f64, SearchError> {
            Ok(angular_separation(provider, Body::Sun, Body::Moon, jd)? - target)
        }
    };

    // External contacts: disks touch at radius sum.
    let external = separation_minus(sun_radius + moon_radius);
    let c1_jd = find_contact(&external, new_moon_jd, true, config, failures)?;
    let c4_jd = find_contact(&external, new_moon_jd, false, config, failures)?;

    // Internal contacts only exist for central eclipses.
    let (c2_jd, c3_jd) = if kind != SolarEclipseKind::Partial {
        let internal = separation_minus((sun_radius - moon_radius).abs());
        (
            find_contact(&internal, new_moon_jd, true, config, failures)?,
            find_contact(&internal, new_moon_jd, false, config, failures)?,
        )
    } else {
        (None, None)
    };

    Ok(Some(SolarEclipse {
        kind,
        greatest_jd: new_moon_jd,
        magnitude,
        c1_jd,
        c2_jd,
        c3_jd,
        c4_jd,
        min_separation_deg: min_sep,
        moon_lat_deg: moon.lat_deg,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_radii_reasonable() {
        // Sun at ~1 au, Moon at mean distance.
        let (pen, umb) = shadow_radii_deg(149_597_870.7, 384_400.0);
        assert!(pen > 1.1 && pen < 1.4, "penumbral = {pen}");
        assert!(umb > 0.6 && umb < 0.8, "umbral = {umb}");
    }

    #[test]
    fn apparent_radii_typical() {
        let m = moon_angular_radius_deg(384_400.0);
        let s = sun_angular_radius_deg(149_597_870.7);
        assert!(m > 0.24 && m < 0.28, "moon radius = {m}");
        assert!(s > 0.25 && s < 0.28, "sun radius = {s}");
    }

    #[test]
    fn classify_lunar_total() {
        // Moon fully inside the umbra.
        assert_eq!(
            classify_lunar(0.1, 0.26, 0.70, 1.25),
            Some(LunarEclipseKind::Total)
        );
    }

    #[test]
    fn classify_lunar_partial() {
        // Near edge inside the umbra, far edge outside.
        assert_eq!(
            classify_lunar(0.55, 0.26, 0.70, 1.25),
            Some(LunarEclipseKind::Partial)
        );
    }

    #[test]
    fn classify_lunar_penumbral() {
        assert_eq!(
            classify_lunar(1.05, 0.26, 0.70, 1.25),
            Some(LunarEclipseKind::Penumbral)
        );
    }

    #[test]
    fn classify_lunar_miss() {
        assert_eq!(classify_lunar(1.6, 0.26, 0.70, 1.25), None);
    }

    #[test]
    fn classify_solar_total() {
        assert_eq!(
            classify_solar(0.266, 0.270, 0.002),
            Some(SolarEclipseKind::Total)
        );
    }

    #[test]
    fn classify_solar_annular() {
        assert_eq!(
            classify_solar(0.266, 0.250, 0.002),
            Some(SolarEclipseKind::Annular)
        );
    }

    #[test]
    fn classify_solar_partial() {
        assert_eq!(
            classify_solar(0.266, 0.260, 0.30),
            Some(SolarEclipseKind::Partial)
        );
    }

    #[test]
    fn classify_solar_miss() {
        assert_eq!(classify_solar(0.266, 0.260, 0.6), None);
    }

    #[test]
    fn danjon_enlargement_is_two_percent() {
        assert!((DANJON_ENLARGEMENT - 1.02).abs() < 1e-12);
    }
}
