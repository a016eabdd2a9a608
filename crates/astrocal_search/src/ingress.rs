//! Zodiac ingress search.
//!
//! A body's geocentric ecliptic longitude modulo 30° crossing zero is a
//! sign boundary. The wrap modulus makes the 29.x° → 0.x° transition a
//! single genuine crossing. Retrograde bodies re-enter the previous
//! sign with a falling crossing; the entered sign is read from the
//! longitude just past the crossing either way.

use astrocal_ephem::{Body, EphemerisProvider, Frame};

use crate::adapters::ecliptic_longitude;
use crate::error::SearchError;
use crate::locate::{ConditionSpec, Direction, LocateConfig, RefineFailure, SearchWindow, locate};

/// The twelve signs, in longitude order from 0° Aries.
pub const ZODIAC_SIGNS: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// Width of one sign in degrees.
const SIGN_WIDTH_DEG: f64 = 30.0;

/// One sign-boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngressEvent {
    pub jd_utc: f64,
    pub body: Body,
    /// Index into [`ZODIAC_SIGNS`] of the sign being entered.
    pub sign_index: usize,
    /// True when the body entered moving retrograde (re-entering the
    /// previous sign).
    pub retrograde: bool,
}

impl IngressEvent {
    pub fn sign_name(&self) -> &'static str {
        ZODIAC_SIGNS[self.sign_index]
    }
}

/// Configuration for ingress search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngressConfig {
    /// Coarse scan step for most bodies, days.
    pub step_days: f64,
    /// Finer step for the Moon (≈13°/day; it can cross a sign boundary
    /// and a retrograde planet's step in under a day).
    pub moon_step_days: f64,
    pub locate: LocateConfig,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            step_days: 0.5,
            moon_step_days: 0.1,
            locate: LocateConfig::default(),
        }
    }
}

impl IngressConfig {
    fn step_for(&self, body: Body) -> f64 {
        if body == Body::Moon {
            self.moon_step_days
        } else {
            self.step_days
        }
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if !self.moon_step_days.is_finite() || self.moon_step_days <= 0.0 {
            return Err("moon_step_days must be positive");
        }
        self.locate.validate()
    }
}

/// Everything one body's ingress search produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngressOutcome {
    pub events: Vec<IngressEvent>,
    pub failures: Vec<RefineFailure>,
}

/// Search all sign-boundary crossings for one body.
pub fn search_ingresses(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_start: f64,
    jd_end: f64,
    config: &IngressConfig,
) -> Result<IngressOutcome, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let lon = |jd: f64| ecliptic_longitude(provider, body, Frame::Geocentric, jd);
    let window = SearchWindow::new(jd_start, jd_end, config.step_for(body));

    let located = locate(
        &lon,
        &ConditionSpec::zero_crossing().with_wrap(SIGN_WIDTH_DEG),
        &window,
        &config.locate,
    )?;

    let mut events = Vec::with_capacity(located.events.len());
    for ev in &located.events {
        // Read the sign just past the crossing; at the boundary itself
        // the refined longitude could floor to either side.
        let probe = lon(ev.jd_utc + 2.0 * config.locate.tolerance_days)?;
        events.push(IngressEvent {
            jd_utc: ev.jd_utc,
            body,
            sign_index: sign_index_of(probe),
            retrograde: ev.direction == Direction::Falling,
        });
    }

    Ok(IngressOutcome {
        events,
        failures: located.failures,
    })
}

/// Sign index of a longitude in degrees.
fn sign_index_of(lon_deg: f64) -> usize {
    ((lon_deg.rem_euclid(360.0) / SIGN_WIDTH_DEG).floor() as usize) % 12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_index_boundaries() {
        assert_eq!(sign_index_of(0.0), 0);
        assert_eq!(sign_index_of(29.999), 0);
        assert_eq!(sign_index_of(30.0), 1);
        assert_eq!(sign_index_of(359.999), 11);
        assert_eq!(sign_index_of(360.0), 0);
        assert_eq!(sign_index_of(-0.001), 11);
    }

    #[test]
    fn sign_names_cover_the_circle() {
        assert_eq!(ZODIAC_SIGNS.len(), 12);
        assert_eq!(ZODIAC_SIGNS[sign_index_of(45.0)], "Taurus");
        assert_eq!(ZODIAC_SIGNS[sign_index_of(275.0)], "Capricorn");
    }

    #[test]
    fn moon_gets_finer_step() {
        let c = IngressConfig::default();
        assert!(c.step_for(Body::Moon) < c.step_for(Body::Saturn));
    }
}
