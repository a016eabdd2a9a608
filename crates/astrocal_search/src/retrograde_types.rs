//! Types for retrograde station and shadow-exit search.

use astrocal_ephem::Body;

use crate::locate::LocateConfig;

/// Which way the apparent motion flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationKind {
    /// Longitude rate crossed positive→negative: retrograde begins.
    Retrograde,
    /// Longitude rate crossed negative→positive: direct motion resumes.
    Direct,
}

impl StationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Retrograde => "Retrograde",
            Self::Direct => "Direct",
        }
    }
}

/// A station: the instant a planet's apparent longitude motion
/// reverses as seen from Earth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationEvent {
    pub jd_utc: f64,
    pub body: Body,
    pub kind: StationKind,
    /// Geocentric ecliptic longitude at the station, degrees [0, 360).
    pub longitude_deg: f64,
}

/// The instant a planet, moving direct again, re-crosses the longitude
/// where its previous retrograde began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowExitEvent {
    pub jd_utc: f64,
    pub body: Body,
    /// The retrograde-station longitude being re-crossed, degrees.
    pub longitude_deg: f64,
}

/// Configuration for station and shadow-exit search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrogradeConfig {
    /// Coarse scan step in days.
    pub step_days: f64,
    /// How far past a direct station to look for the shadow exit.
    pub shadow_scan_days: f64,
    /// Scan step for the shadow-exit longitude re-crossing.
    pub shadow_step_days: f64,
    /// Extra scan margin past the requested range so retrograde loops
    /// straddling the boundary resolve; events are filtered back to
    /// the range afterwards.
    pub scan_margin_days: f64,
    pub locate: LocateConfig,
}

impl Default for RetrogradeConfig {
    fn default() -> Self {
        Self {
            step_days: 1.0,
            shadow_scan_days: 365.0,
            shadow_step_days: 2.0,
            scan_margin_days: 400.0,
            locate: LocateConfig::default(),
        }
    }
}

impl RetrogradeConfig {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if !self.shadow_scan_days.is_finite() || self.shadow_scan_days <= 0.0 {
            return Err("shadow_scan_days must be positive");
        }
        if !self.shadow_step_days.is_finite() || self.shadow_step_days <= 0.0 {
            return Err("shadow_step_days must be positive");
        }
        if !self.scan_margin_days.is_finite() || self.scan_margin_days < 0.0 {
            return Err("scan_margin_days must be non-negative");
        }
        self.locate.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        assert!(RetrogradeConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_step() {
        let c = RetrogradeConfig {
            step_days: 0.0,
            ..RetrogradeConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn station_labels() {
        assert_eq!(StationKind::Retrograde.label(), "Retrograde");
        assert_eq!(StationKind::Direct.label(), "Direct");
    }
}
