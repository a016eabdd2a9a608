//! Types for eclipse search.

use crate::locate::LocateConfig;
use crate::moon_phase::MoonPhaseConfig;

/// Geocentric solar eclipse classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarEclipseKind {
    Partial,
    Annular,
    Total,
}

impl SolarEclipseKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Partial => "Partial Solar Eclipse",
            Self::Annular => "Annular Solar Eclipse",
            Self::Total => "Total Solar Eclipse",
        }
    }
}

/// Lunar eclipse classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LunarEclipseKind {
    Penumbral,
    Partial,
    Total,
}

impl LunarEclipseKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Penumbral => "Penumbral Lunar Eclipse",
            Self::Partial => "Partial Lunar Eclipse",
            Self::Total => "Total Lunar Eclipse",
        }
    }
}

/// A geocentric solar eclipse with its contact instants.
///
/// Contacts are `None` when the corresponding boundary crossing does
/// not exist (internal contacts for a partial eclipse) or could not be
/// bracketed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarEclipse {
    pub kind: SolarEclipseKind,
    /// Instant of greatest eclipse (the New Moon), JD UTC.
    pub greatest_jd: f64,
    /// Ratio of lunar to solar apparent radius.
    pub magnitude: f64,
    /// First external contact: disks begin touching.
    pub c1_jd: Option<f64>,
    /// First internal contact: totality/annularity begins.
    pub c2_jd: Option<f64>,
    /// Last internal contact: totality/annularity ends.
    pub c3_jd: Option<f64>,
    /// Last external contact: disks separate.
    pub c4_jd: Option<f64>,
    /// Sun–Moon separation at greatest eclipse, degrees.
    pub min_separation_deg: f64,
    /// Moon ecliptic latitude at greatest eclipse, degrees.
    pub moon_lat_deg: f64,
}

/// A lunar eclipse with its contact instants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarEclipse {
    pub kind: LunarEclipseKind,
    /// Instant of greatest eclipse (the Full Moon), JD UTC.
    pub greatest_jd: f64,
    /// Fraction of the lunar diameter inside the umbra.
    pub umbral_magnitude: f64,
    /// Fraction of the lunar diameter inside the penumbra.
    pub penumbral_magnitude: f64,
    /// Penumbral contacts (first touch / last touch).
    pub p1_jd: Option<f64>,
    pub p4_jd: Option<f64>,
    /// Umbral contacts (partial phase bounds).
    pub u1_jd: Option<f64>,
    pub u4_jd: Option<f64>,
    /// Totality contacts; present only for total eclipses.
    pub u2_jd: Option<f64>,
    pub u3_jd: Option<f64>,
    /// Moon ecliptic latitude at greatest eclipse, degrees.
    pub moon_lat_deg: f64,
}

/// Configuration for eclipse search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseConfig {
    /// Report penumbral-only lunar eclipses.
    pub include_penumbral: bool,
    /// Moon ecliptic latitude beyond which a syzygy cannot eclipse,
    /// degrees. Generous; exact geometry filters afterwards.
    pub lat_threshold_deg: f64,
    /// Half-window around greatest eclipse searched for contacts, days.
    pub contact_window_days: f64,
    /// Scan step for contact crossings within that window, days.
    pub contact_step_days: f64,
    /// Phase search used to find the candidate syzygies.
    pub phase: MoonPhaseConfig,
    pub locate: LocateConfig,
}

impl Default for EclipseConfig {
    fn default() -> Self {
        Self {
            include_penumbral: true,
            lat_threshold_deg: 2.0,
            contact_window_days: 0.25,
            contact_step_days: 0.01,
            phase: MoonPhaseConfig::default(),
            locate: LocateConfig::default(),
        }
    }
}

impl EclipseConfig {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.lat_threshold_deg.is_finite() || self.lat_threshold_deg <= 0.0 {
            return Err("lat_threshold_deg must be positive");
        }
        if !self.contact_window_days.is_finite() || self.contact_window_days <= 0.0 {
            return Err("contact_window_days must be positive");
        }
        if !self.contact_step_days.is_finite()
            || self.contact_step_days <= 0.0
            || self.contact_step_days >= self.contact_window_days
        {
            return Err("contact_step_days must be positive and inside the contact window");
        }
        self.phase.validate()?;
        self.locate.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        assert!(EclipseConfig::default().validate().is_ok());
        assert!(EclipseConfig::default().include_penumbral);
    }

    #[test]
    fn rejects_step_wider_than_window() {
        let c = EclipseConfig {
            contact_step_days: 1.0,
            ..EclipseConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn labels_name_the_geometry() {
        assert_eq!(SolarEclipseKind::Annular.label(), "Annular Solar Eclipse");
        assert_eq!(LunarEclipseKind::Penumbral.label(), "Penumbral Lunar Eclipse");
    }
}
