//! Seasonal event search: equinoxes and solstices.
//!
//! The Sun's apparent geocentric longitude crossing 0°, 90°, 180°, and
//! 270° marks the vernal equinox, summer solstice, autumnal equinox,
//! and winter solstice respectively (northern-hemisphere naming).

use astrocal_ephem::{Body, EphemerisProvider, Frame};

use crate::adapters::ecliptic_longitude;
use crate::error::SearchError;
use crate::locate::{ConditionSpec, LocateConfig, RefineFailure, SearchWindow, locate};

/// The four seasonal cardinal points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeasonKind {
    VernalEquinox,
    SummerSolstice,
    AutumnalEquinox,
    WinterSolstice,
}

impl SeasonKind {
    pub const ALL: [SeasonKind; 4] = [
        SeasonKind::VernalEquinox,
        SeasonKind::SummerSolstice,
        SeasonKind::AutumnalEquinox,
        SeasonKind::WinterSolstice,
    ];

    /// Solar longitude at this cardinal point, degrees.
    pub const fn target_deg(self) -> f64 {
        match self {
            Self::VernalEquinox => 0.0,
            Self::SummerSolstice => 90.0,
            Self::AutumnalEquinox => 180.0,
            Self::WinterSolstice => 270.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VernalEquinox => "Vernal Equinox (Spring)",
            Self::SummerSolstice => "Summer Solstice",
            Self::AutumnalEquinox => "Autumnal Equinox (Fall)",
            Self::WinterSolstice => "Winter Solstice",
        }
    }

    /// Equinoxes cross the equator; solstices are the standstills.
    pub const fn is_equinox(self) -> bool {
        matches!(self, Self::VernalEquinox | Self::AutumnalEquinox)
    }
}

/// One equinox or solstice instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonEvent {
    pub jd_utc: f64,
    pub kind: SeasonKind,
}

/// Configuration for seasonal search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonConfig {
    /// Coarse scan step in days; the Sun moves ~1°/day so daily
    /// sampling brackets each crossing comfortably.
    pub step_days: f64,
    pub locate: LocateConfig,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            step_days: 1.0,
            locate: LocateConfig::default(),
        }
    }
}

impl SeasonConfig {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        self.locate.validate()
    }
}

/// Everything the seasonal search produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonOutcome {
    /// Events in ascending time order.
    pub events: Vec<SeasonEvent>,
    pub failures: Vec<RefineFailure>,
}

/// Search all equinoxes and solstices in the range.
pub fn search_seasons(
    provider: &dyn EphemerisProvider,
    jd_start: f64,
    jd_end: f64,
    config: &SeasonConfig,
) -> Result<SeasonOutcome, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let sun_lon = |jd: f64| ecliptic_longitude(provider, Body::Sun, Frame::Geocentric, jd);
    let window = SearchWindow::new(jd_start, jd_end, config.step_days);

    let mut outcome = SeasonOutcome::default();
    for kind in SeasonKind::ALL {
        let located = locate(
            &sun_lon,
            &ConditionSpec::threshold(kind.target_deg()).with_wrap(360.0),
            &window,
            &config.locate,
        )?;
        for ev in &located.events {
            outcome.events.push(SeasonEvent {
                jd_utc: ev.jd_utc,
                kind,
            });
        }
        outcome.failures.extend_from_slice(&located.failures);
    }

    outcome
        .events
        .sort_by(|a, b| a.jd_utc.total_cmp(&b.jd_utc));
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_quarter_the_circle() {
        let targets: Vec<f64> = SeasonKind::ALL.iter().map(|k| k.target_deg()).collect();
        assert_eq!(targets, vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn equinox_classification() {
        assert!(SeasonKind::VernalEquinox.is_equinox());
        assert!(SeasonKind::AutumnalEquinox.is_equinox());
        assert!(!SeasonKind::SummerSolstice.is_equinox());
        assert!(!SeasonKind::WinterSolstice.is_equinox());
    }

    #[test]
    fn default_config_valid() {
        assert!(SeasonConfig::default().validate().is_ok());
    }
}
