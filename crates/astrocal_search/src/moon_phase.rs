//! Moon phase search.
//!
//! The Moon−Sun elongation increases monotonically through the synodic
//! month; crossings of 0°, 90°, 180°, and 270° are New Moon, First
//! Quarter, Full Moon, and Last Quarter.

use astrocal_ephem::EphemerisProvider;

use crate::adapters::elongation;
use crate::error::SearchError;
use crate::locate::{ConditionSpec, LocateConfig, RefineFailure, SearchWindow, locate};

/// The four primary phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoonPhase {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl MoonPhase {
    pub const ALL: [MoonPhase; 4] = [
        MoonPhase::New,
        MoonPhase::FirstQuarter,
        MoonPhase::Full,
        MoonPhase::LastQuarter,
    ];

    /// Elongation at this phase, degrees.
    pub const fn target_deg(self) -> f64 {
        match self {
            Self::New => 0.0,
            Self::FirstQuarter => 90.0,
            Self::Full => 180.0,
            Self::LastQuarter => 270.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New Moon",
            Self::FirstQuarter => "First Quarter Moon",
            Self::Full => "Full Moon",
            Self::LastQuarter => "Last Quarter Moon",
        }
    }

    /// The phase that follows this one in the cycle.
    pub const fn next(self) -> Self {
        match self {
            Self::New => Self::FirstQuarter,
            Self::FirstQuarter => Self::Full,
            Self::Full => Self::LastQuarter,
            Self::LastQuarter => Self::New,
        }
    }
}

/// One phase instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPhaseEvent {
    pub jd_utc: f64,
    pub phase: MoonPhase,
}

/// Configuration for phase search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPhaseConfig {
    /// Coarse scan step in days. Elongation advances ~12.2°/day, so a
    /// quarter-day step brackets each 90° crossing several times over.
    pub step_days: f64,
    pub locate: LocateConfig,
}

impl Default for MoonPhaseConfig {
    fn default() -> Self {
        Self {
            step_days: 0.25,
            locate: LocateConfig::default(),
        }
    }
}

impl MoonPhaseConfig {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        self.locate.validate()
    }
}

/// Everything the phase search produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoonPhaseOutcome {
    /// Phase events in ascending time order.
    pub events: Vec<MoonPhaseEvent>,
    pub failures: Vec<RefineFailure>,
}

/// Search all primary phase instants in the range.
pub fn search_moon_phases(
    provider: &dyn EphemerisProvider,
    jd_start: f64,
    jd_end: f64,
    config: &MoonPhaseConfig,
) -> Result<MoonPhaseOutcome, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let elong = |jd: f64| elongation(provider, jd);
    let window = SearchWindow::new(jd_start, jd_end, config.step_days);

    let mut outcome = MoonPhaseOutcome::default();
    for phase in MoonPhase::ALL {
        let located = locate(
            &elong,
            &ConditionSpec::threshold(phase.target_deg()).with_wrap(360.0),
            &window,
            &config.locate,
        )?;
        for ev in &located.events {
            outcome.events.push(MoonPhaseEvent {
                jd_utc: ev.jd_utc,
                phase,
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
    fn phase_targets_quarter_the_circle() {
        let targets: Vec<f64> = MoonPhase::ALL.iter().map(|p| p.target_deg()).collect();
        assert_eq!(targets, vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn cycle_order() {
        assert_eq!(MoonPhase::New.next(), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::LastQuarter.next(), MoonPhase::New);
    }

    #[test]
    fn default_config_valid() {
        assert!(MoonPhaseConfig::default().validate().is_ok());
    }
}
