//! Lunar node crossings and declination standstills.
//!
//! Node crossings are zero-crossings of the Moon's geocentric ecliptic
//! latitude: rising = ascending (north) node, falling = descending
//! (south) node. Standstills are the extrema of the Moon's declination.
//! Consecutive extrema sit ~13.7 days apart; detections closer than the
//! configured gap are numerical chatter around the turning point and
//! the later one is discarded.

use astrocal_ephem::{Body, EphemerisProvider};

use crate::adapters::{declination, ecliptic_latitude};
use crate::error::SearchError;
use crate::locate::{
    ConditionSpec, Direction, ExtremumKind, LocateConfig, RefineFailure, SearchWindow, locate,
};

/// Which node the Moon crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Latitude crossing south→north.
    Ascending,
    /// Latitude crossing north→south.
    Descending,
}

impl NodeKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ascending => "Moon North Node",
            Self::Descending => "Moon South Node",
        }
    }
}

/// One node crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeEvent {
    pub jd_utc: f64,
    pub kind: NodeKind,
}

/// Which declination extreme was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandstillKind {
    FurthestNorth,
    FurthestSouth,
}

impl StandstillKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FurthestNorth => "Moon Furthest North",
            Self::FurthestSouth => "Moon Furthest South",
        }
    }
}

/// One declination standstill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandstillEvent {
    pub jd_utc: f64,
    pub kind: StandstillKind,
    /// Declination at the extreme, degrees.
    pub declination_deg: f64,
}

/// Configuration for moon-feature search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonFeatureConfig {
    /// Coarse scan step in days; the Moon's latitude period is ~27.2
    /// days, so half-day sampling is comfortable.
    pub step_days: f64,
    /// Minimum separation between reported standstills, days.
    pub min_standstill_gap_days: f64,
    pub locate: LocateConfig,
}

impl Default for MoonFeatureConfig {
    fn default() -> Self {
        Self {
            step_days: 0.5,
            min_standstill_gap_days: 5.0,
            locate: LocateConfig::default(),
        }
    }
}

impl MoonFeatureConfig {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if !self.min_standstill_gap_days.is_finite() || self.min_standstill_gap_days < 0.0 {
            return Err("min_standstill_gap_days must be non-negative");
        }
        self.locate.validate()
    }
}

/// Everything the moon-feature search produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoonFeatureOutcome {
    /// Node crossings in ascending time order.
    pub nodes: Vec<NodeEvent>,
    /// Standstills in ascending time order, chatter-filtered.
    pub standstills: Vec<StandstillEvent>,
    pub failures: Vec<RefineFailure>,
}

/// Search node crossings and declination standstills.
pub fn search_moon_features(
    provider: &dyn EphemerisProvider,
    jd_start: f64,
    jd_end: f64,
    config: &MoonFeatureConfig,
) -> Result<MoonFeatureOutcome, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let window = SearchWindow::new(jd_start, jd_end, config.step_days);
    let mut outcome = MoonFeatureOutcome::default();

    // Nodes: latitude zero-crossings.
    let lat = |jd: f64| ecliptic_latitude(provider, Body::Moon, jd);
    let located = locate(&lat, &ConditionSpec::zero_crossing(), &window, &config.locate)?;
    for ev in &located.events {
        outcome.nodes.push(NodeEvent {
            jd_utc: ev.jd_utc,
            kind: match ev.direction {
                Direction::Rising => NodeKind::Ascending,
                Direction::Falling => NodeKind::Descending,
            },
        });
    }
    outcome.failures.extend_from_slice(&located.failures);

    // Standstills: declination extrema.
    let dec = |jd: f64| declination(provider, Body::Moon, jd);
    let mut raw = Vec::new();
    for (kind, extremum) in [
        (StandstillKind::FurthestNorth, ExtremumKind::Max),
        (StandstillKind::FurthestSouth, ExtremumKind::Min),
    ] {
        let located = locate(
            &dec,
            &ConditionSpec::extremum(extremum),
            &window,
            &config.locate,
        )?;
        for ev in &located.events {
            raw.push(StandstillEvent {
                jd_utc: ev.jd_utc,
                kind,
                declination_deg: ev.value,
            });
        }
        outcome.failures.extend_from_slice(&located.failures);
    }
    raw.sort_by(|a, b| a.jd_utc.total_cmp(&b.jd_utc));
    outcome.standstills = filter_chatter(raw, config.min_standstill_gap_days);

    Ok(outcome)
}

/// Drop standstills closer than `gap_days` to the previous kept one.
fn filter_chatter(sorted: Vec<StandstillEvent>, gap_days: f64) -> Vec<StandstillEvent> {
    let mut kept: Vec<StandstillEvent> = Vec::with_capacity(sorted.len());
    for ev in sorted {
        match kept.last() {
            Some(prev) if ev.jd_utc - prev.jd_utc < gap_days => {}
            _ => kept.push(ev),
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standstill(jd: f64) -> StandstillEvent {
        StandstillEvent {
            jd_utc: jd,
            kind: StandstillKind::FurthestNorth,
            declination_deg: 25.0,
        }
    }

    #[test]
    fn chatter_within_gap_dropped() {
        let kept = filter_chatter(
            vec![standstill(0.0), standstill(1.0), standstill(13.7)],
            5.0,
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].jd_utc, 13.7);
    }

    #[test]
    fn well_separated_all_kept() {
        let kept = filter_chatter(
            vec![standstill(0.0), standstill(13.7), standstill(27.3)],
            5.0,
        );
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn node_labels() {
        assert_eq!(NodeKind::Ascending.label(), "Moon North Node");
        assert_eq!(NodeKind::Descending.label(), "Moon South Node");
    }

    #[test]
    fn default_config_valid() {
        assert!(MoonFeatureConfig::default().validate().is_ok());
    }
}
