//! Retrograde station and shadow-exit search.
//!
//! Stations are derivative-sign-change events on geocentric ecliptic
//! longitude: the rate crossing positive→negative is a retrograde
//! station, negative→positive a direct station. After each
//! retrograde/direct pair, the shadow exit is the first upward
//! re-crossing of the retrograde-station longitude.
//!
//! The scan runs past the requested range so loops straddling the
//! boundary resolve; emitted events are filtered back to the range.

use astrocal_ephem::{Body, EphemerisProvider, Frame};

use crate::adapters::ecliptic_longitude;
use crate::error::SearchError;
use crate::locate::{ConditionSpec, Direction, RefineFailure, SearchWindow, locate};
use crate::retrograde_types::{RetrogradeConfig, ShadowExitEvent, StationEvent, StationKind};

/// Everything one planet's retrograde search produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrogradeOutcome {
    /// Stations in ascending time order, alternating kinds.
    pub stations: Vec<StationEvent>,
    /// Shadow exits in ascending time order.
    pub shadow_exits: Vec<ShadowExitEvent>,
    pub failures: Vec<RefineFailure>,
}

/// Sun and Moon never move retrograde geocentrically; rejected at
/// construction, not at query time.
fn validate_station_body(body: Body) -> Result<(), SearchError> {
    if body.is_planet() {
        Ok(())
    } else {
        Err(SearchError::InvalidConfig(
            "Sun and Moon do not have stationary points",
        ))
    }
}

/// Search stations and shadow exits for one planet.
pub fn search_retrograde(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_start: f64,
    jd_end: f64,
    config: &RetrogradeConfig,
) -> Result<RetrogradeOutcome, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    validate_station_body(body)?;
    if jd_end <= jd_start {
        return Err(SearchError::InvalidConfig("jd_end must be after jd_start"));
    }

    let lon = |jd: f64| ecliptic_longitude(provider, body, Frame::Geocentric, jd);

    // Stations over the widened scan range.
    let scan = SearchWindow::new(
        jd_start,
        jd_end + config.scan_margin_days,
        config.step_days,
    );
    let located = locate(
        &lon,
        &ConditionSpec::derivative_sign_change().with_wrap(360.0),
        &scan,
        &config.locate,
    )?;

    let mut outcome = RetrogradeOutcome {
        failures: located.failures.clone(),
        ..RetrogradeOutcome::default()
    };

    let stations: Vec<StationEvent> = located
        .events
        .iter()
        .map(|ev| StationEvent {
            jd_utc: ev.jd_utc,
            body,
            kind: match ev.direction {
                Direction::Falling => StationKind::Retrograde,
                Direction::Rising => StationKind::Direct,
            },
            longitude_deg: ev.value,
        })
        .collect();

    // Shadow exits from each retrograde→direct pair.
    for pair in stations.windows(2) {
        let [retro, direct] = pair else { continue };
        if retro.kind != StationKind::Retrograde || direct.kind != StationKind::Direct {
            continue;
        }
        if let Some(exit) =
            find_shadow_exit(&lon, body, retro.longitude_deg, direct.jd_utc, config, &mut outcome)?
        {
            outcome.shadow_exits.push(exit);
        }
    }

    // Filter back to the requested range.
    outcome.stations = stations
        .into_iter()
        .filter(|s| s.jd_utc >= jd_start && s.jd_utc <= jd_end)
        .collect();
    outcome
        .shadow_exits
        .retain(|s| s.jd_utc >= jd_start && s.jd_utc <= jd_end);

    Ok(outcome)
}

/// First upward crossing of the retrograde-station longitude after a
/// direct station.
fn find_shadow_exit<F>(
    lon: &F,
    body: Body,
    target_lon_deg: f64,
    direct_jd: f64,
    config: &RetrogradeConfig,
    outcome: &mut RetrogradeOutcome,
) -> Result<Option<ShadowExitEvent>, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    let window = SearchWindow::new(
        direct_jd,
        direct_jd + config.shadow_scan_days,
        config.shadow_step_days,
    );
    let located = locate(
        lon,
        &ConditionSpec::threshold(target_lon_deg).with_wrap(360.0),
        &window,
        &config.locate,
    )?;
    outcome.failures.extend_from_slice(&located.failures);

    Ok(located
        .events
        .iter()
        .find(|ev| ev.direction == Direction::Rising)
        .map(|ev| ShadowExitEvent {
            jd_utc: ev.jd_utc,
            body,
            longitude_deg: target_lon_deg,
        }))
}
