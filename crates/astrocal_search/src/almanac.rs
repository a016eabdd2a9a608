//! Rise/set, culmination, and day-arc division search.
//!
//! Rise and Set are threshold crossings of the altitude function at the
//! per-body horizon altitude; MC and IC are the daily altitude maximum
//! and minimum. Day-arc divisions subdivide each Rise→Set span at the
//! configured fractions. At latitudes where a body never crosses its
//! horizon threshold the search returns no rise/set events — the
//! circumpolar case is an empty result, not an error.

use astrocal_ephem::{Body, EphemerisProvider};

use crate::adapters::altitude_deg;
use crate::almanac_types::{
    AlmanacConfig, AlmanacEvent, AlmanacEventKind, DivisionEvent, GeoLocation,
};
use crate::error::SearchError;
use crate::locate::{
    ConditionSpec, Direction, ExtremumKind, LocateOutcome, RefineFailure, SearchWindow, locate,
};

/// Everything one body's almanac search produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlmanacOutcome {
    /// Rise/Set/MC/IC events in ascending time order.
    pub events: Vec<AlmanacEvent>,
    /// Day-arc division marks in ascending time order.
    pub divisions: Vec<DivisionEvent>,
    pub failures: Vec<RefineFailure>,
}

/// Search rise/set, culminations, and day-arc divisions for one body.
pub fn search_almanac(
    provider: &dyn EphemerisProvider,
    body: Body,
    location: &GeoLocation,
    jd_start: f64,
    jd_end: f64,
    config: &AlmanacConfig,
) -> Result<AlmanacOutcome, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    location.validate().map_err(SearchError::InvalidConfig)?;

    let altitude = |jd: f64| altitude_deg(provider, body, location, jd);
    let window = SearchWindow::new(jd_start, jd_end, config.step_days);

    // Horizon crossings.
    let horizon = config.horizon_for(body);
    let crossings = locate(
        &altitude,
        &ConditionSpec::threshold(horizon),
        &window,
        &config.locate,
    )?;

    // Culminations: altitude extrema.
    let mc = locate(
        &altitude,
        &ConditionSpec::extremum(ExtremumKind::Max),
        &window,
        &config.locate,
    )?;
    let ic = locate(
        &altitude,
        &ConditionSpec::extremum(ExtremumKind::Min),
        &window,
        &config.locate,
    )?;

    let mut outcome = AlmanacOutcome::default();
    collect(&mut outcome, body, &crossings, |dir| match dir {
        Direction::Rising => AlmanacEventKind::Rise,
        Direction::Falling => AlmanacEventKind::Set,
    });
    collect(&mut outcome, body, &mc, |_| AlmanacEventKind::Mc);
    collect(&mut outcome, body, &ic, |_| AlmanacEventKind::Ic);

    outcome
        .events
        .sort_by(|a, b| a.jd_utc.total_cmp(&b.jd_utc));

    outcome.divisions = day_arc_divisions(&outcome.events, &config.division_denominators);
    Ok(outcome)
}

fn collect(
    outcome: &mut AlmanacOutcome,
    body: Body,
    located: &LocateOutcome,
    kind_of: impl Fn(Direction) -> AlmanacEventKind,
) {
    for ev in &located.events {
        outcome.events.push(AlmanacEvent {
            jd_utc: ev.jd_utc,
            body,
            kind: kind_of(ev.direction),
            altitude_deg: ev.value,
        });
    }
    outcome.failures.extend_from_slice(&located.failures);
}

/// Subdivide each Rise→Set span at n/d for every configured
/// denominator d and each n in 1..d.
///
/// Spans are paired from the merged event stream: a Rise opens a span,
/// the next Set of the same body closes it. Unpaired events at the
/// window boundaries produce no divisions.
fn day_arc_divisions(events: &[AlmanacEvent], denominators: &[u32]) -> Vec<DivisionEvent> {
    let mut divisions = Vec::new();
    let mut open_rise: Option<&AlmanacEvent> = None;

    for ev in events {
        match ev.kind {
            AlmanacEventKind::Rise => open_rise = Some(ev),
            AlmanacEventKind::Set => {
                if let Some(rise) = open_rise.take() {
                    let span = ev.jd_utc - rise.jd_utc;
                    if span > 0.0 {
                        for &denom in denominators {
                            for num in 1..denom {
                                divisions.push(DivisionEvent {
                                    jd_utc: rise.jd_utc + span * num as f64 / denom as f64,
                                    body: ev.body,
                                    numerator: num,
                                    denominator: denom,
                                });
                            }
                        }
                    }
                }
            }
            AlmanacEventKind::Mc | AlmanacEventKind::Ic => {}
        }
    }

    divisions.sort_by(|a, b| a.jd_utc.total_cmp(&b.jd_utc));
    divisions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(jd: f64, kind: AlmanacEventKind) -> AlmanacEvent {
        AlmanacEvent {
            jd_utc: jd,
            body: Body::Sun,
            kind,
            altitude_deg: 0.0,
        }
    }

    #[test]
    fn divisions_cover_each_arc() {
        let events = vec![
            ev(0.0, AlmanacEventKind::Rise),
            ev(0.2, AlmanacEventKind::Mc),
            ev(0.5, AlmanacEventKind::Set),
            ev(1.0, AlmanacEventKind::Rise),
            ev(1.5, AlmanacEventKind::Set),
        ];
        let divs = day_arc_divisions(&events, &[3, 8]);
        // Per arc: 2 thirds + 7 eighths = 9 marks; two arcs.
        assert_eq!(divs.len(), 18);
        // First arc's midpoint-ish mark: 4/8 at jd 0.25.
        assert!(divs.iter().any(|d| d.denominator == 8
            && d.numerator == 4
            && (d.jd_utc - 0.25).abs() < 1e-12));
    }

    #[test]
    fn leading_set_produces_no_divisions() {
        let events = vec![ev(0.1, AlmanacEventKind::Set), ev(0.6, AlmanacEventKind::Rise)];
        assert!(day_arc_divisions(&events, &[3]).is_empty());
    }

    #[test]
    fn divisions_sorted() {
        let events = vec![
            ev(0.0, AlmanacEventKind::Rise),
            ev(0.9, AlmanacEventKind::Set),
        ];
        let divs = day_arc_divisions(&events, &[19, 3]);
        for pair in divs.windows(2) {
            assert!(pair[0].jd_utc <= pair[1].jd_utc);
        }
        assert_eq!(divs.len(), 18 + 2);
    }
}
