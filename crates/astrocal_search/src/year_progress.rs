//! Year-progress markers.
//!
//! Two origins: the calendar year (Jan 1 → Jan 1) and the solar year
//! (vernal equinox → vernal equinox, equinox instants from the
//! seasonal search). For each span: marks at k/16 of the elapsed span
//! and at square-number day boundaries (day n² for every n² within the
//! span).
//!
//! The elapsed-fraction function is linear and invertible, so marks
//! are computed in closed form rather than root-found.

use astrocal_ephem::EphemerisProvider;
use astrocal_time::{jd_to_calendar, year_start_jd};

use crate::error::SearchError;
use crate::locate::RefineFailure;
use crate::seasons::{SeasonConfig, SeasonKind, search_seasons};

/// Which year definition a mark belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearOrigin {
    /// January 1 to the next January 1.
    CalendarYear,
    /// Vernal equinox to the next vernal equinox.
    SolarYear,
}

impl YearOrigin {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CalendarYear => "Calendar Year",
            Self::SolarYear => "Solar Year",
        }
    }
}

/// What a mark denotes within its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressMark {
    /// The instant k/16 of the span has elapsed, k in 1..=15.
    Sixteenth { k: u32 },
    /// The start of day n² of the span (day 1 is the span start).
    SquareDay { n: u32 },
}

/// One year-progress marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearProgressEvent {
    pub jd_utc: f64,
    pub origin: YearOrigin,
    /// Calendar year the span starts in.
    pub year: i32,
    pub mark: ProgressMark,
}

/// Marks for every calendar year in `[start_year, end_year]`.
/// Closed-form; needs no ephemeris.
pub fn calendar_year_marks(start_year: i32, end_year: i32) -> Vec<YearProgressEvent> {
    let mut events = Vec::new();
    for year in start_year..=end_year {
        let span_start = year_start_jd(year);
        let span_end = year_start_jd(year + 1);
        marks_for_span(YearOrigin::CalendarYear, year, span_start, span_end, &mut events);
    }
    events.sort_by(|a, b| a.jd_utc.total_cmp(&b.jd_utc));
    events
}

/// Marks for every solar year whose starting equinox falls in a
/// calendar year in `[start_year, end_year]`.
pub fn solar_year_marks(
    provider: &dyn EphemerisProvider,
    start_year: i32,
    end_year: i32,
    config: &SeasonConfig,
) -> Result<(Vec<YearProgressEvent>, Vec<RefineFailure>), SearchError> {
    // Scan one extra year so the closing equinox of the last span is
    // always found.
    let seasons = search_seasons(
        provider,
        year_start_jd(start_year),
        year_start_jd(end_year + 2),
        config,
    )?;

    let vernals: Vec<f64> = seasons
        .events
        .iter()
        .filter(|e| e.kind == SeasonKind::VernalEquinox)
        .map(|e| e.jd_utc)
        .collect();

    let mut events = Vec::new();
    for pair in vernals.windows(2) {
        let (span_start, span_end) = (pair[0], pair[1]);
        let (year, _, _) = jd_to_calendar(span_start);
        if year >= start_year && year <= end_year {
            marks_for_span(YearOrigin::SolarYear, year, span_start, span_end, &mut events);
        }
    }
    events.sort_by(|a, b| a.jd_utc.total_cmp(&b.jd_utc));
    Ok((events, seasons.failures))
}

/// Emit the k/16 and square-day marks for one span.
fn marks_for_span(
    origin: YearOrigin,
    year: i32,
    span_start: f64,
    span_end: f64,
    events: &mut Vec<YearProgressEvent>,
) {
    let span_days = span_end - span_start;

    for k in 1..16 {
        events.push(YearProgressEvent {
            jd_utc: span_start + span_days * k as f64 / 16.0,
            origin,
            year,
            mark: ProgressMark::Sixteenth { k },
        });
    }

    let mut n = 1u32;
    loop {
        let sq = n * n;
        if sq as f64 > span_days + 1.0 {
            break;
        }
        let jd = span_start + (sq - 1) as f64;
        if jd >= span_end {
            break;
        }
        events.push(YearProgressEvent {
            jd_utc: jd,
            origin,
            year,
            mark: ProgressMark::SquareDay { n },
        });
        n += 1;
    }
}
