//! Calendar-ready events, calendar assembly, and output sinks.
//!
//! Classifier outputs become [`Event`] records routed into named
//! calendars; a [`CalendarSet`] groups and deterministically orders
//! them, and a [`CalendarSink`] carries them out of the pipeline. The
//! calendar-file byte format itself lives behind the sink trait — this
//! crate ships a JSON sink (the raw-data mode made durable) and an
//! in-memory sink for tests.

pub mod assembly;
pub mod sink;

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use astrocal_ephem::Body;
use serde::Serialize;

pub use assembly::{CalendarSet, file_stem};
pub use sink::{CalendarSink, JsonFileSink, MemorySink, write_all};

/// The closed set of event kinds the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Rise,
    Set,
    Mc,
    Ic,
    Division,
    AspectEnter,
    AspectExit,
    AspectPeak,
    EclipseContact,
    RetroStation,
    DirectStation,
    ShadowExit,
    Equinox,
    Solstice,
    NodeCrossing,
    DeclinationExtreme,
    Phase,
    Ingress,
    YearProgressMark,
    PatternOverlap,
}

impl EventKind {
    /// Stable snake_case tag used in serialized records.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Rise => "rise",
            Self::Set => "set",
            Self::Mc => "mc",
            Self::Ic => "ic",
            Self::Division => "division",
            Self::AspectEnter => "aspect_enter",
            Self::AspectExit => "aspect_exit",
            Self::AspectPeak => "aspect_peak",
            Self::EclipseContact => "eclipse_contact",
            Self::RetroStation => "retro_station",
            Self::DirectStation => "direct_station",
            Self::ShadowExit => "shadow_exit",
            Self::Equinox => "equinox",
            Self::Solstice => "solstice",
            Self::NodeCrossing => "node_crossing",
            Self::DeclinationExtreme => "declination_extreme",
            Self::Phase => "phase",
            Self::Ingress => "ingress",
            Self::YearProgressMark => "year_progress_mark",
            Self::PatternOverlap => "pattern_overlap",
        }
    }
}

/// A finalized, calendar-ready event.
///
/// `end_jd` is present only for durational events (aspect windows,
/// eclipse spans, pattern overlaps) and must not precede `start_jd`;
/// [`CalendarSet::push`] enforces the invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub calendar: String,
    pub label: String,
    pub bodies: Vec<Body>,
    pub kind: EventKind,
    pub start_jd: f64,
    pub end_jd: Option<f64>,
    pub metadata: BTreeMap<String, String>,
}

impl Event {
    /// An instantaneous event.
    pub fn instant(
        calendar: impl Into<String>,
        label: impl Into<String>,
        kind: EventKind,
        start_jd: f64,
    ) -> Self {
        Self {
            calendar: calendar.into(),
            label: label.into(),
            bodies: Vec::new(),
            kind,
            start_jd,
            end_jd: None,
            metadata: BTreeMap::new(),
        }
    }

    /// A durational event spanning `[start_jd, end_jd]`.
    pub fn window(
        calendar: impl Into<String>,
        label: impl Into<String>,
        kind: EventKind,
        start_jd: f64,
        end_jd: f64,
    ) -> Self {
        let mut ev = Self::instant(calendar, label, kind, start_jd);
        ev.end_jd = Some(end_jd);
        ev
    }

    pub fn with_bodies(mut self, bodies: impl IntoIterator<Item = Body>) -> Self {
        self.bodies = bodies.into_iter().collect();
        self.bodies.sort_unstable();
        self.bodies.dedup();
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), CalendarError> {
        if !self.start_jd.is_finite() {
            return Err(CalendarError::InvalidEvent("start must be finite"));
        }
        if let Some(end) = self.end_jd {
            if !end.is_finite() {
                return Err(CalendarError::InvalidEvent("end must be finite"));
            }
            if end < self.start_jd {
                return Err(CalendarError::InvalidEvent("end must not precede start"));
            }
        }
        if self.calendar.is_empty() {
            return Err(CalendarError::InvalidEvent("calendar name must not be empty"));
        }
        Ok(())
    }
}

/// Serialized form of an [`Event`]: timestamps rendered RFC 3339 UTC.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub calendar: String,
    pub label: String,
    pub bodies: Vec<String>,
    pub kind: &'static str,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl From<&Event> for EventRecord {
    fn from(ev: &Event) -> Self {
        Self {
            calendar: ev.calendar.clone(),
            label: ev.label.clone(),
            bodies: ev.bodies.iter().map(|b| b.name().to_string()).collect(),
            kind: ev.kind.tag(),
            start: astrocal_time::jd_to_datetime(ev.start_jd).to_rfc3339(),
            end: ev
                .end_jd
                .map(|jd| astrocal_time::jd_to_datetime(jd).to_rfc3339()),
            metadata: ev.metadata.clone(),
        }
    }
}

/// Errors from assembly or serialization.
#[derive(Debug)]
#[non_exhaustive]
pub enum CalendarError {
    /// An event violated the calendar invariants.
    InvalidEvent(&'static str),
    /// Sink I/O failed.
    Io(std::io::Error),
    /// Record serialization failed.
    Serialize(serde_json::Error),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEvent(msg) => write!(f, "invalid event: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Serialize(e) => write!(f, "serialization error: {e}"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CalendarError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CalendarError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrocal_time::J2000_JD;

    #[test]
    fn window_end_before_start_invalid() {
        let ev = Event::window("Cal", "x", EventKind::AspectPeak, J2000_JD, J2000_JD - 1.0);
        assert!(ev.validate().is_err());
    }

    #[test]
    fn zero_length_window_valid() {
        let ev = Event::window("Cal", "x", EventKind::AspectPeak, J2000_JD, J2000_JD);
        assert!(ev.validate().is_ok());
    }

    #[test]
    fn bodies_sorted_and_deduped() {
        let ev = Event::instant("Cal", "x", EventKind::Phase, J2000_JD)
            .with_bodies([Body::Moon, Body::Sun, Body::Moon]);
        assert_eq!(ev.bodies, vec![Body::Sun, Body::Moon]);
    }

    #[test]
    fn record_renders_rfc3339() {
        let ev = Event::instant("Cal", "Vernal Equinox", EventKind::Equinox, J2000_JD)
            .with_meta("longitude_deg", "0.00");
        let rec = EventRecord::from(&ev);
        assert_eq!(rec.start, "2000-01-01T12:00:00+00:00");
        assert_eq!(rec.kind, "equinox");
        assert!(rec.end.is_none());
        assert_eq!(rec.metadata["longitude_deg"], "0.00");
    }

    #[test]
    fn kind_tags_are_distinct() {
        let kinds = [
            EventKind::Rise,
            EventKind::Set,
            EventKind::Mc,
            EventKind::Ic,
            EventKind::Division,
            EventKind::AspectEnter,
            EventKind::AspectExit,
            EventKind::AspectPeak,
            EventKind::EclipseContact,
            EventKind::RetroStation,
            EventKind::DirectStation,
            EventKind::ShadowExit,
            EventKind::Equinox,
            EventKind::Solstice,
            EventKind::NodeCrossing,
            EventKind::DeclinationExtreme,
            EventKind::Phase,
            EventKind::Ingress,
            EventKind::YearProgressMark,
            EventKind::PatternOverlap,
        ];
        let mut tags: Vec<_> = kinds.iter().map(|k| k.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), kinds.len());
    }
}
