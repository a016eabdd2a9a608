//! Calendar grouping and deterministic ordering.

use std::collections::BTreeMap;

use crate::{CalendarError, Event};

/// Events grouped by calendar name.
///
/// Iteration order is the calendar name order (`BTreeMap`), and
/// [`finalize`](CalendarSet::finalize) sorts each calendar by
/// `(start, label)` — so output is identical regardless of the order
/// classifiers completed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarSet {
    calendars: BTreeMap<String, Vec<Event>>,
}

impl CalendarSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one event to its calendar, validating the event invariants.
    pub fn push(&mut self, event: Event) -> Result<(), CalendarError> {
        event.validate()?;
        self.calendars
            .entry(event.calendar.clone())
            .or_default()
            .push(event);
        Ok(())
    }

    /// Add a batch of events.
    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) -> Result<(), CalendarError> {
        for event in events {
            self.push(event)?;
        }
        Ok(())
    }

    /// Sort every calendar by start time, tie-broken by label.
    pub fn finalize(&mut self) {
        for events in self.calendars.values_mut() {
            events.sort_by(|a, b| {
                a.start_jd
                    .total_cmp(&b.start_jd)
                    .then_with(|| a.label.cmp(&b.label))
            });
        }
    }

    /// Iterate calendars in name order.
    pub fn calendars(&self) -> impl Iterator<Item = (&str, &[Event])> {
        self.calendars
            .iter()
            .map(|(name, events)| (name.as_str(), events.as_slice()))
    }

    /// Number of calendars.
    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }

    /// Total events across all calendars.
    pub fn total_events(&self) -> usize {
        self.calendars.values().map(Vec::len).sum()
    }
}

/// File stem for a calendar: the covered year (or year range) as a
/// prefix, then the sanitized calendar name.
///
/// `"Astro: Solar Eclipses"` for 2024 → `"2024_Astro_Solar_Eclipses"`.
pub fn file_stem(calendar: &str, start_year: i32, end_year: i32) -> String {
    let prefix = if start_year == end_year {
        format!("{start_year}")
    } else {
        format!("{start_year}-{end_year}")
    };
    let safe: String = calendar
        .chars()
        .filter_map(|c| match c {
            ':' => None,
            '/' => Some('-'),
            ' ' => Some('_'),
            other => Some(other),
        })
        .collect();
    format!("{prefix}_{safe}")
}
