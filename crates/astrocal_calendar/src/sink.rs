//! Output sinks: the serializer seam.
//!
//! The pipeline hands each finalized calendar to a [`CalendarSink`];
//! what bytes land on disk is the sink's concern. [`JsonFileSink`]
//! writes one JSON file per calendar; [`MemorySink`] keeps the records
//! in-process for tests and the raw-data output mode.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::{CalendarError, CalendarSet, Event, EventRecord, file_stem};

/// Destination for finalized calendars.
pub trait CalendarSink {
    /// Write one calendar's events under the given file stem.
    fn write(
        &mut self,
        file_stem: &str,
        calendar: &str,
        events: &[Event],
    ) -> Result<(), CalendarError>;
}

/// Hand every calendar in the set to the sink, stems prefixed with the
/// covered year range. Call [`CalendarSet::finalize`] first.
pub fn write_all(
    set: &CalendarSet,
    start_year: i32,
    end_year: i32,
    sink: &mut dyn CalendarSink,
) -> Result<(), CalendarError> {
    for (calendar, events) in set.calendars() {
        let stem = file_stem(calendar, start_year, end_year);
        sink.write(&stem, calendar, events)?;
    }
    Ok(())
}

/// Writes each calendar as `<stem>.json` in the output directory.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    output_dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl CalendarSink for JsonFileSink {
    fn write(
        &mut self,
        file_stem: &str,
        calendar: &str,
        events: &[Event],
    ) -> Result<(), CalendarError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{file_stem}.json"));

        let records: Vec<EventRecord> = events.iter().map(EventRecord::from).collect();
        let mut file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(&mut file, &records)?;
        file.write_all(b"\n")?;

        info!(
            calendar,
            events = events.len(),
            path = %path.display(),
            "calendar written"
        );
        Ok(())
    }
}

/// Keeps serialized records in memory, grouped by calendar name.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: BTreeMap<String, Vec<EventRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CalendarSink for MemorySink {
    fn write(
        &mut self,
        _file_stem: &str,
        calendar: &str,
        events: &[Event],
    ) -> Result<(), CalendarError> {
        self.records.insert(
            calendar.to_string(),
            events.iter().map(EventRecord::from).collect(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;
    use astrocal_time::J2000_JD;

    #[test]
    fn memory_sink_groups_by_calendar() {
        let mut set = CalendarSet::new();
        set.push(Event::instant(
            "Astro: Seasons",
            "Vernal Equinox (Spring)",
            EventKind::Equinox,
            J2000_JD,
        ))
        .unwrap();
        set.push(Event::instant(
            "Astro: Moon Phases",
            "Full Moon",
            EventKind::Phase,
            J2000_JD + 3.0,
        ))
        .unwrap();
        set.finalize();

        let mut sink = MemorySink::new();
        write_all(&set, 2000, 2000, &mut sink).unwrap();

        assert_eq!(sink.records.len(), 2);
        assert_eq!(sink.records["Astro: Seasons"].len(), 1);
        assert_eq!(
            sink.records["Astro: Moon Phases"][0].kind,
            EventKind::Phase.tag()
        );
    }

    #[test]
    fn memory_sink_output_is_deterministic() {
        let build = || {
            let mut set = CalendarSet::new();
            set.push(Event::instant("Cal", "b", EventKind::Phase, J2000_JD + 1.0))
                .unwrap();
            set.push(Event::instant("Cal", "a", EventKind::Phase, J2000_JD))
                .unwrap();
            set.finalize();
            let mut sink = MemorySink::new();
            write_all(&set, 2000, 2001, &mut sink).unwrap();
            sink.records
        };
        assert_eq!(build(), build());
    }
}
