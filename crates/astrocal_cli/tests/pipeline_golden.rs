//! Full-pipeline runs against the deterministic synthetic provider:
//! calendar routing, ordering, invariants, and idempotence.

use astrocal_calendar::{CalendarSet, MemorySink, write_all};
use astrocal_cli::config::AstrocalConfig;
use astrocal_cli::pipeline::generate;
use astrocal_ephem::SyntheticProvider;

fn test_config() -> AstrocalConfig {
    let mut config = AstrocalConfig::default();
    config.years.start = Some(2024);
    config.years.end = Some(2024);
    config
}

fn run_pipeline() -> CalendarSet {
    generate(&test_config(), &SyntheticProvider::new()).expect("pipeline should succeed")
}

#[test]
fn expected_calendars_present() {
    let set = run_pipeline();

    for calendar in [
        "Astro: Seasons",
        "Astro: Moon Phases",
        "Astro: Moon Features",
        "Astro: Calendar Year Progress",
        "Astro: Solar Year Progress",
        "Astro: Sun Almanac",
        "Astro: Sun Zodiac",
        "Astro: Mars Geo",
        "Astro: Mars Helio",
        "Astro: Mars Zodiac",
    ] {
        assert!(
            set.calendars().any(|(name, _)| name == calendar),
            "missing calendar {calendar:?}"
        );
    }
}

#[test]
fn seasons_calendar_has_four_events() {
    let set = run_pipeline();
    let (_, events) = set
        .calendars()
        .find(|(name, _)| *name == "Astro: Seasons")
        .unwrap();
    assert_eq!(events.len(), 4);
}

#[test]
fn calendar_year_progress_count() {
    let set = run_pipeline();
    let (_, events) = set
        .calendars()
        .find(|(name, _)| *name == "Astro: Calendar Year Progress")
        .unwrap();
    // 15 sixteenths + 19 square days in a 366-day year.
    assert_eq!(events.len(), 34);
}

#[test]
fn all_calendars_sorted_and_valid() {
    let set = run_pipeline();
    let mut total = 0usize;

    for (calendar, events) in set.calendars() {
        assert!(!events.is_empty(), "empty calendar {calendar:?}");
        total += events.len();

        for pair in events.windows(2) {
            assert!(
                pair[0].start_jd <= pair[1].start_jd,
                "calendar {calendar:?} out of order"
            );
        }
        for ev in events {
            if let Some(end) = ev.end_jd {
                assert!(end >= ev.start_jd, "inverted window in {calendar:?}");
            }
        }
    }

    assert!(total > 1000, "suspiciously few events: {total}");
}

#[test]
fn moon_phase_events_are_labeled_phases() {
    let set = run_pipeline();
    let (_, events) = set
        .calendars()
        .find(|(name, _)| *name == "Astro: Moon Phases")
        .unwrap();

    // 12.37 synodic months per year → 49-50 quarter events.
    assert!(
        (48..=51).contains(&events.len()),
        "{} phase events",
        events.len()
    );
    for ev in events {
        assert!(
            matches!(
                ev.label.as_str(),
                "New Moon" | "First Quarter Moon" | "Full Moon" | "Last Quarter Moon"
            ),
            "unexpected phase label {:?}",
            ev.label
        );
    }
}

#[test]
fn pipeline_is_idempotent() {
    let first = run_pipeline();
    let second = run_pipeline();
    assert_eq!(first, second, "identical runs must be identical");

    // And the serialized records match byte for byte.
    let serialize = |set: &CalendarSet| {
        let mut sink = MemorySink::new();
        write_all(set, 2024, 2024, &mut sink).unwrap();
        serde_json::to_string(&sink.records).unwrap()
    };
    assert_eq!(serialize(&first), serialize(&second));
}

#[test]
fn disabling_features_removes_their_calendars() {
    let mut config = test_config();
    config.features.moon_phases = false;
    config.features.almanac = false;

    let set = generate(&config, &SyntheticProvider::new()).unwrap();
    assert!(
        !set.calendars().any(|(name, _)| name == "Astro: Moon Phases"),
        "moon phases should be disabled"
    );
    assert!(
        !set.calendars().any(|(name, _)| name.ends_with("Almanac")),
        "almanac should be disabled"
    );
    // Location-independent features still present.
    assert!(set.calendars().any(|(name, _)| name == "Astro: Seasons"));
}
