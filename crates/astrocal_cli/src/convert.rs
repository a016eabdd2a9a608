//! Routing: classifier outcomes → calendar-ready [`Event`] records.
//!
//! Calendar names and label wording follow the generated calendars'
//! established conventions: per-body almanac/division/zodiac calendars,
//! per-participant aspect calendars split by frame, and shared
//! calendars for eclipses, seasons, moon features, phases, year
//! progress, and patterns.

use astrocal_calendar::{Event, EventKind};
use astrocal_ephem::{Body, Frame};
use astrocal_search::{
    AlmanacEventKind, AlmanacOutcome, AspectOccurrence, IngressOutcome, LunarEclipse,
    MoonFeatureOutcome, MoonPhaseEvent, PatternOverlap, ProgressMark, RetrogradeOutcome,
    SeasonEvent, SolarEclipse, StandstillKind, StationKind, YearProgressEvent,
};
use astrocal_time::jd_to_datetime;

fn rfc3339(jd: f64) -> String {
    jd_to_datetime(jd).to_rfc3339()
}

/// Rise/Set/MC/IC events for one body.
pub fn almanac_events(outcome: &AlmanacOutcome, location_name: &str) -> Vec<Event> {
    let mut events = Vec::with_capacity(outcome.events.len() + outcome.divisions.len());

    for ev in &outcome.events {
        let body = ev.body;
        let kind = match ev.kind {
            AlmanacEventKind::Rise => EventKind::Rise,
            AlmanacEventKind::Set => EventKind::Set,
            AlmanacEventKind::Mc => EventKind::Mc,
            AlmanacEventKind::Ic => EventKind::Ic,
        };
        events.push(
            Event::instant(
                format!("Astro: {body} Almanac"),
                format!("{body} {}", ev.kind.label()),
                kind,
                ev.jd_utc,
            )
            .with_bodies([body])
            .with_meta("location", location_name)
            .with_meta("altitude_deg", format!("{:.4}", ev.altitude_deg)),
        );
    }

    for div in &outcome.divisions {
        let body = div.body;
        events.push(
            Event::instant(
                format!("Astro: {body} Divisions"),
                format!("{body} {}/{} (Rise-Set)", div.numerator, div.denominator),
                EventKind::Division,
                div.jd_utc,
            )
            .with_bodies([body])
            .with_meta("location", location_name),
        );
    }

    events
}

/// One durational event per aspect occurrence, duplicated into each
/// participant's per-frame calendar.
pub fn aspect_events(occurrences: &[AspectOccurrence]) -> Vec<Event> {
    let mut events = Vec::with_capacity(occurrences.len() * 2);

    for occ in occurrences {
        let mut label = format!(
            "{}: {} - {}",
            occ.angle.name(),
            occ.body_a.name(),
            occ.body_b.name()
        );
        if occ.frame == Frame::Heliocentric {
            label.push_str(" (Helio)");
        }

        for participant in occ.bodies() {
            let mut event = Event::window(
                format!("Astro: {participant} {}", occ.frame.label()),
                label.clone(),
                EventKind::AspectPeak,
                occ.enter_jd,
                occ.exit_jd,
            )
            .with_bodies(occ.bodies())
            .with_meta("exact", rfc3339(occ.exact_jd))
            .with_meta("target_deg", format!("{:.1}", occ.target_deg));
            if occ.truncated_enter || occ.truncated_exit {
                event = event.with_meta("boundary_truncated", "true");
            }
            events.push(event);
        }
    }

    events
}

/// Solar eclipses into the shared solar calendar.
pub fn solar_eclipse_events(eclipses: &[SolarEclipse]) -> Vec<Event> {
    eclipses
        .iter()
        .map(|e| {
            let start = e.c1_jd.unwrap_or(e.greatest_jd);
            let end = e.c4_jd.unwrap_or(e.greatest_jd);
            let mut event = Event::window(
                "Astro: Solar Eclipses",
                e.kind.label(),
                EventKind::EclipseContact,
                start,
                end,
            )
            .with_bodies([Body::Sun, Body::Moon])
            .with_meta("greatest", rfc3339(e.greatest_jd))
            .with_meta("magnitude", format!("{:.3}", e.magnitude))
            .with_meta("min_separation_deg", format!("{:.3}", e.min_separation_deg));
            for (name, contact) in [
                ("c1", e.c1_jd),
                ("c2", e.c2_jd),
                ("c3", e.c3_jd),
                ("c4", e.c4_jd),
            ] {
                if let Some(jd) = contact {
                    event = event.with_meta(name, rfc3339(jd));
                }
            }
            event
        })
        .collect()
}

/// Lunar eclipses into the shared lunar calendar.
pub fn lunar_eclipse_events(eclipses: &[LunarEclipse]) -> Vec<Event> {
    eclipses
        .iter()
        .map(|e| {
            let start = e.p1_jd.unwrap_or(e.greatest_jd);
            let end = e.p4_jd.unwrap_or(e.greatest_jd);
            let mut event = Event::window(
                "Astro: Lunar Eclipses",
                e.kind.label(),
                EventKind::EclipseContact,
                start,
                end,
            )
            .with_bodies([Body::Sun, Body::Moon])
            .with_meta("greatest", rfc3339(e.greatest_jd))
            .with_meta("umbral_magnitude", format!("{:.3}", e.umbral_magnitude))
            .with_meta(
                "penumbral_magnitude",
                format!("{:.3}", e.penumbral_magnitude),
            );
            for (name, contact) in [
                ("p1", e.p1_jd),
                ("u1", e.u1_jd),
                ("u2", e.u2_jd),
                ("u3", e.u3_jd),
                ("u4", e.u4_jd),
                ("p4", e.p4_jd),
            ] {
                if let Some(jd) = contact {
                    event = event.with_meta(name, rfc3339(jd));
                }
            }
            event
        })
        .collect()
}

/// Stations and shadow exits into the body's geocentric calendar.
pub fn retrograde_events(outcome: &RetrogradeOutcome) -> Vec<Event> {
    let mut events = Vec::with_capacity(outcome.stations.len() + outcome.shadow_exits.len());

    for st in &outcome.stations {
        let body = st.body;
        let kind = match st.kind {
            StationKind::Retrograde => EventKind::RetroStation,
            StationKind::Direct => EventKind::DirectStation,
        };
        events.push(
            Event::instant(
                format!("Astro: {body} Geo"),
                format!("{body} {}", st.kind.label()),
                kind,
                st.jd_utc,
            )
            .with_bodies([body])
            .with_meta("longitude_deg", format!("{:.2}", st.longitude_deg)),
        );
    }

    for exit in &outcome.shadow_exits {
        let body = exit.body;
        events.push(
            Event::instant(
                format!("Astro: {body} Geo"),
                format!("{body} Shadow Exit"),
                EventKind::ShadowExit,
                exit.jd_utc,
            )
            .with_bodies([body])
            .with_meta("longitude_deg", format!("{:.2}", exit.longitude_deg)),
        );
    }

    events
}

/// Sign ingresses into the body's zodiac calendar.
pub fn ingress_events(outcome: &IngressOutcome) -> Vec<Event> {
    outcome
        .events
        .iter()
        .map(|ev| {
            let body = ev.body;
            let mut event = Event::instant(
                format!("Astro: {body} Zodiac"),
                format!("{body} enters {}", ev.sign_name()),
                EventKind::Ingress,
                ev.jd_utc,
            )
            .with_bodies([body]);
            if ev.retrograde {
                event = event.with_meta("retrograde", "true");
            }
            event
        })
        .collect()
}

/// Equinoxes and solstices into the shared seasons calendar.
pub fn season_events(events: &[SeasonEvent]) -> Vec<Event> {
    events
        .iter()
        .map(|ev| {
            let kind = if ev.kind.is_equinox() {
                EventKind::Equinox
            } else {
                EventKind::Solstice
            };
            Event::instant("Astro: Seasons", ev.kind.label(), kind, ev.jd_utc)
                .with_bodies([Body::Sun])
        })
        .collect()
}

/// Node crossings and standstills into the shared moon-features
/// calendar.
pub fn moon_feature_events(outcome: &MoonFeatureOutcome) -> Vec<Event> {
    let mut events = Vec::with_capacity(outcome.nodes.len() + outcome.standstills.len());

    for node in &outcome.nodes {
        events.push(
            Event::instant(
                "Astro: Moon Features",
                node.kind.label(),
                EventKind::NodeCrossing,
                node.jd_utc,
            )
            .with_bodies([Body::Moon]),
        );
    }

    for st in &outcome.standstills {
        let hemisphere = match st.kind {
            StandstillKind::FurthestNorth => "north",
            StandstillKind::FurthestSouth => "south",
        };
        events.push(
            Event::instant(
                "Astro: Moon Features",
                st.kind.label(),
                EventKind::DeclinationExtreme,
                st.jd_utc,
            )
            .with_bodies([Body::Moon])
            .with_meta("declination_deg", format!("{:.2}", st.declination_deg))
            .with_meta("hemisphere", hemisphere),
        );
    }

    events
}

/// Primary phases into the shared phases calendar.
pub fn moon_phase_events(events: &[MoonPhaseEvent]) -> Vec<Event> {
    events
        .iter()
        .map(|ev| {
            Event::instant(
                "Astro: Moon Phases",
                ev.phase.label(),
                EventKind::Phase,
                ev.jd_utc,
            )
            .with_bodies([Body::Sun, Body::Moon])
        })
        .collect()
}

/// Year-progress marks into the matching per-origin calendar.
pub fn year_progress_events(marks: &[YearProgressEvent]) -> Vec<Event> {
    marks
        .iter()
        .map(|mark| {
            let origin = mark.origin.label();
            let calendar = format!("Astro: {origin} Progress");
            let (label, meta): (String, (&str, String)) = match mark.mark {
                ProgressMark::Sixteenth { k } => {
                    let percent = k as f64 / 16.0 * 100.0;
                    (
                        format!("{origin}: {k}/16 ({percent:.1}%)"),
                        ("fraction", format!("{k}/16")),
                    )
                }
                ProgressMark::SquareDay { n } => {
                    let sq = n * n;
                    (
                        format!("{origin} Day {sq} ({n}\u{b2})"),
                        ("square_of", n.to_string()),
                    )
                }
            };
            Event::instant(calendar, label, EventKind::YearProgressMark, mark.jd_utc)
                .with_meta("year", mark.year.to_string())
                .with_meta(meta.0, meta.1)
        })
        .collect()
}

/// Square-and-trine overlaps into the shared pattern calendar.
pub fn pattern_events(patterns: &[PatternOverlap]) -> Vec<Event> {
    patterns
        .iter()
        .map(|p| {
            Event::window(
                "Astro: Square and Trine",
                format!(
                    "{}: Sq {} & Tri {}",
                    p.focus.name(),
                    p.square_partner.name(),
                    p.trine_partner.name()
                ),
                EventKind::PatternOverlap,
                p.start_jd,
                p.end_jd,
            )
            .with_bodies(p.bodies())
        })
        .collect()
}
