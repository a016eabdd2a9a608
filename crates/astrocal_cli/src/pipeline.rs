//! The generation pipeline: task fan-out, event routing, assembly,
//! and output.
//!
//! Every enabled (feature × body) search is an independent task; the
//! fan-out runs them in parallel and collects into calendar buckets,
//! which are sorted before serialization so completion order never
//! shows in the output. A provider failure is fatal for the run — no
//! partial silent calendars — while refinement failures are local:
//! they are counted, logged, and the rest of the events stand.

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use tracing::{info, warn};

use astrocal_calendar::{
    CalendarSet, Event, JsonFileSink, MemorySink, write_all,
};
use astrocal_ephem::{Body, EphemerisProvider, Frame, SyntheticProvider};
use astrocal_search::{
    AlmanacConfig, AspectAngle, AspectConfig, AspectOccurrence, EclipseConfig, GeoLocation,
    IngressConfig, MoonFeatureConfig, MoonPhaseConfig, RetrogradeConfig, SearchError, SeasonConfig,
    calendar_year_marks, search_almanac, search_aspects, search_ingresses, search_lunar_eclipses,
    search_moon_features, search_moon_phases, search_retrograde, search_seasons,
    search_solar_eclipses, solar_year_marks, square_trine_overlaps,
};
use astrocal_time::year_start_jd;

use crate::cli::{GenerateArgs, OutputModeArg};
use crate::config::{self, AstrocalConfig, OutputMode};
use crate::convert;
use crate::location;

/// Run the `generate` subcommand end to end.
pub fn run(args: &GenerateArgs) -> Result<()> {
    let mut config = config::load(&args.config)?;
    apply_overrides(&mut config, args);

    // The built-in deterministic provider; production callers swap in
    // their own ephemeris behind the same trait.
    let provider = SyntheticProvider::new();
    let (start_year, end_year) = config.years.resolve();

    let set = generate(&config, &provider)?;
    info!(
        calendars = set.len(),
        events = set.total_events(),
        "generation complete"
    );

    match config.output.mode {
        OutputMode::CalendarFiles => {
            let mut sink = JsonFileSink::new(&config.output.directory);
            write_all(&set, start_year, end_year, &mut sink)
                .context("failed to write calendar files")?;
        }
        OutputMode::RawData => {
            let mut sink = MemorySink::new();
            write_all(&set, start_year, end_year, &mut sink)
                .context("failed to collect raw records")?;
            let rendered = serde_json::to_string_pretty(&sink.records)
                .context("failed to render raw records")?;
            println!("{rendered}");
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut AstrocalConfig, args: &GenerateArgs) {
    if let Some(year) = args.start_year {
        config.years.start = Some(year);
    }
    if let Some(year) = args.end_year {
        config.years.end = Some(year);
    }
    if let Some(city) = &args.city {
        config.observer.city = Some(city.clone());
    }
    if let Some(dir) = &args.output {
        config.output.directory = dir.clone();
    }
    if let Some(mode) = args.mode {
        config.output.mode = match mode {
            OutputModeArg::CalendarFiles => OutputMode::CalendarFiles,
            OutputModeArg::RawData => OutputMode::RawData,
        };
    }
}

/// One independent unit of search work.
enum Task {
    Almanac(Body),
    Aspects { body_a: Body, body_b: Body, frame: Frame },
    SolarEclipses,
    LunarEclipses,
    Retrograde(Body),
    Ingress(Body),
    Seasons,
    MoonFeatures,
    MoonPhases,
}

/// What one task contributed.
#[derive(Default)]
struct TaskOutput {
    events: Vec<Event>,
    /// Geocentric aspect occurrences, kept for the pattern post-pass.
    geo_aspects: Vec<AspectOccurrence>,
    failures: usize,
}

/// Shared per-run search context.
struct RunContext<'a> {
    provider: &'a dyn EphemerisProvider,
    jd_start: f64,
    jd_end: f64,
    observer: Option<(GeoLocation, String)>,
    angles: Vec<AspectAngle>,
    almanac: AlmanacConfig,
    aspect: AspectConfig,
    eclipse: EclipseConfig,
    retrograde: RetrogradeConfig,
    ingress: IngressConfig,
    season: SeasonConfig,
    moon_feature: MoonFeatureConfig,
    moon_phase: MoonPhaseConfig,
}

/// Run every enabled search and assemble the calendar set.
///
/// Pure with respect to the provider: identical configuration and a
/// deterministic provider give byte-identical output.
pub fn generate(
    config: &AstrocalConfig,
    provider: &dyn EphemerisProvider,
) -> Result<CalendarSet> {
    let (start_year, end_year) = config.years.resolve();
    let jd_start = year_start_jd(start_year);
    let jd_end = year_start_jd(end_year + 1);

    let observer = resolve_observer(config);
    if config.features.almanac && observer.is_none() {
        warn!("observer location unresolved; skipping rise/set features");
    }

    let ctx = RunContext {
        provider,
        jd_start,
        jd_end,
        observer,
        angles: config::parse_angles(&config.aspects.angles)?,
        almanac: AlmanacConfig::default(),
        aspect: AspectConfig {
            orb_deg: config.aspects.orb_deg,
            ..AspectConfig::default()
        },
        eclipse: EclipseConfig::default(),
        retrograde: RetrogradeConfig::default(),
        ingress: IngressConfig::default(),
        season: SeasonConfig::default(),
        moon_feature: MoonFeatureConfig::default(),
        moon_phase: MoonPhaseConfig::default(),
    };

    let tasks = build_tasks(config, &ctx)?;
    info!(tasks = tasks.len(), "starting search fan-out");

    let outputs: Vec<TaskOutput> = tasks
        .par_iter()
        .map(|task| run_task(task, &ctx))
        .collect::<std::result::Result<_, SearchError>>()
        .context("event search failed")?;

    let mut set = CalendarSet::new();
    let mut geo_aspects = Vec::new();
    let mut failures = 0usize;

    for output in outputs {
        set.extend(output.events)?;
        geo_aspects.extend(output.geo_aspects);
        failures += output.failures;
    }

    // Year progress is closed-form (calendar) or one extra seasonal
    // search (solar); both are cheap enough to run inline.
    if config.features.calendar_year_progress {
        let marks = calendar_year_marks(start_year, end_year);
        set.extend(convert::year_progress_events(&marks))?;
    }
    if config.features.solar_year_progress {
        let (marks, mark_failures) =
            solar_year_marks(provider, start_year, end_year, &ctx.season)
                .context("solar year progress search failed")?;
        failures += mark_failures.len();
        set.extend(convert::year_progress_events(&marks))?;
    }

    // Pattern aggregation: a pure post-pass over the aspect stream.
    if config.features.patterns {
        if config.features.aspects {
            let overlaps = square_trine_overlaps(&geo_aspects);
            info!(patterns = overlaps.len(), "pattern aggregation complete");
            set.extend(convert::pattern_events(&overlaps))?;
        } else {
            warn!("patterns enabled without aspects; nothing to aggregate");
        }
    }

    if failures > 0 {
        warn!(
            failures,
            "some brackets did not converge; their events were skipped"
        );
    }

    set.finalize();
    Ok(set)
}

/// Resolve the observer once, before any computation starts.
fn resolve_observer(config: &AstrocalConfig) -> Option<(GeoLocation, String)> {
    if let Some(city) = &config.observer.city {
        if let Some(loc) = location::resolve(city) {
            return Some((loc, city.clone()));
        }
        warn!(city, "could not resolve observer city");
    }
    match (config.observer.latitude, config.observer.longitude) {
        (Some(lat), Some(lon)) => Some((GeoLocation::new(lat, lon), "configured location".into())),
        _ => None,
    }
}

fn build_tasks(config: &AstrocalConfig, ctx: &RunContext<'_>) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();

    if config.features.almanac && ctx.observer.is_some() {
        for body in dedup(config::parse_bodies(&config.almanac.bodies)?) {
            tasks.push(Task::Almanac(body));
        }
    }

    if config.features.aspects {
        let bodies = dedup(config::parse_bodies(&config.aspects.bodies)?);
        if bodies.len() < 2 {
            bail!("aspect search needs at least two distinct bodies");
        }
        let mut frames = vec![Frame::Geocentric];
        if config.aspects.heliocentric {
            frames.push(Frame::Heliocentric);
        }
        for frame in frames {
            for i in 0..bodies.len() {
                for j in (i + 1)..bodies.len() {
                    tasks.push(Task::Aspects {
                        body_a: bodies[i],
                        body_b: bodies[j],
                        frame,
                    });
                }
            }
        }
    }

    if config.features.eclipses {
        tasks.push(Task::SolarEclipses);
        tasks.push(Task::LunarEclipses);
    }

    if config.features.retrograde {
        for body in dedup(config::parse_bodies(&config.retrograde.planets)?) {
            tasks.push(Task::Retrograde(body));
        }
    }

    if config.features.zodiac {
        for body in dedup(config::parse_bodies(&config.almanac.bodies)?) {
            tasks.push(Task::Ingress(body));
        }
    }

    if config.features.seasons {
        tasks.push(Task::Seasons);
    }
    if config.features.moon_features {
        tasks.push(Task::MoonFeatures);
    }
    if config.features.moon_phases {
        tasks.push(Task::MoonPhases);
    }

    Ok(tasks)
}

fn dedup(mut bodies: Vec<Body>) -> Vec<Body> {
    bodies.sort_unstable();
    bodies.dedup();
    bodies
}

fn run_task(task: &Task, ctx: &RunContext<'_>) -> std::result::Result<TaskOutput, SearchError> {
    let mut output = TaskOutput::default();

    match task {
        Task::Almanac(body) => {
            // build_tasks only schedules almanac work with an observer.
            let Some((location, name)) = &ctx.observer else {
                return Ok(output);
            };
            let outcome = search_almanac(
                ctx.provider,
                *body,
                location,
                ctx.jd_start,
                ctx.jd_end,
                &ctx.almanac,
            )?;
            output.failures = outcome.failures.len();
            output.events = convert::almanac_events(&outcome, name);
            info!(body = %body, events = output.events.len(), "almanac search complete");
        }
        Task::Aspects { body_a, body_b, frame } => {
            let outcome = search_aspects(
                ctx.provider,
                *body_a,
                *body_b,
                *frame,
                &ctx.angles,
                ctx.jd_start,
                ctx.jd_end,
                &ctx.aspect,
            )?;
            output.failures = outcome.failures.len();
            output.events = convert::aspect_events(&outcome.occurrences);
            if *frame == Frame::Geocentric {
                output.geo_aspects = outcome.occurrences;
            }
            info!(
                body_a = %body_a,
                body_b = %body_b,
                frame = frame.label(),
                occurrences = output.events.len() / 2,
                "aspect search complete"
            );
        }
        Task::SolarEclipses => {
            let outcome =
                search_solar_eclipses(ctx.provider, ctx.jd_start, ctx.jd_end, &ctx.eclipse)?;
            output.failures = outcome.failures.len();
            output.events = convert::solar_eclipse_events(&outcome.eclipses);
            info!(eclipses = outcome.eclipses.len(), "solar eclipse search complete");
        }
        Task::LunarEclipses => {
            let outcome =
                search_lunar_eclipses(ctx.provider, ctx.jd_start, ctx.jd_end, &ctx.eclipse)?;
            output.failures = outcome.failures.len();
            output.events = convert::lunar_eclipse_events(&outcome.eclipses);
            info!(eclipses = outcome.eclipses.len(), "lunar eclipse search complete");
        }
        Task::Retrograde(body) => {
            let outcome = search_retrograde(
                ctx.provider,
                *body,
                ctx.jd_start,
                ctx.jd_end,
                &ctx.retrograde,
            )?;
            output.failures = outcome.failures.len();
            output.events = convert::retrograde_events(&outcome);
            info!(body = %body, stations = outcome.stations.len(), "retrograde search complete");
        }
        Task::Ingress(body) => {
            let outcome = search_ingresses(
                ctx.provider,
                *body,
                ctx.jd_start,
                ctx.jd_end,
                &ctx.ingress,
            )?;
            output.failures = outcome.failures.len();
            output.events = convert::ingress_events(&outcome);
            info!(body = %body, ingresses = outcome.events.len(), "ingress search complete");
        }
        Task::Seasons => {
            let outcome = search_seasons(ctx.provider, ctx.jd_start, ctx.jd_end, &ctx.season)?;
            output.failures = outcome.failures.len();
            output.events = convert::season_events(&outcome.events);
            info!(events = outcome.events.len(), "seasonal search complete");
        }
        Task::MoonFeatures => {
            let outcome =
                search_moon_features(ctx.provider, ctx.jd_start, ctx.jd_end, &ctx.moon_feature)?;
            output.failures = outcome.failures.len();
            output.events = convert::moon_feature_events(&outcome);
            info!(
                nodes = outcome.nodes.len(),
                standstills = outcome.standstills.len(),
                "moon feature search complete"
            );
        }
        Task::MoonPhases => {
            let outcome =
                search_moon_phases(ctx.provider, ctx.jd_start, ctx.jd_end, &ctx.moon_phase)?;
            output.failures = outcome.failures.len();
            output.events = convert::moon_phase_events(&outcome.events);
            info!(phases = outcome.events.len(), "moon phase search complete");
        }
    }

    Ok(output)
}
