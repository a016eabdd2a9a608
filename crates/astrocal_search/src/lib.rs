//! Celestial event search: the generic localization engine and the
//! classifiers built on it.
//!
//! This crate provides:
//! - The condition-agnostic localization engine (coarse scan +
//!   bisection refinement to minute precision)
//! - Sampled-function adapters over the ephemeris provider seam
//! - Per-feature classifiers: rise/set/culminations, aspects, eclipses,
//!   retrograde stations, zodiac ingresses, seasons, lunar nodes and
//!   standstills, moon phases, year-progress marks
//! - The square-and-trine pattern aggregator (a pure post-pass)

pub mod adapters;
pub mod almanac;
pub mod almanac_types;
pub mod aspect;
pub mod aspect_types;
pub mod eclipse;
pub mod eclipse_types;
pub mod error;
pub mod ingress;
pub mod locate;
pub mod moon_features;
pub mod moon_phase;
pub mod patterns;
pub mod retrograde;
pub mod retrograde_types;
pub mod seasons;
pub mod year_progress;

pub use almanac::{AlmanacOutcome, search_almanac};
pub use almanac_types::{
    AlmanacConfig, AlmanacEvent, AlmanacEventKind, DivisionEvent, GeoLocation,
};
pub use aspect::{AspectOutcome, search_aspects};
pub use aspect_types::{AspectAngle, AspectConfig, AspectOccurrence};
pub use eclipse::{
    LunarEclipseOutcome, SolarEclipseOutcome, search_lunar_eclipses, search_solar_eclipses,
};
pub use eclipse_types::{
    EclipseConfig, LunarEclipse, LunarEclipseKind, SolarEclipse, SolarEclipseKind,
};
pub use error::SearchError;
pub use ingress::{IngressConfig, IngressEvent, IngressOutcome, ZODIAC_SIGNS, search_ingresses};
pub use locate::{
    Condition, ConditionSpec, Direction, ExtremumKind, LocateConfig, LocateOutcome, RawEvent,
    RefineFailure, SearchWindow, locate,
};
pub use moon_features::{
    MoonFeatureConfig, MoonFeatureOutcome, NodeEvent, NodeKind, StandstillEvent, StandstillKind,
    search_moon_features,
};
pub use moon_phase::{
    MoonPhase, MoonPhaseConfig, MoonPhaseEvent, MoonPhaseOutcome, search_moon_phases,
};
pub use patterns::{PatternOverlap, square_trine_overlaps};
pub use retrograde::{RetrogradeOutcome, search_retrograde};
pub use retrograde_types::{
    RetrogradeConfig, ShadowExitEvent, StationEvent, StationKind,
};
pub use seasons::{SeasonConfig, SeasonEvent, SeasonKind, SeasonOutcome, search_seasons};
pub use year_progress::{
    ProgressMark, YearOrigin, YearProgressEvent, calendar_year_marks, solar_year_marks,
};
