//! Pipeline configuration, loaded from TOML.
//!
//! Every section and field has a default, so an absent file or an
//! empty one yields the stock single-year, all-features run. CLI flags
//! override file values in `pipeline::run`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use astrocal_ephem::Body;
use astrocal_search::AspectAngle;
use chrono::Datelike;
use serde::Deserialize;

/// Top-level astrocal configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AstrocalConfig {
    /// Year range to generate events for.
    #[serde(default)]
    pub years: YearsToml,

    /// Observer location (almanac features only).
    #[serde(default)]
    pub observer: ObserverToml,

    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,

    /// Feature toggles.
    #[serde(default)]
    pub features: FeaturesToml,

    /// Aspect settings.
    #[serde(default)]
    pub aspects: AspectsToml,

    /// Almanac settings.
    #[serde(default)]
    pub almanac: AlmanacToml,

    /// Retrograde settings.
    #[serde(default)]
    pub retrograde: RetrogradeToml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YearsToml {
    /// First year; defaults to the current year.
    pub start: Option<i32>,
    /// Last year, inclusive; defaults to `start`.
    pub end: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObserverToml {
    /// City name looked up in the built-in table.
    pub city: Option<String>,
    /// Fallback coordinates when the city cannot be resolved.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for ObserverToml {
    fn default() -> Self {
        Self {
            city: Some("New York, USA".to_string()),
            latitude: Some(40.7128),
            longitude: Some(-74.0060),
        }
    }
}

/// Where the finalized calendars go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// One file per calendar in the output directory.
    CalendarFiles,
    /// Grouped event records printed to stdout.
    RawData,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_output_mode")]
    pub mode: OutputMode,
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            mode: default_output_mode(),
            directory: default_output_dir(),
        }
    }
}

fn default_output_mode() -> OutputMode {
    OutputMode::CalendarFiles
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("calendars")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeaturesToml {
    #[serde(default = "default_true")]
    pub eclipses: bool,
    #[serde(default = "default_true")]
    pub almanac: bool,
    #[serde(default = "default_true")]
    pub aspects: bool,
    #[serde(default = "default_true")]
    pub retrograde: bool,
    #[serde(default = "default_true")]
    pub seasons: bool,
    #[serde(default = "default_true")]
    pub moon_features: bool,
    #[serde(default = "default_true")]
    pub zodiac: bool,
    #[serde(default = "default_true")]
    pub moon_phases: bool,
    #[serde(default = "default_true")]
    pub calendar_year_progress: bool,
    #[serde(default = "default_true")]
    pub solar_year_progress: bool,
    #[serde(default = "default_true")]
    pub patterns: bool,
}

impl Default for FeaturesToml {
    fn default() -> Self {
        Self {
            eclipses: true,
            almanac: true,
            aspects: true,
            retrograde: true,
            seasons: true,
            moon_features: true,
            zodiac: true,
            moon_phases: true,
            calendar_year_progress: true,
            solar_year_progress: true,
            patterns: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AspectsToml {
    /// Orb half-width in degrees.
    #[serde(default = "default_orb")]
    pub orb_deg: f64,
    /// Bodies whose pairs are searched.
    #[serde(default = "default_aspect_bodies")]
    pub bodies: Vec<String>,
    /// Aspect angle names to track.
    #[serde(default = "default_aspect_angles")]
    pub angles: Vec<String>,
    /// Also search heliocentric aspects.
    #[serde(default = "default_true")]
    pub heliocentric: bool,
}

impl Default for AspectsToml {
    fn default() -> Self {
        Self {
            orb_deg: default_orb(),
            bodies: default_aspect_bodies(),
            angles: default_aspect_angles(),
            heliocentric: true,
        }
    }
}

fn default_orb() -> f64 {
    1.0
}

fn default_aspect_bodies() -> Vec<String> {
    ["Mars", "Jupiter", "Saturn", "Venus"]
        .map(str::to_string)
        .to_vec()
}

fn default_aspect_angles() -> Vec<String> {
    AspectAngle::ALL.map(|a| a.name().to_string()).to_vec()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlmanacToml {
    /// Bodies tracked for rise/set/culminations.
    #[serde(default = "default_almanac_bodies")]
    pub bodies: Vec<String>,
}

impl Default for AlmanacToml {
    fn default() -> Self {
        Self {
            bodies: default_almanac_bodies(),
        }
    }
}

fn default_almanac_bodies() -> Vec<String> {
    Body::ALL.map(|b| b.name().to_string()).to_vec()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrogradeToml {
    /// Planets tracked for stations and shadow exits.
    #[serde(default = "default_retrograde_planets")]
    pub planets: Vec<String>,
}

impl Default for RetrogradeToml {
    fn default() -> Self {
        Self {
            planets: default_retrograde_planets(),
        }
    }
}

fn default_retrograde_planets() -> Vec<String> {
    Body::ALL
        .iter()
        .filter(|b| b.is_planet())
        .map(|b| b.name().to_string())
        .collect()
}

/// Load configuration from a TOML file; an absent file yields the
/// defaults.
pub fn load(path: &Path) -> Result<AstrocalConfig> {
    if !path.exists() {
        return Ok(AstrocalConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Resolve a list of configured body names, rejecting unknown ones.
pub fn parse_bodies(names: &[String]) -> Result<Vec<Body>> {
    let mut bodies = Vec::with_capacity(names.len());
    for name in names {
        match Body::from_name(name) {
            Some(body) => bodies.push(body),
            None => bail!("unknown body in config: {name:?}"),
        }
    }
    Ok(bodies)
}

/// Resolve a list of configured aspect-angle names.
pub fn parse_angles(names: &[String]) -> Result<Vec<AspectAngle>> {
    let mut angles = Vec::with_capacity(names.len());
    for name in names {
        match AspectAngle::from_name(name) {
            Some(angle) => angles.push(angle),
            None => bail!("unknown aspect angle in config: {name:?}"),
        }
    }
    Ok(angles)
}

impl YearsToml {
    /// Resolved year range; defaults to the current year only.
    pub fn resolve(&self) -> (i32, i32) {
        let start = self.start.unwrap_or_else(|| chrono::Utc::now().year());
        let end = self.end.unwrap_or(start).max(start);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: AstrocalConfig = toml::from_str("").unwrap();
        assert!(config.features.eclipses);
        assert_eq!(config.aspects.orb_deg, 1.0);
        assert_eq!(config.output.mode, OutputMode::CalendarFiles);
        assert_eq!(config.almanac.bodies.len(), 10);
        assert_eq!(config.retrograde.planets.len(), 8);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: std::result::Result<AstrocalConfig, _> =
            toml::from_str("[features]\nteleportation = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn output_mode_kebab_case() {
        let config: AstrocalConfig = toml::from_str("[output]\nmode = \"raw-data\"\n").unwrap();
        assert_eq!(config.output.mode, OutputMode::RawData);
    }

    #[test]
    fn parse_bodies_rejects_unknown() {
        assert!(parse_bodies(&["Mars".into(), "Vulcan".into()]).is_err());
        let ok = parse_bodies(&["mars".into(), "Venus".into()]).unwrap();
        assert_eq!(ok, vec![Body::Mars, Body::Venus]);
    }

    #[test]
    fn years_resolve_orders_range() {
        let years = YearsToml {
            start: Some(2025),
            end: Some(2023),
        };
        assert_eq!(years.resolve(), (2025, 2025));
        let fixed = YearsToml {
            start: Some(2024),
            end: Some(2026),
        };
        assert_eq!(fixed.resolve(), (2024, 2026));
    }
}
