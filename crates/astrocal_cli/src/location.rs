//! Observer location resolution.
//!
//! A real deployment would sit a geocoding service behind this seam;
//! the pipeline itself only needs a name → coordinates lookup that is
//! deterministic and available offline, so a table of well-known
//! cities ships built in. An unresolvable city is surfaced before any
//! computation starts — the location-dependent almanac degrades, the
//! rest of the pipeline runs.

use astrocal_search::GeoLocation;

/// Well-known city coordinates: (name, latitude, east longitude).
const WELL_KNOWN_CITIES: &[(&str, f64, f64)] = &[
    ("New York, USA", 40.7128, -74.0060),
    ("London, UK", 51.5074, -0.1278),
    ("Paris, France", 48.8566, 2.3522),
    ("Tokyo, Japan", 35.6762, 139.6503),
    ("Sydney, Australia", -33.8688, 151.2093),
    ("Chicago, USA", 41.8781, -87.6298),
    ("Frankfurt, Germany", 50.1109, 8.6821),
    ("Hong Kong", 22.3193, 114.1694),
    ("Singapore", 1.3521, 103.8198),
    ("Shanghai, China", 31.2304, 121.4737),
    ("Mumbai, India", 19.0760, 72.8777),
    ("Sao Paulo, Brazil", -23.5505, -46.6333),
    ("Dubai, UAE", 25.2048, 55.2708),
];

/// Resolve a city name to coordinates, case-insensitively.
pub fn resolve(city: &str) -> Option<GeoLocation> {
    WELL_KNOWN_CITIES
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(city))
        .map(|&(_, lat, lon)| GeoLocation::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_city_resolves() {
        let loc = resolve("New York, USA").unwrap();
        assert!((loc.latitude_deg - 40.7128).abs() < 1e-9);
        assert!(loc.longitude_deg < 0.0);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(resolve("london, uk").is_some());
    }

    #[test]
    fn unknown_city_is_none() {
        assert!(resolve("Atlantis").is_none());
    }
}
