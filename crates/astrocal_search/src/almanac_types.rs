//! Types for rise/set, culmination, and day-arc division search.

use astrocal_ephem::Body;

use crate::locate::LocateConfig;

/// Observer geographic location. East longitude positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl GeoLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err("latitude must be in [-90, 90]");
        }
        if !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err("longitude must be in [-180, 180]");
        }
        Ok(())
    }
}

/// Kind of horizon/meridian event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlmanacEventKind {
    /// Altitude crosses the horizon threshold upward.
    Rise,
    /// Altitude crosses the horizon threshold downward.
    Set,
    /// Upper culmination (midheaven), altitude maximum.
    Mc,
    /// Lower culmination (nadir), altitude minimum.
    Ic,
}

impl AlmanacEventKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rise => "Rise",
            Self::Set => "Set",
            Self::Mc => "MC",
            Self::Ic => "IC",
        }
    }
}

/// A rise/set/culmination event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlmanacEvent {
    pub jd_utc: f64,
    pub body: Body,
    pub kind: AlmanacEventKind,
    /// Altitude at the event in degrees (≈ the threshold for
    /// rise/set, the extremum for MC/IC).
    pub altitude_deg: f64,
}

/// A fractional mark on a rise→set day arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivisionEvent {
    pub jd_utc: f64,
    pub body: Body,
    pub numerator: u32,
    pub denominator: u32,
}

/// Configuration for the almanac search.
#[derive(Debug, Clone, PartialEq)]
pub struct AlmanacConfig {
    /// Coarse scan step in days. Altitude oscillates daily, so the
    /// default samples hourly.
    pub step_days: f64,
    /// Horizon altitude for the Sun: 34′ standard refraction plus 16′
    /// semidiameter below the geometric horizon.
    pub sun_horizon_deg: f64,
    /// Horizon altitude for the Moon: refraction net of mean parallax.
    pub moon_horizon_deg: f64,
    /// Horizon altitude for planets: refraction only.
    pub planet_horizon_deg: f64,
    /// Denominators for day-arc divisions (marks at n/d between rise
    /// and set for each n in 1..d).
    pub division_denominators: Vec<u32>,
    pub locate: LocateConfig,
}

impl Default for AlmanacConfig {
    fn default() -> Self {
        Self {
            step_days: 1.0 / 24.0,
            sun_horizon_deg: -0.8333,
            moon_horizon_deg: 0.125,
            planet_horizon_deg: -0.5667,
            division_denominators: vec![3, 8, 19],
            locate: LocateConfig::default(),
        }
    }
}

impl AlmanacConfig {
    /// Horizon threshold for a body, degrees.
    pub fn horizon_for(&self, body: Body) -> f64 {
        match body {
            Body::Sun => self.sun_horizon_deg,
            Body::Moon => self.moon_horizon_deg,
            _ => self.planet_horizon_deg,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if self.step_days > 0.5 {
            return Err("step_days must be under half a day to bracket daily motion");
        }
        if self.division_denominators.iter().any(|&d| d < 2) {
            return Err("division denominators must be >= 2");
        }
        self.locate.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        assert!(AlmanacConfig::default().validate().is_ok());
    }

    #[test]
    fn horizon_per_body_class() {
        let c = AlmanacConfig::default();
        assert!(c.horizon_for(Body::Sun) < c.horizon_for(Body::Mars));
        assert!(c.horizon_for(Body::Moon) > 0.0);
    }

    #[test]
    fn rejects_daily_step() {
        let c = AlmanacConfig {
            step_days: 1.0,
            ..AlmanacConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_unit_denominator() {
        let c = AlmanacConfig {
            division_denominators: vec![1],
            ..AlmanacConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn location_bounds_checked() {
        assert!(GeoLocation::new(91.0, 0.0).validate().is_err());
        assert!(GeoLocation::new(0.0, 181.0).validate().is_err());
        assert!(GeoLocation::new(40.7, -74.0).validate().is_ok());
    }
}
