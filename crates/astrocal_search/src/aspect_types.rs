//! Types for aspect search.

use astrocal_ephem::{Body, Frame};

use crate::locate::LocateConfig;

/// The tracked aspect angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectAngle {
    Conjunction,
    Sextile,
    Quintile,
    Square,
    Trine,
    Biquintile,
    Opposition,
}

impl AspectAngle {
    pub const ALL: [AspectAngle; 7] = [
        AspectAngle::Conjunction,
        AspectAngle::Sextile,
        AspectAngle::Quintile,
        AspectAngle::Square,
        AspectAngle::Trine,
        AspectAngle::Biquintile,
        AspectAngle::Opposition,
    ];

    /// Exact separation angle in degrees.
    pub const fn degrees(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Quintile => 72.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Biquintile => 144.0,
            Self::Opposition => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "Conjunction",
            Self::Sextile => "Sextile",
            Self::Quintile => "Quintile",
            Self::Square => "Square",
            Self::Trine => "Trine",
            Self::Biquintile => "Biquintile",
            Self::Opposition => "Opposition",
        }
    }

    /// Parse an angle from its (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }

    /// Conjunction and opposition sit on the symmetry axis of the
    /// separation circle, so they have no mirrored twin at 360 − x.
    pub const fn is_axial(self) -> bool {
        matches!(self, Self::Conjunction | Self::Opposition)
    }
}

/// One aspect occurrence: the interval the pair spends inside the orb
/// around one exact crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectOccurrence {
    pub body_a: Body,
    pub body_b: Body,
    pub frame: Frame,
    pub angle: AspectAngle,
    /// The crossed target in [0, 360): `angle.degrees()` or its mirror.
    pub target_deg: f64,
    /// Orb entry (JD UTC).
    pub enter_jd: f64,
    /// Exact crossing (JD UTC).
    pub exact_jd: f64,
    /// Orb exit (JD UTC).
    pub exit_jd: f64,
    /// Entry fell back to the exact instant: the true window starts
    /// beyond the orb-scan horizon or the search range.
    pub truncated_enter: bool,
    /// Likewise for the exit.
    pub truncated_exit: bool,
}

impl AspectOccurrence {
    /// Both participants, in query order.
    pub fn bodies(&self) -> [Body; 2] {
        [self.body_a, self.body_b]
    }

    /// The partner of `body` in this occurrence, if it participates.
    pub fn partner_of(&self, body: Body) -> Option<Body> {
        if body == self.body_a {
            Some(self.body_b)
        } else if body == self.body_b {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Configuration for aspect search.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectConfig {
    /// Orb half-width in degrees; the occurrence spans the interval
    /// where |deviation| < orb.
    pub orb_deg: f64,
    /// Coarse scan step for exact crossings, days. Daily suffices for
    /// planet pairs; drop it for pairs involving the Moon.
    pub step_days: f64,
    /// Scan step when walking outward from an exact crossing to find
    /// the orb boundary, days.
    pub orb_scan_step_days: f64,
    /// How far from the exact crossing to look for the orb boundary
    /// before falling back to the exact instant. Slow outer-planet
    /// pairs can sit inside a 1° orb for months.
    pub max_orb_scan_days: f64,
    pub locate: LocateConfig,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            orb_deg: 1.0,
            step_days: 1.0,
            orb_scan_step_days: 1.0 / 6.0,
            max_orb_scan_days: 120.0,
            locate: LocateConfig::default(),
        }
    }
}

impl AspectConfig {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.orb_deg.is_finite() || self.orb_deg <= 0.0 || self.orb_deg >= 30.0 {
            return Err("orb_deg must be in (0, 30)");
        }
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if !self.orb_scan_step_days.is_finite() || self.orb_scan_step_days <= 0.0 {
            return Err("orb_scan_step_days must be positive");
        }
        if !self.max_orb_scan_days.is_finite() || self.max_orb_scan_days < self.orb_scan_step_days {
            return Err("max_orb_scan_days must cover at least one scan step");
        }
        self.locate.validate()
    }
}
