//! Multi-body pattern aggregation.
//!
//! A pure post-pass over already-classified aspect occurrences — it
//! never queries the ephemeris. A body simultaneously square one
//! partner and trine another produces a pattern whose interval is
//! exactly the intersection of the two aspect windows.

use astrocal_ephem::Body;

use crate::aspect_types::{AspectAngle, AspectOccurrence};

/// A square-and-trine overlap centered on one focus body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternOverlap {
    /// The body participating in both aspects.
    pub focus: Body,
    pub square_partner: Body,
    pub trine_partner: Body,
    /// Intersection of the two aspect windows.
    pub start_jd: f64,
    pub end_jd: f64,
}

impl PatternOverlap {
    /// All three participants.
    pub fn bodies(&self) -> [Body; 3] {
        [self.focus, self.square_partner, self.trine_partner]
    }
}

/// Find every square-and-trine overlap in a set of aspect occurrences.
///
/// Aspects are symmetric, so each occurrence counts for both of its
/// participants; the focus body is whichever participant appears in
/// both windows. The two partners must be distinct bodies. Returned
/// patterns are sorted by start time.
pub fn square_trine_overlaps(occurrences: &[AspectOccurrence]) -> Vec<PatternOverlap> {
    let squares: Vec<&AspectOccurrence> = occurrences
        .iter()
        .filter(|o| o.angle == AspectAngle::Square)
        .collect();
    let trines: Vec<&AspectOccurrence> = occurrences
        .iter()
        .filter(|o| o.angle == AspectAngle::Trine)
        .collect();

    let mut patterns = Vec::new();
    for sq in &squares {
        for tr in &trines {
            for focus in sq.bodies() {
                let Some(square_partner) = sq.partner_of(focus) else {
                    continue;
                };
                let Some(trine_partner) = tr.partner_of(focus) else {
                    continue;
                };
                if trine_partner == square_partner || trine_partner == focus {
                    continue;
                }

                let start_jd = sq.enter_jd.max(tr.enter_jd);
                let end_jd = sq.exit_jd.min(tr.exit_jd);
                if start_jd < end_jd {
                    patterns.push(PatternOverlap {
                        focus,
                        square_partner,
                        trine_partner,
                        start_jd,
                        end_jd,
                    });
                }
            }
        }
    }

    patterns.sort_by(|a, b| a.start_jd.total_cmp(&b.start_jd));
    patterns
}
