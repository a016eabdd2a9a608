//! Aspect search: exact angular-separation crossings with orb windows.
//!
//! For each target angle the longitude separation of the pair is
//! searched for wrap-aware threshold crossings; each exact crossing is
//! then widened into an occurrence by walking outward to the instants
//! the absolute deviation leaves the orb. Non-axial angles are searched
//! at both the angle and its 360° mirror, so "Mars square Jupiter" is
//! found whichever body leads.

use astrocal_ephem::{Body, EphemerisProvider, Frame};

use crate::adapters::pair_separation;
use crate::aspect_types::{AspectAngle, AspectConfig, AspectOccurrence};
use crate::error::SearchError;
use crate::locate::{ConditionSpec, RefineFailure, SearchWindow, locate, wrap_pm};

/// Everything an aspect search produced for one pair and frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AspectOutcome {
    /// Occurrences in ascending exact-crossing order.
    pub occurrences: Vec<AspectOccurrence>,
    pub failures: Vec<RefineFailure>,
    /// Orb-boundary searches that hit the scan horizon and fell back
    /// to the exact instant.
    pub truncated_windows: u32,
}

/// Reject pairs with no defined separation.
fn validate_pair(body_a: Body, body_b: Body, frame: Frame) -> Result<(), SearchError> {
    if body_a == body_b {
        return Err(SearchError::InvalidConfig(
            "aspect pair must be two distinct bodies",
        ));
    }
    if frame == Frame::Heliocentric && (body_a == Body::Sun || body_b == Body::Sun) {
        return Err(SearchError::InvalidConfig(
            "Sun has no heliocentric position",
        ));
    }
    Ok(())
}

/// Search all occurrences of the given aspect angles for one body pair
/// in one frame.
pub fn search_aspects(
    provider: &dyn EphemerisProvider,
    body_a: Body,
    body_b: Body,
    frame: Frame,
    angles: &[AspectAngle],
    jd_start: f64,
    jd_end: f64,
    config: &AspectConfig,
) -> Result<AspectOutcome, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    validate_pair(body_a, body_b, frame)?;

    let sep = |jd: f64| pair_separation(provider, body_a, body_b, frame, jd);
    let window = SearchWindow::new(jd_start, jd_end, config.step_days);

    let mut outcome = AspectOutcome::default();

    for &angle in angles {
        let mut targets = vec![angle.degrees()];
        if !angle.is_axial() {
            targets.push(360.0 - angle.degrees());
        }

        for target in targets {
            let exact = locate(
                &sep,
                &ConditionSpec::threshold(target).with_wrap(360.0),
                &window,
                &config.locate,
            )?;
            outcome.failures.extend_from_slice(&exact.failures);

            for crossing in &exact.events {
                let occurrence = widen_to_orb(
                    &sep,
                    body_a,
                    body_b,
                    frame,
                    angle,
                    target,
                    crossing.jd_utc,
                    config,
                    &mut outcome,
                )?;
                outcome.occurrences.push(occurrence);
            }
        }
    }

    outcome
        .occurrences
        .sort_by(|a, b| a.exact_jd.total_cmp(&b.exact_jd));
    Ok(outcome)
}

/// Walk outward from an exact crossing until |deviation| exceeds the
/// orb, then refine the boundary crossing. Falls back to the exact
/// instant when the boundary lies beyond the scan horizon (slow outer
/// pairs), matching the occurrence to what is actually resolvable.
#[allow(clippy::too_many_arguments)]
fn widen_to_orb<F>(
    sep: &F,
    body_a: Body,
    body_b: Body,
    frame: Frame,
    angle: AspectAngle,
    target: f64,
    exact_jd: f64,
    config: &AspectConfig,
    outcome: &mut AspectOutcome,
) -> Result<AspectOccurrence, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    let deviation = |jd: f64| -> Result<f64, SearchError> {
        Ok(wrap_pm(sep(jd)? - target, 360.0).abs() - config.orb_deg)
    };

    let enter = orb_boundary(&deviation, exact_jd, -config.orb_scan_step_days, config, outcome)?;
    let exit = orb_boundary(&deviation, exact_jd, config.orb_scan_step_days, config, outcome)?;

    let truncated_enter = enter.is_none();
    let truncated_exit = exit.is_none();
    if truncated_enter {
        outcome.truncated_windows += 1;
    }
    if truncated_exit {
        outcome.truncated_windows += 1;
    }

    Ok(AspectOccurrence {
        body_a,
        body_b,
        frame,
        angle,
        target_deg: target,
        enter_jd: enter.unwrap_or(exact_jd),
        exact_jd,
        exit_jd: exit.unwrap_or(exact_jd),
        truncated_enter,
        truncated_exit,
    })
}

/// Step away from `exact_jd` by `signed_step` until the deviation
/// leaves the orb, then refine the crossing inside the bracketing step.
fn orb_boundary<G>(
    deviation: &G,
    exact_jd: f64,
    signed_step: f64,
    config: &AspectConfig,
    outcome: &mut AspectOutcome,
) -> Result<Option<f64>, SearchError>
where
    G: Fn(f64) -> Result<f64, SearchError>,
{
    let max_steps = (config.max_orb_scan_days / config.orb_scan_step_days).ceil() as usize;
    let mut t_inside = exact_jd;

    for _ in 0..max_steps {
        let t_next = t_inside + signed_step;
        if deviation(t_next)? > 0.0 {
            // Bracketed: refine inside the single step.
            let (lo, hi) = if t_next < t_inside {
                (t_next, t_inside)
            } else {
                (t_inside, t_next)
            };
            let refined = locate(
                deviation,
                &ConditionSpec::zero_crossing(),
                &SearchWindow::new(lo, hi, hi - lo),
                &config.locate,
            )?;
            outcome.failures.extend_from_slice(&refined.failures);
            return Ok(refined.events.first().map(|ev| ev.jd_utc));
        }
        t_inside = t_next;
    }

    Ok(None)
}
