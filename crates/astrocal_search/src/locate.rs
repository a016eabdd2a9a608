//! Event localization engine: coarse scan + bisection refinement.
//!
//! [`locate`] takes an arbitrary scalar function of time, a condition
//! (zero-crossing, threshold-crossing, derivative sign change, local
//! extremum), and a search window, and returns every instant at which
//! the condition holds, refined to minute precision. The engine knows
//! nothing about bodies or features; every classifier in this crate is
//! a different instantiation of this one procedure.
//!
//! Circular quantities (angles) set a wrap modulus on the condition:
//! differences are reduced to `(-m/2, m/2]` before sign tests, and a
//! sign change spanning most of the circle is treated as the wrap
//! discontinuity rather than a crossing.

use astrocal_time::{MINUTE_DAYS, minute_index};
use tracing::debug;

use crate::error::SearchError;

/// Coarse sampling interval for a search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    /// Start of the interval (JD UTC).
    pub start_jd: f64,
    /// End of the interval (JD UTC).
    pub end_jd: f64,
    /// Coarse scan step in days. Must be shorter than half the fastest
    /// oscillation of the sampled function or events will be missed.
    pub step_days: f64,
}

impl SearchWindow {
    pub fn new(start_jd: f64, end_jd: f64, step_days: f64) -> Self {
        Self {
            start_jd,
            end_jd,
            step_days,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.start_jd.is_finite() || !self.end_jd.is_finite() {
            return Err("window bounds must be finite");
        }
        if self.end_jd <= self.start_jd {
            return Err("end_jd must be after start_jd");
        }
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        Ok(())
    }
}

/// Which extremum a `LocalExtremum` search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtremumKind {
    Max,
    Min,
}

/// The condition to localize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// f(t) = 0.
    ZeroCrossing,
    /// f(t) = target.
    ThresholdCrossing { target: f64 },
    /// Forward-difference derivative of f changes sign (either way).
    SignChangeOfDerivative,
    /// Derivative changes sign in one direction only.
    LocalExtremum { kind: ExtremumKind },
}

/// A condition plus an optional wrap modulus for circular functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionSpec {
    pub condition: Condition,
    /// Period of a circular function (e.g. 360 or 30 degrees).
    /// `None` for unbounded scalars such as altitude or latitude.
    pub wrap_modulus: Option<f64>,
}

impl ConditionSpec {
    pub fn zero_crossing() -> Self {
        Self {
            condition: Condition::ZeroCrossing,
            wrap_modulus: None,
        }
    }

    pub fn threshold(target: f64) -> Self {
        Self {
            condition: Condition::ThresholdCrossing { target },
            wrap_modulus: None,
        }
    }

    pub fn derivative_sign_change() -> Self {
        Self {
            condition: Condition::SignChangeOfDerivative,
            wrap_modulus: None,
        }
    }

    pub fn extremum(kind: ExtremumKind) -> Self {
        Self {
            condition: Condition::LocalExtremum { kind },
            wrap_modulus: None,
        }
    }

    pub fn with_wrap(mut self, modulus: f64) -> Self {
        self.wrap_modulus = Some(modulus);
        self
    }

    fn validate(&self) -> Result<(), &'static str> {
        if let Condition::ThresholdCrossing { target } = self.condition
            && !target.is_finite()
        {
            return Err("threshold target must be finite");
        }
        if let Some(m) = self.wrap_modulus
            && (!m.is_finite() || m <= 0.0)
        {
            return Err("wrap_modulus must be positive");
        }
        Ok(())
    }
}

/// Which way the residual passed through zero at a crossing.
///
/// For threshold conditions: `Rising` means the function passed upward
/// through the target. For derivative conditions: `Rising` means the
/// derivative went negative→positive (a minimum), `Falling`
/// positive→negative (a maximum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Rising,
    Falling,
}

/// A refined condition instant, before feature-specific interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEvent {
    /// Refined instant (JD UTC), accurate to `tolerance_days`.
    pub jd_utc: f64,
    /// Function value at the refined instant.
    pub value: f64,
    /// The coarse samples that bracketed the crossing.
    pub bracket: (f64, f64),
    /// Crossing direction, from the bracketing samples.
    pub direction: Direction,
}

/// A bracket whose refinement did not converge within the iteration cap.
///
/// Reported instead of a wrong answer; the surrounding scan continues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineFailure {
    pub bracket: (f64, f64),
    /// Bracket width remaining when the cap was hit, in days.
    pub width_days: f64,
}

/// Everything a search produced: events in ascending time order, plus
/// any brackets that failed to refine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocateOutcome {
    pub events: Vec<RawEvent>,
    pub failures: Vec<RefineFailure>,
}

/// Refinement parameters shared by all searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocateConfig {
    /// Bisection iteration cap. Bisection on a year-long bracket
    /// reaches minute width in under 30 halvings; the default leaves
    /// generous headroom.
    pub max_iterations: u32,
    /// Refinement target in days (default one minute).
    pub tolerance_days: f64,
    /// Step for the forward-difference derivative proxy, in days.
    pub derivative_step_days: f64,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            max_iterations: 60,
            tolerance_days: MINUTE_DAYS,
            derivative_step_days: 0.01,
        }
    }
}

impl LocateConfig {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        if !self.tolerance_days.is_finite() || self.tolerance_days <= 0.0 {
            return Err("tolerance_days must be positive");
        }
        if !self.derivative_step_days.is_finite() || self.derivative_step_days <= 0.0 {
            return Err("derivative_step_days must be positive");
        }
        Ok(())
    }
}

/// Reduce `x` to the half-open interval `[-m/2, m/2)`.
pub(crate) fn wrap_pm(x: f64, modulus: f64) -> f64 {
    let half = 0.5 * modulus;
    (x + half).rem_euclid(modulus) - half
}

/// Residual of a raw function value against the condition target,
/// wrap-reduced when a modulus is set.
fn residual(value: f64, target: f64, wrap: Option<f64>) -> f64 {
    match wrap {
        Some(m) => wrap_pm(value - target, m),
        None => value - target,
    }
}

/// A sign change is a genuine crossing only if the two residuals do not
/// span most of the circle; a jump of ~m is the wrap seam, not a root.
fn is_genuine_crossing(r_a: f64, r_b: f64, wrap: Option<f64>) -> bool {
    if r_a * r_b >= 0.0 {
        return false;
    }
    match wrap {
        Some(m) => (r_a - r_b).abs() < 0.75 * m,
        None => true,
    }
}

enum Refined {
    Converged(f64),
    Failed { width_days: f64 },
}

/// Bisect a bracketed sign change of `g` down to `tolerance_days`.
///
/// Maintains the invariant that `g(t_a)` keeps the sign of the original
/// left sample, so the root stays inside `[t_a, t_b]`.
fn bisect_zero<G>(
    mut t_a: f64,
    mut r_a: f64,
    mut t_b: f64,
    config: &LocateConfig,
    g: &G,
) -> Result<Refined, SearchError>
where
    G: Fn(f64) -> Result<f64, SearchError>,
{
    for _ in 0..config.max_iterations {
        let t_mid = 0.5 * (t_a + t_b);
        let r_mid = g(t_mid)?;

        if r_a * r_mid <= 0.0 {
            t_b = t_mid;
        } else {
            t_a = t_mid;
            r_a = r_mid;
        }

        if (t_b - t_a).abs() < config.tolerance_days {
            return Ok(Refined::Converged(0.5 * (t_a + t_b)));
        }
    }

    let width = (t_b - t_a).abs();
    if width < config.tolerance_days {
        Ok(Refined::Converged(0.5 * (t_a + t_b)))
    } else {
        Ok(Refined::Failed { width_days: width })
    }
}

/// Localize every instant in `window` at which `f` satisfies the
/// condition. Returns events in ascending time order; a window with no
/// bracket (circumpolar case, no aspect ever forms) yields an empty
/// outcome, not an error.
pub fn locate<F>(
    f: &F,
    spec: &ConditionSpec,
    window: &SearchWindow,
    config: &LocateConfig,
) -> Result<LocateOutcome, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    window.validate().map_err(SearchError::InvalidConfig)?;
    spec.validate().map_err(SearchError::InvalidConfig)?;
    config.validate().map_err(SearchError::InvalidConfig)?;

    let outcome = match spec.condition {
        Condition::ZeroCrossing => scan_crossings(f, 0.0, spec.wrap_modulus, window, config)?,
        Condition::ThresholdCrossing { target } => {
            scan_crossings(f, target, spec.wrap_modulus, window, config)?
        }
        Condition::SignChangeOfDerivative => {
            scan_derivative(f, spec.wrap_modulus, window, config, None)?
        }
        Condition::LocalExtremum { kind } => {
            scan_derivative(f, spec.wrap_modulus, window, config, Some(kind))?
        }
    };

    debug!(
        events = outcome.events.len(),
        failures = outcome.failures.len(),
        "locate scan complete"
    );
    Ok(outcome)
}

/// Coarse scan + refine for zero/threshold crossings of `f`.
fn scan_crossings<F>(
    f: &F,
    target: f64,
    wrap: Option<f64>,
    window: &SearchWindow,
    config: &LocateConfig,
) -> Result<LocateOutcome, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    let g = |t: f64| -> Result<f64, SearchError> { Ok(residual(f(t)?, target, wrap)) };
    let mut outcome = LocateOutcome::default();

    let mut t_prev = window.start_jd;
    let mut r_prev = g(t_prev)?;

    loop {
        let t_curr = (t_prev + window.step_days).min(window.end_jd);
        let r_curr = g(t_curr)?;

        if is_genuine_crossing(r_prev, r_curr, wrap) {
            let direction = if r_prev < 0.0 {
                Direction::Rising
            } else {
                Direction::Falling
            };
            match bisect_zero(t_prev, r_prev, t_curr, config, &g)? {
                Refined::Converged(jd) => outcome.events.push(RawEvent {
                    jd_utc: jd,
                    value: f(jd)?,
                    bracket: (t_prev, t_curr),
                    direction,
                }),
                Refined::Failed { width_days } => outcome.failures.push(RefineFailure {
                    bracket: (t_prev, t_curr),
                    width_days,
                }),
            }
        }

        if t_curr >= window.end_jd {
            break;
        }
        t_prev = t_curr;
        r_prev = r_curr;
    }

    dedupe_same_minute(&mut outcome.events);
    Ok(outcome)
}

/// Coarse scan + refine for sign changes of the derivative proxy.
///
/// `only` restricts to one direction: `Max` keeps positive→negative
/// changes, `Min` negative→positive.
fn scan_derivative<F>(
    f: &F,
    wrap: Option<f64>,
    window: &SearchWindow,
    config: &LocateConfig,
    only: Option<ExtremumKind>,
) -> Result<LocateOutcome, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    let h = config.derivative_step_days;
    let d = |t: f64| -> Result<f64, SearchError> {
        let f0 = f(t)?;
        let f1 = f(t + h)?;
        let df = match wrap {
            Some(m) => wrap_pm(f1 - f0, m),
            None => f1 - f0,
        };
        Ok(df / h)
    };

    let mut outcome = LocateOutcome::default();
    let mut t_prev = window.start_jd;
    let mut d_prev = d(t_prev)?;

    loop {
        let t_curr = (t_prev + window.step_days).min(window.end_jd);
        let d_curr = d(t_curr)?;

        if d_prev * d_curr < 0.0 {
            let direction = if d_prev < 0.0 {
                Direction::Rising
            } else {
                Direction::Falling
            };
            let wanted = match only {
                None => true,
                Some(ExtremumKind::Max) => direction == Direction::Falling,
                Some(ExtremumKind::Min) => direction == Direction::Rising,
            };
            if wanted {
                match bisect_zero(t_prev, d_prev, t_curr, config, &d)? {
                    Refined::Converged(jd) => outcome.events.push(RawEvent {
                        jd_utc: jd,
                        value: f(jd)?,
                        bracket: (t_prev, t_curr),
                        direction,
                    }),
                    Refined::Failed { width_days } => outcome.failures.push(RefineFailure {
                        bracket: (t_prev, t_curr),
                        width_days,
                    }),
                }
            }
        }

        if t_curr >= window.end_jd {
            break;
        }
        t_prev = t_curr;
        d_prev = d_curr;
    }

    dedupe_same_minute(&mut outcome.events);
    Ok(outcome)
}

/// Deterministic tie-break: when two refined instants land in the same
/// minute, the earlier bracket wins. The scan is sequential, so this is
/// stable across runs.
fn dedupe_same_minute(events: &mut Vec<RawEvent>) {
    events.dedup_by(|next, kept| minute_index(next.jd_utc) == minute_index(kept.jd_utc));
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrocal_time::J2000_JD;

    fn cfg() -> LocateConfig {
        LocateConfig::default()
    }

    fn window(len_days: f64, step: f64) -> SearchWindow {
        SearchWindow::new(J2000_JD, J2000_JD + len_days, step)
    }

    #[test]
    fn wrap_pm_reduces_to_half_interval() {
        assert!((wrap_pm(359.0, 360.0) - (-1.0)).abs() < 1e-12);
        assert!((wrap_pm(181.0, 360.0) - (-179.0)).abs() < 1e-12);
        assert!((wrap_pm(29.9, 30.0) - (-0.1)).abs() < 1e-9);
        assert!((wrap_pm(-1.0, 30.0) - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn genuine_crossing_rejects_wrap_seam() {
        assert!(is_genuine_crossing(5.0, -3.0, Some(360.0)));
        assert!(!is_genuine_crossing(170.0, -170.0, Some(360.0)));
        assert!(is_genuine_crossing(-1.0, 1.0, None));
    }

    #[test]
    fn cosine_zero_found_within_minute() {
        // cos with a 30-day period crosses zero at 7.5 and 22.5 days.
        let f = |t: f64| -> Result<f64, SearchError> {
            Ok(((t - J2000_JD) * std::f64::consts::TAU / 30.0).cos())
        };
        let out = locate(&f, &ConditionSpec::zero_crossing(), &window(20.0, 1.0), &cfg()).unwrap();
        assert_eq!(out.events.len(), 1);
        let ev = &out.events[0];
        assert!((ev.jd_utc - (J2000_JD + 7.5)).abs() < MINUTE_DAYS);
        assert_eq!(ev.direction, Direction::Falling);
        assert!(out.failures.is_empty());
    }

    #[test]
    fn threshold_crossing_direction() {
        let f = |t: f64| -> Result<f64, SearchError> { Ok(t - J2000_JD) };
        let spec = ConditionSpec::threshold(5.0);
        let out = locate(&f, &spec, &window(10.0, 1.0), &cfg()).unwrap();
        assert_eq!(out.events.len(), 1);
        assert!((out.events[0].jd_utc - (J2000_JD + 5.0)).abs() < MINUTE_DAYS);
        assert_eq!(out.events[0].direction, Direction::Rising);
        assert!((out.events[0].value - 5.0).abs() < 1e-3);
    }

    #[test]
    fn wrap_boundary_counted_once() {
        // Longitude advancing 1°/day crosses 0° once as it wraps 359.x → 0.x.
        let f =
            |t: f64| -> Result<f64, SearchError> { Ok((350.3 + (t - J2000_JD)).rem_euclid(360.0)) };
        let spec = ConditionSpec::zero_crossing().with_wrap(360.0);
        let out = locate(&f, &spec, &window(20.0, 1.0), &cfg()).unwrap();
        assert_eq!(out.events.len(), 1);
        assert!((out.events[0].jd_utc - (J2000_JD + 9.7)).abs() < MINUTE_DAYS);
        assert_eq!(out.events[0].direction, Direction::Rising);
    }

    #[test]
    fn monotonic_function_yields_empty() {
        // Strictly increasing, never reaches the threshold: circumpolar case.
        let f = |t: f64| -> Result<f64, SearchError> { Ok(100.0 + (t - J2000_JD) * 0.01) };
        let out = locate(&f, &ConditionSpec::threshold(0.0), &window(30.0, 1.0), &cfg()).unwrap();
        assert!(out.events.is_empty());
        assert!(out.failures.is_empty());
    }

    #[test]
    fn extremum_max_of_sine() {
        // Max of sin(2π t / 30) at t = 7.5 days.
        let f = |t: f64| -> Result<f64, SearchError> {
            Ok(((t - J2000_JD) * std::f64::consts::TAU / 30.0).sin())
        };
        let spec = ConditionSpec::extremum(ExtremumKind::Max);
        let out = locate(&f, &spec, &window(14.0, 0.5), &cfg()).unwrap();
        assert_eq!(out.events.len(), 1);
        // Forward-difference proxy shifts the root by ~h/2.
        assert!((out.events[0].jd_utc - (J2000_JD + 7.5)).abs() < 0.02);
        assert_eq!(out.events[0].direction, Direction::Falling);
    }

    #[test]
    fn extremum_min_ignores_maxima() {
        let f = |t: f64| -> Result<f64, SearchError> {
            Ok(((t - J2000_JD) * std::f64::consts::TAU / 30.0).sin())
        };
        let spec = ConditionSpec::extremum(ExtremumKind::Min);
        let out = locate(&f, &spec, &window(30.0, 0.5), &cfg()).unwrap();
        assert_eq!(out.events.len(), 1);
        assert!((out.events[0].jd_utc - (J2000_JD + 22.5)).abs() < 0.02);
    }

    #[test]
    fn derivative_sign_change_finds_both() {
        let f = |t: f64| -> Result<f64, SearchError> {
            Ok(((t - J2000_JD) * std::f64::consts::TAU / 30.0).sin())
        };
        let spec = ConditionSpec::derivative_sign_change();
        let out = locate(&f, &spec, &window(30.0, 0.5), &cfg()).unwrap();
        assert_eq!(out.events.len(), 2);
        assert_eq!(out.events[0].direction, Direction::Falling);
        assert_eq!(out.events[1].direction, Direction::Rising);
    }

    #[test]
    fn multiple_brackets_ascend() {
        let f = |t: f64| -> Result<f64, SearchError> {
            Ok(((t - J2000_JD - 0.25) * std::f64::consts::TAU / 10.0).sin())
        };
        let out = locate(&f, &ConditionSpec::zero_crossing(), &window(30.0, 0.5), &cfg()).unwrap();
        assert!(out.events.len() >= 5);
        for pair in out.events.windows(2) {
            assert!(pair[0].jd_utc < pair[1].jd_utc);
        }
    }

    #[test]
    fn capped_iterations_report_failure_and_continue() {
        // Zeros at 0.5, 5.5, and 10.5 days.
        let f = |t: f64| -> Result<f64, SearchError> {
            Ok(((t - J2000_JD - 0.5) * std::f64::consts::TAU / 10.0).sin())
        };
        let tight = LocateConfig {
            max_iterations: 2,
            ..LocateConfig::default()
        };
        let out = locate(&f, &ConditionSpec::zero_crossing(), &window(12.0, 1.0), &tight).unwrap();
        // A 1-day bracket halved twice is still 6 hours wide: every
        // bracket fails, none silently misreports.
        assert!(out.events.is_empty());
        assert_eq!(out.failures.len(), 3);
        assert!(out.failures[0].width_days > MINUTE_DAYS);
    }

    #[test]
    fn same_minute_collapses_to_earlier_bracket() {
        let mut events = vec![
            RawEvent {
                jd_utc: J2000_JD + 0.5,
                value: 0.0,
                bracket: (J2000_JD, J2000_JD + 1.0),
                direction: Direction::Rising,
            },
            RawEvent {
                jd_utc: J2000_JD + 0.5 + 0.3 * MINUTE_DAYS,
                value: 0.0,
                bracket: (J2000_JD + 1.0, J2000_JD + 2.0),
                direction: Direction::Falling,
            },
        ];
        dedupe_same_minute(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].bracket.0, J2000_JD);
    }

    #[test]
    fn invalid_window_rejected() {
        let f = |_t: f64| -> Result<f64, SearchError> { Ok(0.0) };
        let bad = SearchWindow::new(J2000_JD, J2000_JD - 1.0, 1.0);
        let err = locate(&f, &ConditionSpec::zero_crossing(), &bad, &cfg()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn invalid_wrap_rejected() {
        let f = |_t: f64| -> Result<f64, SearchError> { Ok(0.0) };
        let spec = ConditionSpec::zero_crossing().with_wrap(0.0);
        let err = locate(&f, &spec, &window(1.0, 0.5), &cfg()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn provider_error_propagates() {
        let f = |t: f64| -> Result<f64, SearchError> {
            if t > J2000_JD + 2.0 {
                Err(SearchError::Provider(
                    astrocal_ephem::ProviderError::EpochOutOfRange { jd_utc: t },
                ))
            } else {
                Ok(1.0)
            }
        };
        let err = locate(&f, &ConditionSpec::zero_crossing(), &window(10.0, 1.0), &cfg());
        assert!(matches!(err, Err(SearchError::Provider(_))));
    }
}
