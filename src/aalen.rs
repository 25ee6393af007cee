//! aalen additive hazards fitter
//!
//! the hazard of subject i at time t is `x_i(t) . b(t)`. at every observed event
//! time the increment of the cumulative coefficients B(t) is a penalized
//! least-squares fit of the event indicators on the covariates of the risk set:
//!
//! ```text
//! (X'X + (c + s) I) dB = X' dN + s dB_prev
//! ```
//!
//! w/ `c` the coefficient penalizer and `s` the smoothing penalizer, which pulls
//! each increment towards the previous one.

use std::collections::BTreeMap;

use log::Level;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::{
    error::{Result, SurvivalError},
    frame::Frame,
    linalg,
    options::{expect_bool, FitOptions},
    stats,
};

/// name of the intercept column in the cumulative coefficients
pub const BASELINE_COLUMN: &str = "baseline";

/// what to fit against: column roles + extras
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AalenFitParams {
    pub duration_col: String,
    pub event_col: Option<String>,
    pub timeline: Option<Vec<f64>>, // times to report B(t) & predictions on
    pub id_col: Option<String>,     // groups rows into subjects
    pub options: FitOptions,
}

impl AalenFitParams {
    pub fn new(duration_col: impl Into<String>) -> Self {
        Self {
            duration_col: duration_col.into(),
            ..Default::default()
        }
    }

    pub fn with_event_col(mut self, event_col: impl Into<String>) -> Self {
        self.event_col = Some(event_col.into());
        self
    }

    pub fn with_timeline(mut self, timeline: Vec<f64>) -> Self {
        self.timeline = Some(timeline);
        self
    }

    pub fn with_id_col(mut self, id_col: impl Into<String>) -> Self {
        self.id_col = Some(id_col.into());
        self
    }

    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }
}

/// one subject: covariates piecewise constant over intervals ending at each row's duration
#[derive(Debug, Clone)]
struct Subject {
    exit: f64,
    event: bool,
    intervals: Vec<(f64, Array1<f64>)>, // (interval end, covariates), sorted by end
}

impl Subject {
    /// covariates in effect at `t`, for t <= exit
    fn covariates_at(&self, t: f64) -> ArrayView1<'_, f64> {
        let k = self
            .intervals
            .partition_point(|(end, _)| *end < t)
            .min(self.intervals.len() - 1);
        self.intervals[k].1.view()
    }
}

#[derive(Debug, Clone)]
struct AalenFit {
    covariate_names: Vec<String>,           // w/o the intercept
    timeline: Vec<f64>,
    cumulative_coefficients: Array2<f64>,   // timeline x coefficients
    cumulative_variance: Array2<f64>,       // timeline x coefficients
}

/// aalen additive hazards fitter
#[derive(Debug, Clone)]
pub struct AalenAdditiveFitter {
    fit_intercept: bool,
    alpha: f64,               // confidence level for the bands
    coef_penalizer: f64,      // ridge on each increment
    smoothing_penalizer: f64, // ridge towards the previous increment
    fit: Option<AalenFit>,
}

impl Default for AalenAdditiveFitter {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            alpha: 0.95,
            coef_penalizer: 0.5,
            smoothing_penalizer: 0.0,
            fit: None,
        }
    }
}

impl AalenAdditiveFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_coef_penalizer(mut self, coef_penalizer: f64) -> Self {
        self.coef_penalizer = coef_penalizer;
        self
    }

    pub fn with_smoothing_penalizer(mut self, smoothing_penalizer: f64) -> Self {
        self.smoothing_penalizer = smoothing_penalizer;
        self
    }

    pub fn fit(&mut self, frame: &Frame, params: &AalenFitParams) -> Result<&mut Self> {
        let mut progress_level = Level::Debug;
        for (name, value) in params.options.iter() {
            match name {
                "show_progress" => {
                    if expect_bool(name, value)? {
                        progress_level = Level::Info;
                    }
                }
                _ => return Err(SurvivalError::unrecognized_option(name)),
            }
        }

        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(SurvivalError::invalid_parameter("alpha", self.alpha.to_string()));
        }
        for (name, value) in [
            ("coef_penalizer", self.coef_penalizer),
            ("smoothing_penalizer", self.smoothing_penalizer),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SurvivalError::invalid_parameter(name, value.to_string()));
            }
        }

        let (covariate_names, subjects) = build_subjects(frame, params)?;
        if subjects.is_empty() {
            return Err(SurvivalError::invalid_survival_data("no observations to fit"));
        }
        if self.fit_intercept && covariate_names.iter().any(|n| n == BASELINE_COLUMN) {
            return Err(SurvivalError::duplicate_column(BASELINE_COLUMN));
        }

        let timeline = match &params.timeline {
            Some(timeline) => {
                if timeline.iter().any(|t| !t.is_finite() || *t < 0.0) {
                    return Err(SurvivalError::invalid_parameter(
                        "timeline",
                        "times must be non-negative & finite",
                    ));
                }
                sorted_unique(timeline.clone())
            }
            None => sorted_unique(subjects.iter().map(|s| s.exit).collect()),
        };

        let event_times = sorted_unique(
            subjects
                .iter()
                .filter(|s| s.event)
                .map(|s| s.exit)
                .collect(),
        );

        let n_coef = covariate_names.len() + usize::from(self.fit_intercept);
        let mut increments = Vec::with_capacity(event_times.len());
        let mut previous = Array1::zeros(n_coef);

        for (k, &t) in event_times.iter().enumerate() {
            let (increment, variance) = self.increment_at(&subjects, t, &previous)?;
            if k % (event_times.len() / 10).max(1) == 0 {
                log::log!(
                    progress_level,
                    "aalen: event time {}/{} (t = {t})",
                    k + 1,
                    event_times.len()
                );
            }
            previous = increment.clone();
            increments.push((t, increment, variance));
        }

        // cumulative sums, read off on the timeline as a step function
        let mut cumulative_coefficients = Array2::zeros((timeline.len(), n_coef));
        let mut cumulative_variance = Array2::zeros((timeline.len(), n_coef));
        let mut running_coef = Array1::<f64>::zeros(n_coef);
        let mut running_var = Array1::<f64>::zeros(n_coef);
        let mut next = 0;
        for (row, &t) in timeline.iter().enumerate() {
            while next < increments.len() && increments[next].0 <= t {
                running_coef += &increments[next].1;
                running_var += &increments[next].2;
                next += 1;
            }
            cumulative_coefficients.row_mut(row).assign(&running_coef);
            cumulative_variance.row_mut(row).assign(&running_var);
        }

        log::debug!(
            "aalen fit: {} subjects, {} coefficients, {} event times, {} timeline points",
            subjects.len(),
            n_coef,
            event_times.len(),
            timeline.len()
        );

        self.fit = Some(AalenFit {
            covariate_names,
            timeline,
            cumulative_coefficients,
            cumulative_variance,
        });

        Ok(self)
    }

    /// coefficient increment + its variance contribution at one event time
    fn increment_at(
        &self,
        subjects: &[Subject],
        t: f64,
        previous: &Array1<f64>,
    ) -> Result<(Array1<f64>, Array1<f64>)> {
        let at_risk: Vec<&Subject> = subjects.iter().filter(|s| s.exit >= t).collect();
        let n_coef = previous.len();

        let mut x = Array2::zeros((at_risk.len(), n_coef));
        for (i, subject) in at_risk.iter().enumerate() {
            let covariates = subject.covariates_at(t);
            for (j, &v) in covariates.iter().enumerate() {
                x[[i, j]] = v;
            }
            if self.fit_intercept {
                x[[i, n_coef - 1]] = 1.0;
            }
        }
        let dn: Array1<f64> = at_risk
            .iter()
            .map(|s| if s.event && s.exit == t { 1.0 } else { 0.0 })
            .collect();

        if at_risk.len() < n_coef {
            log::warn!(
                "aalen: risk set at t = {t} has {} subjects for {n_coef} coefficients, estimate leans on the penalizers",
                at_risk.len()
            );
        }

        let mut gram = x.t().dot(&x);
        let ridge = self.coef_penalizer + self.smoothing_penalizer;
        for j in 0..n_coef {
            gram[[j, j]] += ridge;
        }
        let rhs = x.t().dot(&dn) + self.smoothing_penalizer * previous;

        let singular = |_| {
            SurvivalError::numerical_error(format!(
                "risk set design at t = {t} is singular - try a positive coef_penalizer"
            ))
        };
        let increment = linalg::solve(&gram, &rhs).map_err(singular)?;

        // sum of squared influence of each event on the increment
        let mut variance = Array1::zeros(n_coef);
        for (i, &d) in dn.iter().enumerate() {
            if d == 0.0 {
                continue;
            }
            let influence = linalg::solve(&gram, &x.row(i).to_owned()).map_err(singular)?;
            variance += &influence.mapv(|v| v * v);
        }

        Ok((increment, variance))
    }

    fn fitted(&self) -> Result<&AalenFit> {
        self.fit.as_ref().ok_or(SurvivalError::ModelNotFitted)
    }

    pub fn is_fitted(&self) -> bool {
        self.fit.is_some()
    }

    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn coef_penalizer(&self) -> f64 {
        self.coef_penalizer
    }

    pub fn smoothing_penalizer(&self) -> f64 {
        self.smoothing_penalizer
    }

    /// times the cumulative coefficients are reported on
    pub fn timeline(&self) -> Result<&[f64]> {
        Ok(&self.fitted()?.timeline)
    }

    /// names of the cumulative coefficient columns, intercept last
    pub fn coefficient_names(&self) -> Result<Vec<String>> {
        let fit = self.fitted()?;
        let mut names = fit.covariate_names.clone();
        if self.fit_intercept {
            names.push(BASELINE_COLUMN.to_string());
        }
        Ok(names)
    }

    /// B(t) on the timeline (rows) per coefficient (columns)
    pub fn cumulative_coefficients(&self) -> Result<ArrayView2<'_, f64>> {
        Ok(self.fitted()?.cumulative_coefficients.view())
    }

    /// pointwise `alpha`-level bands around B(t): (lower, upper)
    pub fn confidence_intervals(&self) -> Result<(Array2<f64>, Array2<f64>)> {
        let fit = self.fitted()?;
        let half_width = fit.cumulative_variance.mapv(f64::sqrt) * stats::z_critical(self.alpha);
        Ok((
            &fit.cumulative_coefficients - &half_width,
            &fit.cumulative_coefficients + &half_width,
        ))
    }

    /// covariates of `frame` picked by name, plus the intercept column
    fn design(&self, frame: &Frame) -> Result<Array2<f64>> {
        let fit = self.fitted()?;
        let x = frame.select(&fit.covariate_names)?.values().to_owned();
        if !self.fit_intercept {
            return Ok(x);
        }
        let p = x.ncols();
        Ok(Array2::from_shape_fn((x.nrows(), p + 1), |(i, j)| {
            if j < p { x[[i, j]] } else { 1.0 }
        }))
    }

    /// cumulative hazard per row (rows) on the timeline (columns)
    pub fn predict_cumulative_hazard(&self, frame: &Frame) -> Result<Array2<f64>> {
        let fit = self.fitted()?;
        Ok(self.design(frame)?.dot(&fit.cumulative_coefficients.t()))
    }

    /// survival per row (rows) on the timeline (columns), clamped to [0, 1]
    pub fn predict_survival_function(&self, frame: &Frame) -> Result<Array2<f64>> {
        Ok(self
            .predict_cumulative_hazard(frame)?
            .mapv(|h| (-h).exp().clamp(0.0, 1.0)))
    }

    /// expected lifetime per row: area under the survival curve up to the end of the timeline
    ///
    /// left-step integral from t = 0, so it sits slightly above a trapezoid
    /// integral that starts at the first observed time
    pub fn predict_expectation(&self, frame: &Frame) -> Result<Array1<f64>> {
        let fit = self.fitted()?;
        let survival = self.predict_survival_function(frame)?;

        Ok(survival
            .axis_iter(Axis(0))
            .map(|row| {
                let mut area = 0.0;
                let mut prev_time = 0.0;
                let mut prev_surv = 1.0;
                for (&t, &s) in fit.timeline.iter().zip(row.iter()) {
                    area += prev_surv * (t - prev_time);
                    prev_time = t;
                    prev_surv = s;
                }
                area
            })
            .collect())
    }
}

fn sorted_unique(mut times: Vec<f64>) -> Vec<f64> {
    times.sort_by(f64::total_cmp);
    times.dedup();
    times
}

/// covariate names + one subject per row, or per id when an id column is given
fn build_subjects(frame: &Frame, params: &AalenFitParams) -> Result<(Vec<String>, Vec<Subject>)> {
    let durations = frame.column(&params.duration_col)?;
    if durations.iter().any(|t| !t.is_finite() || *t < 0.0) {
        return Err(SurvivalError::invalid_survival_data(
            "survival times must be non-negative & finite",
        ));
    }

    let events: Vec<bool> = match &params.event_col {
        Some(col) => frame.column(col)?.iter().map(|&e| !e.is_nan() && e != 0.0).collect(),
        None => vec![true; frame.n_rows()],
    };
    let ids = params.id_col.as_deref().map(|col| frame.column(col)).transpose()?;

    let mut dropped = vec![params.duration_col.as_str()];
    dropped.extend(params.event_col.as_deref());
    dropped.extend(params.id_col.as_deref());
    let covariates = frame.drop(&dropped);
    if covariates.values().iter().any(|x| !x.is_finite()) {
        return Err(SurvivalError::invalid_survival_data(
            "covariates contain NaN or infinite values",
        ));
    }

    // rows per subject, subjects in order of first appearance
    let mut groups: Vec<Vec<usize>> = Vec::new();
    match ids {
        None => groups.extend((0..frame.n_rows()).map(|i| vec![i])),
        Some(ids) => {
            let mut lookup: BTreeMap<u64, usize> = BTreeMap::new();
            for (i, id) in ids.iter().enumerate() {
                if id.is_nan() {
                    return Err(SurvivalError::invalid_survival_data(format!("row {i} has no id")));
                }
                let next = groups.len();
                let g = *lookup.entry(id.to_bits()).or_insert(next);
                if g == next {
                    groups.push(Vec::new());
                }
                groups[g].push(i);
            }
        }
    }

    let values = covariates.values();
    let subjects = groups
        .into_iter()
        .map(|mut rows| {
            rows.sort_by(|&a, &b| durations[a].total_cmp(&durations[b]));
            let last = rows[rows.len() - 1];
            Subject {
                exit: durations[last],
                event: events[last],
                intervals: rows
                    .iter()
                    .map(|&i| (durations[i], values.row(i).to_owned()))
                    .collect(),
            }
        })
        .collect();

    Ok((covariates.column_names().to_vec(), subjects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_frame() -> Frame {
        Frame::from_columns(vec![
            ("x", vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]),
            ("T", vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0]),
            ("E", vec![1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_not_fitted() {
        let aaf = AalenAdditiveFitter::new();
        assert!(!aaf.is_fitted());
        assert_eq!(aaf.timeline().unwrap_err(), SurvivalError::ModelNotFitted);
        assert!(aaf.predict_expectation(&create_test_frame()).is_err());
    }

    #[test]
    fn test_intercept_only_matches_penalized_nelson_aalen() {
        // no covariates: each increment is d / (n_at_risk + c)
        let frame = Frame::from_columns(vec![("T", vec![1.0, 2.0, 3.0, 4.0])]).unwrap();
        let mut aaf = AalenAdditiveFitter::new().with_coef_penalizer(0.5);
        aaf.fit(&frame, &AalenFitParams::new("T")).unwrap();

        assert_eq!(aaf.coefficient_names().unwrap(), vec!["baseline".to_string()]);
        let b = aaf.cumulative_coefficients().unwrap();
        assert_relative_eq!(b[[0, 0]], 1.0 / 4.5, epsilon = 1e-12);
        assert_relative_eq!(
            b[[3, 0]],
            1.0 / 4.5 + 1.0 / 3.5 + 1.0 / 2.5 + 1.0 / 1.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_fit_and_predict() {
        let mut aaf = AalenAdditiveFitter::new();
        aaf.fit(&create_test_frame(), &AalenFitParams::new("T").with_event_col("E"))
            .unwrap();

        assert_eq!(aaf.coefficient_names().unwrap(), vec!["x".to_string(), "baseline".to_string()]);
        assert_eq!(aaf.timeline().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let expectations = aaf.predict_expectation(&create_test_frame()).unwrap();
        assert_eq!(expectations.len(), 8);
        assert!(expectations.iter().all(|&e| e.is_finite() && e >= 0.0 && e <= 8.0));
        // survival is 1 on [0, 1) before the first event time
        assert!(expectations.iter().all(|&e| e >= 1.0));

        let surv = aaf.predict_survival_function(&create_test_frame()).unwrap();
        assert!(surv.iter().all(|&s| (0.0..=1.0).contains(&s)));
    }

    #[test]
    fn test_censored_times_carry_coefficients_forward() {
        let mut aaf = AalenAdditiveFitter::new();
        aaf.fit(&create_test_frame(), &AalenFitParams::new("T").with_event_col("E"))
            .unwrap();
        let b = aaf.cumulative_coefficients().unwrap();
        // t = 4 is censored only, so B(4) == B(3)
        assert_eq!(b.row(3), b.row(2));
    }

    #[test]
    fn test_explicit_timeline() {
        let mut aaf = AalenAdditiveFitter::new();
        aaf.fit(
            &create_test_frame(),
            &AalenFitParams::new("T").with_event_col("E").with_timeline(vec![5.0, 0.5, 2.5, 5.0]),
        )
        .unwrap();

        assert_eq!(aaf.timeline().unwrap(), &[0.5, 2.5, 5.0]);
        let b = aaf.cumulative_coefficients().unwrap();
        assert_eq!(b.nrows(), 3);
        // nothing has happened by t = 0.5
        assert!(b.row(0).iter().all(|&v| v == 0.0));

        let bad = AalenFitParams::new("T").with_timeline(vec![f64::NAN]);
        assert!(matches!(
            AalenAdditiveFitter::new().fit(&create_test_frame(), &bad),
            Err(SurvivalError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_unique_ids_match_plain_fit() {
        let frame = create_test_frame()
            .with_column("id", ndarray::array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0].view())
            .unwrap();

        let mut plain = AalenAdditiveFitter::new();
        plain.fit(&create_test_frame(), &AalenFitParams::new("T").with_event_col("E"))
            .unwrap();
        let mut with_ids = AalenAdditiveFitter::new();
        with_ids
            .fit(&frame, &AalenFitParams::new("T").with_event_col("E").with_id_col("id"))
            .unwrap();

        // id column is not a covariate
        assert_eq!(with_ids.coefficient_names().unwrap(), plain.coefficient_names().unwrap());
        assert_eq!(
            with_ids.cumulative_coefficients().unwrap(),
            plain.cumulative_coefficients().unwrap()
        );
    }

    #[test]
    fn test_long_format_subjects() {
        // subject 1 switches x from 0 to 1 at t = 2 and dies at t = 4
        let frame = Frame::from_columns(vec![
            ("id", vec![1.0, 1.0, 2.0, 3.0]),
            ("x", vec![0.0, 1.0, 0.0, 1.0]),
            ("T", vec![2.0, 4.0, 3.0, 5.0]),
            ("E", vec![0.0, 1.0, 1.0, 0.0]),
        ])
        .unwrap();

        let mut aaf = AalenAdditiveFitter::new();
        aaf.fit(&frame, &AalenFitParams::new("T").with_event_col("E").with_id_col("id"))
            .unwrap();

        // three subjects leave at 3, 4, 5 - the interval row at t = 2 is not an exit
        assert_eq!(aaf.timeline().unwrap(), &[3.0, 4.0, 5.0]);

        let subject = Subject {
            exit: 4.0,
            event: true,
            intervals: vec![(2.0, ndarray::array![0.0]), (4.0, ndarray::array![1.0])],
        };
        assert_eq!(subject.covariates_at(1.0)[0], 0.0);
        assert_eq!(subject.covariates_at(2.0)[0], 0.0);
        assert_eq!(subject.covariates_at(3.0)[0], 1.0);
        assert_eq!(subject.covariates_at(4.0)[0], 1.0);
    }

    #[test]
    fn test_smoothing_penalizer_changes_fit() {
        let params = AalenFitParams::new("T").with_event_col("E");
        let mut rough = AalenAdditiveFitter::new();
        let mut smooth = AalenAdditiveFitter::new().with_smoothing_penalizer(5.0);
        rough.fit(&create_test_frame(), &params).unwrap();
        smooth.fit(&create_test_frame(), &params).unwrap();

        assert_ne!(
            rough.cumulative_coefficients().unwrap(),
            smooth.cumulative_coefficients().unwrap()
        );
    }

    #[test]
    fn test_without_intercept() {
        let mut aaf = AalenAdditiveFitter::new().with_fit_intercept(false);
        aaf.fit(&create_test_frame(), &AalenFitParams::new("T").with_event_col("E"))
            .unwrap();
        assert_eq!(aaf.coefficient_names().unwrap(), vec!["x".to_string()]);

        // x = 0 rows have zero hazard w/o an intercept
        let surv = aaf.predict_survival_function(&create_test_frame()).unwrap();
        assert!(surv.row(0).iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_confidence_intervals() {
        let mut aaf = AalenAdditiveFitter::new();
        aaf.fit(&create_test_frame(), &AalenFitParams::new("T").with_event_col("E"))
            .unwrap();

        let b = aaf.cumulative_coefficients().unwrap().to_owned();
        let (lower, upper) = aaf.confidence_intervals().unwrap();
        assert_eq!(lower.dim(), b.dim());
        for ((&lo, &hi), &mid) in lower.iter().zip(upper.iter()).zip(b.iter()) {
            assert!(lo <= mid && mid <= hi);
        }
        // the first event adds variance to the intercept
        assert!(upper[[0, 1]] > lower[[0, 1]]);
    }

    #[test]
    fn test_invalid_inputs() {
        let frame = create_test_frame();
        let params = AalenFitParams::new("T");

        assert!(AalenAdditiveFitter::new().with_alpha(0.0).fit(&frame, &params).is_err());
        assert!(AalenAdditiveFitter::new().with_coef_penalizer(-0.1).fit(&frame, &params).is_err());

        let unknown =
            AalenFitParams::new("T").with_options(FitOptions::new().with("max_steps", 10));
        assert_eq!(
            AalenAdditiveFitter::new().fit(&frame, &unknown).unwrap_err(),
            SurvivalError::unrecognized_option("max_steps")
        );

        assert_eq!(
            AalenAdditiveFitter::new().fit(&frame, &AalenFitParams::new("duration")).unwrap_err(),
            SurvivalError::column_not_found("duration")
        );

        let baseline = ndarray::array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let clash = frame.with_column("baseline", baseline.view()).unwrap();
        assert_eq!(
            AalenAdditiveFitter::new().fit(&clash, &params).unwrap_err(),
            SurvivalError::duplicate_column("baseline")
        );
    }
}
