//! cox proportional hazards fitter
//!
//! maximizes the L2-penalized partial likelihood by newton-raphson on
//! standardized covariates, w/ efron or breslow handling of tied event times and
//! optional stratification. the baseline cumulative hazard is the breslow
//! estimator, one per stratum.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::Level;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{
    data::SurvivalData,
    error::{Result, SurvivalError},
    frame::Frame,
    linalg,
    options::{expect_bool, expect_f64, expect_usize, FitOptions},
    stats,
};

/// how tied event times enter the partial likelihood
///
/// deserializes through `FromStr`, so config files accept any case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TieMethod {
    #[default]
    Efron,
    Breslow,
}

impl FromStr for TieMethod {
    type Err = SurvivalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "efron" => Ok(Self::Efron),
            "breslow" => Ok(Self::Breslow),
            _ => Err(SurvivalError::invalid_parameter("tie_method", s)),
        }
    }
}

impl TryFrom<String> for TieMethod {
    type Error = SurvivalError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for TieMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Efron => f.write_str("Efron"),
            Self::Breslow => f.write_str("Breslow"),
        }
    }
}

/// what to fit against: column roles + solver extras
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoxFitParams {
    pub duration_col: String,
    pub event_col: Option<String>,
    pub initial_beta: Option<Vec<f64>>, // starting coefficients, original covariate scale
    pub strata: Option<Vec<String>>,
    pub options: FitOptions,
}

impl CoxFitParams {
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

    pub fn with_initial_beta(mut self, initial_beta: Vec<f64>) -> Self {
        self.initial_beta = Some(initial_beta);
        self
    }

    pub fn with_strata(mut self, strata: Vec<String>) -> Self {
        self.strata = Some(strata);
        self
    }

    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }
}

/// newton-raphson knobs, overridable through fit options
#[derive(Debug, Clone, Copy)]
struct SolverSettings {
    max_iterations: usize,
    tolerance: f64,
    step_size: f64,
    progress_level: Level,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-7,
            step_size: 0.95,
            progress_level: Level::Debug,
        }
    }
}

impl SolverSettings {
    fn from_options(options: &FitOptions) -> Result<Self> {
        let mut settings = Self::default();

        for (name, value) in options.iter() {
            match name {
                "max_iterations" | "max_steps" => {
                    settings.max_iterations = expect_usize(name, value)?
                }
                "tolerance" | "precision" => settings.tolerance = expect_f64(name, value)?,
                "step_size" => settings.step_size = expect_f64(name, value)?,
                "show_progress" => {
                    if expect_bool(name, value)? {
                        settings.progress_level = Level::Info;
                    }
                }
                _ => return Err(SurvivalError::unrecognized_option(name)),
            }
        }

        if settings.max_iterations == 0 {
            return Err(SurvivalError::invalid_parameter("max_iterations", "0"));
        }
        if !(settings.tolerance > 0.0) {
            return Err(SurvivalError::invalid_parameter(
                "tolerance",
                settings.tolerance.to_string(),
            ));
        }
        if !(settings.step_size > 0.0 && settings.step_size <= 1.0) {
            return Err(SurvivalError::invalid_parameter(
                "step_size",
                settings.step_size.to_string(),
            ));
        }

        Ok(settings)
    }
}

/// breslow baseline cumulative hazard for one stratum
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineHazard {
    pub stratum: Vec<f64>,            // strata column values, empty w/o strata
    pub times: Vec<f64>,              // unique durations in the stratum, ascending
    pub cumulative_hazard: Vec<f64>,  // H0 at each of `times`
}

impl BaselineHazard {
    /// H0(t) as a right-continuous step function, 0 before the first time
    fn at(&self, t: f64) -> f64 {
        match self.times.partition_point(|&bt| bt <= t) {
            0 => 0.0,
            k => self.cumulative_hazard[k - 1],
        }
    }

    /// area under exp(-H0(t) * partial_hazard) from 0 to the last time
    fn expected_lifetime(&self, partial_hazard: f64) -> f64 {
        let mut area = 0.0;
        let mut prev_time = 0.0;
        let mut prev_surv = 1.0;
        for (&t, &h) in self.times.iter().zip(&self.cumulative_hazard) {
            area += prev_surv * (t - prev_time);
            prev_time = t;
            prev_surv = (-h * partial_hazard).exp();
        }
        area
    }
}

#[derive(Debug, Clone)]
struct CoxFit {
    covariate_names: Vec<String>,
    means: Array1<f64>,
    stds: Array1<f64>,
    beta: Array1<f64>,            // standardized scale
    coefficients: Array1<f64>,    // original scale
    standard_errors: Array1<f64>, // original scale
    log_likelihood: f64,
    n_iterations: usize,
    strata: Option<Vec<String>>,
    baselines: Vec<BaselineHazard>,
    stratum_lookup: BTreeMap<Vec<u64>, usize>,
}

/// cox proportional hazards fitter
#[derive(Debug, Clone)]
pub struct CoxPhFitter {
    alpha: f64,            // confidence level for intervals
    tie_method: TieMethod,
    penalizer: f64,        // ridge coefficient
    fit: Option<CoxFit>,
}

impl Default for CoxPhFitter {
    fn default() -> Self {
        Self {
            alpha: 0.95,
            tie_method: TieMethod::Efron,
            penalizer: 0.0,
            fit: None,
        }
    }
}

impl CoxPhFitter {
    /// new fitter w/ defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// confidence level used for coefficient intervals
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_tie_method(mut self, tie_method: TieMethod) -> Self {
        self.tie_method = tie_method;
        self
    }

    /// ridge penalty - shrinks coefficients
    pub fn with_penalizer(mut self, penalizer: f64) -> Self {
        self.penalizer = penalizer;
        self
    }

    /// fit the model to a table - this does the actual work
    pub fn fit(&mut self, frame: &Frame, params: &CoxFitParams) -> Result<&mut Self> {
        let settings = SolverSettings::from_options(&params.options)?;

        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(SurvivalError::invalid_parameter("alpha", self.alpha.to_string()));
        }
        if !(self.penalizer >= 0.0 && self.penalizer.is_finite()) {
            return Err(SurvivalError::invalid_parameter("penalizer", self.penalizer.to_string()));
        }

        let strata_cols = params.strata.clone().unwrap_or_default();
        let mut data = SurvivalData::from_frame(
            frame,
            &params.duration_col,
            params.event_col.as_deref(),
            &strata_cols,
        )?;

        if data.n_samples() == 0 {
            return Err(SurvivalError::invalid_survival_data("no observations to fit"));
        }

        let (strata_keys, stratum_values) = stratum_assignments(frame, &strata_cols)?;
        let groups = group_rows(&strata_keys, stratum_values.len());

        let (means, stds) = data.standardize_covariates()?;

        let mut beta = match &params.initial_beta {
            Some(initial) if initial.len() != data.n_features() => {
                return Err(SurvivalError::invalid_dimensions(format!(
                    "initial_beta has {} values for {} covariates",
                    initial.len(),
                    data.n_features()
                )));
            }
            Some(initial) => Array1::from(initial.clone()) * &stds,
            None => Array1::zeros(data.n_features()),
        };

        let n_iterations = self.newton_raphson(&data, &groups, &mut beta, &settings)?;

        let (ll, _, hessian) = self.penalized_derivatives(&data, &groups, &beta)?;
        let information = hessian.mapv(|h| -h);
        let covariance = linalg::invert(&information)?;
        let standard_errors = covariance.diag().mapv(|v| v.max(0.0).sqrt()) / &stds;
        let coefficients = &beta / &stds;

        let baselines = stratum_values
            .into_iter()
            .zip(&groups)
            .map(|(stratum, rows)| breslow_baseline(&data, rows, &beta, stratum))
            .collect::<Result<Vec<_>>>()?;

        let stratum_lookup = baselines
            .iter()
            .enumerate()
            .map(|(i, b)| (stratum_key(&b.stratum), i))
            .collect();

        let log_likelihood = ll + 0.5 * self.penalizer * beta.dot(&beta);
        log::debug!(
            "cox fit: {} subjects, {} covariates, {} strata, log-likelihood {:.6} after {} iterations",
            data.n_samples(),
            data.n_features(),
            groups.len(),
            log_likelihood,
            n_iterations
        );

        self.fit = Some(CoxFit {
            covariate_names: data.covariate_names().to_vec(),
            means,
            stds,
            log_likelihood,
            beta,
            coefficients,
            standard_errors,
            n_iterations,
            strata: params.strata.clone(),
            baselines,
            stratum_lookup,
        });

        Ok(self)
    }

    /// newton-raphson w/ step halving, returns the iteration count
    fn newton_raphson(
        &self,
        data: &SurvivalData,
        groups: &[Vec<usize>],
        beta: &mut Array1<f64>,
        settings: &SolverSettings,
    ) -> Result<usize> {
        let (mut loglik, mut gradient, mut hessian) =
            self.penalized_derivatives(data, groups, beta)?;

        for iteration in 1..=settings.max_iterations {
            let step = linalg::solve(&hessian, &gradient).map_err(|_| {
                SurvivalError::numerical_error(
                    "hessian is singular - check for collinear or constant covariates",
                )
            })?;

            let mut scale = settings.step_size;
            let mut accepted = None;
            for _ in 0..30 {
                let candidate = &*beta - &(scale * &step);
                if let Ok((ll, g, h)) = self.penalized_derivatives(data, groups, &candidate) {
                    if ll.is_finite() && ll >= loglik - 1e-12 * loglik.abs().max(1.0) {
                        accepted = Some((candidate, ll, g, h));
                        break;
                    }
                }
                scale *= 0.5;
            }

            let Some((candidate, ll, g, h)) = accepted else {
                // no ascent direction left - already at the optimum numerically
                log::debug!("cox iteration {iteration}: step halving exhausted, stopping");
                return Ok(iteration);
            };

            let step_norm = scale * step.dot(&step).sqrt();
            let improvement = (ll - loglik).abs();
            log::log!(
                settings.progress_level,
                "cox iteration {iteration}: penalized log-likelihood {ll:.6}, step norm {step_norm:.3e}"
            );

            *beta = candidate;
            loglik = ll;
            gradient = g;
            hessian = h;

            if improvement < settings.tolerance || step_norm < settings.tolerance {
                return Ok(iteration);
            }
        }

        Err(SurvivalError::optimization_failed(format!(
            "newton-raphson failed to converge in {} iterations",
            settings.max_iterations
        )))
    }

    /// penalized log partial likelihood, gradient & hessian summed over strata
    fn penalized_derivatives(
        &self,
        data: &SurvivalData,
        groups: &[Vec<usize>],
        beta: &Array1<f64>,
    ) -> Result<(f64, Array1<f64>, Array2<f64>)> {
        let p = data.n_features();
        let mut loglik = 0.0;
        let mut gradient = Array1::zeros(p);
        let mut hessian = Array2::zeros((p, p));

        for rows in groups {
            let (ll, g, h) = partial_likelihood_derivatives(
                data.covariates(),
                data.times(),
                data.events(),
                rows,
                beta,
                self.tie_method,
            )?;
            loglik += ll;
            gradient += &g;
            hessian += &h;
        }

        if self.penalizer > 0.0 {
            loglik -= 0.5 * self.penalizer * beta.dot(beta);
            gradient.scaled_add(-self.penalizer, beta);
            for j in 0..p {
                hessian[[j, j]] -= self.penalizer;
            }
        }

        Ok((loglik, gradient, hessian))
    }

    fn fitted(&self) -> Result<&CoxFit> {
        self.fit.as_ref().ok_or(SurvivalError::ModelNotFitted)
    }

    /// get the fitted coefficients (betas), original covariate scale
    pub fn coefficients(&self) -> Result<ArrayView1<'_, f64>> {
        Ok(self.fitted()?.coefficients.view())
    }

    pub fn standard_errors(&self) -> Result<ArrayView1<'_, f64>> {
        Ok(self.fitted()?.standard_errors.view())
    }

    /// covariates in the order the coefficients are reported
    pub fn covariate_names(&self) -> Result<&[String]> {
        Ok(&self.fitted()?.covariate_names)
    }

    /// unpenalized log partial likelihood at the fitted coefficients
    pub fn log_likelihood(&self) -> Result<f64> {
        Ok(self.fitted()?.log_likelihood)
    }

    pub fn n_iterations(&self) -> Result<usize> {
        Ok(self.fitted()?.n_iterations)
    }

    pub fn baseline_cumulative_hazard(&self) -> Result<&[BaselineHazard]> {
        Ok(&self.fitted()?.baselines)
    }

    pub fn is_fitted(&self) -> bool {
        self.fit.is_some()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn tie_method(&self) -> TieMethod {
        self.tie_method
    }

    pub fn penalizer(&self) -> f64 {
        self.penalizer
    }

    /// standardized covariates of `frame`, columns picked by name
    fn design(&self, frame: &Frame) -> Result<Array2<f64>> {
        let fit = self.fitted()?;
        let mut x = frame.select(&fit.covariate_names)?.values().to_owned();
        for mut row in x.rows_mut() {
            row -= &fit.means;
            row /= &fit.stds;
        }
        Ok(x)
    }

    /// baseline index for each row of `frame`
    fn row_baselines(&self, frame: &Frame) -> Result<Vec<usize>> {
        let fit = self.fitted()?;
        let Some(strata) = &fit.strata else {
            return Ok(vec![0; frame.n_rows()]);
        };

        let (keys, values) = stratum_assignments(frame, strata)?;
        keys.into_iter()
            .map(|k| {
                fit.stratum_lookup
                    .get(&stratum_key(&values[k]))
                    .copied()
                    .ok_or_else(|| {
                        SurvivalError::invalid_survival_data(format!(
                            "stratum {:?} was not seen during fit",
                            values[k]
                        ))
                    })
            })
            .collect()
    }

    /// centered linear predictor (x - mean) . beta per row
    pub fn predict_log_partial_hazard(&self, frame: &Frame) -> Result<Array1<f64>> {
        let beta = &self.fitted()?.beta;
        Ok(self.design(frame)?.dot(beta))
    }

    /// exp of the centered linear predictor
    pub fn predict_partial_hazard(&self, frame: &Frame) -> Result<Array1<f64>> {
        Ok(self.predict_log_partial_hazard(frame)?.mapv(f64::exp))
    }

    /// cumulative hazard per row (rows) at each requested time (columns)
    pub fn predict_cumulative_hazard(&self, frame: &Frame, times: &[f64]) -> Result<Array2<f64>> {
        let fit = self.fitted()?;
        let partial = self.predict_partial_hazard(frame)?;
        let baselines = self.row_baselines(frame)?;

        Ok(Array2::from_shape_fn((frame.n_rows(), times.len()), |(i, k)| {
            fit.baselines[baselines[i]].at(times[k]) * partial[i]
        }))
    }

    /// survival probability per row (rows) at each requested time (columns)
    pub fn predict_survival_function(&self, frame: &Frame, times: &[f64]) -> Result<Array2<f64>> {
        Ok(self.predict_cumulative_hazard(frame, times)?.mapv(|h| (-h).exp()))
    }

    /// expected lifetime per row: area under the survival curve up to the last fitted time
    ///
    /// left-step integral from t = 0, so it sits slightly above a trapezoid
    /// integral that starts at the first observed time
    pub fn predict_expectation(&self, frame: &Frame) -> Result<Array1<f64>> {
        let fit = self.fitted()?;
        let partial = self.predict_partial_hazard(frame)?;
        let baselines = self.row_baselines(frame)?;

        Ok(partial
            .iter()
            .zip(&baselines)
            .map(|(&ph, &b)| fit.baselines[b].expected_lifetime(ph))
            .collect())
    }

    /// get a nice summary of the fitted model
    pub fn summary(&self) -> Result<CoxModelSummary> {
        let fit = self.fitted()?;
        let z_crit = stats::z_critical(self.alpha);

        let z_scores = &fit.coefficients / &fit.standard_errors;
        let p_values = z_scores.mapv(stats::two_sided_p_value);

        Ok(CoxModelSummary {
            hazard_ratios: fit.coefficients.mapv(f64::exp),
            lower_bounds: &fit.coefficients - &(z_crit * &fit.standard_errors),
            upper_bounds: &fit.coefficients + &(z_crit * &fit.standard_errors),
            coefficients: fit.coefficients.clone(),
            standard_errors: fit.standard_errors.clone(),
            z_scores,
            p_values,
            alpha: self.alpha,
            penalizer: self.penalizer,
            log_likelihood: fit.log_likelihood,
            feature_names: fit.covariate_names.clone(),
        })
    }
}

/// efron/breslow log partial likelihood + derivatives over one stratum
fn partial_likelihood_derivatives(
    x: ArrayView2<f64>,
    times: ArrayView1<f64>,
    events: ArrayView1<bool>,
    rows: &[usize],
    beta: &Array1<f64>,
    ties: TieMethod,
) -> Result<(f64, Array1<f64>, Array2<f64>)> {
    let p = x.ncols();
    let mut loglik = 0.0;
    let mut gradient = Array1::zeros(p);
    let mut hessian = Array2::<f64>::zeros((p, p));

    // risk set sums, grown as we walk from the latest time back
    let mut s0 = 0.0;
    let mut s1 = Array1::<f64>::zeros(p);
    let mut s2 = Array2::<f64>::zeros((p, p));

    let mut order = rows.to_vec();
    order.sort_by(|&a, &b| times[b].total_cmp(&times[a]));

    let mut start = 0;
    while start < order.len() {
        let t = times[order[start]];
        let mut end = start;
        while end < order.len() && times[order[end]] == t {
            end += 1;
        }

        // tied event sums at t
        let mut t0 = 0.0;
        let mut t1 = Array1::<f64>::zeros(p);
        let mut t2 = Array2::<f64>::zeros((p, p));
        let mut n_events = 0usize;

        for &i in &order[start..end] {
            let xi = x.row(i);
            let eta = xi.dot(beta);
            let w = eta.exp();
            if !w.is_finite() {
                return Err(SurvivalError::numerical_error(format!(
                    "risk score overflowed: exp({eta})"
                )));
            }

            s0 += w;
            s1.scaled_add(w, &xi);
            add_outer(&mut s2, w, xi);

            if events[i] {
                t0 += w;
                t1.scaled_add(w, &xi);
                add_outer(&mut t2, w, xi);
                n_events += 1;
                loglik += eta;
                gradient += &xi;
            }
        }

        for l in 0..n_events {
            let f = match ties {
                TieMethod::Efron => l as f64 / n_events as f64,
                TieMethod::Breslow => 0.0,
            };
            let phi = s0 - f * t0;
            if !(phi > 0.0) {
                return Err(SurvivalError::numerical_error("risk set sum is non-positive"));
            }

            let mean = (&s1 - &(f * &t1)) / phi;
            let second = (&s2 - &(f * &t2)) / phi;

            loglik -= phi.ln();
            gradient -= &mean;
            hessian -= &second;
            for a in 0..p {
                for b in 0..p {
                    hessian[[a, b]] += mean[a] * mean[b];
                }
            }
        }

        start = end;
    }

    Ok((loglik, gradient, hessian))
}

fn add_outer(acc: &mut Array2<f64>, w: f64, x: ArrayView1<f64>) {
    let p = x.len();
    for a in 0..p {
        for b in 0..p {
            acc[[a, b]] += w * x[a] * x[b];
        }
    }
}

/// breslow baseline cumulative hazard over the unique durations of one stratum
fn breslow_baseline(
    data: &SurvivalData,
    rows: &[usize],
    beta: &Array1<f64>,
    stratum: Vec<f64>,
) -> Result<BaselineHazard> {
    let times = data.times();
    let events = data.events();

    let mut order = rows.to_vec();
    order.sort_by(|&a, &b| times[b].total_cmp(&times[a]));

    // walk latest -> earliest accumulating the risk set, then flip
    let mut risk_sum = 0.0;
    let mut steps = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let t = times[order[start]];
        let mut deaths = 0usize;
        let mut end = start;
        while end < order.len() && times[order[end]] == t {
            let i = order[end];
            risk_sum += data.covariates().row(i).dot(beta).exp();
            if events[i] {
                deaths += 1;
            }
            end += 1;
        }
        if !(risk_sum > 0.0 && risk_sum.is_finite()) {
            return Err(SurvivalError::numerical_error("risk set sum is non-positive"));
        }
        steps.push((t, deaths as f64 / risk_sum));
        start = end;
    }
    steps.reverse();

    let mut cumulative = 0.0;
    let (times, cumulative_hazard): (Vec<f64>, Vec<f64>) = steps
        .into_iter()
        .map(|(t, dh)| {
            cumulative += dh;
            (t, cumulative)
        })
        .unzip();

    Ok(BaselineHazard {
        stratum,
        times,
        cumulative_hazard,
    })
}

fn stratum_key(values: &[f64]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}

/// stratum index per row + the distinct strata values, in order of first appearance
fn stratum_assignments(frame: &Frame, strata: &[String]) -> Result<(Vec<usize>, Vec<Vec<f64>>)> {
    if strata.is_empty() {
        return Ok((vec![0; frame.n_rows()], vec![Vec::new()]));
    }

    let columns = strata
        .iter()
        .map(|name| frame.column(name))
        .collect::<Result<Vec<_>>>()?;

    let mut lookup: BTreeMap<Vec<u64>, usize> = BTreeMap::new();
    let mut values = Vec::new();
    let mut keys = Vec::with_capacity(frame.n_rows());

    for i in 0..frame.n_rows() {
        let row: Vec<f64> = columns.iter().map(|c| c[i]).collect();
        if row.iter().any(|v| !v.is_finite()) {
            return Err(SurvivalError::invalid_survival_data(format!(
                "row {i} has a missing strata value"
            )));
        }
        let next = values.len();
        let k = *lookup.entry(stratum_key(&row)).or_insert(next);
        if k == next {
            values.push(row);
        }
        keys.push(k);
    }

    Ok((keys, values))
}

fn group_rows(keys: &[usize], n_groups: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); n_groups];
    for (i, &k) in keys.iter().enumerate() {
        groups[k].push(i);
    }
    groups
}

/// nice summary of what the model learned
#[derive(Debug, Clone)]
pub struct CoxModelSummary {
    pub coefficients: Array1<f64>,    // the betas
    pub hazard_ratios: Array1<f64>,   // exp(betas)
    pub standard_errors: Array1<f64>,
    pub z_scores: Array1<f64>,
    pub p_values: Array1<f64>,        // two-sided
    pub lower_bounds: Array1<f64>,    // alpha-level interval on the betas
    pub upper_bounds: Array1<f64>,
    pub alpha: f64,
    pub penalizer: f64,
    pub log_likelihood: f64,
    pub feature_names: Vec<String>,
}

impl CoxModelSummary {
    /// print out what we learned
    pub fn print(&self) {
        println!("cox proportional hazards model summary");
        println!("=====================================");
        println!("penalizer: {:.6}", self.penalizer);
        println!("log-likelihood: {:.6}", self.log_likelihood);
        println!();

        let pct = self.alpha * 100.0;
        println!(
            "{:<20} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "feature",
            "coef",
            "exp(coef)",
            "se",
            "p",
            format!("lower {pct:.0}%"),
            format!("upper {pct:.0}%")
        );
        println!("{:-<86}", "");

        for i in 0..self.coefficients.len() {
            println!(
                "{:<20} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                self.feature_names[i],
                self.coefficients[i],
                self.hazard_ratios[i],
                self.standard_errors[i],
                self.p_values[i],
                self.lower_bounds[i],
                self.upper_bounds[i]
            );
        }
    }
}
