use serde::{Deserialize, Serialize};

use crate::{
    cox::{CoxFitParams, CoxPhFitter, TieMethod},
    error::{Result, SurvivalError},
    estimator::Estimator,
    frame::Frame,
    options::FitOptions,
};

use super::{augment, concordance, first_row};

/// everything the proportional-hazards adapter is constructed with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProportionalHazardsConfig {
    pub duration_column: Option<String>,
    pub event_column: Option<String>,
    pub initial_beta: Option<Vec<f64>>,
    pub strata: Option<Vec<String>>,
    pub alpha: f64,
    pub tie_method: TieMethod,
    pub penalizer: f64,
    pub extra: FitOptions, // forwarded to the fitter, fit-time options win
}

impl Default for ProportionalHazardsConfig {
    fn default() -> Self {
        Self {
            duration_column: None,
            event_column: None,
            initial_beta: None,
            strata: None,
            alpha: 0.95,
            tie_method: TieMethod::Efron,
            penalizer: 0.0,
            extra: FitOptions::new(),
        }
    }
}

impl ProportionalHazardsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// parse a config from toml - missing keys keep their defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_duration_column(mut self, name: impl Into<String>) -> Self {
        self.duration_column = Some(name.into());
        self
    }

    pub fn with_event_column(mut self, name: impl Into<String>) -> Self {
        self.event_column = Some(name.into());
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

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_tie_method(mut self, tie_method: TieMethod) -> Self {
        self.tie_method = tie_method;
        self
    }

    pub fn with_penalizer(mut self, penalizer: f64) -> Self {
        self.penalizer = penalizer;
        self
    }

    pub fn with_extra(mut self, extra: FitOptions) -> Self {
        self.extra = extra;
        self
    }
}

/// cox regression behind the estimator interface
///
/// `predict` returns the expected lifetime of the first row only. use
/// [`fitted_model`](Self::fitted_model) for per-row predictions.
#[derive(Debug, Clone, Default)]
pub struct ProportionalHazardsAdapter {
    config: ProportionalHazardsConfig,
    fitted: Option<CoxPhFitter>,
}

impl ProportionalHazardsAdapter {
    pub fn new(config: ProportionalHazardsConfig) -> Self {
        Self { config, fitted: None }
    }

    /// the fitted cox model, if `fit` has succeeded
    pub fn fitted_model(&self) -> Option<&CoxPhFitter> {
        self.fitted.as_ref()
    }

    /// concordance index of per-row expected lifetimes against the labels in `y`
    pub fn score(&self, x: &Frame, y: &Frame) -> Result<f64> {
        let model = self.fitted.as_ref().ok_or(SurvivalError::ModelNotFitted)?;
        let expectations = model.predict_expectation(x)?;
        concordance(
            &expectations,
            y,
            self.config.duration_column.as_deref(),
            self.config.event_column.as_deref(),
        )
    }

    fn fit_params(&self, duration_column: &str, fit_params: &FitOptions) -> CoxFitParams {
        let config = &self.config;
        CoxFitParams {
            duration_col: duration_column.to_string(),
            event_col: config.event_column.clone(),
            initial_beta: config.initial_beta.clone(),
            strata: config.strata.clone(),
            options: config.extra.merged(fit_params),
        }
    }
}

impl Estimator for ProportionalHazardsAdapter {
    type Config = ProportionalHazardsConfig;

    fn config(&self) -> &ProportionalHazardsConfig {
        &self.config
    }

    fn set_config(&mut self, config: ProportionalHazardsConfig) {
        self.config = config;
    }

    fn fit(&mut self, x: &Frame, y: &Frame, fit_params: &FitOptions) -> Result<&mut Self> {
        let (augmented, duration_column) = augment(
            x,
            y,
            self.config.duration_column.as_deref(),
            self.config.event_column.as_deref(),
        )?;
        let params = self.fit_params(duration_column, fit_params);

        log::debug!(
            "proportional hazards adapter: fitting {} rows x {} covariates",
            x.n_rows(),
            x.n_columns()
        );

        let mut model = CoxPhFitter::new()
            .with_alpha(self.config.alpha)
            .with_tie_method(self.config.tie_method)
            .with_penalizer(self.config.penalizer);
        model.fit(&augmented, &params)?;

        self.fitted = Some(model);
        Ok(self)
    }

    fn predict(&self, x: &Frame) -> Result<f64> {
        let model = self.fitted.as_ref().ok_or(SurvivalError::ModelNotFitted)?;
        first_row(model.predict_expectation(x)?)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}
