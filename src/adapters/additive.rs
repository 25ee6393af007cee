use serde::{Deserialize, Serialize};

use crate::{
    aalen::{AalenAdditiveFitter, AalenFitParams},
    error::{Result, SurvivalError},
    estimator::Estimator,
    frame::Frame,
    options::FitOptions,
};

use super::{augment, concordance, first_row};

/// everything the additive-hazards adapter is constructed with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditiveHazardsConfig {
    pub duration_column: Option<String>,
    pub event_column: Option<String>,
    pub timeline: Option<Vec<f64>>,
    pub id_column: Option<String>, // lives in the covariate table, not the labels
    pub fit_intercept: bool,
    pub alpha: f64,
    pub coef_penalizer: f64,
    pub smoothing_penalizer: f64,
    pub extra: FitOptions,
}

impl Default for AdditiveHazardsConfig {
    fn default() -> Self {
        Self {
            duration_column: None,
            event_column: None,
            timeline: None,
            id_column: None,
            fit_intercept: true,
            alpha: 0.95,
            coef_penalizer: 0.5,
            smoothing_penalizer: 0.0,
            extra: FitOptions::new(),
        }
    }
}

impl AdditiveHazardsConfig {
    pub fn new() -> Self {
        Self::default()
    }

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

    pub fn with_timeline(mut self, timeline: Vec<f64>) -> Self {
        self.timeline = Some(timeline);
        self
    }

    pub fn with_id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = Some(name.into());
        self
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

    pub fn with_extra(mut self, extra: FitOptions) -> Self {
        self.extra = extra;
        self
    }
}

/// aalen additive regression behind the estimator interface
#[derive(Debug, Clone, Default)]
pub struct AdditiveHazardsAdapter {
    config: AdditiveHazardsConfig,
    fitted: Option<AalenAdditiveFitter>,
}

impl AdditiveHazardsAdapter {
    pub fn new(config: AdditiveHazardsConfig) -> Self {
        Self { config, fitted: None }
    }

    pub fn fitted_model(&self) -> Option<&AalenAdditiveFitter> {
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
}

impl Estimator for AdditiveHazardsAdapter {
    type Config = AdditiveHazardsConfig;

    fn config(&self) -> &AdditiveHazardsConfig {
        &self.config
    }

    fn set_config(&mut self, config: AdditiveHazardsConfig) {
        self.config = config;
    }

    fn fit(&mut self, x: &Frame, y: &Frame, fit_params: &FitOptions) -> Result<&mut Self> {
        let config = &self.config;
        let (augmented, duration_column) = augment(
            x,
            y,
            config.duration_column.as_deref(),
            config.event_column.as_deref(),
        )?;

        let params = AalenFitParams {
            duration_col: duration_column.to_string(),
            event_col: config.event_column.clone(),
            timeline: config.timeline.clone(),
            id_col: config.id_column.clone(),
            options: config.extra.merged(fit_params),
        };

        log::debug!(
            "additive hazards adapter: fitting {} rows x {} columns",
            x.n_rows(),
            x.n_columns()
        );

        let mut model = AalenAdditiveFitter::new()
            .with_fit_intercept(config.fit_intercept)
            .with_alpha(config.alpha)
            .with_coef_penalizer(config.coef_penalizer)
            .with_smoothing_penalizer(config.smoothing_penalizer);
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
