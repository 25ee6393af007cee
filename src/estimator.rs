//! the estimator contract the adapters expose to a composition framework

use crate::{error::Result, frame::Frame, options::FitOptions};

/// a configurable model that fits on a feature table + label table and
/// predicts a single value
pub trait Estimator {
    /// construction-time options, introspectable and replaceable as a whole
    type Config;

    fn config(&self) -> &Self::Config;

    /// swap in a new configuration - takes effect on the next `fit`
    fn set_config(&mut self, config: Self::Config);

    /// fit against `x` (covariates) and `y` (labels, row-aligned w/ `x`)
    ///
    /// `fit_params` are forwarded to the underlying fitter on top of any
    /// options in the configuration.
    fn fit(&mut self, x: &Frame, y: &Frame, fit_params: &FitOptions) -> Result<&mut Self>;

    fn predict(&self, x: &Frame) -> Result<f64>;

    fn is_fitted(&self) -> bool;
}
