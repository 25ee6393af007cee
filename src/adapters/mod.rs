//! estimator adapters around the in-crate survival fitters
//!
//! both adapters take covariates and labels as separate tables, glue the
//! label columns onto a copy of the covariates, and hand that to the fitter.

mod additive;
mod proportional;

pub use additive::{AdditiveHazardsAdapter, AdditiveHazardsConfig};
pub use proportional::{ProportionalHazardsAdapter, ProportionalHazardsConfig};

use ndarray::Array1;

use crate::{
    error::{Result, SurvivalError},
    frame::Frame,
    metrics,
};

/// copy of `x` w/ the duration (+ event) columns of `y` attached
///
/// returns the table along w/ the duration column name the fitter should use
pub(crate) fn augment<'a>(
    x: &Frame,
    y: &Frame,
    duration_column: Option<&'a str>,
    event_column: Option<&str>,
) -> Result<(Frame, &'a str)> {
    let duration_column = duration_column
        .ok_or_else(|| SurvivalError::invalid_parameter("duration_column", "unset"))?;

    if x.n_rows() != y.n_rows() {
        return Err(SurvivalError::invalid_dimensions(format!(
            "covariates have {} rows but labels have {}",
            x.n_rows(),
            y.n_rows()
        )));
    }

    let mut augmented = x.with_column(duration_column, y.column(duration_column)?)?;
    if let Some(event_column) = event_column {
        augmented = augmented.with_column(event_column, y.column(event_column)?)?;
    }

    Ok((augmented, duration_column))
}

/// the first row's prediction - everything after it is dropped
pub(crate) fn first_row(predictions: Array1<f64>) -> Result<f64> {
    if predictions.len() > 1 {
        log::debug!(
            "predict: returning row 0, discarding {} other rows",
            predictions.len() - 1
        );
    }

    predictions
        .first()
        .copied()
        .ok_or_else(|| SurvivalError::invalid_dimensions("can't predict on an empty table"))
}

/// concordance between per-row expected lifetimes and the observed labels
pub(crate) fn concordance(
    expectations: &Array1<f64>,
    y: &Frame,
    duration_column: Option<&str>,
    event_column: Option<&str>,
) -> Result<f64> {
    let duration_column = duration_column
        .ok_or_else(|| SurvivalError::invalid_parameter("duration_column", "unset"))?;
    let durations = y.column(duration_column)?;

    let events: Array1<bool> = match event_column {
        Some(name) => y.column(name)?.mapv(|e| !e.is_nan() && e != 0.0),
        None => Array1::from_elem(y.n_rows(), true),
    };

    metrics::concordance_index(expectations.view(), durations, events.view())
}
