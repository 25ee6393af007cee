use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::{
    error::{Result, SurvivalError},
    frame::Frame,
};

/// survival data - times, events, and subject covariates
#[derive(Debug, Clone)]
pub struct SurvivalData {
    times: Array1<f64>,           // time to event/censoring
    events: Array1<bool>,         // true = event, false = censored
    covariates: Array2<f64>,      // subject features (n_samples x n_features)
    covariate_names: Vec<String>, // column each feature came from
}

impl SurvivalData {
    /// make new survival data from raw vecs/arrays
    pub fn new(
        times: Vec<f64>,         // survival/censoring times
        events: Vec<bool>,       // true = event occurred, false = censored
        covariates: Array2<f64>, // subject features matrix
    ) -> Result<Self> {
        let n_samples = times.len();

        if events.len() != n_samples {
            return Err(SurvivalError::invalid_dimensions(format!(
                "times len ({}) != events len ({})",
                n_samples,
                events.len()
            )));
        }

        if covariates.nrows() != n_samples {
            return Err(SurvivalError::invalid_dimensions(format!(
                "covariates rows ({}) != n_samples ({})",
                covariates.nrows(),
                n_samples
            )));
        }

        if times.iter().any(|&t| t < 0.0 || !t.is_finite()) {
            return Err(SurvivalError::invalid_survival_data(
                "survival times must be non-negative & finite",
            ));
        }

        let covariate_names = (0..covariates.ncols()).map(|j| format!("x{j}")).collect();

        Ok(Self {
            times: Array1::from(times),
            events: Array1::from(events),
            covariates,
            covariate_names,
        })
    }

    /// pull survival data out of a table
    ///
    /// every column other than the duration column, the event column and
    /// `excluded` becomes a covariate. w/o an event column every row counts as
    /// an observed event; a `NaN` event value counts as censored.
    pub fn from_frame(
        frame: &Frame,
        duration_col: &str,
        event_col: Option<&str>,
        excluded: &[String],
    ) -> Result<Self> {
        let times = frame.column(duration_col)?.to_vec();

        let events = match event_col {
            Some(col) => frame
                .column(col)?
                .iter()
                .map(|&e| !e.is_nan() && e != 0.0)
                .collect(),
            None => vec![true; frame.n_rows()],
        };

        let mut dropped: Vec<&str> = excluded.iter().map(String::as_str).collect();
        dropped.push(duration_col);
        if let Some(col) = event_col {
            dropped.push(col);
        }
        let covariate_frame = frame.drop(&dropped);

        if covariate_frame.values().iter().any(|x| !x.is_finite()) {
            return Err(SurvivalError::invalid_survival_data(
                "covariates contain NaN or infinite values",
            ));
        }

        let mut data = Self::new(times, events, covariate_frame.values().to_owned())?;
        data.covariate_names = covariate_frame.column_names().to_vec();
        Ok(data)
    }

    /// how many subjects
    pub fn n_samples(&self) -> usize {
        self.times.len()
    }

    /// how many features per subject
    pub fn n_features(&self) -> usize {
        self.covariates.ncols()
    }

    /// survival/censoring times
    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.times.view()
    }

    /// event indicators (true = event, false = censored)
    pub fn events(&self) -> ArrayView1<'_, bool> {
        self.events.view()
    }

    /// subject feature matrix
    pub fn covariates(&self) -> ArrayView2<'_, f64> {
        self.covariates.view()
    }

    pub fn covariate_names(&self) -> &[String] {
        &self.covariate_names
    }

    /// standardize features (mean=0, std=1) - modifies in place
    pub fn standardize_covariates(&mut self) -> Result<(Array1<f64>, Array1<f64>)> {
        let means = self
            .covariates
            .mean_axis(Axis(0))
            .ok_or_else(|| SurvivalError::invalid_survival_data("no subjects to standardize"))?;
        let stds = self.covariates.std_axis(Axis(0), 0.0);

        for (j, &std) in stds.iter().enumerate() {
            if std == 0.0 {
                return Err(SurvivalError::numerical_error(format!(
                    "feature '{}' has zero variance - can't standardize",
                    self.covariate_names[j]
                )));
            }
        }

        // z-score normalization
        for mut row in self.covariates.rows_mut() {
            row -= &means;
            row /= &stds;
        }

        Ok((means, stds))
    }
}
