use thiserror::Error;

pub type Result<T> = std::result::Result<T, SurvivalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurvivalError {
    #[error("dimensions don't match: {message}")]
    InvalidDimensions { message: String },

    #[error("optimization blew up: {message}")]
    OptimizationFailed { message: String },

    #[error("model not fitted yet - call fit() first")]
    ModelNotFitted,

    #[error("bad parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    #[error("option not recognized by this fitter: {name}")]
    UnrecognizedOption { name: String },

    #[error("numerical issues: {message}")]
    NumericalError { message: String },

    #[error("survival data is broken: {message}")]
    InvalidSurvivalData { message: String },

    #[error("no column named '{column}'")]
    ColumnNotFound { column: String },

    #[error("column '{column}' appears more than once")]
    DuplicateColumn { column: String },

    #[error("can't read csv input: {message}")]
    Csv { message: String },

    #[error("bad configuration: {message}")]
    Config { message: String },
}

impl SurvivalError {
    pub fn invalid_dimensions(message: impl Into<String>) -> Self {
        Self::InvalidDimensions { message: message.into() }
    }

    pub fn optimization_failed(message: impl Into<String>) -> Self {
        Self::OptimizationFailed { message: message.into() }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    pub fn unrecognized_option(name: impl Into<String>) -> Self {
        Self::UnrecognizedOption { name: name.into() }
    }

    pub fn numerical_error(message: impl Into<String>) -> Self {
        Self::NumericalError { message: message.into() }
    }

    pub fn invalid_survival_data(message: impl Into<String>) -> Self {
        Self::InvalidSurvivalData { message: message.into() }
    }

    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound { column: column.into() }
    }

    pub fn duplicate_column(column: impl Into<String>) -> Self {
        Self::DuplicateColumn { column: column.into() }
    }
}

impl From<toml::de::Error> for SurvivalError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config { message: err.to_string() }
    }
}

impl From<ndarray::ShapeError> for SurvivalError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::invalid_dimensions(err.to_string())
    }
}

impl From<csv::Error> for SurvivalError {
    fn from(err: csv::Error) -> Self {
        Self::Csv { message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_error_messages() {
        let err = SurvivalError::column_not_found("duration");
        assert_eq!(err.to_string(), "no column named 'duration'");

        let err = SurvivalError::invalid_parameter("penalizer", "-1");
        assert_eq!(err.to_string(), "bad parameter: penalizer = -1");

        assert_eq!(
            SurvivalError::ModelNotFitted.to_string(),
            "model not fitted yet - call fit() first"
        );
    }

    #[test]
    fn test_shape_error_conversion() {
        let shape_err = Array2::<f64>::from_shape_vec((2, 2), vec![1.0]).unwrap_err();
        let err: SurvivalError = shape_err.into();
        assert!(matches!(err, SurvivalError::InvalidDimensions { .. }));
    }
}
