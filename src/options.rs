//! open-ended extra options handed through to a fitter
//!
//! the estimators never look inside a [`FitOptions`] - they merge and forward it.
//! deciding which keys mean something is up to the fitter receiving them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurvivalError};

/// a single option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<f64>),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// ints widen to floats, nothing else converts
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Self::Int(i) => usize::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::List(xs) => write!(f, "{xs:?}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for OptionValue {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<f64>> for OptionValue {
    fn from(value: Vec<f64>) -> Self {
        Self::List(value)
    }
}

/// string-keyed bag of extra options, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FitOptions(BTreeMap<String, OptionValue>);

impl FitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `self` overlaid w/ `overrides` - keys in `overrides` win
    pub fn merged(&self, overrides: &FitOptions) -> FitOptions {
        let mut out = self.clone();
        for (k, v) in &overrides.0 {
            out.0.insert(k.clone(), v.clone());
        }
        out
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for FitOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// typed lookups for fitters reading their own keys

pub(crate) fn expect_bool(name: &str, value: &OptionValue) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| SurvivalError::invalid_parameter(name, value.to_string()))
}

pub(crate) fn expect_f64(name: &str, value: &OptionValue) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| SurvivalError::invalid_parameter(name, value.to_string()))
}

pub(crate) fn expect_usize(name: &str, value: &OptionValue) -> Result<usize> {
    value
        .as_usize()
        .ok_or_else(|| SurvivalError::invalid_parameter(name, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_overrides() {
        let base = FitOptions::new()
            .with("tolerance", 1e-6)
            .with("show_progress", false);
        let overrides = FitOptions::new().with("show_progress", true);

        let merged = base.merged(&overrides);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("show_progress"), Some(&OptionValue::Bool(true)));
        assert_eq!(merged.get("tolerance"), Some(&OptionValue::Float(1e-6)));
        // inputs untouched
        assert_eq!(base.get("show_progress"), Some(&OptionValue::Bool(false)));
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(OptionValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(OptionValue::Int(-3).as_usize(), None);
        assert_eq!(OptionValue::Float(3.0).as_usize(), None);
        assert_eq!(OptionValue::Text("x".into()).as_bool(), None);
    }

    #[test]
    fn test_typed_lookup_errors() {
        let err = expect_usize("max_iterations", &OptionValue::Text("lots".into())).unwrap_err();
        assert_eq!(
            err,
            SurvivalError::invalid_parameter("max_iterations", "\"lots\"")
        );
        assert!(expect_bool("show_progress", &OptionValue::Bool(true)).unwrap());
    }

    #[test]
    fn test_serde_untagged_values() {
        let options: FitOptions =
            serde_json::from_str(r#"{"max_steps": 50, "precision": 1e-7, "show_progress": true}"#)
                .unwrap();

        assert_eq!(options.get("max_steps"), Some(&OptionValue::Int(50)));
        assert_eq!(options.get("precision"), Some(&OptionValue::Float(1e-7)));
        assert_eq!(options.get("show_progress"), Some(&OptionValue::Bool(true)));
    }
}
