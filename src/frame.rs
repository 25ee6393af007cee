//! named-column numeric tables - the feature & label tables the estimators take
//!
//! every cell is an `f64`: booleans are stored as 0/1 and missing values as `NaN`.
//! columns are addressed by name, rows by position.

use std::collections::HashSet;
use std::io::Read;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{Result, SurvivalError};

/// a table of observations (rows) by named columns
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    names: Vec<String>,   // column names, unique
    values: Array2<f64>,  // n_rows x n_columns
}

impl Frame {
    /// build a frame from column names + a value matrix
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if names.len() != values.ncols() {
            return Err(SurvivalError::invalid_dimensions(format!(
                "{} column names for {} columns",
                names.len(),
                values.ncols()
            )));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SurvivalError::duplicate_column(name.clone()));
            }
        }

        Ok(Self { names, values })
    }

    /// build a frame from `(name, values)` pairs - all columns must be the same length
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let columns: Vec<(String, Vec<f64>)> = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();

        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != n_rows) {
            return Err(SurvivalError::invalid_dimensions(format!(
                "column '{}' has {} rows, expected {}",
                name,
                values.len(),
                n_rows
            )));
        }

        let values = Array2::from_shape_fn((n_rows, columns.len()), |(i, j)| columns[j].1[i]);
        let names = columns.into_iter().map(|(name, _)| name).collect();
        Self::new(names, values)
    }

    /// read a csv table w/ a header row
    ///
    /// numeric cells parse as `f64`, `true`/`false` (any case) as 1/0, empty cells
    /// and `NA`/`NaN` as missing.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let names: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        let mut cells = Vec::new();
        let mut n_rows = 0;

        for record in rdr.records() {
            let record = record?;
            for (j, field) in record.iter().enumerate() {
                cells.push(parse_cell(field).ok_or_else(|| SurvivalError::Csv {
                    message: format!(
                        "row {} column '{}': can't parse '{}'",
                        n_rows + 1,
                        names.get(j).map(String::as_str).unwrap_or("?"),
                        field
                    ),
                })?);
            }
            n_rows += 1;
        }

        let values = Array2::from_shape_vec((n_rows, names.len()), cells)?;
        Self::new(names, values)
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// position of a column by name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| SurvivalError::column_not_found(name))
    }

    /// one column by name
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let j = self.column_index(name)?;
        Ok(self.values.column(j))
    }

    /// all values (n_rows x n_columns)
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// copy of this frame w/ `name` set to `values`
    ///
    /// an existing column of the same name is replaced in place, otherwise the
    /// column is appended. `self` is never touched.
    pub fn with_column(&self, name: &str, values: ArrayView1<f64>) -> Result<Self> {
        if values.len() != self.n_rows() {
            return Err(SurvivalError::invalid_dimensions(format!(
                "column '{}' has {} rows, frame has {}",
                name,
                values.len(),
                self.n_rows()
            )));
        }

        if let Some(j) = self.names.iter().position(|n| n == name) {
            let mut out = self.clone();
            out.values.column_mut(j).assign(&values);
            return Ok(out);
        }

        let p = self.n_columns();
        let merged = Array2::from_shape_fn((self.n_rows(), p + 1), |(i, j)| {
            if j < p { self.values[[i, j]] } else { values[i] }
        });
        let mut names = self.names.clone();
        names.push(name.to_string());

        Ok(Self { names, values: merged })
    }

    /// keep only the named columns, in the order given
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|n| self.column_index(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Self::new(
            names.iter().map(|n| n.as_ref().to_string()).collect(),
            self.values.select(Axis(1), &indices),
        )
    }

    /// everything except the named columns - unknown names are ignored
    pub fn drop<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let (kept_names, kept_indices): (Vec<String>, Vec<usize>) = self
            .names
            .iter()
            .enumerate()
            .filter(|(_, n)| !names.iter().any(|d| d.as_ref() == n.as_str()))
            .map(|(j, n)| (n.clone(), j))
            .unzip();

        Self {
            names: kept_names,
            values: self.values.select(Axis(1), &kept_indices),
        }
    }

    /// grab a subset of rows by index
    pub fn take_rows(&self, indices: &[usize]) -> Result<Self> {
        if indices.iter().any(|&i| i >= self.n_rows()) {
            return Err(SurvivalError::invalid_dimensions("row index out of bounds"));
        }

        Ok(Self {
            names: self.names.clone(),
            values: self.values.select(Axis(0), indices),
        })
    }

    /// first `n` rows (fewer if the frame is shorter)
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.n_rows());
        Self {
            names: self.names.clone(),
            values: self.values.slice(ndarray::s![..n, ..]).to_owned(),
        }
    }
}

fn parse_cell(field: &str) -> Option<f64> {
    match field.to_ascii_lowercase().as_str() {
        "" | "na" | "nan" => Some(f64::NAN),
        "true" => Some(1.0),
        "false" => Some(0.0),
        other => other.parse::<f64>().ok(),
    }
}
