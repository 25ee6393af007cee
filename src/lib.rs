//! # survival estimators
//!
//! cox proportional hazards & aalen additive hazards regression behind a plain
//! estimator interface - fit on a covariate table + a label table, predict an
//! expected lifetime
//!
//! ## what you get
//!
//! - [`ProportionalHazardsAdapter`] wrapping [`CoxPhFitter`] (efron/breslow ties, strata,
//!   L2 penalty)
//! - [`AdditiveHazardsAdapter`] wrapping [`AalenAdditiveFitter`] (ridge-penalized increments,
//!   subject ids)
//! - configs you can build in code or load from toml
//! - concordance scoring
//!
//! ## quick start
//!
//! ```rust,no_run
//! use survival_estimators::{
//!     Estimator, FitOptions, Frame, ProportionalHazardsAdapter, ProportionalHazardsConfig,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // covariates & labels are separate tables w/ the same rows
//! let x = Frame::from_columns(vec![
//!     ("age", vec![52.0, 61.0, 47.0, 70.0, 58.0]),
//!     ("treated", vec![1.0, 0.0, 1.0, 0.0, 1.0]),
//! ])?;
//! let y = Frame::from_columns(vec![
//!     ("duration", vec![12.0, 5.0, 20.0, 3.0, 9.0]),
//!     ("observed", vec![1.0, 1.0, 0.0, 1.0, 1.0]), // 0 = censored
//! ])?;
//!
//! let config = ProportionalHazardsConfig::new()
//!     .with_duration_column("duration")
//!     .with_event_column("observed")
//!     .with_penalizer(0.1);
//!
//! let mut model = ProportionalHazardsAdapter::new(config);
//! model.fit(&x, &y, &FitOptions::new())?;
//!
//! // expected lifetime of the first row
//! let lifetime = model.predict(&x.head(1))?;
//! # Ok(())
//! # }
//! ```

pub mod aalen;
pub mod adapters;
pub mod cox;
pub mod data;
pub mod error;
pub mod estimator;
pub mod frame;
pub mod metrics;
pub mod options;

mod linalg;
mod stats;

pub use aalen::AalenAdditiveFitter;
pub use adapters::{
    AdditiveHazardsAdapter, AdditiveHazardsConfig, ProportionalHazardsAdapter,
    ProportionalHazardsConfig,
};
pub use cox::{CoxPhFitter, TieMethod};
pub use data::SurvivalData;
pub use error::{Result, SurvivalError};
pub use estimator::Estimator;
pub use frame::Frame;
pub use options::{FitOptions, OptionValue};
