//! Point estimators and the ensemble that blends them.

mod kind;
mod traits;

pub mod arima;
pub mod autoregressive;
pub mod baseline;
pub mod ensemble;
pub mod exponential;
pub mod growth;
pub mod regression;

pub use kind::{EstimatorKind, EstimatorResult, ModelParams, QualitySignal};
pub use traits::{BoxedEstimator, Estimator, EstimatorRegistry};
