//! Exponential smoothing models.
//!
//! Annual coverage series carry no seasonality, so only Holt's linear trend
//! method is provided.

mod holt;

pub use holt::{HoltLinear, HoltState};
