//! Simplified ARIMA(1,1,1) model.
//!
//! Coefficients come from closed-form lag-1 ratios rather than maximum
//! likelihood, which keeps the fit deterministic on short annual series.

mod diff;
mod model;

pub use diff::{difference, lag1_ratio};
pub use model::{Arima111, ArimaState};
