//! Numeric helpers shared by the estimators.

pub mod linalg;
pub mod stats;

pub use linalg::{least_squares, solve_linear_system};
pub use stats::{mean, quantile_normal, r_squared};
