//! Baseline forecasting models.
//!
//! Simple methods that serve as benchmarks for the ensemble members.

mod moving_average;

pub use moving_average::{MovingAverage, MovingAverageFit};
