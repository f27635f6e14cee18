//! Nutrition computation core: portion units, meal text parsing, nutrition
//! estimation, goal calculation and daily adherence scoring.
//!
//! Everything in here is free of HTTP and storage concerns; the feature
//! slices (`meals`, `profile`, `progress`) call into it.

pub mod adherence;
pub mod error;
pub mod estimator;
pub mod food_lookup;
pub mod goals;
pub mod parser;
pub mod units;

/// Round `value` to `places` decimal places. Exact ties go to the even
/// digit, so 0.25 becomes 0.2 and 1588.5 becomes 1588.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
