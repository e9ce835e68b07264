//! Present-value discounting on quarterly periods
//!
//! All series are discounted to period 0 using the absolute period index:
//! the value at period `p` is divided by `(1 + r)^p`, so period 0 is never
//! discounted.

use crate::profile::PERIODS_PER_YEAR;

/// Convert an annual discount rate into the per-period (quarterly) rate
pub fn quarterly_rate(annual_rate: f64) -> f64 {
    annual_rate / PERIODS_PER_YEAR as f64
}

/// Present value (as of period 0) of `value` received at `period`
pub fn discount(value: f64, quarterly_rate: f64, period: usize) -> f64 {
    value / (1.0 + quarterly_rate).powi(period as i32)
}

/// Discount every element of a series by its own period index
pub fn discount_series(values: &[f64], quarterly_rate: f64) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(period, &value)| discount(value, quarterly_rate, period))
        .collect()
}
