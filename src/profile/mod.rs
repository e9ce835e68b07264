//! Cash-flow profiles: a delayed, ramping, capped quantity projected per quarter

mod function;
mod cashflow;

pub use function::{ProfileFunction, Ramp};
pub use cashflow::{CashFlowParams, CashFlowProfile, CashFlowRecord, trapezoidal_variable_cost};

// ============================================================================
// Projection constants
// ============================================================================

/// Default length of every produced series (three years of quarters)
pub const DEFAULT_TOTAL_PERIODS: usize = 12;

/// Periods per year; annual rates are divided by this to get the period rate
pub const PERIODS_PER_YEAR: u32 = 4;

/// Share of the span a sigmoid reaches at the end of its scale-up
pub const SIGMOID_COMPLETION: f64 = 0.95;

/// Quantity figures are declared in millions of units
pub const DEFAULT_QUANTITY_UNIT_SCALE: f64 = 1_000_000.0;
