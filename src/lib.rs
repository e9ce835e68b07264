//! Cash-flow profiles - quarterly projection of ramping line items
//!
//! This library provides:
//! - Profile shapes (sigmoid, linear, step, single payment) for a delayed, capped ramp
//! - Present-value discounting on absolute quarter indices
//! - Derived throughput and trapezoid-integrated variable cost series
//! - Fixed-cost (headcount) flows sharing the same output contract
//! - Portfolio totals across any mix of flows

pub mod error;
pub mod discount;
pub mod profile;
pub mod flow;
pub mod portfolio;
pub mod loader;

// Re-export commonly used types
pub use error::{FlowError, Result};
pub use profile::{CashFlowParams, CashFlowProfile, ProfileFunction};
pub use flow::{FixedCostFlow, FixedCostParams, Flow, FlowId, FlowRecord, SeriesSelector};
pub use portfolio::{combine, Portfolio, PortfolioConfig, PortfolioSummary};
