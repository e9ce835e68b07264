//! Error types for flow construction, aggregation and loading

use thiserror::Error;

use crate::flow::FlowId;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FlowError>;

/// Errors raised while building or combining flows
#[derive(Debug, Error)]
pub enum FlowError {
    /// A ramping profile was configured with fewer than two scale-up periods
    #[error("flow {name} ({flow_id}): {function} profile needs at least 2 scale-up periods, got {scale_up_periods}")]
    InvalidScaleUp {
        flow_id: FlowId,
        name: String,
        function: String,
        scale_up_periods: u32,
    },

    /// A profile label outside {sigmoid, linear, step, single}
    #[error("unknown profile type: {label:?}")]
    UnknownProfileFunction { label: String },

    /// A flow produced a series whose length differs from the rest of the portfolio
    #[error("flow {name} ({flow_id}) produced {actual} periods, expected {expected}")]
    LengthMismatch {
        flow_id: FlowId,
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Aggregation over zero flows
    #[error("cannot combine an empty collection of flows")]
    EmptyPortfolio,

    /// Fixed-cost rows cannot follow a projection length other than their own
    #[error("row {row}: fixed-cost flow {name} always spans {fixed} periods, portfolio is configured for {configured}")]
    FixedCostPeriods {
        row: usize,
        name: String,
        fixed: usize,
        configured: usize,
    },

    /// Unrecognised flow kind in a parameter file
    #[error("row {row}: unknown flow kind {kind:?}")]
    UnknownFlowKind { row: usize, kind: String },

    /// Parameter file row is missing a column its flow kind requires
    #[error("row {row}: missing required field {field}")]
    MissingField { row: usize, field: &'static str },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
