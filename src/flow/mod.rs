//! The common flow contract shared by every line-item variant

mod fixed_cost;

pub use fixed_cost::{FixedCostFlow, FixedCostParams, FixedCostRecord, FIXED_COST_PERIODS};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::CashFlowRecord;

/// Identifier of a flow, stable for the flow's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowId(Uuid);

impl FlowId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FlowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Serialized form of any flow; each variant keeps its own key set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlowRecord {
    CashFlow(CashFlowRecord),
    FixedCost(FixedCostRecord),
}

/// One of the six series every flow exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesSelector {
    Amount,
    DiscountedAmount,
    Quantity,
    DiscountedQuantity,
    VariableCost,
    DiscountedVariableCost,
}

impl SeriesSelector {
    pub const ALL: [SeriesSelector; 6] = [
        SeriesSelector::Amount,
        SeriesSelector::DiscountedAmount,
        SeriesSelector::Quantity,
        SeriesSelector::DiscountedQuantity,
        SeriesSelector::VariableCost,
        SeriesSelector::DiscountedVariableCost,
    ];

    pub fn is_discounted(self) -> bool {
        matches!(
            self,
            SeriesSelector::DiscountedAmount
                | SeriesSelector::DiscountedQuantity
                | SeriesSelector::DiscountedVariableCost
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            SeriesSelector::Amount => "amount",
            SeriesSelector::DiscountedAmount => "discounted_amount",
            SeriesSelector::Quantity => "quantity",
            SeriesSelector::DiscountedQuantity => "discounted_quantity",
            SeriesSelector::VariableCost => "variable_cost",
            SeriesSelector::DiscountedVariableCost => "discounted_variable_cost",
        }
    }
}

impl fmt::Display for SeriesSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability contract for anything that can sit in a portfolio.
///
/// Every series has length `total_periods()`. Variants without a notion of
/// throughput return all-zero quantity and variable-cost series.
pub trait Flow: Send + Sync {
    fn id(&self) -> FlowId;

    fn name(&self) -> &str;

    fn total_periods(&self) -> usize;

    /// Currency amount per period
    fn amount_series(&self, discounted: bool) -> Vec<f64>;

    /// Throughput per period
    fn quantity_series(&self, discounted: bool) -> Vec<f64>;

    /// Cost driven by the quantity series
    fn variable_cost_series(&self, discounted: bool) -> Vec<f64>;

    fn to_record(&self) -> FlowRecord;

    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_record())
    }

    /// Dispatch to one of the six series
    fn series(&self, selector: SeriesSelector) -> Vec<f64> {
        let discounted = selector.is_discounted();
        match selector {
            SeriesSelector::Amount | SeriesSelector::DiscountedAmount => self.amount_series(discounted),
            SeriesSelector::Quantity | SeriesSelector::DiscountedQuantity => self.quantity_series(discounted),
            SeriesSelector::VariableCost | SeriesSelector::DiscountedVariableCost => {
                self.variable_cost_series(discounted)
            }
        }
    }
}
