//! Portfolio aggregation: elementwise totals across heterogeneous flows

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{FlowError, Result};
use crate::flow::{Flow, FlowRecord, SeriesSelector};
use crate::profile::{DEFAULT_QUANTITY_UNIT_SCALE, DEFAULT_TOTAL_PERIODS};

/// Settings shared by every flow built for one portfolio run
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioConfig {
    /// Length of every cash-flow profile series
    pub total_periods: usize,
    /// Multiplier turning declared quantities into units
    pub quantity_unit_scale: f64,
    /// Whether reports use present values
    pub discounted: bool,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            total_periods: DEFAULT_TOTAL_PERIODS,
            quantity_unit_scale: DEFAULT_QUANTITY_UNIT_SCALE,
            discounted: false,
        }
    }
}

/// Sum one named series across `flows`, period by period.
///
/// Every flow must produce the same number of periods; the first flow's
/// length is the expected one. Mismatches are rejected, never truncated.
pub fn combine(flows: &[&dyn Flow], selector: SeriesSelector) -> Result<Vec<f64>> {
    sum_series(flows.iter().map(|&flow| (flow, flow.series(selector))))
}

fn sum_series<'a, I>(evaluated: I) -> Result<Vec<f64>>
where
    I: IntoIterator<Item = (&'a dyn Flow, Vec<f64>)>,
{
    let mut evaluated = evaluated.into_iter();
    let (_, mut total) = evaluated.next().ok_or(FlowError::EmptyPortfolio)?;

    for (flow, series) in evaluated {
        if series.len() != total.len() {
            log::warn!(
                "flow {} ({}) has {} periods, portfolio has {}",
                flow.name(), flow.id(), series.len(), total.len()
            );
            return Err(FlowError::LengthMismatch {
                flow_id: flow.id(),
                name: flow.name().to_string(),
                expected: total.len(),
                actual: series.len(),
            });
        }
        for (acc, value) in total.iter_mut().zip(&series) {
            *acc += value;
        }
    }

    Ok(total)
}

/// Owned collection of flows evaluated together
#[derive(Default)]
pub struct Portfolio {
    flows: Vec<Box<dyn Flow>>,
}

impl fmt::Debug for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.flows.iter().map(|flow| (flow.name(), flow.id())))
            .finish()
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F: Flow + 'static>(&mut self, flow: F) {
        self.flows.push(Box::new(flow));
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn flows(&self) -> impl Iterator<Item = &dyn Flow> {
        self.flows.iter().map(|flow| flow.as_ref())
    }

    /// Portfolio total of one series.
    ///
    /// Flows are evaluated in parallel; the sum is folded in insertion order
    /// so the result does not depend on scheduling.
    pub fn total(&self, selector: SeriesSelector) -> Result<Vec<f64>> {
        log::debug!("aggregating {} across {} flows", selector, self.flows.len());
        let evaluated: Vec<Vec<f64>> = self
            .flows
            .par_iter()
            .map(|flow| flow.series(selector))
            .collect();
        sum_series(self.flows().zip(evaluated))
    }

    pub fn records(&self) -> Vec<FlowRecord> {
        self.flows.iter().map(|flow| flow.to_record()).collect()
    }

    /// Net position of the whole portfolio
    pub fn summary(&self, discounted: bool) -> Result<PortfolioSummary> {
        let (amount, quantity, variable_cost) = if discounted {
            (
                self.total(SeriesSelector::DiscountedAmount)?,
                self.total(SeriesSelector::DiscountedQuantity)?,
                self.total(SeriesSelector::DiscountedVariableCost)?,
            )
        } else {
            (
                self.total(SeriesSelector::Amount)?,
                self.total(SeriesSelector::Quantity)?,
                self.total(SeriesSelector::VariableCost)?,
            )
        };
        Ok(PortfolioSummary::from_totals(&amount, &quantity, &variable_cost))
    }
}

/// Summary statistics for a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_periods: usize,
    pub total_amount: f64,
    pub total_quantity: f64,
    pub total_variable_cost: f64,
    pub net_total: f64,
    /// Amount plus variable cost, per period
    pub net_by_period: Vec<f64>,
    pub cumulative_net: Vec<f64>,
    /// First period where cumulative net recovers to >= 0 after being negative
    pub payback_period: Option<usize>,
}

impl PortfolioSummary {
    pub fn from_totals(amount: &[f64], quantity: &[f64], variable_cost: &[f64]) -> Self {
        let net_by_period: Vec<f64> = amount
            .iter()
            .zip(variable_cost)
            .map(|(a, v)| a + v)
            .collect();

        let cumulative_net: Vec<f64> = net_by_period
            .iter()
            .scan(0.0, |acc, &net| {
                *acc += net;
                Some(*acc)
            })
            .collect();

        Self {
            total_periods: amount.len(),
            total_amount: amount.iter().sum(),
            total_quantity: quantity.iter().sum(),
            total_variable_cost: variable_cost.iter().sum(),
            net_total: net_by_period.iter().sum(),
            payback_period: payback_period(&cumulative_net),
            net_by_period,
            cumulative_net,
        }
    }
}

fn payback_period(cumulative: &[f64]) -> Option<usize> {
    let mut underwater = false;
    for (period, &value) in cumulative.iter().enumerate() {
        if value < 0.0 {
            underwater = true;
        } else if underwater {
            return Some(period);
        }
    }
    None
}
