//! Fixed-cost burn driven by a yearly headcount schedule

use serde::{Deserialize, Serialize};

use super::{Flow, FlowId, FlowRecord};
use crate::discount::{discount, quarterly_rate};
use crate::profile::PERIODS_PER_YEAR;

/// Number of schedule years; each expands to `PERIODS_PER_YEAR` periods
const SCHEDULE_YEARS: usize = 3;

/// Length of every fixed-cost series
pub const FIXED_COST_PERIODS: usize = SCHEDULE_YEARS * PERIODS_PER_YEAR as usize;

/// Inputs for a fixed-cost line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedCostParams {
    pub name: String,
    /// Annual rate; stored and reported quarterly (divided by 4)
    pub discount_rate_annual: f64,
    /// Cost of one FTE for one quarter
    pub period_cost: f64,
    pub fte_year1: f64,
    pub fte_year2: f64,
    pub fte_year3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostRecord {
    pub name: String,
    pub discount_rate_quarterly: f64,
    pub fte_year1: f64,
    pub fte_year2: f64,
    pub fte_year3: f64,
    pub flow_id: FlowId,
}

/// Labor-style cost: `period_cost * fte` every quarter, always a cost.
/// No throughput, so quantity and variable cost are all zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedCostFlow {
    id: FlowId,
    name: String,
    discount_rate_quarterly: f64,
    period_cost: f64,
    fte_years: [f64; SCHEDULE_YEARS],
}

impl FixedCostFlow {
    pub fn new(params: FixedCostParams) -> Self {
        Self::with_id(FlowId::new(), params)
    }

    pub fn with_id(id: FlowId, params: FixedCostParams) -> Self {
        log::debug!("built fixed-cost flow {} ({})", params.name, id);
        Self {
            id,
            name: params.name,
            discount_rate_quarterly: quarterly_rate(params.discount_rate_annual),
            period_cost: params.period_cost,
            fte_years: [params.fte_year1, params.fte_year2, params.fte_year3],
        }
    }

    /// Rebuild from a record; the per-period cost is not part of the record
    pub fn from_record(record: &FixedCostRecord, period_cost: f64) -> Self {
        Self::with_id(
            record.flow_id,
            FixedCostParams {
                name: record.name.clone(),
                discount_rate_annual: record.discount_rate_quarterly * PERIODS_PER_YEAR as f64,
                period_cost,
                fte_year1: record.fte_year1,
                fte_year2: record.fte_year2,
                fte_year3: record.fte_year3,
            },
        )
    }

    pub fn period_cost(&self) -> f64 {
        self.period_cost
    }

    /// Yearly headcount repeated for each quarter of its year
    pub fn fte_by_period(&self) -> Vec<f64> {
        self.fte_years
            .iter()
            .flat_map(|&fte| std::iter::repeat(fte).take(PERIODS_PER_YEAR as usize))
            .collect()
    }

    pub fn record(&self) -> FixedCostRecord {
        FixedCostRecord {
            name: self.name.clone(),
            discount_rate_quarterly: self.discount_rate_quarterly,
            fte_year1: self.fte_years[0],
            fte_year2: self.fte_years[1],
            fte_year3: self.fte_years[2],
            flow_id: self.id,
        }
    }
}

impl Flow for FixedCostFlow {
    fn id(&self) -> FlowId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn total_periods(&self) -> usize {
        FIXED_COST_PERIODS
    }

    fn amount_series(&self, discounted: bool) -> Vec<f64> {
        self.fte_by_period()
            .into_iter()
            .enumerate()
            .map(|(period, fte)| {
                let amount = -self.period_cost * fte;
                if discounted {
                    discount(amount, self.discount_rate_quarterly, period)
                } else {
                    amount
                }
            })
            .collect()
    }

    fn quantity_series(&self, _discounted: bool) -> Vec<f64> {
        vec![0.0; self.total_periods()]
    }

    fn variable_cost_series(&self, _discounted: bool) -> Vec<f64> {
        vec![0.0; self.total_periods()]
    }

    fn to_record(&self) -> FlowRecord {
        FlowRecord::FixedCost(self.record())
    }
}
