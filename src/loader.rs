//! Load validated flow parameters from CSV into a portfolio
//!
//! One row per line item. Values are expected already unit-converted
//! (currency in dollars, rates annual). Cells a row's kind does not use may
//! be left empty.

use std::path::Path;

use csv::Reader;

use crate::error::{FlowError, Result};
use crate::flow::{FixedCostFlow, FixedCostParams, FIXED_COST_PERIODS};
use crate::portfolio::{Portfolio, PortfolioConfig};
use crate::profile::{CashFlowParams, CashFlowProfile, ProfileFunction};

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    kind: String,
    name: String,
    function: Option<String>,
    is_cost: Option<bool>,
    delay_periods: Option<u32>,
    scale_up_periods: Option<u32>,
    start_amount: Option<f64>,
    max_amount: Option<f64>,
    digital_quantity: Option<f64>,
    variable_cost_per_unit: Option<f64>,
    discount_rate_annual: f64,
    period_cost: Option<f64>,
    fte_year1: Option<f64>,
    fte_year2: Option<f64>,
    fte_year3: Option<f64>,
}

fn required<T>(value: Option<T>, row: usize, field: &'static str) -> Result<T> {
    value.ok_or(FlowError::MissingField { row, field })
}

impl CsvRow {
    fn add_to(self, row: usize, config: &PortfolioConfig, portfolio: &mut Portfolio) -> Result<()> {
        match self.kind.trim().to_lowercase().as_str() {
            "profile" => {
                let function: ProfileFunction = required(self.function, row, "function")?.parse()?;
                let params = CashFlowParams {
                    name: self.name,
                    function,
                    is_cost: self.is_cost.unwrap_or(false),
                    delay_periods: required(self.delay_periods, row, "delay_periods")?,
                    scale_up_periods: required(self.scale_up_periods, row, "scale_up_periods")?,
                    max_amount: required(self.max_amount, row, "max_amount")?,
                    start_amount: self.start_amount.unwrap_or(0.0),
                    digital_quantity: self.digital_quantity.unwrap_or(0.0),
                    variable_cost_per_unit: self.variable_cost_per_unit.unwrap_or(0.0),
                    discount_rate_annual: self.discount_rate_annual,
                    total_periods: config.total_periods,
                    quantity_unit_scale: config.quantity_unit_scale,
                };
                portfolio.push(CashFlowProfile::new(params)?);
            }
            "fixed_cost" => {
                if config.total_periods != FIXED_COST_PERIODS {
                    log::warn!(
                        "rejecting fixed-cost row {} ({}): portfolio runs {} periods",
                        row, self.name, config.total_periods
                    );
                    return Err(FlowError::FixedCostPeriods {
                        row,
                        name: self.name,
                        fixed: FIXED_COST_PERIODS,
                        configured: config.total_periods,
                    });
                }
                let params = FixedCostParams {
                    name: self.name,
                    discount_rate_annual: self.discount_rate_annual,
                    period_cost: required(self.period_cost, row, "period_cost")?,
                    fte_year1: self.fte_year1.unwrap_or(0.0),
                    fte_year2: self.fte_year2.unwrap_or(0.0),
                    fte_year3: self.fte_year3.unwrap_or(0.0),
                };
                portfolio.push(FixedCostFlow::new(params));
            }
            other => {
                return Err(FlowError::UnknownFlowKind { row, kind: other.to_string() });
            }
        }
        Ok(())
    }
}

/// Load all flows from a CSV file
pub fn load_flows<P: AsRef<Path>>(path: P, config: &PortfolioConfig) -> Result<Portfolio> {
    let file = std::fs::File::open(path)?;
    load_flows_from_reader(file, config)
}

/// Load flows from any reader (e.g., string buffer)
pub fn load_flows_from_reader<R: std::io::Read>(reader: R, config: &PortfolioConfig) -> Result<Portfolio> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut portfolio = Portfolio::new();

    // Rows are numbered from 1, header excluded
    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        row.add_to(index + 1, config, &mut portfolio)?;
    }

    log::info!("loaded {} flows", portfolio.len());
    Ok(portfolio)
}
