//! Cash-flow profiles CLI
//!
//! Loads a portfolio of flow parameters, prints each flow's series and the
//! portfolio total, and writes the per-quarter totals to CSV.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use cashflow_profiles::loader::load_flows;
use cashflow_profiles::{PortfolioConfig, SeriesSelector};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Series {
    Amount,
    Quantity,
    VariableCost,
}

impl Series {
    fn selector(self, discounted: bool) -> SeriesSelector {
        match (self, discounted) {
            (Series::Amount, false) => SeriesSelector::Amount,
            (Series::Amount, true) => SeriesSelector::DiscountedAmount,
            (Series::Quantity, false) => SeriesSelector::Quantity,
            (Series::Quantity, true) => SeriesSelector::DiscountedQuantity,
            (Series::VariableCost, false) => SeriesSelector::VariableCost,
            (Series::VariableCost, true) => SeriesSelector::DiscountedVariableCost,
        }
    }
}

#[derive(Parser)]
#[command(name = "cashflow_profiles")]
#[command(about = "Project quarterly cash-flow profiles and portfolio totals", long_about = None)]
#[command(version)]
struct Cli {
    /// CSV of flow parameters
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the per-quarter totals
    #[arg(short, long, default_value = "portfolio_totals.csv")]
    output: PathBuf,

    /// Number of quarters to project
    #[arg(short, long, default_value_t = cashflow_profiles::profile::DEFAULT_TOTAL_PERIODS)]
    periods: usize,

    /// Report present values instead of nominal amounts
    #[arg(short, long)]
    discounted: bool,

    /// Series to print per flow
    #[arg(short, long, value_enum, default_value = "amount")]
    series: Series,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = PortfolioConfig {
        total_periods: cli.periods,
        discounted: cli.discounted,
        ..Default::default()
    };

    let portfolio = load_flows(&cli.input, &config)
        .with_context(|| format!("failed to load flows from {}", cli.input.display()))?;
    let selector = cli.series.selector(config.discounted);

    println!("Portfolio: {} flows, {} ({})", portfolio.len(), cli.input.display(), selector);
    println!("{}", "-".repeat(80));

    for flow in portfolio.flows() {
        let values: Vec<String> = flow
            .series(selector)
            .iter()
            .map(|v| format!("{:.0}", v))
            .collect();
        println!("{:<24} {}", flow.name(), values.join(" "));
    }

    let total = portfolio.total(selector)?;
    println!("{}", "-".repeat(80));
    let values: Vec<String> = total.iter().map(|v| format!("{:.0}", v)).collect();
    println!("{:<24} {}", "TOTAL", values.join(" "));

    let mut file = File::create(&cli.output)
        .with_context(|| format!("unable to create {}", cli.output.display()))?;
    writeln!(file, "Quarter,Total")?;
    for (quarter, value) in total.iter().enumerate() {
        writeln!(file, "{},{:.2}", quarter, value)?;
    }
    println!("\nTotals written to: {}", cli.output.display());

    let summary = portfolio.summary(config.discounted)?;
    println!("\nSummary:");
    println!("  Quarters: {}", summary.total_periods);
    println!("  Total amount: ${:.2}", summary.total_amount);
    println!("  Total variable cost: ${:.2}", summary.total_variable_cost);
    println!("  Net: ${:.2}", summary.net_total);
    match summary.payback_period {
        Some(q) => println!("  Payback quarter: {}", q),
        None => println!("  Payback quarter: n/a"),
    }

    Ok(())
}
