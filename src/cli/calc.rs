use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    ledger::{factors::Category, parse_quantity, EmissionLedger},
    utils::percentage::Percentage,
};

use super::output::{render_report, OutputStyle, Report};

/// A single activity given on the command line as `<category>:<type>=<quantity>`. The type may be
/// omitted (`travel=12`) to use the category default.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySpec {
    pub category: Category,
    pub subcategory: Option<String>,
    /// Kept as text, the ledger decides whether it's a valid quantity.
    pub quantity: String,
}

impl FromStr for ActivitySpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, quantity) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected <category>:<type>=<quantity>, got {s:?}"))?;
        let (category, subcategory) = match kind.split_once(':') {
            Some((category, subcategory)) => (category, Some(subcategory.trim().to_string())),
            None => (kind, None),
        };
        Ok(ActivitySpec {
            category: category.parse()?,
            subcategory,
            quantity: quantity.trim().to_string(),
        })
    }
}

#[derive(Debug, Parser)]
pub struct CalcCommand {
    #[arg(
        short,
        long = "add",
        help = "Activity to record. Examples are \"travel:car=120\", \"food:beef=0.5\", \"electricity=300\""
    )]
    activities: Vec<ActivitySpec>,
    #[arg(short = 'p', long = "percentage", help = "Hide breakdown entries below the specified share of the total", default_value_t = Percentage::ZERO)]
    min_percentage: Percentage,
    #[arg(long, help = "Print the report as JSON")]
    json: bool,
}

/// Records every activity into a fresh ledger and prints a report. The first invalid activity
/// aborts the command.
pub fn process_calc_command(
    CalcCommand {
        activities,
        min_percentage,
        json,
    }: CalcCommand,
    style: OutputStyle,
) -> Result<()> {
    let ledger = build_ledger(&activities)?;
    info!(
        "Calculated {} activities, {} kg total",
        ledger.len(),
        ledger.total_emissions()
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&Report::new(&ledger, min_percentage))?
        );
    } else {
        println!("{}", render_report(&ledger, min_percentage, style));
    }
    Ok(())
}

fn build_ledger(activities: &[ActivitySpec]) -> Result<EmissionLedger> {
    let mut ledger = EmissionLedger::new();
    for spec in activities {
        let subcategory = spec
            .subcategory
            .as_deref()
            .unwrap_or_else(|| spec.category.default_subcategory());
        parse_quantity(&spec.quantity)
            .and_then(|q| ledger.record(spec.category, subcategory, q))
            .with_context(|| {
                format!(
                    "Failed to record {}:{subcategory}={}",
                    spec.category, spec.quantity
                )
            })?;
    }
    Ok(ledger)
}
