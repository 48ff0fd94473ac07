//! Text and JSON rendering of a ledger. Every renderer returns a `String` so that the same output
//! can be printed to stdout by one-shot commands and written to the interactive menu's writer.

pub mod analysis;

use std::fmt::Write;

use ansi_term::{Colour, Style};
use serde::Serialize;

use crate::{
    ledger::{
        advice::{FootprintStatus, Suggestion, QUICK_TIPS},
        factors::{Category, EmissionFactor, FACTORS},
        ActivityRecord, EmissionLedger,
    },
    utils::percentage::Percentage,
};

use analysis::{analyze_categories, analyze_subcategories, CategoryShare, SubcategoryShare};

pub const UNIT: &str = "kg CO2";

#[derive(Debug, Clone, Copy)]
pub struct OutputStyle {
    pub color: bool,
}

impl OutputStyle {
    fn heading(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    fn status(&self, status: FootprintStatus) -> String {
        let style = match status {
            FootprintStatus::Low => Colour::Green.bold(),
            FootprintStatus::High => Colour::Yellow.bold(),
        };
        self.paint(style, status.message())
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn render_total(ledger: &EmissionLedger) -> String {
    format!("Total emissions: {:.2} {UNIT}", ledger.total_emissions())
}

fn describe(record: &ActivityRecord) -> String {
    format!(
        "{}: {} - {} {}",
        record.category,
        record.subcategory(),
        record.quantity,
        record.unit()
    )
}

pub fn render_history(ledger: &EmissionLedger, style: OutputStyle) -> String {
    if ledger.is_empty() {
        return "No activities yet.".into();
    }
    let mut out = style.heading("Activity History:");
    for (i, record) in ledger.history().iter().enumerate() {
        let _ = write!(
            out,
            "\n{}. {} | Emissions: {:.2} {UNIT}",
            i + 1,
            describe(record),
            record.emission()
        );
    }
    out
}

pub fn render_breakdown(
    ledger: &EmissionLedger,
    min_percentage: Percentage,
    style: OutputStyle,
) -> String {
    let categories = analyze_categories(ledger, min_percentage);
    if categories.is_empty() {
        return "Nothing to break down yet.".into();
    }
    let mut out = style.heading("Emission Breakdown:");
    for CategoryShare {
        category,
        kg,
        share,
    } in categories
    {
        let _ = write!(out, "\n{category}\t{kg:.2} kg\t{share}");
        for SubcategoryShare {
            subcategory,
            kg,
            share,
        } in analyze_subcategories(ledger, category, min_percentage)
        {
            let _ = write!(out, "\n  {subcategory}\t{kg:.2} kg\t{share}");
        }
    }
    out
}

pub fn render_suggestion(ledger: &EmissionLedger) -> String {
    ledger.suggestion().to_string()
}

/// Everything a user might want to see at once.
pub fn render_report(
    ledger: &EmissionLedger,
    min_percentage: Percentage,
    style: OutputStyle,
) -> String {
    let mut sections = vec![render_total(ledger), render_history(ledger, style)];
    if !ledger.is_empty() {
        sections.push(render_breakdown(ledger, min_percentage, style));
    }
    sections.push(render_suggestion(ledger));

    if let Some(status) = ledger.footprint_status() {
        sections.push(style.status(status));
    }
    if ledger.total_emissions() > 0. {
        let mut tips = style.heading("Quick Reduction Tips:");
        for tip in QUICK_TIPS {
            let _ = write!(tips, "\n  - {tip}");
        }
        sections.push(tips);
    }
    sections.join("\n\n")
}

pub fn render_factors(style: OutputStyle) -> String {
    let mut out = style.heading("Emission factors (kg CO2e per unit):");
    for category in Category::ALL {
        let _ = write!(out, "\n{category}");
        for factor in category.factors() {
            let _ = write!(
                out,
                "\n  {}\t{}\t{}",
                factor.name, factor.kg_per_unit, factor.unit
            );
        }
    }
    out
}

#[derive(Debug, Serialize)]
pub struct Advice<T> {
    pub kind: T,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ActivityView {
    pub category: Category,
    #[serde(rename = "type")]
    pub subcategory: &'static str,
    pub quantity: f64,
    pub unit: &'static str,
    pub kg: f64,
}

impl From<&ActivityRecord> for ActivityView {
    fn from(record: &ActivityRecord) -> Self {
        ActivityView {
            category: record.category,
            subcategory: record.subcategory(),
            quantity: record.quantity,
            unit: record.unit(),
            kg: record.emission(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    #[serde(flatten)]
    pub summary: CategoryShare,
    pub types: Vec<SubcategoryShare>,
}

/// Machine readable counterpart of [render_report].
#[derive(Debug, Serialize)]
pub struct Report {
    pub total_kg: f64,
    pub activities: Vec<ActivityView>,
    pub breakdown: Vec<CategoryView>,
    pub suggestion: Advice<Suggestion>,
    pub status: Option<Advice<FootprintStatus>>,
    pub tips: Vec<&'static str>,
}

impl Report {
    pub fn new(ledger: &EmissionLedger, min_percentage: Percentage) -> Self {
        let breakdown = analyze_categories(ledger, min_percentage)
            .into_iter()
            .map(|summary| CategoryView {
                types: analyze_subcategories(ledger, summary.category, min_percentage),
                summary,
            })
            .collect();
        let suggestion = ledger.suggestion();
        let status = ledger.footprint_status();
        Report {
            total_kg: ledger.total_emissions(),
            activities: ledger.history().iter().map(ActivityView::from).collect(),
            breakdown,
            suggestion: Advice {
                kind: suggestion,
                message: suggestion.message(),
            },
            status: status.map(|kind| Advice {
                kind,
                message: kind.message(),
            }),
            tips: if ledger.total_emissions() > 0. {
                QUICK_TIPS.to_vec()
            } else {
                vec![]
            },
        }
    }
}

pub fn factors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty::<[EmissionFactor]>(FACTORS)
}
