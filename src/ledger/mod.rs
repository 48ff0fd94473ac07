//! In-memory accounting of recorded activities.
//!
//! [EmissionLedger] keeps every recorded [ActivityRecord] in insertion order. Emissions are never
//! stored; they are derived from the quantity and the static [factors::FACTORS] table whenever a
//! total or a breakdown is requested.

pub mod advice;
pub mod factors;

use std::collections::BTreeMap;

use advice::{FootprintStatus, Suggestion};
use factors::{Category, EmissionFactor};
use thiserror::Error;
use tracing::debug;

/// Validation failures. None of them modify the ledger.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("Invalid quantity {input:?}. Expected a non-negative number (whole for meals)")]
    InvalidQuantity { input: String },

    #[error("Unknown type {subcategory:?} for category {category}")]
    InvalidFactor {
        category: Category,
        subcategory: String,
    },

    #[error("Unknown category {input:?}. Expected one of travel, electricity, food")]
    UnknownCategory { input: String },
}

/// Parses user-provided text into a quantity accepted by [EmissionLedger::record].
pub fn parse_quantity(input: &str) -> Result<f64, LedgerError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| is_valid_quantity(*v))
        .ok_or_else(|| LedgerError::InvalidQuantity {
            input: input.trim().into(),
        })
}

fn is_valid_quantity(value: f64) -> bool {
    value.is_finite() && value >= 0.
}

/// A single recorded activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub category: Category,
    pub factor: &'static EmissionFactor,
    pub quantity: f64,
}

impl ActivityRecord {
    pub fn subcategory(&self) -> &'static str {
        self.factor.name
    }

    pub fn unit(&self) -> &'static str {
        self.factor.unit
    }

    /// Emitted kg CO2e.
    pub fn emission(&self) -> f64 {
        self.quantity * self.factor.kg_per_unit
    }
}

/// `Iterator::sum` over no floats yields `-0.0`, which would print as "-0.00".
fn sum_emissions<'a>(records: impl Iterator<Item = &'a ActivityRecord>) -> f64 {
    records.fold(0., |acc, record| acc + record.emission())
}

#[derive(Debug, Default)]
pub struct EmissionLedger {
    records: Vec<ActivityRecord>,
}

impl EmissionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an activity and returns its emission in kg CO2e.
    pub fn record(
        &mut self,
        category: Category,
        subcategory: &str,
        quantity: f64,
    ) -> Result<f64, LedgerError> {
        if !is_valid_quantity(quantity) {
            return Err(LedgerError::InvalidQuantity {
                input: quantity.to_string(),
            });
        }
        let factor = factors::lookup(category, subcategory)?;
        if factor.whole_units && quantity.fract() != 0. {
            return Err(LedgerError::InvalidQuantity {
                input: quantity.to_string(),
            });
        }
        let record = ActivityRecord {
            category,
            factor,
            quantity,
        };
        let emission = record.emission();
        // The running total must stay finite.
        if !emission.is_finite() || !(self.total_emissions() + emission).is_finite() {
            return Err(LedgerError::InvalidQuantity {
                input: quantity.to_string(),
            });
        }
        debug!(
            "Recorded {category}/{} {quantity} {} = {emission} kg",
            factor.name, factor.unit
        );
        self.records.push(record);
        Ok(emission)
    }

    pub fn total_emissions(&self) -> f64 {
        sum_emissions(self.records.iter())
    }

    /// Subtotal of a single category. Zero when nothing was recorded for it.
    pub fn category_total(&self, category: Category) -> f64 {
        sum_emissions(self.records.iter().filter(|r| r.category == category))
    }

    /// Only categories with at least one record are present.
    pub fn breakdown_by_category(&self) -> BTreeMap<Category, f64> {
        let mut breakdown = BTreeMap::new();
        for record in &self.records {
            *breakdown.entry(record.category).or_insert(0.) += record.emission();
        }
        breakdown
    }

    /// Per-type subtotals inside a category. Only types with at least one record are present.
    pub fn breakdown_by_subcategory(&self, category: Category) -> BTreeMap<&'static str, f64> {
        let mut breakdown = BTreeMap::new();
        for record in self.records.iter().filter(|r| r.category == category) {
            *breakdown.entry(record.subcategory()).or_insert(0.) += record.emission();
        }
        breakdown
    }

    pub fn history(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn reset(&mut self) {
        debug!("Clearing {} records", self.records.len());
        self.records.clear();
    }

    pub fn suggestion(&self) -> Suggestion {
        Suggestion::evaluate(self.category_total(Category::Travel), self.total_emissions())
    }

    pub fn footprint_status(&self) -> Option<FootprintStatus> {
        FootprintStatus::evaluate(self.total_emissions())
    }
}

#[cfg(test)]
mod ledger_tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn sample(ledger: &mut EmissionLedger) {
        ledger.record(Category::Travel, "car", 100.).unwrap();
        ledger.record(Category::Electricity, "grid", 10.).unwrap();
        ledger.record(Category::Food, "meat", 2.).unwrap();
        ledger.record(Category::Travel, "bus", 20.).unwrap();
    }

    #[test]
    fn record_returns_emission() {
        let mut ledger = EmissionLedger::new();
        assert_close(ledger.record(Category::Travel, "car", 100.).unwrap(), 21.);
        assert_close(ledger.record(Category::Food, "meat", 2.).unwrap(), 28.);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn empty_ledger() {
        let ledger = EmissionLedger::new();
        assert_eq!(ledger.total_emissions(), 0.);
        assert!(ledger.breakdown_by_category().is_empty());
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.suggestion(), Suggestion::StartTracking);
        assert_eq!(ledger.footprint_status(), None);
    }

    #[test]
    fn total_is_independent_of_order() {
        let entries = [
            (Category::Travel, "flight", 350.),
            (Category::Food, "beef", 0.4),
            (Category::Electricity, "heating-oil", 12.5),
            (Category::Travel, "train", 42.),
            (Category::Food, "vegetarian", 3.),
        ];
        let expected = entries
            .iter()
            .map(|(c, s, q)| q * factors::lookup(*c, s).unwrap().kg_per_unit)
            .sum::<f64>();

        let mut forward = EmissionLedger::new();
        for (c, s, q) in entries {
            forward.record(c, s, q).unwrap();
        }
        let mut backward = EmissionLedger::new();
        for (c, s, q) in entries.into_iter().rev() {
            backward.record(c, s, q).unwrap();
        }

        assert_close(forward.total_emissions(), expected);
        assert_close(backward.total_emissions(), expected);
    }

    #[test]
    fn breakdown_omits_categories_without_entries() {
        let mut ledger = EmissionLedger::new();
        ledger.record(Category::Travel, "car", 100.).unwrap();
        ledger.record(Category::Travel, "bus", 100.).unwrap();

        let breakdown = ledger.breakdown_by_category();
        assert_eq!(breakdown.len(), 1);
        assert_close(breakdown[&Category::Travel], 29.9);
        assert!(!breakdown.contains_key(&Category::Food));
        assert!(!breakdown.contains_key(&Category::Electricity));
    }

    #[test]
    fn breakdown_by_subcategory_sums_per_type() {
        let mut ledger = EmissionLedger::new();
        sample(&mut ledger);
        ledger.record(Category::Travel, "Car", 10.).unwrap();

        let travel = ledger.breakdown_by_subcategory(Category::Travel);
        assert_eq!(travel.len(), 2);
        assert_close(travel["car"], 23.1);
        assert_close(travel["bus"], 1.78);
        assert!(ledger.breakdown_by_subcategory(Category::Food).contains_key("meat"));
    }

    #[test]
    fn history_keeps_insertion_order() {
        let mut ledger = EmissionLedger::new();
        sample(&mut ledger);
        let names = ledger
            .history()
            .iter()
            .map(ActivityRecord::subcategory)
            .collect::<Vec<_>>();
        assert_eq!(names, ["car", "grid", "meat", "bus"]);
    }

    #[test]
    fn rejected_records_leave_ledger_unchanged() {
        let mut ledger = EmissionLedger::new();
        sample(&mut ledger);
        let total = ledger.total_emissions();

        assert!(matches!(
            ledger.record(Category::Travel, "car", -1.),
            Err(LedgerError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            ledger.record(Category::Travel, "car", f64::NAN),
            Err(LedgerError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            ledger.record(Category::Electricity, "car", 3.),
            Err(LedgerError::InvalidFactor { .. })
        ));
        assert!(matches!(
            ledger.record(Category::Food, "tofu", f64::INFINITY),
            Err(LedgerError::InvalidQuantity { .. })
        ));

        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.total_emissions(), total);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut ledger = EmissionLedger::new();
        sample(&mut ledger);
        ledger.reset();
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_emissions(), 0.);
        assert!(ledger.breakdown_by_category().is_empty());
        assert_eq!(ledger.suggestion(), Suggestion::StartTracking);
    }

    #[test]
    fn suggestion_follows_travel_share() {
        let mut ledger = EmissionLedger::new();
        ledger.record(Category::Travel, "car", 100.).unwrap();
        assert_eq!(ledger.suggestion(), Suggestion::ReduceTravel);

        // 21 kg of food against 21 kg of travel is exactly half.
        ledger.record(Category::Food, "veg", 10.5).unwrap();
        assert_eq!(ledger.suggestion(), Suggestion::KeepGoing);
    }

    #[test]
    fn zero_quantity_is_recorded() {
        let mut ledger = EmissionLedger::new();
        assert_eq!(ledger.record(Category::Food, "beef", 0.).unwrap(), 0.);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.breakdown_by_category()[&Category::Food], 0.);
        assert_eq!(ledger.suggestion(), Suggestion::StartTracking);
    }

    #[test]
    fn empty_totals_are_positive_zero() {
        let mut ledger = EmissionLedger::new();
        assert!(!ledger.total_emissions().is_sign_negative());
        sample(&mut ledger);
        ledger.reset();
        assert!(!ledger.total_emissions().is_sign_negative());
        assert!(!ledger.category_total(Category::Food).is_sign_negative());
    }

    #[test]
    fn overflowing_emissions_are_rejected() {
        let mut ledger = EmissionLedger::new();
        assert!(matches!(
            ledger.record(Category::Food, "beef", 1e307),
            Err(LedgerError::InvalidQuantity { .. })
        ));
        assert!(ledger.is_empty());

        let accepted = (0..10)
            .filter(|_| ledger.record(Category::Travel, "car", f64::MAX).is_ok())
            .count();
        assert_eq!(accepted, 4);
        assert_eq!(ledger.len(), 4);
        assert!(ledger.total_emissions().is_finite());
        assert!(ledger.breakdown_by_category()[&Category::Travel].is_finite());
        assert_eq!(ledger.suggestion(), Suggestion::ReduceTravel);
    }

    #[test]
    fn meals_are_counted_whole() {
        let mut ledger = EmissionLedger::new();
        assert!(matches!(
            ledger.record(Category::Food, "vegetarian", 1.5),
            Err(LedgerError::InvalidQuantity { .. })
        ));
        assert_eq!(ledger.record(Category::Food, "vegetarian", 3.).unwrap(), 6.);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn parse_quantity_validates_text() {
        assert_eq!(parse_quantity(" 12.5 ").unwrap(), 12.5);
        assert_eq!(
            parse_quantity("abc"),
            Err(LedgerError::InvalidQuantity {
                input: "abc".into()
            })
        );
        assert!(parse_quantity("-3").is_err());
        assert!(parse_quantity("inf").is_err());
        assert!(parse_quantity("NaN").is_err());
    }
}
