use std::{fmt::Display, str::FromStr};

use serde::Serialize;

use super::LedgerError;

/// Closed set of activity categories the ledger knows how to account for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Travel,
    Electricity,
    Food,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Travel, Category::Electricity, Category::Food];

    /// Subcategory used when a user doesn't specify one.
    pub fn default_subcategory(self) -> &'static str {
        match self {
            Category::Travel => "car",
            Category::Electricity => "grid",
            Category::Food => "meat",
        }
    }

    /// Every factor registered for this category, in table order.
    pub fn factors(self) -> impl Iterator<Item = &'static EmissionFactor> {
        FACTORS.iter().filter(move |f| f.category == self)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Travel => write!(f, "Travel"),
            Category::Electricity => write!(f, "Electricity"),
            Category::Food => write!(f, "Food"),
        }
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "travel" | "transport" => Ok(Category::Travel),
            "electricity" | "energy" => Ok(Category::Electricity),
            "food" => Ok(Category::Food),
            _ => Err(LedgerError::UnknownCategory { input: s.into() }),
        }
    }
}

/// Constant kg CO2e emitted per unit of an activity.
#[derive(Debug, PartialEq, Serialize)]
pub struct EmissionFactor {
    pub category: Category,
    pub name: &'static str,
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    pub unit: &'static str,
    pub kg_per_unit: f64,
    /// Quantity is a count (meals), so fractions are rejected.
    #[serde(skip)]
    pub whole_units: bool,
}

impl EmissionFactor {
    const fn new(
        category: Category,
        name: &'static str,
        aliases: &'static [&'static str],
        unit: &'static str,
        kg_per_unit: f64,
    ) -> Self {
        Self {
            category,
            name,
            aliases,
            unit,
            kg_per_unit,
            whole_units: false,
        }
    }

    const fn counted(self) -> Self {
        Self {
            whole_units: true,
            ..self
        }
    }

    /// `name` is expected to be trimmed and lowercase already.
    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

pub static FACTORS: &[EmissionFactor] = &[
    EmissionFactor::new(Category::Travel, "car", &[], "km", 0.21),
    EmissionFactor::new(Category::Travel, "bus", &[], "km", 0.089),
    EmissionFactor::new(Category::Travel, "train", &[], "km", 0.041),
    EmissionFactor::new(Category::Travel, "flight", &["plane"], "km", 0.255),
    EmissionFactor::new(
        Category::Electricity,
        "grid",
        &["electricity", "kwh"],
        "kWh",
        0.92,
    ),
    EmissionFactor::new(
        Category::Electricity,
        "natural-gas",
        &["naturalgas", "gas"],
        "therm",
        2.0,
    ),
    EmissionFactor::new(
        Category::Electricity,
        "heating-oil",
        &["heatingoil", "oil"],
        "L",
        2.68,
    ),
    EmissionFactor::new(Category::Food, "meat", &[], "kg", 14.0),
    EmissionFactor::new(Category::Food, "veg", &["vegetables"], "kg", 2.0),
    EmissionFactor::new(Category::Food, "beef", &[], "kg", 27.0),
    EmissionFactor::new(Category::Food, "pork", &[], "kg", 12.1),
    EmissionFactor::new(Category::Food, "chicken", &[], "kg", 6.9),
    EmissionFactor::new(
        Category::Food,
        "vegetarian",
        &["vegetarian-meal"],
        "meal",
        2.0,
    )
    .counted(),
];

/// Finds the factor for a subcategory. Matching ignores case and surrounding whitespace.
pub fn lookup(category: Category, subcategory: &str) -> Result<&'static EmissionFactor, LedgerError> {
    let wanted = subcategory.trim().to_ascii_lowercase();
    category
        .factors()
        .find(|f| f.matches(&wanted))
        .ok_or_else(|| LedgerError::InvalidFactor {
            category,
            subcategory: subcategory.into(),
        })
}

#[cfg(test)]
mod factor_tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_aliases() {
        assert_eq!(lookup(Category::Travel, " CAR ").unwrap().kg_per_unit, 0.21);
        assert_eq!(
            lookup(Category::Electricity, "naturalGas").unwrap().name,
            "natural-gas"
        );
        assert_eq!(lookup(Category::Travel, "plane").unwrap().name, "flight");
    }

    #[test]
    fn lookup_is_scoped_to_category() {
        let err = lookup(Category::Food, "car").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidFactor {
                category: Category::Food,
                ..
            }
        ));
    }

    #[test]
    fn only_meals_are_counted() {
        let counted = FACTORS
            .iter()
            .filter(|f| f.whole_units)
            .map(|f| f.unit)
            .collect::<Vec<_>>();
        assert_eq!(counted, ["meal"]);
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Electricity).unwrap(),
            "\"electricity\""
        );
        let factor = serde_json::to_value(lookup(Category::Food, "vegetarian").unwrap()).unwrap();
        assert_eq!(factor["category"], "food");
        assert!(factor.get("whole_units").is_none());
    }

    #[test]
    fn every_category_has_a_valid_default() {
        for category in Category::ALL {
            let factor = lookup(category, category.default_subcategory()).unwrap();
            assert_eq!(factor.category, category);
        }
    }

    #[test]
    fn factor_names_are_unique_within_category() {
        for category in Category::ALL {
            let names = category
                .factors()
                .flat_map(|f| std::iter::once(f.name).chain(f.aliases.iter().copied()))
                .collect::<Vec<_>>();
            let mut deduped = names.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(names.len(), deduped.len(), "duplicate names in {category}");
        }
    }

    #[test]
    fn category_parsing() {
        assert_eq!("Energy".parse::<Category>().unwrap(), Category::Electricity);
        assert_eq!("travel".parse::<Category>().unwrap(), Category::Travel);
        assert!("water".parse::<Category>().is_err());
    }
}
