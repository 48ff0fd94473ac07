use serde::Serialize;

use crate::{
    ledger::{factors::Category, EmissionLedger},
    utils::percentage::{share_percentage, Percentage},
};

#[derive(Debug, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub kg: f64,
    pub share: Percentage,
}

#[derive(Debug, Serialize)]
pub struct SubcategoryShare {
    #[serde(rename = "type")]
    pub subcategory: &'static str,
    pub kg: f64,
    /// Share of the grand total, not of the category.
    pub share: Percentage,
}

/// Returns categories with their share of the total, largest first. Categories below
/// `min_percentage` are left out.
pub fn analyze_categories(
    ledger: &EmissionLedger,
    min_percentage: Percentage,
) -> Vec<CategoryShare> {
    let total = ledger.total_emissions();

    let mut shares = ledger
        .breakdown_by_category()
        .into_iter()
        .map(|(category, kg)| CategoryShare {
            category,
            kg,
            share: share_percentage(kg, total),
        })
        .filter(|v| v.share >= min_percentage)
        .collect::<Vec<_>>();
    shares.sort_by(|a, b| b.kg.total_cmp(&a.kg));
    shares
}

/// Same as [analyze_categories] but for types inside a single category.
pub fn analyze_subcategories(
    ledger: &EmissionLedger,
    category: Category,
    min_percentage: Percentage,
) -> Vec<SubcategoryShare> {
    let total = ledger.total_emissions();

    let mut shares = ledger
        .breakdown_by_subcategory(category)
        .into_iter()
        .map(|(subcategory, kg)| SubcategoryShare {
            subcategory,
            kg,
            share: share_percentage(kg, total),
        })
        .filter(|v| v.share >= min_percentage)
        .collect::<Vec<_>>();
    shares.sort_by(|a, b| b.kg.total_cmp(&a.kg));
    shares
}
