use std::fmt::Display;

use serde::Serialize;

/// Share of travel in the total above which travel reduction is suggested. The comparison is
/// strict.
pub const TRAVEL_SHARE_THRESHOLD: f64 = 0.5;

/// Totals above this many kg are considered a high footprint.
pub const HIGH_FOOTPRINT_KG: f64 = 500.;
/// Totals at or below this many kg are considered below average. Totals between the two bands
/// get no status line.
pub const LOW_FOOTPRINT_KG: f64 = 100.;

pub const QUICK_TIPS: [&str; 5] = [
    "Replace car trips with bus -> save 58% per km",
    "Use train instead of car -> save 80% per km",
    "Switch to LED bulbs -> save 75% on lighting",
    "Carpool to work -> cut commute emissions by 50%",
    "Bike or walk for trips under 5 km -> 100% reduction",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Suggestion {
    StartTracking,
    ReduceTravel,
    KeepGoing,
}

impl Suggestion {
    pub fn evaluate(travel: f64, total: f64) -> Self {
        if total == 0. {
            Suggestion::StartTracking
        } else if travel / total > TRAVEL_SHARE_THRESHOLD {
            Suggestion::ReduceTravel
        } else {
            Suggestion::KeepGoing
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Suggestion::StartTracking => "Add some activities to get suggestions!",
            Suggestion::ReduceTravel => {
                "Consider reducing car travel or using public transport more."
            }
            Suggestion::KeepGoing => "Great job! Keep tracking and finding ways to improve.",
        }
    }
}

impl Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FootprintStatus {
    Low,
    High,
}

impl FootprintStatus {
    /// Returns `None` when nothing has been emitted yet or the total sits between the bands.
    pub fn evaluate(total: f64) -> Option<Self> {
        if total > HIGH_FOOTPRINT_KG {
            Some(FootprintStatus::High)
        } else if total > 0. && total <= LOW_FOOTPRINT_KG {
            Some(FootprintStatus::Low)
        } else {
            None
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FootprintStatus::Low => "Excellent! You're below average - keep it up!",
            FootprintStatus::High => "Your footprint is high - small changes = big impact!",
        }
    }
}

impl Display for FootprintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
