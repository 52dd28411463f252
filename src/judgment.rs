//! Price fairness classification
//!
//! An ordered rule table maps a listed price against the simulated market
//! summary and the point prediction. Rules are evaluated top to bottom and
//! the first match wins; the order encodes their priority.

use serde::{Deserialize, Serialize};

use crate::stats::MarketSummary;

/// Qualitative verdict on a listed price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Judgment {
    SuspiciouslyUnderpriced,
    FairLow,
    PredictedPrice,
    GoodDeal,
    FairPrice,
    Overpriced,
}

impl Judgment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Judgment::SuspiciouslyUnderpriced => "SUSPICIOUSLY_UNDERPRICED",
            Judgment::FairLow => "FAIR_LOW",
            Judgment::PredictedPrice => "PREDICTED_PRICE",
            Judgment::GoodDeal => "GOOD_DEAL",
            Judgment::FairPrice => "FAIR_PRICE",
            Judgment::Overpriced => "OVERPRICED",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RuleInputs {
    listed: f64,
    predicted: f64,
    min: f64,
    mean: f64,
    max: f64,
}

type Rule = (fn(&RuleInputs) -> bool, Judgment);

/// The decision table. Every threshold is a multiplicative factor of the
/// market min/mean/max or the point prediction.
const RULES: &[Rule] = &[
    (
        |c| c.listed < f64::max(c.min * 0.9, c.mean * 0.7),
        Judgment::SuspiciouslyUnderpriced,
    ),
    (|c| c.listed < c.mean * 0.85, Judgment::FairLow),
    (
        |c| c.predicted * 0.95 <= c.listed && c.listed <= c.predicted * 1.05,
        Judgment::PredictedPrice,
    ),
    (|c| c.listed < c.mean * 0.95, Judgment::GoodDeal),
    (|c| c.listed < c.predicted, Judgment::PredictedPrice),
    (|c| c.listed <= c.max, Judgment::FairPrice),
    (|_| true, Judgment::Overpriced),
];

/// Classify a listed price. Total: the final catch-all rule guarantees
/// exactly one verdict for any finite inputs.
pub fn judge(listed: f64, predicted: f64, summary: &MarketSummary) -> Judgment {
    let inputs = RuleInputs {
        listed,
        predicted,
        min: summary.min,
        mean: summary.mean,
        max: summary.max,
    };
    RULES
        .iter()
        .find(|(matches, _)| matches(&inputs))
        .map(|(_, verdict)| *verdict)
        .unwrap_or(Judgment::Overpriced)
}
