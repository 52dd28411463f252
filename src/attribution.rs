//! Attribution grouping
//!
//! Collapses raw per-feature attribution scores into a handful of semantic
//! groups, normalizes them to signed percentage-of-total-influence, and
//! keeps the top-ranked groups.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::encoding::{
    FeatureSchema, COL_AREA, COL_BATHROOMS, COL_BUILDING_AGE, COL_FLOOR, COL_FURNISHED,
    COL_MORTGAGED, COL_PAYMENT_METHOD, COL_ROOMS,
};
use crate::stats::round2;

/// Guard against a zero denominator when every group sums to 0
const NORM_EPSILON: f64 = 1e-9;

/// Number of groups retained after ranking
pub const TOP_GROUPS: usize = 4;

/// A named bucket of feature columns with one aggregated score.
///
/// `active_only` groups (the city one-hot block) count only members whose
/// encoded value is 1 for the current request, so model noise on inactive
/// indicators never leaks into the score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureGroup {
    pub name: String,
    pub features: Vec<String>,
    pub active_only: bool,
}

impl FeatureGroup {
    pub fn summed(name: &str, features: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            features: features.iter().map(|s| s.to_string()).collect(),
            active_only: false,
        }
    }
}

/// The static grouping the service reports: five attribute groups plus the
/// city one-hot block taken from the schema.
pub fn default_groups(schema: &FeatureSchema) -> Vec<FeatureGroup> {
    let city_columns: Vec<String> = schema
        .city_indices()
        .into_iter()
        .map(|i| schema.columns()[i].clone())
        .collect();

    vec![
        FeatureGroup::summed("area & rooms", &[COL_AREA, COL_ROOMS]),
        FeatureGroup::summed("bathrooms", &[COL_BATHROOMS]),
        FeatureGroup::summed(
            "condition",
            &[COL_FURNISHED, COL_BUILDING_AGE, COL_MORTGAGED],
        ),
        FeatureGroup::summed("payment", &[COL_PAYMENT_METHOD]),
        FeatureGroup::summed("floor", &[COL_FLOOR]),
        FeatureGroup {
            name: "city".to_string(),
            features: city_columns,
            active_only: true,
        },
    ]
}

/// A group with its members resolved to schema positions
#[derive(Debug, Clone)]
struct ResolvedGroup {
    name: String,
    indices: Vec<usize>,
    active_only: bool,
}

/// Aggregates schema-aligned attribution rows into ranked group percentages.
#[derive(Debug, Clone)]
pub struct AttributionAggregator {
    groups: Vec<ResolvedGroup>,
}

impl AttributionAggregator {
    /// Resolve group members against the schema once. Members absent from
    /// the schema are dropped and contribute 0.
    pub fn new(groups: &[FeatureGroup], schema: &FeatureSchema) -> Self {
        let groups = groups
            .iter()
            .map(|g| ResolvedGroup {
                name: g.name.clone(),
                indices: g
                    .features
                    .iter()
                    .filter_map(|f| schema.position(f))
                    .collect(),
                active_only: g.active_only,
            })
            .collect();
        Self { groups }
    }

    /// Group, normalize and rank one attribution row.
    ///
    /// `attributions` and `encoded` are both schema-aligned. The result is
    /// sorted by descending absolute percentage (stable, so ties keep the
    /// group definition order) and truncated to [`TOP_GROUPS`].
    pub fn aggregate(
        &self,
        attributions: ArrayView1<'_, f64>,
        encoded: ArrayView1<'_, f64>,
    ) -> Vec<(String, f64)> {
        let mut grouped: Vec<(String, f64)> = self
            .groups
            .iter()
            .map(|g| {
                let sum: f64 = g
                    .indices
                    .iter()
                    .filter(|&&i| !g.active_only || encoded[i] == 1.0)
                    .map(|&i| attributions[i])
                    .sum();
                (g.name.clone(), sum)
            })
            .collect();

        let total_abs: f64 = grouped.iter().map(|(_, v)| v.abs()).sum::<f64>() + NORM_EPSILON;
        for (_, v) in grouped.iter_mut() {
            *v = round2(*v / total_abs * 100.0);
        }

        grouped.sort_by(|a, b| {
            b.1.abs()
                .partial_cmp(&a.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        grouped.truncate(TOP_GROUPS);
        grouped
    }
}
