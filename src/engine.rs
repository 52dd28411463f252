//! Judgment engine
//!
//! The process-wide facade over the five core components. All state (the
//! model, the feature schema, the city categories, the group definitions)
//! is loaded once at startup and read-only thereafter, so concurrent
//! requests run with no locking.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use ndarray::Axis;
use serde::Serialize;
use tracing::info;

use crate::attribution::{default_groups, AttributionAggregator};
use crate::encoding::{FeatureEncoder, FeatureSchema, ListingAttributes};
use crate::error::Result;
use crate::judgment::{judge, Judgment};
use crate::model::{ModelArtifacts, PriceModel};
use crate::simulation::MarketSimulator;
use crate::stats::{round2, summarize, Histogram};

/// Fixed surcharge applied to the point estimate when the listing has a
/// parking spot.
pub const PARKING_SURCHARGE: f64 = 1.011;

/// Point prediction with ranked group factors
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub predicted_price: f64,
    /// Group name -> signed percentage of influence, descending |value|
    pub factors: Vec<(String, f64)>,
}

/// Full judgment payload for one listing and asking price
#[derive(Debug, Clone, Serialize)]
pub struct JudgmentReport {
    pub judgment_key: Judgment,
    pub listed_price: f64,
    pub predicted_price: f64,
    pub market_mean: f64,
    pub market_median: f64,
    pub price_q1: f64,
    pub price_q3: f64,
    pub price_range: [f64; 2],
    pub hist: Histogram,
}

/// Read-only introspection over the loaded metadata
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub feature_columns_count: usize,
    pub feature_columns: Vec<String>,
    pub city_categories: Vec<String>,
}

/// Stateless-per-request price engine over immutable startup state.
pub struct JudgmentEngine {
    model: Arc<dyn PriceModel>,
    encoder: FeatureEncoder,
    simulator: MarketSimulator,
    aggregator: AttributionAggregator,
    cities: Arc<Vec<String>>,
}

impl std::fmt::Debug for JudgmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgmentEngine")
            .field("feature_columns", &self.encoder.schema().len())
            .field("city_categories", &self.cities.len())
            .finish()
    }
}

impl JudgmentEngine {
    pub fn new(
        model: Arc<dyn PriceModel>,
        feature_columns: Vec<String>,
        city_categories: Vec<String>,
    ) -> Self {
        let schema = Arc::new(FeatureSchema::new(feature_columns));
        let cities = Arc::new(city_categories);
        let encoder = FeatureEncoder::new(Arc::clone(&schema), Arc::clone(&cities));
        let aggregator = AttributionAggregator::new(&default_groups(&schema), &schema);
        Self {
            model,
            simulator: MarketSimulator::new(encoder.clone()),
            encoder,
            aggregator,
            cities,
        }
    }

    /// Load the artifact triple from a directory and build the engine.
    pub fn from_artifacts(dir: &Path) -> Result<Self> {
        let artifacts = ModelArtifacts::load(dir)?;
        Ok(Self::new(
            Arc::new(artifacts.model),
            artifacts.feature_columns,
            artifacts.city_categories,
        ))
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            feature_columns_count: self.encoder.schema().len(),
            feature_columns: self.encoder.schema().columns().to_vec(),
            city_categories: self.cities.as_ref().clone(),
        }
    }

    /// Point prediction for the exact request attributes, with the parking
    /// surcharge applied when set.
    fn point_prediction(&self, attrs: &ListingAttributes) -> Result<f64> {
        let row = self.encoder.encode(attrs);
        let batch = row.insert_axis(Axis(0));
        let mut price = self.model.predict(&batch)?[0];
        if attrs.parking {
            price *= PARKING_SURCHARGE;
        }
        Ok(price)
    }

    /// Predict a price and attribute it to interpretable feature groups.
    pub fn predict(&self, attrs: &ListingAttributes) -> Result<Prediction> {
        let predicted = self.point_prediction(attrs)?;

        let row = self.encoder.encode(attrs);
        let batch = row.clone().insert_axis(Axis(0));
        let contribs = self.model.explain(&batch)?;
        let factors = self
            .aggregator
            .aggregate(contribs.index_axis(Axis(0), 0), row.view());

        Ok(Prediction {
            predicted_price: round2(predicted),
            factors,
        })
    }

    /// Judge an asking price against the simulated local market.
    pub fn judge(&self, attrs: &ListingAttributes, listed_price: f64) -> Result<JudgmentReport> {
        let started = Instant::now();

        let prices = self.simulator.simulate(attrs, self.model.as_ref())?;
        let summary = summarize(prices.view())?;
        let predicted = self.point_prediction(attrs)?;
        let verdict = judge(listed_price, predicted, &summary);

        info!(
            judgment = verdict.as_str(),
            listed_price,
            predicted_price = predicted,
            market_mean = summary.mean,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Judged listing price"
        );

        Ok(JudgmentReport {
            judgment_key: verdict,
            listed_price: round2(listed_price),
            predicted_price: round2(predicted),
            market_mean: round2(summary.mean),
            market_median: round2(summary.median),
            price_q1: round2(summary.q1),
            price_q3: round2(summary.q3),
            price_range: [round2(summary.min), round2(summary.max)],
            hist: Histogram {
                counts: summary.hist.counts,
                edges: summary.hist.edges.into_iter().map(round2).collect(),
            },
        })
    }
}
