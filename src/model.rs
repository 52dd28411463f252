//! Model contract and the linear artifact backend
//!
//! The trained regressor is an external collaborator: the engine only
//! depends on the [`PriceModel`] trait. [`LinearPriceModel`] is the
//! concrete backend loaded from a JSON artifact directory, whose
//! `explain` is the exact additive decomposition `w_i * x_i`.

use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AqariyError, Result};

/// Contract the judgment engine requires from a trained regressor.
///
/// `predict` maps a batch of encoded feature rows to one price per row;
/// `explain` returns a per-row, per-feature additive attribution matrix
/// with the same shape as the input batch.
pub trait PriceModel: Send + Sync {
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>>;
    fn explain(&self, features: &Array2<f64>) -> Result<Array2<f64>>;
}

/// Linear regression backend stored as `model.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearPriceModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearPriceModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn check_width(&self, features: &Array2<f64>) -> Result<()> {
        if features.ncols() != self.coefficients.len() {
            return Err(AqariyError::ShapeError(format!(
                "expected {} feature columns, got {}",
                self.coefficients.len(),
                features.ncols()
            )));
        }
        Ok(())
    }
}

impl PriceModel for LinearPriceModel {
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_width(features)?;
        let weights = ndarray::aview1(&self.coefficients);
        Ok(features.dot(&weights) + self.intercept)
    }

    fn explain(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(features)?;
        // Row-wise w_i * x_i; the intercept is the base value and carries
        // no per-feature attribution.
        let weights = ndarray::aview1(&self.coefficients);
        Ok(features * &weights)
    }
}

/// The artifact triple loaded once at process start: the model, the ordered
/// feature schema it was fit on, and the city categories it knows.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub model: LinearPriceModel,
    pub feature_columns: Vec<String>,
    pub city_categories: Vec<String>,
}

impl ModelArtifacts {
    /// Load `model.json`, `feature_columns.json` and `city_categories.json`
    /// from a directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let model: LinearPriceModel = read_json(&dir.join("model.json"))?;
        let feature_columns: Vec<String> = read_json(&dir.join("feature_columns.json"))?;
        let city_categories: Vec<String> = read_json(&dir.join("city_categories.json"))?;

        if model.n_features() != feature_columns.len() {
            return Err(AqariyError::ShapeError(format!(
                "model has {} coefficients but schema declares {} columns",
                model.n_features(),
                feature_columns.len()
            )));
        }

        info!(
            dir = %dir.display(),
            feature_columns = feature_columns.len(),
            city_categories = city_categories.len(),
            "Loaded model artifacts"
        );

        Ok(Self {
            model,
            feature_columns,
            city_categories,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = std::fs::File::open(path).map_err(|e| {
        AqariyError::DataError(format!("cannot open {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}
