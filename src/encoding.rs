//! Feature encoding
//!
//! Maps a raw listing record into the exact numeric feature vector the
//! trained model was fit on: building-age bucketing, one-hot city encoding
//! with an "other" fallback column, and a zero-filled reindex against the
//! model's declared column order.

use std::collections::HashMap;
use std::sync::Arc;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Prefix shared by every city indicator column in the schema
pub const CITY_PREFIX: &str = "city_";

/// Fallback indicator for cities the model was not trained on, if present
pub const CITY_OTHER_COLUMN: &str = "city_other";

pub const COL_ROOMS: &str = "rooms";
pub const COL_BATHROOMS: &str = "bathrooms";
pub const COL_FURNISHED: &str = "furnished";
pub const COL_AREA: &str = "area";
pub const COL_FLOOR: &str = "floor";
pub const COL_BUILDING_AGE: &str = "building_age";
pub const COL_MORTGAGED: &str = "mortgaged";
pub const COL_PAYMENT_METHOD: &str = "payment_method";

/// A validated listing record as seen by the engine.
///
/// Boundary validation (positivity, 0/1 flags) happens before construction;
/// inside the engine the flags are plain booleans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingAttributes {
    pub rooms: u32,
    pub bathrooms: u32,
    pub furnished: bool,
    pub area: f64,
    pub floor: i32,
    pub building_age: u32,
    pub mortgaged: bool,
    pub payment_method: i32,
    pub parking: bool,
    pub city: String,
}

/// The fixed, ordered column list a trained model was fit on, with a
/// position index for O(1) lookups.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self { columns, index }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Indices of every city indicator column, in schema order.
    pub fn city_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.starts_with(CITY_PREFIX))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Map raw age-in-years onto the ordinal bucket the model was trained with.
///
/// Boundaries: {0}, {1}, {2-5}, {6-9}, {10-19}, {20+}.
pub fn map_building_age(age: u32) -> u32 {
    match age {
        0 => 0,
        1 => 1,
        2..=5 => 2,
        6..=9 => 3,
        10..=19 => 4,
        _ => 5,
    }
}

/// Encodes listings against a fixed schema and city category set.
///
/// Pure: identical inputs always produce the identical vector. Columns the
/// schema declares but the encoder does not populate stay 0; values the
/// encoder produces for columns absent from the schema are dropped.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: Arc<FeatureSchema>,
    cities: Arc<Vec<String>>,
}

impl FeatureEncoder {
    pub fn new(schema: Arc<FeatureSchema>, cities: Arc<Vec<String>>) -> Self {
        Self { schema, cities }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Encode one listing into a schema-aligned vector.
    pub fn encode(&self, attrs: &ListingAttributes) -> Array1<f64> {
        self.encode_parts(
            attrs.rooms,
            attrs.bathrooms,
            attrs.furnished,
            attrs.area,
            attrs.floor,
            attrs.building_age,
            attrs.mortgaged,
            attrs.payment_method,
            &attrs.city,
        )
    }

    /// Encode from loose parts. The market simulator uses this to build
    /// grid variants without cloning the request per grid point.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn encode_parts(
        &self,
        rooms: u32,
        bathrooms: u32,
        furnished: bool,
        area: f64,
        floor: i32,
        building_age: u32,
        mortgaged: bool,
        payment_method: i32,
        city: &str,
    ) -> Array1<f64> {
        let mut row = Array1::zeros(self.schema.len());

        let mut set = |name: &str, value: f64| {
            if let Some(i) = self.schema.position(name) {
                row[i] = value;
            }
        };

        set(COL_ROOMS, rooms as f64);
        set(COL_BATHROOMS, bathrooms as f64);
        set(COL_FURNISHED, furnished as u8 as f64);
        set(COL_AREA, area);
        set(COL_FLOOR, floor as f64);
        set(COL_BUILDING_AGE, map_building_age(building_age) as f64);
        set(COL_MORTGAGED, mortgaged as u8 as f64);
        set(COL_PAYMENT_METHOD, payment_method as f64);

        if self.cities.iter().any(|c| c == city) {
            set(&format!("{CITY_PREFIX}{city}"), 1.0);
        } else {
            // Unknown city: fall back to the "other" indicator when the
            // schema has one, otherwise leave every indicator at 0.
            set(CITY_OTHER_COLUMN, 1.0);
        }

        row
    }
}
