//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::encoding::ListingAttributes;
use crate::error::AqariyError;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Raw listing payload as it arrives on the wire. Boolean attributes are
/// 0/1 integers, matching the public API contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPayload {
    pub rooms: i64,
    pub bathrooms: i64,
    pub furnished: i64,
    pub area: f64,
    pub floor: i64,
    pub building_age: i64,
    pub mortgaged: i64,
    pub payment_method: i64,
    #[serde(default)]
    pub parking: Option<i64>,
    pub city: String,
}

fn flag(name: &str, value: i64) -> std::result::Result<bool, AqariyError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(AqariyError::ValidationError(format!(
            "{name} must be 0 or 1, got {value}"
        ))),
    }
}

impl ListingPayload {
    /// Boundary validation: everything past this point is a well-formed
    /// [`ListingAttributes`] and the core raises no input errors itself.
    pub fn validate(&self) -> std::result::Result<ListingAttributes, AqariyError> {
        if self.rooms < 1 {
            return Err(AqariyError::ValidationError(format!(
                "rooms must be >= 1, got {}",
                self.rooms
            )));
        }
        if self.bathrooms < 1 {
            return Err(AqariyError::ValidationError(format!(
                "bathrooms must be >= 1, got {}",
                self.bathrooms
            )));
        }
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(AqariyError::ValidationError(format!(
                "area must be > 0, got {}",
                self.area
            )));
        }
        if self.building_age < 0 {
            return Err(AqariyError::ValidationError(format!(
                "building_age must be >= 0, got {}",
                self.building_age
            )));
        }
        if self.city.trim().is_empty() {
            return Err(AqariyError::ValidationError(
                "city must be a non-empty string".to_string(),
            ));
        }

        Ok(ListingAttributes {
            rooms: self.rooms as u32,
            bathrooms: self.bathrooms as u32,
            furnished: flag("furnished", self.furnished)?,
            area: self.area,
            floor: self.floor as i32,
            building_age: self.building_age as u32,
            mortgaged: flag("mortgaged", self.mortgaged)?,
            payment_method: self.payment_method as i32,
            parking: flag("parking", self.parking.unwrap_or(0))?,
            city: self.city.clone(),
        })
    }
}

/// Judgment request: a listing plus the asking price to evaluate
#[derive(Debug, Clone, Deserialize)]
pub struct JudgePayload {
    #[serde(flatten)]
    pub listing: ListingPayload,
    pub listed_price: f64,
}

/// Predict a price and its top influence factors
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ListingPayload>,
) -> Result<Json<serde_json::Value>> {
    let attrs = payload.validate().map_err(ServerError::Engine)?;
    let prediction = state.engine.predict(&attrs)?;

    // preserve_order keeps the magnitude ranking in the JSON object
    let mut factors = serde_json::Map::new();
    for (name, pct) in prediction.factors {
        factors.insert(name, json!(pct));
    }

    Ok(Json(json!({
        "predicted_price": prediction.predicted_price,
        "factors": factors,
    })))
}

/// Judge an asking price against the simulated local market
pub async fn judge_price(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<JudgePayload>,
) -> Result<Json<serde_json::Value>> {
    if !payload.listed_price.is_finite() || payload.listed_price <= 0.0 {
        return Err(ServerError::BadRequest(format!(
            "listed_price must be > 0, got {}",
            payload.listed_price
        )));
    }
    let attrs = payload.listing.validate().map_err(ServerError::Engine)?;

    let report = state.engine.judge(&attrs, payload.listed_price)?;
    Ok(Json(serde_json::to_value(&report).map_err(|e| {
        ServerError::Internal(e.to_string())
    })?))
}

/// Introspection over the loaded schema and city categories
pub async fn metadata(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let meta = state.engine.metadata();
    Json(json!({
        "feature_columns_count": meta.feature_columns_count,
        "feature_columns": meta.feature_columns,
        "city_categories": meta.city_categories,
    }))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": chrono::Utc::now()
            .signed_duration_since(state.started_at)
            .num_seconds(),
    }))
}

/// Serve the frontend index when present, otherwise a JSON banner
pub async fn serve_index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    if let Some(ref static_dir) = state.config.static_dir {
        let index = std::path::Path::new(static_dir).join("index.html");
        if index.exists() {
            info!(path = %index.display(), "Serving frontend index");
            return Ok(Html(std::fs::read_to_string(index)?).into_response());
        }
    }
    Ok(Json(json!({
        "message": "Aqariy price engine is up. Frontend index.html not found.",
    }))
    .into_response())
}
