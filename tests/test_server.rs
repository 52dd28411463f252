//! Integration test: server API endpoints

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use ndarray::{Array1, Array2};
use tower::ServiceExt;

use aqariy::engine::JudgmentEngine;
use aqariy::error::Result;
use aqariy::model::PriceModel;
use aqariy::server::{create_router, AppState, ServerConfig};

struct RoomsModel;

impl PriceModel for RoomsModel {
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(features.column(0).mapv(|rooms| rooms * 1000.0))
    }

    fn explain(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        Ok(features.clone())
    }
}

fn test_app() -> axum::Router {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        model_dir: "/tmp/aqariy-test-model".to_string(),
        static_dir: None,
    };
    let engine = JudgmentEngine::new(
        Arc::new(RoomsModel),
        [
            "rooms",
            "bathrooms",
            "furnished",
            "area",
            "floor",
            "building_age",
            "mortgaged",
            "payment_method",
            "city_Amman",
            "city_Irbid",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        vec!["Amman".to_string(), "Irbid".to_string()],
    );
    let state = Arc::new(AppState::new(config.clone(), engine));
    create_router(state, &config)
}

fn listing_json() -> serde_json::Value {
    serde_json::json!({
        "rooms": 3,
        "bathrooms": 2,
        "furnished": 1,
        "area": 120.0,
        "floor": 2,
        "building_age": 7,
        "mortgaged": 0,
        "payment_method": 0,
        "parking": 0,
        "city": "Amman",
    })
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metadata_endpoint() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/metadata")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["feature_columns_count"], 10);
    assert_eq!(json["city_categories"], serde_json::json!(["Amman", "Irbid"]));
    assert_eq!(json["feature_columns"][0], "rooms");
}

#[tokio::test]
async fn test_predict_endpoint() {
    let response = test_app()
        .oneshot(post_json("/predict", &listing_json()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["predicted_price"], 3000.0);

    let factors = json["factors"].as_object().unwrap();
    assert!(factors.len() <= 4);
    // preserve_order: the first key is the dominant group
    assert_eq!(factors.keys().next().unwrap(), "area & rooms");
}

#[tokio::test]
async fn test_predict_applies_parking_surcharge() {
    let mut body = listing_json();
    body["parking"] = serde_json::json!(1);

    let response = test_app().oneshot(post_json("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["predicted_price"], 3033.0);
}

#[tokio::test]
async fn test_judge_price_endpoint() {
    let mut body = listing_json();
    body["listed_price"] = serde_json::json!(3000.0);

    let response = test_app()
        .oneshot(post_json("/judge_price", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["judgment_key"], "PREDICTED_PRICE");
    assert_eq!(json["market_mean"], 2500.0);
    assert_eq!(json["price_range"], serde_json::json!([1000.0, 4000.0]));
    assert_eq!(json["hist"]["counts"].as_array().unwrap().len(), 10);
    assert_eq!(json["hist"]["edges"].as_array().unwrap().len(), 11);

    let total: u64 = json["hist"]["counts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_u64().unwrap())
        .sum();
    assert_eq!(total, 4320);
}

#[tokio::test]
async fn test_judge_rejects_nonpositive_price() {
    let mut body = listing_json();
    body["listed_price"] = serde_json::json!(0.0);

    let response = test_app()
        .oneshot(post_json("/judge_price", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], true);
}

#[tokio::test]
async fn test_predict_rejects_invalid_rooms() {
    let mut body = listing_json();
    body["rooms"] = serde_json::json!(0);

    let response = test_app().oneshot(post_json("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_rejects_bad_flag() {
    let mut body = listing_json();
    body["furnished"] = serde_json::json!(2);

    let response = test_app().oneshot(post_json("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_city_is_accepted() {
    let mut body = listing_json();
    body["city"] = serde_json::json!("Atlantis");

    let response = test_app().oneshot(post_json("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_root_returns_banner_without_static_dir() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], true);
}

#[tokio::test]
async fn test_wrong_method_is_json_405() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/predict")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
