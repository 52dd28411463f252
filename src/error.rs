//! Error types for the aqariy engine

use thiserror::Error;

/// Errors produced by the price-judgment engine
#[derive(Error, Debug)]
pub enum AqariyError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Shape error: {0}")]
    ShapeError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AqariyError>;
