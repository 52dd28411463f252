//! Aqariy - Residential price estimation and fairness judgment
//!
//! Estimates a fair market price for a residential listing from structured
//! attributes and judges whether an asking price is fair relative to a
//! simulated local market distribution.
//!
//! # Modules
//!
//! ## Core engine
//! - [`encoding`] - Listing attributes to model feature vectors
//! - [`simulation`] - Brute-force local market grid simulation
//! - [`stats`] - Market distribution summarization
//! - [`judgment`] - Ordered price fairness rules
//! - [`attribution`] - Feature attribution grouping and ranking
//! - [`engine`] - The facade tying the pipeline together
//!
//! ## Model boundary
//! - [`model`] - The `predict`/`explain` contract and the linear artifact
//!   backend loaded at startup
//!
//! ## Services
//! - [`server`] - HTTP server with REST API
//! - [`cli`] - Command-line interface

pub mod error;

pub mod attribution;
pub mod encoding;
pub mod engine;
pub mod judgment;
pub mod model;
pub mod simulation;
pub mod stats;

pub mod cli;
pub mod server;

pub use crate::encoding::{FeatureEncoder, FeatureSchema, ListingAttributes};
pub use crate::engine::{JudgmentEngine, JudgmentReport, Metadata, Prediction};
pub use crate::error::{AqariyError, Result};
pub use crate::judgment::Judgment;
pub use crate::model::{LinearPriceModel, ModelArtifacts, PriceModel};
pub use crate::simulation::{MarketSimulator, GRID_SIZE};
pub use crate::stats::{summarize, MarketSummary};
