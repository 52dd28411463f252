//! Command-line interface
//!
//! One-shot prediction and judgment against a local artifact directory,
//! plus the server entry point.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::engine::JudgmentEngine;
use crate::server::{run_server, ListingPayload, ServerConfig};

#[derive(Parser)]
#[command(name = "aqariy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Residential price estimation and fairness judgment engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 7860)]
        port: u16,
        /// Directory with model.json, feature_columns.json, city_categories.json
        #[arg(long, default_value = "./model")]
        model_dir: PathBuf,
        /// Directory with the static frontend
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Predict a price for one listing JSON file
    Predict {
        #[arg(long, default_value = "./model")]
        model_dir: PathBuf,
        /// Listing attributes as JSON
        #[arg(long)]
        input: PathBuf,
    },
    /// Judge an asking price for one listing JSON file
    Judge {
        #[arg(long, default_value = "./model")]
        model_dir: PathBuf,
        /// Listing attributes as JSON
        #[arg(long)]
        input: PathBuf,
        /// The asking price to evaluate
        #[arg(long)]
        listed_price: f64,
    },
    /// Print the loaded feature schema and city categories
    Info {
        #[arg(long, default_value = "./model")]
        model_dir: PathBuf,
    },
}

fn load_listing(path: &Path) -> anyhow::Result<crate::encoding::ListingAttributes> {
    let payload: ListingPayload = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    Ok(payload.validate()?)
}

pub async fn cmd_serve(
    host: String,
    port: u16,
    model_dir: PathBuf,
    static_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = ServerConfig {
        host,
        port,
        model_dir: model_dir.display().to_string(),
        static_dir: static_dir.map(|d| d.display().to_string()),
    };
    run_server(config).await
}

pub fn cmd_predict(model_dir: &Path, input: &Path) -> anyhow::Result<()> {
    let engine = JudgmentEngine::from_artifacts(model_dir)?;
    let attrs = load_listing(input)?;
    let prediction = engine.predict(&attrs)?;
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

pub fn cmd_judge(model_dir: &Path, input: &Path, listed_price: f64) -> anyhow::Result<()> {
    if !listed_price.is_finite() || listed_price <= 0.0 {
        anyhow::bail!("listed price must be > 0, got {listed_price}");
    }
    let engine = JudgmentEngine::from_artifacts(model_dir)?;
    let attrs = load_listing(input)?;
    let report = engine.judge(&attrs, listed_price)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn cmd_info(model_dir: &Path) -> anyhow::Result<()> {
    let engine = JudgmentEngine::from_artifacts(model_dir)?;
    let meta = engine.metadata();
    println!("{}", serde_json::to_string_pretty(&meta)?);
    Ok(())
}
