//! Command-line interface: run the HTTP service or train offline from a CSV file.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::data::FeatureValue;
use crate::pipeline::{Pipeline, PipelineConfig};
use crate::server::{run_server, ServerConfig};
use crate::training::{Metrics, ProblemType};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString { s.truecolor(100, 210, 120) }

fn field(key: &str, val: impl std::fmt::Display) {
    println!("  {:<16} {}", muted(key), val.to_string().white());
}

fn step(msg: &str) {
    print!("  {} {}... ", ok("›"), msg);
}

fn done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "automl-pipeline",
    version = env!("CARGO_PKG_VERSION"),
    about = "Automatic tabular model fitting and serving"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP service
    Serve {
        /// Bind address (overrides API_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides API_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Train on a CSV file and print the held-out metrics
    Train {
        /// CSV file; the last column is the target
        #[arg(short, long)]
        data: PathBuf,

        /// Comma-separated feature values to predict after training
        #[arg(long)]
        predict: Option<String>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(data_path: &Path, predict: Option<&str>) -> anyhow::Result<()> {
    section("Train");

    step("Loading data");
    let csv = std::fs::read_to_string(data_path)?;
    done(&format!("{} bytes from {}", csv.len(), data_path.display()));

    step("Training");
    let start = Instant::now();
    let pipeline = Pipeline::new(PipelineConfig::default());
    let metrics = pipeline.train(&csv)?;
    done(&format!("{:?}", start.elapsed()));

    let model_class = pipeline
        .model_info()
        .map(|info| info.model_class)
        .unwrap_or_default();
    print_metrics(&model_class, &metrics);

    if let Some(raw) = predict {
        section("Predict");
        let features = parse_feature_values(raw);
        let output = pipeline.predict_with_model_type(&features)?;
        let rendered: Vec<String> = output.predictions.iter().map(|p| p.to_string()).collect();
        field("Input", raw);
        field("Prediction", rendered.join(", ").bold());
        println!();
    }

    Ok(())
}

fn print_metrics(model_class: &str, metrics: &Metrics) {
    println!();
    field("Model", model_class.cyan());
    field("Problem", metrics.model_type);
    field("Samples", metrics.n_samples);
    field("Features", metrics.features.join(", "));
    match metrics.model_type {
        ProblemType::Classification => field("Accuracy", format!("{:.4}", metrics.accuracy).bold()),
        ProblemType::Regression => field("Accuracy", format!("{:.2}", metrics.accuracy).bold()),
    }
    if let Some(mse) = metrics.mse {
        field("MSE", format!("{:.4}", mse));
    }
    if let Some(r2) = metrics.r2 {
        field("R²", format!("{:.4}", r2));
    }
    println!();
}

/// Split `v1,v2,...` into feature values: numbers where they parse, text otherwise
pub fn parse_feature_values(raw: &str) -> Vec<FeatureValue> {
    raw.split(',')
        .map(str::trim)
        .map(|v| match v.parse::<f64>() {
            Ok(n) => FeatureValue::Number(n),
            Err(_) => FeatureValue::Text(v.to_string()),
        })
        .collect()
}

pub async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    section(&format!("AutoML Pipeline {}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    let base = format!("http://{}:{}", config.host, config.port);
    field("Train", format!("POST {}/train", base));
    field("Predict", format!("POST {}/predict", base));
    field("Model info", format!("GET  {}/model-info", base));
    field("Health", format!("GET  {}/health", base));
    println!();
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    let pipeline = Arc::new(Pipeline::new(PipelineConfig::default()));
    run_server(config, pipeline).await
}
