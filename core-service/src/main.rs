//! Churn CLI - command-line presentation layer
//!
//! # Commands
//!
//! - `predict` - validate a record, predict and explain it
//! - `form` - print the input form descriptor
//! - `check-model` - load the artifact, assert its schema, build the explainer

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use churn_core::api::{render_assessment, render_form, AssessmentView, FormDescriptor, Layout};
use churn_core::constants::{APP_NAME, APP_VERSION};
use churn_core::logic::record::layout::LayoutInfo;
use churn_core::{InferenceContext, ServiceConfig};

/// Churn prediction with per-feature explanations
#[derive(Parser)]
#[command(name = "churn-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one customer record
    ///
    /// Examples:
    ///   churn-cli predict --record customer.json
    ///   cat customer.json | churn-cli predict --record - --json
    Predict {
        /// JSON file holding the 19 fields, or `-` for stdin
        #[arg(short, long, value_name = "FILE")]
        record: String,

        /// Model artifact (defaults to CHURN_MODEL_PATH)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Form layout used for the report
        #[arg(short, long, default_value = "single")]
        layout: Layout,

        /// Print the assessment view as JSON
        #[arg(long)]
        json: bool,

        /// Contributions shown before the remainder (defaults to CHURN_TOP_K)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Skip the explanation
        #[arg(long)]
        no_explain: bool,
    },
    /// Print the input form
    Form {
        #[arg(short, long, default_value = "single")]
        layout: Layout,

        /// Print the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load and validate a model artifact
    CheckModel {
        /// Model artifact (defaults to CHURN_MODEL_PATH)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Predict {
            record,
            model,
            layout,
            json,
            top_k,
            no_explain,
        } => {
            let mut config = ServiceConfig::from_env();
            if let Some(path) = model {
                config = config.with_model_path(path);
            }
            if let Some(k) = top_k {
                config = config.with_top_k(k);
            }
            if no_explain {
                config = config.with_explain(false);
            }
            predict(&record, config, layout, json)
        }
        Commands::Form { layout, json } => {
            let form = FormDescriptor::new(layout);
            if json {
                println!("{}", serde_json::to_string_pretty(&form)?);
            } else {
                print!("{}", render_form(&form));
            }
            Ok(())
        }
        Commands::CheckModel { model } => {
            let mut config = ServiceConfig::from_env();
            if let Some(path) = model {
                config = config.with_model_path(path);
            }
            check_model(config)
        }
    }
}

fn read_record(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read record from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
    }
}

fn predict(source: &str, config: ServiceConfig, layout: Layout, json: bool) -> Result<()> {
    let text = read_record(source)?;
    let top_k = config.top_k;

    // Validate before touching the model
    let record = match churn_core::logic::record::CustomerRecord::from_json(&text) {
        Ok(record) => record,
        Err(e) => bail!("Please fix the form: {}", e),
    };

    let ctx = InferenceContext::load(config)?;
    let assessment = ctx.assess(&record)?;
    let view = AssessmentView::new(&assessment, top_k);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_assessment(&view, layout));
    }
    Ok(())
}

fn check_model(config: ServiceConfig) -> Result<()> {
    log::info!("{} v{}", APP_NAME, APP_VERSION);
    let ctx = InferenceContext::load(config)?;
    let meta = ctx.metadata();
    let layout = LayoutInfo::current();

    println!("Model:        {}", meta.name);
    println!("Path:         {}", meta.model_path);
    println!("SHA-256:      {}", meta.sha256);
    println!("Classifier:   {}", meta.classifier);
    println!("Features:     {}", meta.feature_count);
    println!("Threshold:    {}", meta.threshold);
    println!("Layout:       v{} (hash {:08x}, {} columns)", layout.version, layout.hash, layout.column_count);
    match ctx.explainer_name() {
        Some(name) => println!("Explainer:    {}", name),
        None => println!(
            "Explainer:    unavailable ({})",
            ctx.explainer().err().map(|e| e.to_string()).unwrap_or_default()
        ),
    }
    Ok(())
}
