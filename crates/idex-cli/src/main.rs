//! idex CLI: extract PAN and Aadhaar card fields from local images.
//!
//! Uses the same environment configuration as the API server (MOONDREAM_ENDPOINT,
//! OUTPUT_FOLDER, SAVE_EXTRACTED_DATA, ...).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use idex_cli::{build_extractor, build_model, display_name, init_tracing, local_items};
use idex_core::{BatchStatus, Config, DocumentType};
use idex_services::{BatchMode, BatchOrchestrator};
use idex_storage::UploadStaging;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "idex", about = "PAN and Aadhaar card field extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from one card image
    Extract {
        /// Document type: pan or aadhaar
        #[arg(long = "type")]
        r#type: String,
        /// Path to the image
        file: PathBuf,
    },
    /// Extract fields from several card images of the same type
    Batch {
        /// Document type: pan or aadhaar
        #[arg(long = "type")]
        r#type: String,
        /// Process the images concurrently (results in completion order)
        #[arg(long)]
        concurrent: bool,
        /// Paths to the images
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check whether the vision model endpoint is reachable
    Health,
}

#[derive(Serialize)]
struct HealthReport<'a> {
    endpoint: &'a str,
    moondream_connected: bool,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize result")?;
    println!("{}", out);
    Ok(())
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Commands::Extract { r#type, file } => {
            let extractor = build_extractor(&config)?;
            let name = display_name(&file);
            let result = extractor
                .extract_tag(&file, &r#type, name.as_deref())
                .await?;
            print_json(&result)?;
            Ok(exit_code(result.is_success()))
        }
        Commands::Batch {
            r#type,
            concurrent,
            files,
        } => {
            let document_type: DocumentType = r#type.parse()?;
            let extractor = build_extractor(&config)?;
            let orchestrator = BatchOrchestrator::from_config(extractor, &config);
            let staging = UploadStaging::from_config(&config);
            let mode = if concurrent {
                BatchMode::Concurrent
            } else {
                BatchMode::Sequential
            };

            let items = local_items(&staging, &files, document_type);
            let batch = orchestrator.extract_batch(items, mode).await?;
            print_json(&batch)?;
            Ok(exit_code(batch.status() == BatchStatus::Success))
        }
        Commands::Health => {
            let model = build_model(&config)?;
            let moondream_connected = model.ping().await;
            print_json(&HealthReport {
                endpoint: &config.model.endpoint,
                moondream_connected,
            })?;
            Ok(exit_code(moondream_connected))
        }
    }
}
