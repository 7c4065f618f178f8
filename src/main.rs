//! CLI entry point for the OpenSky flight snapshot pipeline.
//!
//! Provides subcommands for archiving raw snapshots, transforming a snapshot
//! into a clean table plus analysis, re-analyzing a saved table, and
//! handling S3 upload notifications.

mod infra;

use crate::infra::s3_event::parse_event;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use opensky_flights::{
    analyzers::aggregate::analyze,
    config::Config,
    extract::{first_batch, save_raw_snapshot},
    fetch::{BasicClient, fetch_snapshot, normalize_snapshot},
    output::{ArtifactSink, ArtifactWriter, LocalSink, S3Sink, get_object, read_table},
    parser::parse_payload,
    pipeline::{BatchReport, run_batch},
    transform::validate_rows,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "opensky_flights")]
#[command(about = "Fetch, transform and analyze OpenSky aircraft state snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Destination {
    /// Directory for local artifacts (defaults to OUTPUT_DIR or "data")
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// S3 bucket to write artifacts to instead of the local directory
    #[arg(long)]
    s3_bucket: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a snapshot from the API and archive it unchanged
    Extract {
        #[command(flatten)]
        destination: Destination,

        /// Gzip the archived snapshot
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Transform a snapshot into a clean table and analysis
    Transform {
        /// Path to a snapshot file or URL to fetch (defaults to the API)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[command(flatten)]
        destination: Destination,
    },
    /// Analyze a previously saved table
    Analyze {
        /// CSV table written by `transform`
        #[arg(value_name = "CSV")]
        input: PathBuf,

        #[command(flatten)]
        destination: Destination,
    },
    /// Process the raw snapshot referenced by an S3 event notification
    HandleEvent {
        /// Path to the event JSON document
        #[arg(value_name = "EVENT_JSON")]
        event: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/opensky_flights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("opensky_flights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Extract {
            destination,
            gzip,
            timeout,
        } => {
            let config = destination.apply(config);
            let client = BasicClient::with_timeout(Duration::from_secs(timeout))?;

            info!(url = %config.api_url, "Downloading flights data");
            let snapshot = fetch_snapshot(&client, &config.api_url).await?;

            let sink = make_sink(&config).await;
            // Archive the first batch object as the API delivered it
            let payload = first_batch(&snapshot)
                .with_context(|| format!("unexpected response shape from {}", config.api_url))?;
            save_raw_snapshot(sink.as_ref(), &config.raw_prefix, &payload, Utc::now(), gzip).await?;
        }
        Commands::Transform {
            source,
            destination,
        } => {
            let config = destination.apply(config);
            let source = source.unwrap_or_else(|| config.api_url.clone());
            let payload = load_snapshot(&source).await?;

            let writer = make_writer(&config).await;
            let report = run_batch(&source, &payload, &writer, Utc::now().date_naive()).await?;
            log_report(&report);
        }
        Commands::Analyze { input, destination } => {
            let config = destination.apply(config);
            let file = std::fs::File::open(&input)
                .with_context(|| format!("failed to open {}", input.display()))?;
            let table = validate_rows(read_table(file)?);

            let summary = match analyze(&table) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!(error = %e, input = %input.display(), "Nothing to analyze");
                    None
                }
            };

            let writer = make_writer(&config).await;
            writer
                .write_summary(summary.as_ref(), Utc::now().date_naive())
                .await?;
        }
        Commands::HandleEvent { event } => {
            let bytes = std::fs::read(&event)
                .with_context(|| format!("failed to read event {}", event.display()))?;
            let object = parse_event(&bytes)?;
            info!(bucket = %object.bucket, key = %object.key, "Received event");

            if !object.is_snapshot(&config.raw_prefix) {
                info!(key = %object.key, raw_prefix = %config.raw_prefix, "Skipped object, it's not a raw snapshot");
                return Ok(());
            }

            let client = infra::s3_client(config.aws_region.as_deref()).await;
            let raw = get_object(&client, &object.bucket, &object.key).await?;
            let payload = normalize_snapshot(parse_payload(&raw)?);

            let writer = ArtifactWriter::new(
                Box::new(S3Sink::new(client, &object.bucket)),
                &config.processed_prefix,
                &config.analysis_prefix,
            );
            let report = run_batch(&object.key, &payload, &writer, Utc::now().date_naive()).await?;
            log_report(&report);
        }
    }

    Ok(())
}

impl Destination {
    /// Command-line values take precedence over the environment.
    fn apply(self, mut config: Config) -> Config {
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if self.s3_bucket.is_some() {
            config.s3_bucket = self.s3_bucket;
        }
        config
    }
}

/// Loads a snapshot from a local file path or fetches it over HTTP.
#[tracing::instrument]
async fn load_snapshot(source: &str) -> Result<serde_json::Value> {
    if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_snapshot(&client, source).await
    } else {
        let bytes = std::fs::read(source).with_context(|| format!("failed to read {source}"))?;
        Ok(normalize_snapshot(parse_payload(&bytes)?))
    }
}

async fn make_sink(config: &Config) -> Box<dyn ArtifactSink> {
    match &config.s3_bucket {
        Some(bucket) => {
            info!(bucket = %bucket, "S3 upload enabled");
            let client = infra::s3_client(config.aws_region.as_deref()).await;
            Box::new(S3Sink::new(client, bucket))
        }
        None => Box::new(LocalSink::new(&config.output_dir)),
    }
}

async fn make_writer(config: &Config) -> ArtifactWriter {
    ArtifactWriter::new(
        make_sink(config).await,
        &config.processed_prefix,
        &config.analysis_prefix,
    )
}

fn log_report(report: &BatchReport) {
    info!(
        batch = %report.batch,
        rows_built = report.rows_built,
        rows_valid = report.rows_valid,
        table = ?report.table,
        summary = ?report.summary_artifact,
        "Batch finished"
    );
}
