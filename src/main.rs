//! Promwatch runner
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - PROMWATCH_DEFINITIONS: Path to the definitions JSON file (default: alert_definitions.json)
//! - PROMWATCH_BACKEND_URL: Backend base URL (default: http://127.0.0.1:9090)
//! - PROMWATCH_STEP_SECS: Default sampling interval in seconds (default: 60)
//! - PROMWATCH_PROBES: Default window size in probes (default: 5)
//! - PROMWATCH_TIMEOUT_SECS: Backend request timeout (default: 30)
//! - PROMWATCH_CONCURRENCY: Definitions fetched concurrently (default: 1)
//! - PROMWATCH_VERBOSE: Also report first-occurrence OK verdicts (default: false)
//! - PROMWATCH_FORMAT: "text" for report lines, "json" for records (default: text)
//! - RUST_LOG: Log level (default: promwatch=info)

use std::time::Duration;

use promwatch::definition::Registry;
use promwatch::engine::{EvalOptions, Evaluator};
use promwatch::probe::HttpProbeSource;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration from environment
    let definitions_path = std::env::var("PROMWATCH_DEFINITIONS")
        .unwrap_or_else(|_| "alert_definitions.json".to_string());
    let backend_url = std::env::var("PROMWATCH_BACKEND_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:9090".to_string());
    let step_secs: u64 = std::env::var("PROMWATCH_STEP_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60);
    let probes: u32 = std::env::var("PROMWATCH_PROBES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);
    let timeout_secs: u64 = std::env::var("PROMWATCH_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);
    let concurrency: usize = std::env::var("PROMWATCH_CONCURRENCY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let verbose = std::env::var("PROMWATCH_VERBOSE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let json_output = std::env::var("PROMWATCH_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Definition problems refuse the whole run
    let registry = Registry::from_file(&definitions_path)?;
    let source = HttpProbeSource::with_timeout(&backend_url, Duration::from_secs(timeout_secs));
    let options = EvalOptions {
        step_secs,
        probes,
        verbose,
        concurrency,
    };

    tracing::info!("Promwatch configuration:");
    tracing::info!("  Definitions: {} ({} loaded)", definitions_path, registry.len());
    tracing::info!("  Backend: {}", backend_url);
    tracing::info!(
        "  Window: {} probes at {}s step",
        options.probes,
        options.step_secs
    );
    tracing::info!(
        "  Timeout: {}s, concurrency: {}, verbose: {}",
        timeout_secs,
        options.concurrency,
        options.verbose
    );

    let evaluator = Evaluator::new(registry, source, options);

    // Ctrl-C cancels the run; records emitted so far still print
    let shutdown = evaluator.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(()).await;
        }
    });

    let report = evaluator.run().await;

    if json_output {
        for record in &report.records {
            println!("{}", serde_json::to_string(record)?);
        }
        eprintln!("{}", report.summary);
    } else {
        for line in &report.lines {
            println!("{line}");
        }
        println!("{}", report.summary);
    }

    Ok(())
}
