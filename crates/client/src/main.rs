//! `multigate` client binary.
//!
//! Composition root for a headless solver session:
//! 1. Load `.env` and build [`ClientConfig`] from the environment
//! 2. Install logging
//! 3. Start the runtime with a drift provider
//! 4. Spawn concurrent producers that steer actors through cloned handles
//! 5. Run the configured number of steps and print the final summary
//!
//! # Examples
//!
//! ```bash
//! SOLVER_CAPACITY=256 SOLVER_PRODUCERS=8 SOLVER_TICKS=600 cargo run -p solver-client
//! ```

mod config;
mod logging;
mod producers;

use anyhow::{Context, Result};

use config::ClientConfig;
use producers::{DriftProvider, spawn_producers};
use runtime::Runtime;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(&config)?;

    tracing::info!(
        capacity = config.capacity,
        producers = config.producers,
        ticks = config.ticks,
        "Starting multigate session"
    );

    let mut runtime = Runtime::builder()
        .config(config.runtime_config())
        .provider(DriftProvider::new(config.tick_interval))
        .build()
        .await
        .context("failed to start runtime")?;

    let producers = spawn_producers(
        &runtime.handle(),
        config.producers,
        config.capacity,
        config.ticks,
        config.tick_interval,
    );

    let mut summaries = runtime.run_for(config.ticks).await?;

    let mut sent = 0;
    for producer in producers {
        sent += producer.await.context("producer task panicked")??;
    }

    // Flush whatever producers sent after the last step.
    if runtime.handle().pending().await? > 0 {
        summaries.push(runtime.step().await?);
    }

    let applied: usize = summaries.iter().map(|summary| summary.applied).sum();
    let rejected: usize = summaries.iter().map(|summary| summary.rejected).sum();
    tracing::info!(sent, applied, rejected, "Session complete");

    if let Some(summary) = summaries.last() {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }

    runtime.shutdown().await?;
    tracing::info!("Runtime shutdown complete");

    Ok(())
}
