//! Equilibria Lab Binary
//!
//! Runs one evolutionary simulation and prints its report as JSON.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use equilibria_lab::{LabConfig, LabRunner, LAB_VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Equilibria Lab v{}", LAB_VERSION);

    let config = LabConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let runner = LabRunner::new(&config)?;
    info!(
        "Simulation {} ready: {} strategies, {} individuals",
        runner.simulation().run_id(),
        runner.simulation().registry().len(),
        runner.simulation().latest().total()
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let report = runner.run(shutdown).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Shutting down Equilibria Lab");
    Ok(())
}
