//! StaySync - rental booking reconciliation service.
//!
//! Binary entry point: loads configuration, wires the application context,
//! starts the periodic jobs, and runs until interrupted.

use staysync_lib::{init_tracing, AppContext};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the tracing filter reads RUST_LOG.
    let dotenv_path = dotenvy::dotenv().ok();

    init_tracing();

    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = staysync_infra::config::load()?;
    let ctx = AppContext::new(config)?;

    let mut scheduler = ctx.build_scheduler()?;
    scheduler.start().await?;

    info!("staysync running; press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    if let Err(err) = scheduler.stop().await {
        warn!(error = %err, "scheduler did not stop cleanly");
    }

    Ok(())
}
