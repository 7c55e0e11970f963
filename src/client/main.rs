/**
 * LiftLog Sync Agent Entry Point
 *
 * Headless process that keeps the local queue flowing: it restores the saved
 * session, probes the server, replays queued operations whenever the server
 * becomes reachable, and runs until interrupted.
 */

use liftlog::client::{Config, DrainOutcome, LiftLogClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        "Starting sync agent against {} (database {})",
        config.server_url(),
        config.database_path().display()
    );

    let mut client = LiftLogClient::open(config).await?;
    match client.auth.restore().await? {
        Some(credential) => tracing::info!("Restored session of user {}", credential.user_id),
        None => tracing::warn!("No saved session, queued operations will wait for a login"),
    }

    let probe_task = client.probe().spawn(client.monitor().clone());
    client.sync.start()?;

    // The probe only reports transitions, so drain once for an already-online start
    if let DrainOutcome::Completed(report) = client.sync.force_sync().await {
        tracing::info!("Initial sync: {} replayed, {} failed", report.replayed, report.failed);
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    probe_task.abort();
    client.sync.stop();
    client.db.pool().close().await;
    Ok(())
}
