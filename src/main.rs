use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

use fleetboard::config::Settings;
use fleetboard::handlers::create_router;
use fleetboard::models::FleetSnapshot;
use fleetboard::services::assignment::{AssignmentLookup, TeamRoster, Unassigned};
use fleetboard::services::dashboard::SnapshotStore;
use fleetboard::services::AppState;
use fleetboard::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config_file = std::env::var_os("FLEETBOARD_CONFIG").map(PathBuf::from);
    let settings = Settings::load(config_file.as_deref()).context("loading settings")?;
    telemetry::init(&settings.logging).context("initialising logging")?;

    let snapshots = match &settings.snapshot_path {
        Some(path) => {
            let loaded = FleetSnapshot::load(path)
                .with_context(|| format!("loading snapshot from {}", path.display()))?;
            for issue in &loaded.issues {
                tracing::warn!(index = issue.index, train_id = ?issue.train_id, "{}", issue.message);
            }
            tracing::info!(trains = loaded.snapshot.len(), path = %path.display(), "snapshot loaded");
            SnapshotStore::new(loaded.snapshot)
        }
        None => {
            tracing::info!("no snapshot configured; starting with an empty fleet");
            SnapshotStore::default()
        }
    };

    let teams: Arc<dyn AssignmentLookup> = match &settings.roster_path {
        Some(path) => Arc::new(
            TeamRoster::load(path).with_context(|| format!("loading team roster from {}", path.display()))?,
        ),
        None => Arc::new(Unassigned),
    };

    let addr = settings.server.socket_addr()?;
    let state = Arc::new(AppState::new(settings, snapshots, teams));
    let app = create_router(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
