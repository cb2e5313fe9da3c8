use std::sync::Arc;

use kidcheck::server::{
    config::Config,
    error::Error,
    model::app::AppState,
    router,
    scheduler::{MaintenanceContext, Scheduler},
    service::{checkin::CheckinSettings, session::SessionManager},
    startup,
    worker::{ConnectionState, ConnectionStatus, RecordingChannel, Worker},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("kidcheck stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    let db = startup::connect_to_database(&config).await?;

    let sessions = SessionManager::new(config.session_ttl_seconds);
    let checkin = CheckinSettings::new(config.station_tokens.iter().cloned(), config.retry.clone());

    // No external messaging client is attached; sends are recorded and logged
    let connection = ConnectionState::new(ConnectionStatus::Ready);
    let channel = Arc::new(RecordingChannel::new(connection.clone()));
    tracing::warn!("Messaging channel running in dry-run mode, guardian messages are only logged");

    let worker = Worker::new(&config, db.clone(), channel, connection.clone());
    worker.start().await?;

    let mut scheduler = Scheduler::new(MaintenanceContext {
        db: db.clone(),
        sessions: sessions.clone(),
        checkin: checkin.clone(),
        stale_claim_timeout: config.worker.stale_claim_timeout(),
        auto_checkout_after_hours: config.auto_checkout_after_hours,
    })
    .await?
    .start()
    .await?;

    let app = router::routes().with_state(AppState {
        db,
        sessions,
        checkin,
        connection,
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    scheduler.shutdown().await?;
    worker.stop().await?;

    Ok(())
}
