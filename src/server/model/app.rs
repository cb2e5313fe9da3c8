use sea_orm::DatabaseConnection;

use crate::server::{
    config::{DEFAULT_SESSION_TTL_SECONDS, DEFAULT_STATION_TOKENS},
    service::{checkin::CheckinSettings, notification::RetryPolicy, session::SessionManager},
    worker::{ConnectionState, ConnectionStatus},
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sessions: SessionManager,
    pub checkin: CheckinSettings,
    /// Status of the messaging channel, reported by the health endpoint
    pub connection: ConnectionState,
}

/// State with default stations, TTL and retry policy around an existing connection.
impl From<DatabaseConnection> for AppState {
    fn from(db: DatabaseConnection) -> Self {
        Self {
            db,
            sessions: SessionManager::new(DEFAULT_SESSION_TTL_SECONDS),
            checkin: CheckinSettings::new(
                DEFAULT_STATION_TOKENS.split(',').map(str::to_string),
                RetryPolicy::default(),
            ),
            connection: ConnectionState::new(ConnectionStatus::Ready),
        }
    }
}
