//! In-memory store of check-in sessions.
//!
//! A scan creates a PENDING session which a station has `ttl` to confirm. Sessions are never
//! persisted; a restart drops every pending scan.

use std::{collections::HashMap, sync::Arc};

use chrono::{NaiveDateTime, TimeDelta, Utc};
use rand::Rng;
use sea_orm::ConnectionTrait;
use tokio::sync::Mutex;

use crate::server::{
    data::scan_code::ScanCodeRepository,
    error::{checkin::CheckinError, Error},
    model::{
        db::ChildModel,
        session::{CheckinSession, SessionStatus},
    },
    util::time::delta_seconds,
};

const SESSION_ID_LENGTH: usize = 32;

/// How long finished sessions stay answerable before a sweep removes them (seconds).
///
/// A late station asking about a swept session gets a 404 instead of a 409/410.
pub const SWEEP_GRACE_SECONDS: u64 = 5 * 60;

/// Shared handle to the session store, cheap to clone into request state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerRef>,
}

struct SessionManagerRef {
    ttl: TimeDelta,
    sessions: Mutex<HashMap<String, CheckinSession>>,
}

impl SessionManager {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            inner: Arc::new(SessionManagerRef {
                ttl: delta_seconds(ttl_seconds),
                sessions: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.inner.ttl
    }

    /// Resolve a scanned code and open a pending session for the child.
    ///
    /// # Returns
    /// - `Ok((CheckinSession, ChildModel))` - New session and the child it binds
    /// - `Err(CheckinError::ChildNotFound)` - No active child holds the code
    pub async fn create_session<C: ConnectionTrait>(
        &self,
        db: &C,
        code: &str,
        station_id: &str,
        device_id: &str,
    ) -> Result<(CheckinSession, ChildModel), Error> {
        self.create_session_at(db, code, station_id, device_id, Utc::now().naive_utc())
            .await
    }

    pub async fn create_session_at<C: ConnectionTrait>(
        &self,
        db: &C,
        code: &str,
        station_id: &str,
        device_id: &str,
        now: NaiveDateTime,
    ) -> Result<(CheckinSession, ChildModel), Error> {
        let child = ScanCodeRepository::new(db)
            .find_active_child(code)
            .await?
            .ok_or_else(|| CheckinError::ChildNotFound(code.to_string()))?;

        let session = CheckinSession {
            session_id: new_session_id(),
            child_id: child.id,
            station_id: station_id.to_string(),
            device_id: device_id.to_string(),
            created_at: now,
            expires_at: now + self.inner.ttl,
            status: SessionStatus::Pending,
        };

        self.inner
            .sessions
            .lock()
            .await
            .insert(session.session_id.clone(), session.clone());

        tracing::debug!(
            session_id = %session.session_id,
            child_id = child.id,
            station_id,
            "Created check-in session"
        );

        Ok((session, child))
    }

    /// Look up a session, expiring it if its TTL has passed.
    pub async fn get_session(&self, session_id: &str) -> Result<CheckinSession, CheckinError> {
        self.get_session_at(session_id, Utc::now().naive_utc())
            .await
    }

    /// Look up a session as of `now`.
    ///
    /// # Returns
    /// - `Ok(CheckinSession)` - Session is pending or already confirmed
    /// - `Err(CheckinError::SessionExpired)` - Session expired unconfirmed
    /// - `Err(CheckinError::SessionNotFound)` - Unknown or swept session id
    pub async fn get_session_at(
        &self,
        session_id: &str,
        now: NaiveDateTime,
    ) -> Result<CheckinSession, CheckinError> {
        let mut sessions = self.inner.sessions.lock().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| CheckinError::SessionNotFound(session_id.to_string()))?;

        expire_if_due(session, now);

        match session.status {
            SessionStatus::Expired => Err(CheckinError::SessionExpired(session_id.to_string())),
            SessionStatus::Pending | SessionStatus::Confirmed => Ok(session.clone()),
        }
    }

    /// Consume a pending session.
    pub async fn confirm_session(&self, session_id: &str) -> Result<CheckinSession, CheckinError> {
        self.confirm_session_at(session_id, Utc::now().naive_utc())
            .await
    }

    /// Move a session from PENDING to CONFIRMED as of `now`.
    ///
    /// The check and the transition happen under one lock, so of two concurrent
    /// confirmations exactly one succeeds and the other sees `SessionAlreadyConfirmed`.
    pub async fn confirm_session_at(
        &self,
        session_id: &str,
        now: NaiveDateTime,
    ) -> Result<CheckinSession, CheckinError> {
        let mut sessions = self.inner.sessions.lock().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| CheckinError::SessionNotFound(session_id.to_string()))?;

        expire_if_due(session, now);

        match session.status {
            SessionStatus::Pending => {
                session.status = SessionStatus::Confirmed;
                Ok(session.clone())
            }
            SessionStatus::Confirmed => Err(CheckinError::SessionAlreadyConfirmed(
                session_id.to_string(),
            )),
            SessionStatus::Expired => Err(CheckinError::SessionExpired(session_id.to_string())),
        }
    }

    /// Drop sessions that finished or expired more than `grace` ago.
    ///
    /// # Returns
    /// Number of sessions removed
    pub async fn sweep_at(&self, now: NaiveDateTime, grace: TimeDelta) -> usize {
        let mut sessions = self.inner.sessions.lock().await;
        let before = sessions.len();

        sessions.retain(|_, session| now < session.expires_at + grace);

        before - sessions.len()
    }

    pub async fn sweep(&self) -> usize {
        self.sweep_at(Utc::now().naive_utc(), delta_seconds(SWEEP_GRACE_SECONDS))
            .await
    }

    /// Number of sessions held, including finished ones not yet swept.
    pub async fn len(&self) -> usize {
        self.inner.sessions.lock().await.len()
    }
}

fn expire_if_due(session: &mut CheckinSession, now: NaiveDateTime) {
    if session.status == SessionStatus::Pending && session.is_past_ttl(now) {
        session.status = SessionStatus::Expired;
    }
}

fn new_session_id() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}
