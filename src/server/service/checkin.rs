//! Check-in coordination: scan, confirm, checkout and the notifications a check-in queues.

use std::{collections::HashSet, sync::Arc};

use chrono::{NaiveDateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::checkin::{
        ChildDto, CheckoutRequest, CheckoutResponse, ConfirmRequest, ConfirmResponse,
        ProgramDto, ScanRequest, ScanResponse, SessionSummaryDto,
    },
    server::{
        data::{
            attendance::{AttendanceRepository, NewAttendance},
            child::ChildRepository,
            guardian::GuardianRepository,
            program::ProgramRepository,
        },
        error::{checkin::CheckinError, Error},
        model::{
            db::{ChildModel, GuardianModel, ProgramModel},
            message::MessageType,
            session::CheckinSession,
        },
        service::{
            notification::{
                render::{render_message_body, TemplateVars},
                NotificationQueue, RetryPolicy,
            },
            session::SessionManager,
        },
        util::{
            lock::KeyedLock,
            time::{age_in_years, delta_seconds, seconds_until},
        },
    },
};

/// Recorded as `checked_out_by` when the scheduler closes a forgotten attendance record.
pub const AUTO_CHECKOUT_ACTOR: &str = "auto-checkout";

/// Settings shared by every check-in request.
#[derive(Clone)]
pub struct CheckinSettings {
    /// Station tokens allowed to scan, confirm and check out
    pub stations: Arc<HashSet<String>>,
    /// Serializes attendance writes per child
    pub child_locks: Arc<KeyedLock<i32>>,
    /// Attempt cap and backoff stamped on queued messages
    pub retry: RetryPolicy,
}

impl CheckinSettings {
    pub fn new(stations: impl IntoIterator<Item = String>, retry: RetryPolicy) -> Self {
        Self {
            stations: Arc::new(stations.into_iter().collect()),
            child_locks: Arc::new(KeyedLock::new()),
            retry,
        }
    }

    pub fn is_admitted(&self, station_id: &str) -> bool {
        self.stations.contains(station_id)
    }

    fn admit(&self, station_id: &str) -> Result<(), CheckinError> {
        if self.is_admitted(station_id) {
            Ok(())
        } else {
            Err(CheckinError::InvalidStation(station_id.to_string()))
        }
    }
}

/// Outcome of writing attendance for a confirmed session
struct AttendanceWrite {
    attendance_id: i32,
    already_checked_in: bool,
    prior_visits: u64,
}

pub struct CheckinService<'a> {
    db: &'a DatabaseConnection,
    sessions: &'a SessionManager,
    settings: &'a CheckinSettings,
}

impl<'a> CheckinService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        sessions: &'a SessionManager,
        settings: &'a CheckinSettings,
    ) -> Self {
        Self {
            db,
            sessions,
            settings,
        }
    }

    /// Opens a check-in session for a scanned code.
    ///
    /// # Returns
    /// - `Ok(ScanResponse)` - Pending session with the child's details
    /// - `Err(CheckinError::InvalidStation)` - Station is not admitted, checked before the code
    /// - `Err(CheckinError::ChildNotFound)` - Code is unknown, revoked, or its child inactive
    pub async fn scan(&self, request: &ScanRequest) -> Result<ScanResponse, Error> {
        self.settings.admit(&request.station_id)?;

        let (session, child) = self
            .sessions
            .create_session(self.db, &request.code, &request.station_id, &request.device_id)
            .await?;

        tracing::info!(
            child_id = child.id,
            station_id = %request.station_id,
            "Scanned child {}",
            child.first_name
        );

        Ok(ScanResponse {
            session_id: session.session_id,
            child: ChildDto::from(child),
            expires_in_seconds: self.sessions.ttl().num_seconds(),
        })
    }

    pub async fn confirm(&self, request: &ConfirmRequest) -> Result<ConfirmResponse, Error> {
        self.confirm_at(request, Utc::now().naive_utc()).await
    }

    /// Confirms a pending session, records attendance and queues guardian notifications.
    ///
    /// The station and program are validated before the session is consumed. Session errors
    /// are returned unchanged. When the child already has an open attendance record that
    /// record is returned with `already_checked_in` set and nothing is queued.
    ///
    /// Notifications are queued after the attendance write commits. A queueing failure is
    /// logged and leaves the attendance in place.
    pub async fn confirm_at(
        &self,
        request: &ConfirmRequest,
        now: NaiveDateTime,
    ) -> Result<ConfirmResponse, Error> {
        self.settings.admit(&request.station_id)?;
        let program = self.resolve_program(request.program_id).await?;

        let session = self
            .sessions
            .confirm_session_at(&request.session_id, now)
            .await?;

        // The session is spent from here on, a failure means the child must be scanned again
        self.check_in(&session, &program, request, now)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    session_id = %session.session_id,
                    child_id = session.child_id,
                    station_id = %request.station_id,
                    "Check-in failed after the session was confirmed, re-scan required: {}",
                    e
                )
            })
    }

    async fn check_in(
        &self,
        session: &CheckinSession,
        program: &ProgramModel,
        request: &ConfirmRequest,
        now: NaiveDateTime,
    ) -> Result<ConfirmResponse, Error> {
        let (child, family_id) = match ChildRepository::new(self.db)
            .get_with_family(session.child_id)
            .await?
        {
            Some((child, Some(family))) => (child, family.id),
            Some((child, None)) => {
                return Err(Error::InternalError(format!(
                    "Child {} references missing family {}",
                    child.id, child.family_id
                )))
            }
            None => return Err(CheckinError::ChildNotFound(session.child_id.to_string()).into()),
        };

        let write = {
            let _guard = self.settings.child_locks.lock(child.id).await;
            self.write_attendance(&child, program, request, now).await?
        };

        if write.already_checked_in {
            tracing::info!(
                child_id = child.id,
                attendance_id = write.attendance_id,
                "Child {} is already checked in",
                child.first_name
            );

            return Ok(ConfirmResponse {
                attendance_id: write.attendance_id,
                already_checked_in: true,
                messages_queued: 0,
            });
        }

        tracing::info!(
            child_id = child.id,
            attendance_id = write.attendance_id,
            program = %program.name,
            actor = %request.actor,
            "Checked in {}",
            child.first_name
        );

        let messages_queued = self
            .queue_notifications(&child, family_id, write.prior_visits, &request.station_id, now)
            .await;

        Ok(ConfirmResponse {
            attendance_id: write.attendance_id,
            already_checked_in: false,
            messages_queued,
        })
    }

    async fn resolve_program(&self, program_id: Option<i32>) -> Result<ProgramModel, Error> {
        let program_repo = ProgramRepository::new(self.db);

        match program_id {
            Some(id) => program_repo
                .find_active(id)
                .await?
                .ok_or_else(|| CheckinError::ProgramNotFound(id).into()),
            None => program_repo
                .first_active()
                .await?
                .ok_or_else(|| CheckinError::NoActiveProgram.into()),
        }
    }

    /// Writes the attendance record unless the child is already checked in.
    ///
    /// Must run under the child's lock.
    async fn write_attendance(
        &self,
        child: &ChildModel,
        program: &ProgramModel,
        request: &ConfirmRequest,
        now: NaiveDateTime,
    ) -> Result<AttendanceWrite, Error> {
        let txn = self.db.begin().await?;
        let attendance_repo = AttendanceRepository::new(&txn);

        if let Some(open) = attendance_repo.find_open(child.id).await? {
            txn.commit().await?;

            return Ok(AttendanceWrite {
                attendance_id: open.id,
                already_checked_in: true,
                prior_visits: 0,
            });
        }

        let prior_visits = attendance_repo.count_for_child(child.id).await?;
        let attendance = attendance_repo
            .create(NewAttendance {
                child_id: child.id,
                program_id: program.id,
                station_id: &request.station_id,
                device_id: &request.device_id,
                created_by: &request.actor,
                checkin_at: now,
            })
            .await?;

        txn.commit().await?;

        Ok(AttendanceWrite {
            attendance_id: attendance.id,
            already_checked_in: false,
            prior_visits,
        })
    }

    /// Queues a `checkin` message per opted-in guardian, plus a `request_info` message per
    /// guardian on the child's second visit.
    ///
    /// # Returns
    /// Number of messages queued
    async fn queue_notifications(
        &self,
        child: &ChildModel,
        family_id: i32,
        prior_visits: u64,
        station_id: &str,
        now: NaiveDateTime,
    ) -> usize {
        let guardian_repo = GuardianRepository::new(self.db);

        let mut outgoing: Vec<(GuardianModel, MessageType)> = Vec::new();

        match guardian_repo.list_opted_in(family_id).await {
            Ok(guardians) => {
                outgoing.extend(guardians.into_iter().map(|g| (g, MessageType::Checkin)))
            }
            Err(e) => tracing::error!(
                child_id = child.id,
                "Failed to load opted-in guardians, check-in notices not queued: {}",
                e
            ),
        }

        if prior_visits == 1 {
            match guardian_repo.list_by_family(family_id).await {
                Ok(guardians) => outgoing
                    .extend(guardians.into_iter().map(|g| (g, MessageType::RequestInfo))),
                Err(e) => tracing::error!(
                    child_id = child.id,
                    "Failed to load guardians, info requests not queued: {}",
                    e
                ),
            }
        }

        let queue = NotificationQueue::new(self.db, &self.settings.retry);

        let mut queued = 0;
        for (guardian, message_type) in outgoing {
            let body = render_message_body(
                message_type,
                &TemplateVars {
                    child_name: &child.first_name,
                    guardian_name: &guardian.first_name,
                    station_id,
                    time: now,
                },
            );

            match queue
                .enqueue(&guardian, child.id, message_type, body, now)
                .await
            {
                Ok(_) => queued += 1,
                Err(e) => tracing::error!(
                    child_id = child.id,
                    guardian_id = guardian.id,
                    message_type = %message_type,
                    "Failed to queue guardian message: {}",
                    e
                ),
            }
        }

        queued
    }

    pub async fn session_summary(&self, session_id: &str) -> Result<SessionSummaryDto, Error> {
        self.session_summary_at(session_id, Utc::now().naive_utc())
            .await
    }

    /// Details of a pending or confirmed session for the station display.
    pub async fn session_summary_at(
        &self,
        session_id: &str,
        now: NaiveDateTime,
    ) -> Result<SessionSummaryDto, Error> {
        let session = self.sessions.get_session_at(session_id, now).await?;

        let (child, family) = ChildRepository::new(self.db)
            .get_with_family(session.child_id)
            .await?
            .ok_or_else(|| CheckinError::SessionNotFound(session_id.to_string()))?;

        Ok(SessionSummaryDto {
            expires_in_seconds: seconds_until(now, session.expires_at),
            status: session.status.to_string(),
            session_id: session.session_id,
            station_id: session.station_id,
            device_id: session.device_id,
            family_name: family.map(|f| f.family_name).unwrap_or_default(),
            age_years: age_in_years(child.birth_date, now.date()),
            child: ChildDto::from(child),
        })
    }

    /// Closes the child's open attendance record.
    ///
    /// # Returns
    /// - `Ok(CheckoutResponse)` - Record closed
    /// - `Err(CheckinError::InvalidStation)` - Station is not admitted
    /// - `Err(CheckinError::NotCheckedIn)` - Child has no open record
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutResponse, Error> {
        self.settings.admit(&request.station_id)?;

        let _guard = self.settings.child_locks.lock(request.child_id).await;

        let attendance_repo = AttendanceRepository::new(self.db);
        let open = attendance_repo
            .find_open(request.child_id)
            .await?
            .ok_or(CheckinError::NotCheckedIn(request.child_id))?;

        let closed = attendance_repo
            .checkout(open, Utc::now().naive_utc(), &request.actor)
            .await?;

        tracing::info!(
            child_id = request.child_id,
            attendance_id = closed.id,
            actor = %request.actor,
            "Checked out child"
        );

        Ok(CheckoutResponse {
            attendance_id: closed.id,
            checkout_at: closed.checkout_at.unwrap_or_default(),
        })
    }

    pub async fn list_programs(&self) -> Result<Vec<ProgramDto>, Error> {
        let programs = ProgramRepository::new(self.db).list_active().await?;

        Ok(programs.into_iter().map(ProgramDto::from).collect())
    }

    /// Closes attendance records left open longer than `after_hours` as of `now`.
    pub async fn auto_checkout_at(&self, now: NaiveDateTime, after_hours: u64) -> Result<u64, Error> {
        let cutoff = now - delta_seconds(after_hours.saturating_mul(60 * 60));

        let closed = AttendanceRepository::new(self.db)
            .close_open_before(cutoff, now, AUTO_CHECKOUT_ACTOR)
            .await?;

        if closed > 0 {
            tracing::info!("Auto checked out {} attendance record(s)", closed);
        }

        Ok(closed)
    }
}
