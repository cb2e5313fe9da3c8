use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        notification::{MessageQuery, QueuedMessageDto},
    },
    server::{
        error::{error_response, Error},
        model::{app::AppState, message::MessageStatus},
        service::notification::NotificationQueue,
    },
};

pub static ADMIN_TAG: &str = "admin";

const DEFAULT_MESSAGE_LIMIT: u64 = 100;
const MAX_MESSAGE_LIMIT: u64 = 1000;

/// List queued guardian messages, newest first
#[utoipa::path(
    get,
    path = "/api/admin/messages",
    tag = ADMIN_TAG,
    params(MessageQuery),
    responses(
        (status = 200, description = "Messages with attempts and last error", body = Vec<QueuedMessageDto>),
        (status = 400, description = "Unknown status filter", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, Error> {
    let status = match query.status.as_deref().map(str::parse::<MessageStatus>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(e)) => return Ok(error_response(StatusCode::BAD_REQUEST, e)),
    };
    let limit = query
        .limit
        .unwrap_or(DEFAULT_MESSAGE_LIMIT)
        .clamp(1, MAX_MESSAGE_LIMIT);

    let messages = NotificationQueue::new(&state.db, &state.checkin.retry)
        .list(status, limit)
        .await?;

    let messages: Vec<QueuedMessageDto> =
        messages.into_iter().map(QueuedMessageDto::from).collect();

    Ok((StatusCode::OK, Json(messages)).into_response())
}
