//! HTTP notification handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::notification::NotificationRequest;
use crate::server::AppState;

use super::models::{NotificationPayload, SendNotificationResponse};

/// Route a notification to the strategy for its channel.
///
/// Replies `202 Accepted` once the strategy has taken the message.
#[tracing::instrument(
    name = "http.send_notification",
    skip(state, payload),
    fields(channel = tracing::field::Empty)
)]
pub async fn send_notification(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NotificationPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<SendNotificationResponse>)> {
    let Json(payload) = payload?;
    let request = NotificationRequest::try_from(payload)?;
    tracing::Span::current().record("channel", request.channel());

    let result = state.dispatcher.send(&request).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SendNotificationResponse {
            success: true,
            notification_id: result.notification_id,
            channel: result.channel,
            timestamp: result.accepted_at,
        }),
    ))
}
