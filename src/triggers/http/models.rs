//! Request and response models for the HTTP notification API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::notification::{Channel, NotificationRequest, ValidationError};

/// Raw request body.
///
/// Fields are optional here so that missing and `null` values are reported
/// as validation errors rather than deserialization failures.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationPayload {
    /// Channel identifier, e.g. "email"
    pub channel: Option<String>,
    /// Channel-specific address
    pub destination: Option<String>,
    /// Message body
    pub message: Option<String>,
}

impl TryFrom<NotificationPayload> for NotificationRequest {
    type Error = ValidationError;

    fn try_from(payload: NotificationPayload) -> Result<Self, Self::Error> {
        NotificationRequest::new(
            payload.channel.unwrap_or_default(),
            payload.destination.unwrap_or_default(),
            payload.message.unwrap_or_default(),
        )
    }
}

/// Response for an accepted notification
#[derive(Debug, Serialize)]
pub struct SendNotificationResponse {
    /// Whether the notification was accepted
    pub success: bool,
    /// Notification ID
    pub notification_id: Uuid,
    /// Channel the notification was routed to
    pub channel: Channel,
    /// When the notification was accepted
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_missing_field_is_blank() {
        let payload: NotificationPayload =
            serde_json::from_str(r#"{"channel": "email", "message": "hi"}"#).unwrap();

        let err = NotificationRequest::try_from(payload).unwrap_err();
        assert_eq!(err, ValidationError::Blank { field: "destination" });
    }

    #[test]
    fn test_payload_null_field_is_blank() {
        let payload: NotificationPayload = serde_json::from_str(
            r#"{"channel": null, "destination": "a@b.com", "message": "hi"}"#,
        )
        .unwrap();

        let err = NotificationRequest::try_from(payload).unwrap_err();
        assert_eq!(err, ValidationError::Blank { field: "channel" });
    }

    #[test]
    fn test_payload_converts_to_request() {
        let payload: NotificationPayload = serde_json::from_str(
            r##"{"channel": "discord", "destination": "#alerts", "message": "deploy done"}"##,
        )
        .unwrap();

        let request = NotificationRequest::try_from(payload).unwrap();
        assert_eq!(request.channel(), "discord");
        assert_eq!(request.destination(), "#alerts");
        assert_eq!(request.message(), "deploy done");
    }
}
