mod http;

pub use http::{send_notification, NotificationPayload, SendNotificationResponse};
