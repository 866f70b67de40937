//! HTTP notification trigger
//!
//! `POST /api/v1/notifications` accepts `{ "channel", "destination", "message" }`,
//! validates it and hands it to the dispatcher.

mod handlers;
mod models;

pub use handlers::send_notification;
pub use models::{NotificationPayload, SendNotificationResponse};
