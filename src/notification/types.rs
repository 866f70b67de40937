use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{DispatchError, ValidationError};

/// Delivery medium a notification is routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Discord,
    Instagram,
    Twitter,
    Email,
    Whatsapp,
}

impl Channel {
    /// Every supported channel, in registry order
    pub const ALL: [Channel; 5] = [
        Channel::Discord,
        Channel::Instagram,
        Channel::Twitter,
        Channel::Email,
        Channel::Whatsapp,
    ];

    /// Wire identifier of the channel (lowercase, case-sensitive)
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Discord => "discord",
            Channel::Instagram => "instagram",
            Channel::Twitter => "twitter",
            Channel::Email => "email",
            Channel::Whatsapp => "whatsapp",
        }
    }

    /// Human-readable label used in delivery logs
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Discord => "Discord",
            Channel::Instagram => "Instagram",
            Channel::Twitter => "Twitter",
            Channel::Email => "Email",
            Channel::Whatsapp => "Whatsapp",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownChannel(s.to_string()))
    }
}

/// A validated notification request.
///
/// All three fields are guaranteed non-blank. The channel is kept as the raw
/// string so that unsupported channels are reported by the dispatcher rather
/// than at validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    channel: String,
    destination: String,
    message: String,
}

impl NotificationRequest {
    /// Build a request, rejecting blank fields
    pub fn new(
        channel: impl Into<String>,
        destination: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let channel = channel.into();
        let destination = destination.into();
        let message = message.into();

        ensure_not_blank("channel", &channel)?;
        ensure_not_blank("destination", &destination)?;
        ensure_not_blank("message", &message)?;

        Ok(Self {
            channel,
            destination,
            message,
        })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn ensure_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

/// Structured record of a single delivery, emitted by a strategy to its sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryRecord {
    pub channel: Channel,
    pub destination: String,
    pub message: String,
    pub delivered_at: DateTime<Utc>,
}

impl DeliveryRecord {
    pub fn new(channel: Channel, destination: &str, message: &str) -> Self {
        Self {
            channel,
            destination: destination.to_string(),
            message: message.to_string(),
            delivered_at: Utc::now(),
        }
    }
}

/// Result of a successful dispatch
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryResult {
    /// Identifier assigned to this dispatch
    pub notification_id: Uuid,
    /// Channel the notification was routed to
    pub channel: Channel,
    /// When the delivery completed
    pub accepted_at: DateTime<Utc>,
}

impl DeliveryResult {
    pub(crate) fn new(notification_id: Uuid, channel: Channel) -> Self {
        Self {
            notification_id,
            channel,
            accepted_at: Utc::now(),
        }
    }
}
