//! Error types for request validation, dispatch and delivery.

use thiserror::Error;

use super::Channel;

/// A notification request field failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
}

/// Failure raised by a delivery strategy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("delivery via {channel} timed out after {timeout_ms}ms")]
    Timeout { channel: Channel, timeout_ms: u64 },

    #[error("delivery via {channel} failed: {reason}")]
    Transport { channel: Channel, reason: String },
}

impl DeliveryError {
    /// Channel the failed delivery was routed to
    pub fn channel(&self) -> Channel {
        match self {
            DeliveryError::Timeout { channel, .. } | DeliveryError::Transport { channel, .. } => {
                *channel
            }
        }
    }

    /// Whether a caller could reasonably try the same delivery again.
    ///
    /// The service itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryError::Timeout { .. } => true,
            DeliveryError::Transport { .. } => false,
        }
    }
}

/// Failure to route a notification to a strategy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Failure while building a strategy registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("channel {0} registered more than once")]
    DuplicateChannel(Channel),

    #[error("unsupported channel in configuration: {0}")]
    UnsupportedChannel(String),
}
