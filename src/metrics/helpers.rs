//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use crate::notification::{Channel, DeliveryError};

use super::{
    CHANNELS_REGISTERED, DELIVERY_FAILURES_TOTAL, DELIVERY_LATENCY, NOTIFICATIONS_DELIVERED_TOTAL,
    UNKNOWN_CHANNEL_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording dispatch metrics
pub struct DispatchMetrics;

impl DispatchMetrics {
    /// Record a successful delivery
    pub fn record_delivered(channel: Channel) {
        NOTIFICATIONS_DELIVERED_TOTAL
            .with_label_values(&[channel.as_str()])
            .inc();
    }

    /// Record a request rejected for an unknown channel
    pub fn record_unknown_channel() {
        UNKNOWN_CHANNEL_TOTAL.inc();
    }

    /// Record a failed delivery
    pub fn record_failed(error: &DeliveryError) {
        let kind = match error {
            DeliveryError::Timeout { .. } => "timeout",
            DeliveryError::Transport { .. } => "transport",
        };
        DELIVERY_FAILURES_TOTAL
            .with_label_values(&[error.channel().as_str(), kind])
            .inc();
    }

    /// Record how long a deliver call took
    pub fn observe_latency(channel: Channel, elapsed: Duration) {
        DELIVERY_LATENCY
            .with_label_values(&[channel.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Record the size of the registry
    pub fn set_channels_registered(count: usize) {
        CHANNELS_REGISTERED.set(count as i64);
    }
}
