//! Prometheus metrics for the notification router.
//!
//! - Dispatch metrics (notifications routed per channel, unknown channels)
//! - Delivery metrics (failures by channel and kind, delivery latency)
//! - Registry metrics (number of registered channels)

mod helpers;

pub use helpers::{encode_metrics, DispatchMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    HistogramVec, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "notify";

lazy_static! {
    // ============================================================================
    // Dispatch Metrics
    // ============================================================================

    /// Notifications successfully delivered, by channel
    pub static ref NOTIFICATIONS_DELIVERED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_notifications_delivered_total", METRIC_PREFIX),
        "Total notifications delivered",
        &["channel"]
    ).unwrap();

    /// Requests naming a channel with no registered strategy
    pub static ref UNKNOWN_CHANNEL_TOTAL: IntCounter = register_int_counter!(
        format!("{}_unknown_channel_total", METRIC_PREFIX),
        "Total notifications rejected for an unknown channel"
    ).unwrap();

    // ============================================================================
    // Delivery Metrics
    // ============================================================================

    /// Failed deliveries, by channel and failure kind
    pub static ref DELIVERY_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_delivery_failures_total", METRIC_PREFIX),
        "Total delivery failures",
        &["channel", "kind"]
    ).unwrap();

    /// Time spent inside a strategy's deliver call
    pub static ref DELIVERY_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_delivery_latency_seconds", METRIC_PREFIX),
        "Delivery latency in seconds",
        &["channel"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    ).unwrap();

    // ============================================================================
    // Registry Metrics
    // ============================================================================

    /// Number of channels with a registered strategy
    pub static ref CHANNELS_REGISTERED: IntGauge = register_int_gauge!(
        format!("{}_channels_registered", METRIC_PREFIX),
        "Number of channels with a registered delivery strategy"
    ).unwrap();
}
