use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;
use crate::triggers::send_notification;

use super::channels::list_channels;
use super::health::{health, stats};
use super::metrics::prometheus_metrics;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health, stats & metrics
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api/v1",
            Router::new()
                .route("/notifications", post(send_notification))
                .route("/channels", get(list_channels)),
        )
}
