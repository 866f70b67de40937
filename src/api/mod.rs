//! API layer - HTTP endpoint handlers organized by domain.

mod channels;
mod health;
mod metrics;
mod routes;

pub use channels::{list_channels, ChannelListResponse};
pub use health::{health, stats, HealthResponse, StatsResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
