//! Channel listing endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::notification::Channel;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct ChannelListResponse {
    pub channels: Vec<Channel>,
    pub total_channels: usize,
}

/// GET /api/v1/channels - List channels with a registered strategy
pub async fn list_channels(State(state): State<AppState>) -> Json<ChannelListResponse> {
    let channels = state.dispatcher.registry().channels();
    let total = channels.len();

    Json(ChannelListResponse {
        channels,
        total_channels: total,
    })
}
