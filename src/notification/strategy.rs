//! Delivery strategy abstraction.
//!
//! Each supported [`Channel`] has exactly one strategy. Strategies are stateless
//! apart from the sink they report to, and a single instance is shared by every
//! request routed to that channel.

use std::sync::Arc;

use async_trait::async_trait;

use super::strategies::{
    DiscordStrategy, EmailStrategy, InstagramStrategy, TwitterStrategy, WhatsappStrategy,
};
use super::{Channel, DeliveryError, DeliverySink};

/// Delivers a message to a destination over one channel
#[async_trait]
pub trait DeliveryStrategy: Send + Sync {
    /// Channel served by this strategy
    fn channel(&self) -> Channel;

    /// Deliver `message` to `destination`.
    ///
    /// Inputs are trusted: blank-field validation happens before dispatch.
    async fn deliver(&self, destination: &str, message: &str) -> Result<(), DeliveryError>;
}

/// Create the built-in strategy for `channel`, reporting to `sink`
pub fn strategy_for(channel: Channel, sink: Arc<dyn DeliverySink>) -> Arc<dyn DeliveryStrategy> {
    match channel {
        Channel::Discord => Arc::new(DiscordStrategy::new(sink)),
        Channel::Instagram => Arc::new(InstagramStrategy::new(sink)),
        Channel::Twitter => Arc::new(TwitterStrategy::new(sink)),
        Channel::Email => Arc::new(EmailStrategy::new(sink)),
        Channel::Whatsapp => Arc::new(WhatsappStrategy::new(sink)),
    }
}
