use std::sync::Arc;

use async_trait::async_trait;

use crate::notification::{Channel, DeliveryError, DeliveryRecord, DeliverySink, DeliveryStrategy};

/// Delivers notifications to Discord webhooks and channels
pub struct DiscordStrategy {
    sink: Arc<dyn DeliverySink>,
}

impl DiscordStrategy {
    pub fn new(sink: Arc<dyn DeliverySink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl DeliveryStrategy for DiscordStrategy {
    fn channel(&self) -> Channel {
        Channel::Discord
    }

    async fn deliver(&self, destination: &str, message: &str) -> Result<(), DeliveryError> {
        self.sink.record(&DeliveryRecord::new(Channel::Discord, destination, message));
        Ok(())
    }
}
