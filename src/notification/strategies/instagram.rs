use std::sync::Arc;

use async_trait::async_trait;

use crate::notification::{Channel, DeliveryError, DeliveryRecord, DeliverySink, DeliveryStrategy};

/// Delivers notifications as Instagram direct messages.
///
/// Has no Instagram-specific formatting; it reports like every other channel.
pub struct InstagramStrategy {
    sink: Arc<dyn DeliverySink>,
}

impl InstagramStrategy {
    pub fn new(sink: Arc<dyn DeliverySink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl DeliveryStrategy for InstagramStrategy {
    fn channel(&self) -> Channel {
        Channel::Instagram
    }

    async fn deliver(&self, destination: &str, message: &str) -> Result<(), DeliveryError> {
        self.sink.record(&DeliveryRecord::new(Channel::Instagram, destination, message));
        Ok(())
    }
}
