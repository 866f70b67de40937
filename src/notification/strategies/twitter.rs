use std::sync::Arc;

use async_trait::async_trait;

use crate::notification::{Channel, DeliveryError, DeliveryRecord, DeliverySink, DeliveryStrategy};

/// Delivers notifications as Twitter mentions or direct messages
pub struct TwitterStrategy {
    sink: Arc<dyn DeliverySink>,
}

impl TwitterStrategy {
    pub fn new(sink: Arc<dyn DeliverySink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl DeliveryStrategy for TwitterStrategy {
    fn channel(&self) -> Channel {
        Channel::Twitter
    }

    async fn deliver(&self, destination: &str, message: &str) -> Result<(), DeliveryError> {
        self.sink.record(&DeliveryRecord::new(Channel::Twitter, destination, message));
        Ok(())
    }
}
