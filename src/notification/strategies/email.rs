use std::sync::Arc;

use async_trait::async_trait;

use crate::notification::{Channel, DeliveryError, DeliveryRecord, DeliverySink, DeliveryStrategy};

/// Delivers notifications by email
pub struct EmailStrategy {
    sink: Arc<dyn DeliverySink>,
}

impl EmailStrategy {
    pub fn new(sink: Arc<dyn DeliverySink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl DeliveryStrategy for EmailStrategy {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn deliver(&self, destination: &str, message: &str) -> Result<(), DeliveryError> {
        self.sink.record(&DeliveryRecord::new(Channel::Email, destination, message));
        Ok(())
    }
}
