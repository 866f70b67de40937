use std::sync::Arc;

use async_trait::async_trait;

use crate::notification::{Channel, DeliveryError, DeliveryRecord, DeliverySink, DeliveryStrategy};

/// Delivers notifications as WhatsApp messages
pub struct WhatsappStrategy {
    sink: Arc<dyn DeliverySink>,
}

impl WhatsappStrategy {
    pub fn new(sink: Arc<dyn DeliverySink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl DeliveryStrategy for WhatsappStrategy {
    fn channel(&self) -> Channel {
        Channel::Whatsapp
    }

    async fn deliver(&self, destination: &str, message: &str) -> Result<(), DeliveryError> {
        self.sink.record(&DeliveryRecord::new(Channel::Whatsapp, destination, message));
        Ok(())
    }
}
