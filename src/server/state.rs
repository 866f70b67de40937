use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::error::Result;
use crate::notification::{DeliverySink, NotificationDispatcher, StrategyRegistry, TracingSink};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub start_time: Instant,
}

impl AppState {
    /// Build state whose strategies log every delivery through `tracing`
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_sink(settings, Arc::new(TracingSink))
    }

    /// Build state whose strategies report to `sink`
    pub fn with_sink(settings: Settings, sink: Arc<dyn DeliverySink>) -> Result<Self> {
        let registry = StrategyRegistry::from_channel_names(&settings.channels.enabled, sink)?;
        tracing::info!(channels = ?registry.channels(), "Strategy registry built");

        let dispatcher = Arc::new(NotificationDispatcher::with_config(
            Arc::new(registry),
            settings.dispatcher_config(),
        ));

        Ok(Self {
            settings: Arc::new(settings),
            dispatcher,
            start_time: Instant::now(),
        })
    }
}
