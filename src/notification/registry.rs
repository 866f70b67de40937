use std::collections::HashMap;
use std::sync::Arc;

use super::strategy::strategy_for;
use super::{Channel, DeliverySink, DeliveryStrategy, DispatchError, RegistryError};

/// Immutable mapping from channel to its delivery strategy.
///
/// Built once at startup; there is no way to add or remove strategies afterwards.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<Channel, Arc<dyn DeliveryStrategy>>,
}

impl StrategyRegistry {
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::default()
    }

    /// Registry with the built-in strategy for every supported channel
    pub fn with_all_channels(sink: Arc<dyn DeliverySink>) -> Self {
        let strategies = Channel::ALL
            .into_iter()
            .map(|channel| (channel, strategy_for(channel, sink.clone())))
            .collect();
        Self { strategies }
    }

    /// Registry with the built-in strategies for `channels` only
    pub fn from_channels(
        channels: &[Channel],
        sink: Arc<dyn DeliverySink>,
    ) -> Result<Self, RegistryError> {
        channels
            .iter()
            .try_fold(Self::builder(), |builder, channel| {
                builder.register(strategy_for(*channel, sink.clone()))
            })
            .map(StrategyRegistryBuilder::build)
    }

    /// Registry from channel names as they appear in configuration
    pub fn from_channel_names<S: AsRef<str>>(
        names: &[S],
        sink: Arc<dyn DeliverySink>,
    ) -> Result<Self, RegistryError> {
        let channels = names
            .iter()
            .map(|name| {
                name.as_ref()
                    .parse::<Channel>()
                    .map_err(|_| RegistryError::UnsupportedChannel(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_channels(&channels, sink)
    }

    /// Look up the strategy registered for a channel name
    pub fn resolve(&self, channel: &str) -> Result<Arc<dyn DeliveryStrategy>, DispatchError> {
        let parsed: Channel = channel.parse()?;
        self.get(parsed)
            .ok_or_else(|| DispatchError::UnknownChannel(channel.to_string()))
    }

    pub fn get(&self, channel: Channel) -> Option<Arc<dyn DeliveryStrategy>> {
        self.strategies.get(&channel).cloned()
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.strategies.contains_key(&channel)
    }

    /// Registered channels, sorted in declaration order
    pub fn channels(&self) -> Vec<Channel> {
        let mut channels: Vec<Channel> = self.strategies.keys().copied().collect();
        channels.sort();
        channels
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("channels", &self.channels())
            .finish()
    }
}

/// Collects strategies before the registry is frozen
#[derive(Default)]
pub struct StrategyRegistryBuilder {
    strategies: HashMap<Channel, Arc<dyn DeliveryStrategy>>,
}

impl StrategyRegistryBuilder {
    /// Add a strategy under the channel it reports.
    ///
    /// Each channel may be registered only once.
    pub fn register(
        mut self,
        strategy: Arc<dyn DeliveryStrategy>,
    ) -> Result<Self, RegistryError> {
        let channel = strategy.channel();
        if self.strategies.contains_key(&channel) {
            return Err(RegistryError::DuplicateChannel(channel));
        }
        self.strategies.insert(channel, strategy);
        Ok(self)
    }

    pub fn build(self) -> StrategyRegistry {
        StrategyRegistry {
            strategies: self.strategies,
        }
    }
}
