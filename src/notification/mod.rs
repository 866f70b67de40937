//! Notification routing: channels, delivery strategies, and dispatching.
//!
//! # Dispatch Architecture
//!
//! A request names a channel, a destination and a message. The
//! [`NotificationDispatcher`] resolves the channel through an immutable
//! [`StrategyRegistry`] and hands the destination and message to the
//! [`DeliveryStrategy`] registered for it:
//!
//! - `DiscordStrategy`, `InstagramStrategy`, `TwitterStrategy`,
//!   `EmailStrategy`, `WhatsappStrategy`: one shared instance per channel
//! - Every delivery is reported to a [`DeliverySink`] as a [`DeliveryRecord`]
//!   (`TracingSink` in production, `MemorySink` for inspection)
//!
//! Unknown channels are rejected with [`DispatchError::UnknownChannel`] before
//! any strategy runs.

mod dispatcher;
mod error;
mod registry;
mod sink;
mod strategies;
mod strategy;
mod types;

pub use dispatcher::{
    DispatcherConfig, DispatcherStats, DispatcherStatsSnapshot, NotificationDispatcher,
};
pub use error::{DeliveryError, DispatchError, RegistryError, ValidationError};
pub use registry::{StrategyRegistry, StrategyRegistryBuilder};
pub use sink::{DeliverySink, FanoutSink, MemorySink, TracingSink};
pub use strategies::{
    DiscordStrategy, EmailStrategy, InstagramStrategy, TwitterStrategy, WhatsappStrategy,
};
pub use strategy::{strategy_for, DeliveryStrategy};
pub use types::{Channel, DeliveryRecord, DeliveryResult, NotificationRequest};
