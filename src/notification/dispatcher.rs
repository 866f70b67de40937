use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::metrics::DispatchMetrics;

use super::{
    Channel, DeliveryError, DeliveryResult, DispatchError, NotificationRequest, StrategyRegistry,
};

/// Default upper bound for a single deliver call
const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of deliveries allowed in flight at once
const DEFAULT_MAX_CONCURRENT: usize = 64;

/// Limits applied around every delivery
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Upper bound for a single deliver call
    pub delivery_timeout: Duration,
    /// Deliveries allowed in flight at once (minimum 1)
    pub max_concurrent: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

/// Statistics for the notification dispatcher
#[derive(Debug)]
pub struct DispatcherStats {
    /// Total dispatch calls, including rejected ones
    pub total_dispatched: AtomicU64,
    /// Total successful deliveries
    pub total_delivered: AtomicU64,
    /// Total failed deliveries
    pub total_failed: AtomicU64,
    /// Dispatch calls naming an unknown channel
    pub unknown_channel: AtomicU64,
    per_channel: HashMap<Channel, AtomicU64>,
}

impl Default for DispatcherStats {
    fn default() -> Self {
        Self {
            total_dispatched: AtomicU64::new(0),
            total_delivered: AtomicU64::new(0),
            total_failed: AtomicU64::new(0),
            unknown_channel: AtomicU64::new(0),
            per_channel: Channel::ALL
                .into_iter()
                .map(|channel| (channel, AtomicU64::new(0)))
                .collect(),
        }
    }
}

impl DispatcherStats {
    fn record_delivered(&self, channel: Channel) {
        self.total_delivered.fetch_add(1, Ordering::Relaxed);
        if let Some(counter) = self.per_channel.get(&channel) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_dispatched: self.total_dispatched.load(Ordering::Relaxed),
            total_delivered: self.total_delivered.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            unknown_channel: self.unknown_channel.load(Ordering::Relaxed),
            per_channel: self
                .per_channel
                .iter()
                .map(|(channel, count)| {
                    (channel.as_str().to_string(), count.load(Ordering::Relaxed))
                })
                .collect(),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_dispatched: u64,
    pub total_delivered: u64,
    pub total_failed: u64,
    pub unknown_channel: u64,
    /// Successful deliveries keyed by channel name
    pub per_channel: BTreeMap<String, u64>,
}

/// Routes notifications to the strategy registered for their channel
pub struct NotificationDispatcher {
    registry: Arc<StrategyRegistry>,
    limiter: Semaphore,
    delivery_timeout: Duration,
    stats: DispatcherStats,
}

impl NotificationDispatcher {
    /// Create a dispatcher with default limits
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self::with_config(registry, DispatcherConfig::default())
    }

    /// Create a dispatcher with explicit timeout and concurrency limits
    pub fn with_config(registry: Arc<StrategyRegistry>, config: DispatcherConfig) -> Self {
        DispatchMetrics::set_channels_registered(registry.len());

        Self {
            registry,
            limiter: Semaphore::new(config.max_concurrent.max(1)),
            delivery_timeout: config.delivery_timeout,
            stats: DispatcherStats::default(),
        }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Dispatch a validated request
    pub async fn send(&self, request: &NotificationRequest) -> Result<DeliveryResult, DispatchError> {
        self.dispatch(request.channel(), request.destination(), request.message())
            .await
    }

    /// Resolve `channel` and deliver `message` to `destination` through its strategy.
    ///
    /// The destination and message are passed through untouched; callers are
    /// expected to have validated them. Every call produces its own delivery,
    /// identical requests are not merged.
    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, destination, message),
        fields(channel = %channel)
    )]
    pub async fn dispatch(
        &self,
        channel: &str,
        destination: &str,
        message: &str,
    ) -> Result<DeliveryResult, DispatchError> {
        self.stats.total_dispatched.fetch_add(1, Ordering::Relaxed);

        let strategy = match self.registry.resolve(channel) {
            Ok(strategy) => strategy,
            Err(e) => {
                self.stats.unknown_channel.fetch_add(1, Ordering::Relaxed);
                DispatchMetrics::record_unknown_channel();
                tracing::warn!(channel = %channel, "Rejected notification for unknown channel");
                return Err(e);
            }
        };

        let channel = strategy.channel();
        let notification_id = Uuid::new_v4();

        // The semaphore is never closed
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| DeliveryError::Transport {
                channel,
                reason: "dispatcher is shutting down".to_string(),
            })?;

        let started = Instant::now();
        let outcome =
            match tokio::time::timeout(self.delivery_timeout, strategy.deliver(destination, message))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(DeliveryError::Timeout {
                    channel,
                    timeout_ms: self.delivery_timeout.as_millis() as u64,
                }),
            };
        DispatchMetrics::observe_latency(channel, started.elapsed());

        match outcome {
            Ok(()) => {
                self.stats.record_delivered(channel);
                DispatchMetrics::record_delivered(channel);

                tracing::debug!(
                    notification_id = %notification_id,
                    channel = %channel,
                    "Dispatched notification"
                );

                Ok(DeliveryResult::new(notification_id, channel))
            }
            Err(e) => {
                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                DispatchMetrics::record_failed(&e);

                tracing::warn!(
                    notification_id = %notification_id,
                    channel = %channel,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Notification delivery failed"
                );

                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use super::*;
    use crate::notification::{DeliveryStrategy, MemorySink};

    struct SlowStrategy {
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl SlowStrategy {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DeliveryStrategy for SlowStrategy {
        fn channel(&self) -> Channel {
            Channel::Email
        }

        async fn deliver(&self, _destination: &str, _message: &str) -> Result<(), DeliveryError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct RejectingStrategy;

    #[async_trait]
    impl DeliveryStrategy for RejectingStrategy {
        fn channel(&self) -> Channel {
            Channel::Twitter
        }

        async fn deliver(&self, _destination: &str, _message: &str) -> Result<(), DeliveryError> {
            Err(DeliveryError::Transport {
                channel: Channel::Twitter,
                reason: "account suspended".to_string(),
            })
        }
    }

    fn dispatcher_with_sink() -> (NotificationDispatcher, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let registry = Arc::new(StrategyRegistry::with_all_channels(sink.clone()));
        (NotificationDispatcher::new(registry), sink)
    }

    #[tokio::test]
    async fn test_dispatch_email() {
        let (dispatcher, sink) = dispatcher_with_sink();

        let result = dispatcher.dispatch("email", "a@b.com", "hi").await.unwrap();
        assert_eq!(result.channel, Channel::Email);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].channel, Channel::Email);
        assert_eq!(records[0].destination, "a@b.com");
        assert_eq!(records[0].message, "hi");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_channel_has_no_side_effect() {
        let (dispatcher, sink) = dispatcher_with_sink();

        let err = dispatcher.dispatch("sms", "555-1234", "hi").await.unwrap_err();
        assert_eq!(err, DispatchError::UnknownChannel("sms".to_string()));
        assert!(sink.is_empty());

        let stats = dispatcher.stats();
        assert_eq!(stats.total_dispatched, 1);
        assert_eq!(stats.unknown_channel, 1);
        assert_eq!(stats.total_delivered, 0);
    }

    #[tokio::test]
    async fn test_dispatch_trusts_blank_destination() {
        let (dispatcher, sink) = dispatcher_with_sink();

        dispatcher.dispatch("discord", "", "hi").await.unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0].destination, "");
    }

    #[tokio::test]
    async fn test_identical_dispatches_are_not_merged() {
        let (dispatcher, sink) = dispatcher_with_sink();

        let first = dispatcher.dispatch("whatsapp", "+5511999", "ping").await.unwrap();
        let second = dispatcher.dispatch("whatsapp", "+5511999", "ping").await.unwrap();

        assert_ne!(first.notification_id, second.notification_id);
        assert_eq!(sink.count_for(Channel::Whatsapp), 2);
    }

    #[tokio::test]
    async fn test_send_validated_request() {
        let (dispatcher, sink) = dispatcher_with_sink();
        let request = NotificationRequest::new("twitter", "@someone", "hello").unwrap();

        dispatcher.send(&request).await.unwrap();

        assert_eq!(sink.count_for(Channel::Twitter), 1);
    }

    #[tokio::test]
    async fn test_stats_per_channel() {
        let (dispatcher, _sink) = dispatcher_with_sink();

        dispatcher.dispatch("email", "a@b.com", "1").await.unwrap();
        dispatcher.dispatch("email", "a@b.com", "2").await.unwrap();
        dispatcher.dispatch("instagram", "@me", "3").await.unwrap();

        let stats = dispatcher.stats();
        assert_eq!(stats.total_dispatched, 3);
        assert_eq!(stats.total_delivered, 3);
        assert_eq!(stats.per_channel["email"], 2);
        assert_eq!(stats.per_channel["instagram"], 1);
        assert_eq!(stats.per_channel["discord"], 0);
    }

    #[tokio::test]
    async fn test_slow_delivery_times_out() {
        let registry = StrategyRegistry::builder()
            .register(Arc::new(SlowStrategy::new(Duration::from_millis(500))))
            .unwrap()
            .build();
        let dispatcher = NotificationDispatcher::with_config(
            Arc::new(registry),
            DispatcherConfig {
                delivery_timeout: Duration::from_millis(20),
                max_concurrent: 4,
            },
        );

        let err = dispatcher.dispatch("email", "a@b.com", "hi").await.unwrap_err();
        assert_eq!(
            err,
            DispatchError::Delivery(DeliveryError::Timeout {
                channel: Channel::Email,
                timeout_ms: 20,
            })
        );
        assert_eq!(dispatcher.stats().total_failed, 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_propagated() {
        let registry = StrategyRegistry::builder()
            .register(Arc::new(RejectingStrategy))
            .unwrap()
            .build();
        let dispatcher = NotificationDispatcher::new(Arc::new(registry));

        let err = dispatcher.dispatch("twitter", "@x", "hi").await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Delivery(DeliveryError::Transport { channel: Channel::Twitter, .. })
        ));

        let stats = dispatcher.stats();
        assert_eq!(stats.total_failed, 1);
        assert_eq!(stats.total_delivered, 0);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let strategy = Arc::new(SlowStrategy::new(Duration::from_millis(20)));
        let registry = StrategyRegistry::builder()
            .register(strategy.clone())
            .unwrap()
            .build();
        let dispatcher = Arc::new(NotificationDispatcher::with_config(
            Arc::new(registry),
            DispatcherConfig {
                delivery_timeout: Duration::from_secs(5),
                max_concurrent: 2,
            },
        ));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher
                        .dispatch("email", &format!("user{}@example.com", i), "hi")
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(strategy.max_in_flight.load(Ordering::SeqCst) <= 2);
        assert_eq!(dispatcher.stats().total_delivered, 8);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = NotificationDispatcher::with_config(
            Arc::new(StrategyRegistry::with_all_channels(sink)),
            DispatcherConfig {
                delivery_timeout: Duration::from_secs(1),
                max_concurrent: 0,
            },
        );
        assert_eq!(dispatcher.limiter.available_permits(), 1);
    }
}
