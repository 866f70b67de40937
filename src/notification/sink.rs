//! Delivery sinks: observers that receive a structured record for every delivery.

use std::sync::{Arc, Mutex};

use super::{Channel, DeliveryRecord};

/// Receives delivery records emitted by strategies
pub trait DeliverySink: Send + Sync {
    fn record(&self, record: &DeliveryRecord);
}

/// Emits every delivery as a structured `tracing` event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DeliverySink for TracingSink {
    fn record(&self, record: &DeliveryRecord) {
        tracing::info!(
            channel = %record.channel,
            destination = %record.destination,
            body = %record.message,
            delivered_at = %record.delivered_at,
            "Notification delivered via {}",
            record.channel.label()
        );
    }
}

/// Keeps delivery records in memory so they can be inspected
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<DeliveryRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record received so far, in arrival order
    pub fn records(&self) -> Vec<DeliveryRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of records delivered through `channel`
    pub fn count_for(&self, channel: Channel) -> usize {
        self.lock().iter().filter(|r| r.channel == channel).count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DeliveryRecord>> {
        // Pushes are atomic, so a poisoned Vec is still consistent
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DeliverySink for MemorySink {
    fn record(&self, record: &DeliveryRecord) {
        self.lock().push(record.clone());
    }
}

/// Forwards each record to several sinks
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn DeliverySink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn DeliverySink>>) -> Self {
        Self { sinks }
    }
}

impl DeliverySink for FanoutSink {
    fn record(&self, record: &DeliveryRecord) {
        for sink in &self.sinks {
            sink.record(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Collects everything a fmt subscriber writes
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_tracing_sink_emits_distinct_fields() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(logs.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.record(&DeliveryRecord::new(Channel::Email, "a@b.com", "hi"));
        });

        let output = logs.contents();
        let line = output.lines().next().expect("one log line");
        assert_eq!(line.matches("\"message\"").count(), 1);

        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        let fields = &event["fields"];
        assert_eq!(fields["message"], "Notification delivered via Email");
        assert_eq!(fields["channel"], "email");
        assert_eq!(fields["destination"], "a@b.com");
        assert_eq!(fields["body"], "hi");
    }

    #[test]
    fn test_memory_sink_collects_records() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.record(&DeliveryRecord::new(Channel::Email, "a@b.com", "hi"));
        sink.record(&DeliveryRecord::new(Channel::Discord, "#general", "yo"));
        sink.record(&DeliveryRecord::new(Channel::Email, "c@d.com", "hey"));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.count_for(Channel::Email), 2);
        assert_eq!(sink.count_for(Channel::Twitter), 0);
        assert_eq!(sink.records()[1].destination, "#general");

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_fanout_sink_forwards_to_all() {
        let first = Arc::new(MemorySink::new());
        let second = Arc::new(MemorySink::new());
        let fanout = FanoutSink::new(vec![first.clone(), second.clone(), Arc::new(TracingSink)]);

        fanout.record(&DeliveryRecord::new(Channel::Twitter, "@user", "hello"));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first.records(), second.records());
    }
}
