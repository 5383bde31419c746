use crate::error::PublisherError;
use crate::message_sink::MessageSink;
use crate::model::ConfigurationRecord;
use std::future::Future;
use tracing::{info, warn};

pub struct PublisherServiceConfig {
    sink: Box<dyn MessageSink>,
}

impl PublisherServiceConfig {
    pub fn new(sink: Box<dyn MessageSink>) -> Result<Self, PublisherError> {
        Ok(Self { sink })
    }
}

pub struct PublisherService {
    config: PublisherServiceConfig,
}

impl PublisherService {
    pub fn new(config: PublisherServiceConfig) -> Self {
        Self { config }
    }

    /// Encodes the record and hands it to the sink. Returns once the sink has
    /// accepted it, not once the collector has received it.
    pub fn publish(&mut self, record: &ConfigurationRecord) -> Result<(), PublisherError> {
        let envelope = record.to_envelope()?;

        info!("Publishing configuration {}", record);

        self.config.sink.send(envelope)
    }

    pub fn close(self) -> Result<(), PublisherError> {
        self.config.sink.close()
    }

    /// Publishes a single record and releases the sink, also when publishing
    /// failed.
    pub fn run(mut self, record: &ConfigurationRecord) -> Result<(), PublisherError> {
        let published = self.publish(record);
        let closed = self.close();

        published?;
        closed
    }

    /// Runs [`PublisherService::run`] on a blocking thread. When `shutdown`
    /// resolves first, the publish is still awaited: its send timeout and
    /// linger window are both bounded, and the sink must be released.
    pub async fn run_until_released<F>(
        self,
        record: ConfigurationRecord,
        shutdown: F,
    ) -> Result<(), PublisherError>
    where
        F: Future<Output = ()>,
    {
        let mut publish = tokio::task::spawn_blocking(move || self.run(&record));

        tokio::select! {
            published = &mut publish => published?,
            _ = shutdown => {
                warn!("Shutdown requested, waiting for the channel to be released");
                publish.await?
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_sink::MemorySink;
    use assert2::{check, let_assert};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn service(sink: &MemorySink) -> PublisherService {
        PublisherService::new(PublisherServiceConfig::new(Box::new(sink.clone())).unwrap())
    }

    #[test]
    fn run_sends_exactly_one_decodable_envelope() {
        let consumer = MemorySink::new(1000);
        let_assert!(Ok(record) = ConfigurationRecord::new("cpu_usage", "5"));

        check!(service(&consumer).run(&record).is_ok());

        let envelopes = consumer.drain();
        check!(envelopes.len() == 1);
        check!(consumer.is_closed());

        let_assert!(Ok(mapping) = rmp_serde::from_slice::<HashMap<String, String>>(&envelopes[0]));
        let mut expected = HashMap::new();
        expected.insert("metrics".to_string(), "cpu_usage".to_string());
        expected.insert("sample_period".to_string(), "5".to_string());
        assert_eq!(mapping, expected);
    }

    #[test]
    fn repeated_runs_are_not_deduplicated() {
        let consumer = MemorySink::new(1000);
        let_assert!(Ok(record) = ConfigurationRecord::new("cache_misses", "1"));

        check!(service(&consumer).run(&record).is_ok());
        check!(service(&consumer).run(&record).is_ok());

        let envelopes = consumer.drain();
        check!(envelopes.len() == 2);
        check!(envelopes[0] == envelopes[1]);
    }

    #[test]
    fn invalid_input_sends_nothing() {
        let consumer = MemorySink::new(1000);

        let_assert!(Err(PublisherError::Validation(_)) = ConfigurationRecord::new("", "5"));
        let_assert!(Err(PublisherError::Validation(_)) = ConfigurationRecord::new("cpu_usage", ""));

        check!(consumer.is_empty());
    }

    #[test]
    fn publish_past_capacity_is_rejected_not_dropped() {
        let consumer = MemorySink::new(2);
        let mut service = service(&consumer);
        let_assert!(Ok(record) = ConfigurationRecord::new("cpu_usage", "5"));

        check!(service.publish(&record).is_ok());
        check!(service.publish(&record).is_ok());
        let_assert!(Err(PublisherError::QueueFull { capacity: 2 }) = service.publish(&record));

        check!(consumer.len() == 2);
        check!(service.close().is_ok());
    }

    #[tokio::test]
    async fn run_until_released_closes_sink_after_shutdown() {
        let consumer = MemorySink::new(1000);
        let_assert!(Ok(record) = ConfigurationRecord::new("cpu_usage", "5"));

        let_assert!(
            Ok(()) = service(&consumer)
                .run_until_released(record, std::future::ready(()))
                .await
        );

        check!(consumer.is_closed());
        check!(consumer.len() == 1);
    }

    #[tokio::test]
    async fn run_until_released_reports_send_failure_after_closing() {
        let consumer = MemorySink::new(0);
        let_assert!(Ok(record) = ConfigurationRecord::new("cpu_usage", "5"));

        let_assert!(
            Err(PublisherError::QueueFull { .. }) = service(&consumer)
                .run_until_released(record, std::future::pending())
                .await
        );

        check!(consumer.is_closed());
    }

    #[test]
    fn run_closes_sink_when_send_fails() {
        let consumer = MemorySink::new(0);
        let_assert!(Ok(record) = ConfigurationRecord::new("cpu_usage", "5"));

        let_assert!(Err(PublisherError::QueueFull { .. }) = service(&consumer).run(&record));

        check!(consumer.is_closed());
        check!(consumer.is_empty());
    }
}
