//! Production [`EventBus`] for the `order-created` topic.
//!
//! Grounded on the Redpanda-backed event bus used elsewhere in this stack,
//! but deliberately simpler on two counts:
//!
//! - **Producer only.** This orchestrator never subscribes to anything, so
//!   `subscribe` is not wired to a real consumer.
//! - **Raw payload, not a bincode envelope.** The generic event bus wraps
//!   the whole [`SerializedEvent`] (type, bytes, metadata) in bincode before
//!   writing it to the topic. `order-created` is read by non-Rust
//!   consumers, so that would double-encode an already-JSON body. This
//!   producer writes `event.data` straight to the topic instead, keyed by
//!   `order_id` (spec §4.7/§6: "key = orderId") so that all events for one
//!   order land on the same partition and are read in order.

use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use saga_core::event::SerializedEvent;
use saga_core::event_bus::{EventBus, EventBusError, EventStream};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Kafka/Redpanda-backed producer, raw JSON payloads, no consumer side.
pub struct KafkaEventBus {
    producer: FutureProducer,
    send_timeout: Duration,
}

impl KafkaEventBus {
    /// Connect a producer to `brokers` (comma-separated `host:port` list).
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::ConnectionFailed`] if the underlying
    /// producer cannot be created (invalid broker string, resolver
    /// failure, or librdkafka rejecting the configuration).
    pub fn new(brokers: &str) -> Result<Self, EventBusError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("acks", "all")
            .set("compression.type", "lz4")
            .create()
            .map_err(|e| EventBusError::ConnectionFailed(format!("failed to create producer: {e}")))?;

        Ok(Self {
            producer,
            send_timeout: Duration::from_secs(5),
        })
    }
}

impl EventBus for KafkaEventBus {
    fn publish(
        &self,
        topic: &str,
        event: &SerializedEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>> {
        let topic = topic.to_string();
        let event_type = event.event_type.clone();
        let payload = event.data.clone();
        let timeout = self.send_timeout;
        let key = event
            .metadata
            .as_ref()
            .and_then(|m| m.get("order_id"))
            .and_then(|v| v.as_str())
            .map_or_else(|| event_type.clone(), std::string::ToString::to_string);

        Box::pin(async move {
            let record = FutureRecord::to(&topic)
                .payload(&payload)
                .key(key.as_bytes());

            match self.producer.send(record, Timeout::After(timeout)).await {
                Ok((partition, offset)) => {
                    tracing::debug!(%topic, partition, offset, event_type = %event_type, "published order event");
                    Ok(())
                }
                Err((kafka_error, _)) => {
                    tracing::error!(%topic, error = %kafka_error, "failed to publish order event");
                    Err(EventBusError::PublishFailed {
                        topic,
                        reason: kafka_error.to_string(),
                    })
                }
            }
        })
    }

    fn subscribe(
        &self,
        _topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<EventStream, EventBusError>> + Send + '_>> {
        Box::pin(async {
            Err(EventBusError::SubscriptionFailed {
                topics: Vec::new(),
                reason: "this orchestrator is a producer only".to_string(),
            })
        })
    }
}
