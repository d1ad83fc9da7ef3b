//! Best-effort `OrderCreated` publication (C7).
//!
//! Unlike `saga-core`'s default bincode wire format (meant for internal
//! event-sourced services), this event must stay readable by non-Rust
//! consumers of the `order-created` topic, so [`OrderCreatedEvent`]
//! overrides `to_bytes`/`from_bytes` to use JSON.

use saga_core::event::{Event, EventError};
use saga_core::event_bus::EventBus;
use serde::{Deserialize, Serialize};

/// Published to `order-created`, keyed by `order_id` (spec §4.7, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order_id: String,
    pub user_id: String,
    pub tenant_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Event for OrderCreatedEvent {
    fn event_type(&self) -> &'static str {
        "OrderCreated.v1"
    }

    fn to_bytes(&self) -> Result<Vec<u8>, EventError> {
        serde_json::to_vec(self).map_err(|e| EventError::SerializationError(e.to_string()))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(bytes).map_err(|e| EventError::DeserializationError(e.to_string()))
    }
}

/// Publish `event` to `topic`, logging and swallowing any failure. Never
/// alters the saga's terminal state (spec §4.7, §8 universal invariant).
pub async fn publish_order_created(
    event_bus: &dyn EventBus,
    topic: &str,
    event: &OrderCreatedEvent,
) {
    let metadata = serde_json::json!({ "order_id": event.order_id });
    let serialized = match saga_core::event::SerializedEvent::from_event(event, Some(metadata)) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, order_id = %event.order_id, "failed to serialize OrderCreated event");
            return;
        }
    };

    if let Err(e) = event_bus.publish(topic, &serialized).await {
        tracing::warn!(
            error = %e,
            order_id = %event.order_id,
            topic,
            "failed to publish OrderCreated event"
        );
    }
}
