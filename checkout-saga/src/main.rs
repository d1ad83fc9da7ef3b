//! Checkout saga orchestrator binary: wires configuration, downstream
//! client adapters, and the Kafka event bus into the router exposed by
//! the `checkout_saga` library, then serves it.

use checkout_saga::clients::{
    HttpAddressClient, HttpCartClient, HttpInventoryClient, HttpOrderClient, HttpPaymentClient,
    ResilientHttpClient,
};
use checkout_saga::config::AppConfig;
use checkout_saga::event_bus::KafkaEventBus;
use checkout_saga::saga::Downstreams;
use checkout_saga::{handlers, router};
use saga_core::environment::SystemClock;
use saga_core::event_bus::EventBus;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "checkout_saga=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(bind_addr = %config.bind_addr, "starting checkout saga orchestrator");

    let http = ResilientHttpClient::new(config.http_client_timeout);
    let event_bus: Arc<dyn EventBus> = Arc::new(KafkaEventBus::new(&config.kafka_brokers)?);

    let downstreams = Arc::new(Downstreams {
        cart: Arc::new(HttpCartClient::new(http.clone(), config.cart_service_url.clone())),
        address: Arc::new(HttpAddressClient::new(http.clone(), config.address_service_url.clone())),
        inventory: Arc::new(HttpInventoryClient::new(http.clone(), config.inventory_service_url.clone())),
        payment: Arc::new(HttpPaymentClient::new(http.clone(), config.payment_service_url.clone())),
        order: Arc::new(HttpOrderClient::new(http.clone(), config.order_service_url.clone())),
        event_bus,
        clock: Arc::new(SystemClock),
        order_created_topic: config.order_created_topic.clone(),
        default_currency: config.default_currency.clone(),
    });

    let app = router(handlers::AppState {
        downstreams,
        recognized_roles: config.recognized_roles.clone().into(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
