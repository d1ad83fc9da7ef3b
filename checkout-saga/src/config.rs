//! Orchestrator configuration.
//!
//! Plain struct populated from environment variables, not the `config`
//! crate — there is exactly one deployment target and no layered
//! file/env/CLI precedence to manage.

use std::env;
use std::time::Duration;

/// Downstream base URLs and orchestrator-wide settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Cart service (e.g. `http://cart.internal:8080`).
    pub cart_service_url: String,
    /// Base URL of the Address service.
    pub address_service_url: String,
    /// Base URL of the Inventory service.
    pub inventory_service_url: String,
    /// Base URL of the Payment service.
    pub payment_service_url: String,
    /// Base URL of the Order service.
    pub order_service_url: String,
    /// Topic `OrderCreated` is published to.
    pub order_created_topic: String,
    /// Comma-separated Kafka/Redpanda bootstrap servers.
    pub kafka_brokers: String,
    /// Default currency code when a downstream doesn't echo one back.
    pub default_currency: String,
    /// Caller roles this service accepts on `/api/v1/checkout/*` (spec §6).
    pub recognized_roles: Vec<String>,
    /// Per-call timeout for the resilient HTTP client.
    pub http_client_timeout: Duration,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

/// Failure to build [`AppConfig`] from the process environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    /// An environment variable was set but could not be parsed.
    #[error("invalid value for environment variable {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// Downstream base URLs are required; everything else has a default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] if a required base URL is absent,
    /// or [`ConfigError::InvalidValue`] if `HTTP_CLIENT_TIMEOUT_MS` is set
    /// but not a valid integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cart_service_url: required_var("CART_SERVICE_URL")?,
            address_service_url: required_var("ADDRESS_SERVICE_URL")?,
            inventory_service_url: required_var("INVENTORY_SERVICE_URL")?,
            payment_service_url: required_var("PAYMENT_SERVICE_URL")?,
            order_service_url: required_var("ORDER_SERVICE_URL")?,
            order_created_topic: env::var("ORDER_CREATED_TOPIC")
                .unwrap_or_else(|_| "order-created".to_string()),
            kafka_brokers: env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string()),
            default_currency: env::var("DEFAULT_CURRENCY").unwrap_or_else(|_| "INR".to_string()),
            recognized_roles: env::var("RECOGNIZED_ROLES")
                .unwrap_or_else(|_| "CUSTOMER".to_string())
                .split(',')
                .map(|role| role.trim().to_string())
                .filter(|role| !role.is_empty())
                .collect(),
            http_client_timeout: Duration::from_millis(optional_u64(
                "HTTP_CLIENT_TIMEOUT_MS",
                5_000,
            )?),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn optional_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_required_urls<F: FnOnce()>(f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for (k, v) in [
            ("CART_SERVICE_URL", "http://cart"),
            ("ADDRESS_SERVICE_URL", "http://address"),
            ("INVENTORY_SERVICE_URL", "http://inventory"),
            ("PAYMENT_SERVICE_URL", "http://payment"),
            ("ORDER_SERVICE_URL", "http://order"),
        ] {
            env::set_var(k, v);
        }
        f();
        for k in [
            "CART_SERVICE_URL",
            "ADDRESS_SERVICE_URL",
            "INVENTORY_SERVICE_URL",
            "PAYMENT_SERVICE_URL",
            "ORDER_SERVICE_URL",
            "HTTP_CLIENT_TIMEOUT_MS",
        ] {
            env::remove_var(k);
        }
    }

    #[test]
    fn defaults_fill_in_when_unset() {
        with_required_urls(|| {
            let config = AppConfig::from_env().expect("all required vars set");
            assert_eq!(config.order_created_topic, "order-created");
            assert_eq!(config.kafka_brokers, "localhost:9092");
            assert_eq!(config.default_currency, "INR");
            assert_eq!(config.recognized_roles, vec!["CUSTOMER".to_string()]);
            assert_eq!(config.http_client_timeout, Duration::from_millis(5_000));
            assert_eq!(config.bind_addr, "0.0.0.0:8080");
        });
    }

    #[test]
    fn missing_required_var_errors() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var("CART_SERVICE_URL");
        let err = AppConfig::from_env().expect_err("CART_SERVICE_URL unset");
        assert!(matches!(err, ConfigError::MissingVar("CART_SERVICE_URL")));
    }

    #[test]
    fn invalid_timeout_errors() {
        with_required_urls(|| {
            env::set_var("HTTP_CLIENT_TIMEOUT_MS", "not-a-number");
            let err = AppConfig::from_env().expect_err("invalid timeout");
            assert!(matches!(err, ConfigError::InvalidValue("HTTP_CLIENT_TIMEOUT_MS", _)));
        });
    }
}
