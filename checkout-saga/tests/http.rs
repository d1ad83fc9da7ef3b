//! Router-level HTTP tests for the `/api/v1/checkout` surface (spec §10.6):
//! status codes, the envelope shape, and required-header enforcement,
//! exercised through `axum-test` against fakes instead of a live stack.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use async_trait::async_trait;
use axum_test::TestServer;
use checkout_saga::clients::{
    AddressClient, CartClient, InventoryClient, OrderClient, OrderRecord, PaymentClient, ReserveLine,
};
use checkout_saga::errors::CheckoutError;
use checkout_saga::handlers::AppState;
use checkout_saga::models::{Address, CartItem, CartSnapshot, StockLocation};
use checkout_saga::money::Money;
use checkout_saga::principal::RequestContext;
use checkout_saga::router;
use checkout_saga::saga::Downstreams;
use rust_decimal_macros::dec;
use saga_core::environment::SystemClock;
use saga_core::event::SerializedEvent;
use saga_core::event_bus::{EventBus, EventBusError, EventStream};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

struct FakeCart;
#[async_trait]
impl CartClient for FakeCart {
    async fn get_cart(&self, _ctx: &RequestContext) -> Result<CartSnapshot, CheckoutError> {
        Ok(CartSnapshot {
            items: vec![CartItem {
                product_id: "P1".to_string(),
                name: "Widget".to_string(),
                sku: "SKU1".to_string(),
                quantity: 1,
                unit_price: dec!(100.00),
                total_price: dec!(100.00),
            }],
            subtotal: dec!(100.00),
            discount_amount: dec!(0.00),
            currency: "INR".to_string(),
        })
    }
    async fn clear_cart(&self, _ctx: &RequestContext) -> Result<(), CheckoutError> {
        Ok(())
    }
}

struct FakeAddress;
#[async_trait]
impl AddressClient for FakeAddress {
    async fn get_address(&self, _ctx: &RequestContext, id: &str) -> Result<Address, CheckoutError> {
        Ok(Address {
            id: id.to_string(),
            line1: "1 Main St".to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            postcode: "560001".to_string(),
            country: "IN".to_string(),
        })
    }
}

struct FakeInventory;
#[async_trait]
impl InventoryClient for FakeInventory {
    async fn stock_locations(&self, _ctx: &RequestContext, _sku: &str) -> Result<Vec<StockLocation>, CheckoutError> {
        Ok(vec![StockLocation {
            location_id: "L1".to_string(),
            available_qty: 10,
        }])
    }
    async fn reserve(&self, _ctx: &RequestContext, _order_id: &str, _lines: &[ReserveLine]) -> Result<(), CheckoutError> {
        Ok(())
    }
    async fn release(&self, _ctx: &RequestContext, _reservation_id: &str) -> Result<(), CheckoutError> {
        Ok(())
    }
}

struct FakePayment;
#[async_trait]
impl PaymentClient for FakePayment {
    async fn process(
        &self,
        _ctx: &RequestContext,
        _order_id: &str,
        _amount: Money,
        _payment_method_id: Option<&str>,
        _txn: Option<&str>,
    ) -> Result<String, CheckoutError> {
        Ok("PAY-1".to_string())
    }
    async fn refund(&self, _ctx: &RequestContext, _payment_id: &str, _reason: &str) -> Result<(), CheckoutError> {
        Ok(())
    }
    async fn lookup_by_transaction(&self, _ctx: &RequestContext, _transaction_id: &str) -> Result<Option<String>, CheckoutError> {
        Ok(None)
    }
}

struct FakeOrder;
#[async_trait]
impl OrderClient for FakeOrder {
    async fn create_order(
        &self,
        _ctx: &RequestContext,
        _shipping_address_id: &str,
        _payment_id: &str,
        _items: &[CartItem],
        price: &checkout_saga::models::PriceBreakdown,
    ) -> Result<OrderRecord, CheckoutError> {
        Ok(OrderRecord {
            order_id: "ORDER-1".to_string(),
            order_number: "ORD-1001".to_string(),
            total: price.total.amount(),
            currency: price.total.currency().to_string(),
        })
    }
    async fn find_by_payment(&self, _ctx: &RequestContext, _payment_id: &str) -> Result<Option<OrderRecord>, CheckoutError> {
        Ok(None)
    }
}

struct NoopEventBus;
impl EventBus for NoopEventBus {
    fn publish(
        &self,
        _topic: &str,
        _event: &SerializedEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }
    fn subscribe(
        &self,
        _topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<EventStream, EventBusError>> + Send + '_>> {
        Box::pin(async { Err(EventBusError::Other("not supported in tests".to_string())) })
    }
}

fn test_server() -> TestServer {
    let downstreams = Arc::new(Downstreams {
        cart: Arc::new(FakeCart),
        address: Arc::new(FakeAddress),
        inventory: Arc::new(FakeInventory),
        payment: Arc::new(FakePayment),
        order: Arc::new(FakeOrder),
        event_bus: Arc::new(NoopEventBus),
        clock: Arc::new(SystemClock),
        order_created_topic: "order-created".to_string(),
        default_currency: "INR".to_string(),
    });
    let app = router(AppState {
        downstreams,
        recognized_roles: vec!["CUSTOMER".to_string()].into(),
    });
    TestServer::new(app).expect("test server builds")
}

fn auth_headers(server_request: axum_test::TestRequest) -> axum_test::TestRequest {
    server_request
        .add_header("X-User-Id", "user-1")
        .add_header("X-Tenant-Id", "tenant-1")
        .add_header("X-User-Role", "CUSTOMER")
        .add_header("Authorization", "Bearer test-token")
}

#[tokio::test]
async fn health_check_is_ok() {
    let server = test_server();
    let resp = server.get("/health").await;
    resp.assert_status_ok();
}

#[tokio::test]
async fn complete_checkout_returns_201_with_the_envelope_shape() {
    let server = test_server();
    let resp = auth_headers(server.post("/api/v1/checkout/complete"))
        .json(&json!({
            "shipping_address_id": "ADDR-1",
            "payment_method_id": "PM-1",
        }))
        .await;

    resp.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = resp.json();
    assert!(body.get("data").is_some());
    assert_eq!(body["status"], 201);
    assert!(body.get("timestamp").is_some());
    assert_eq!(body["data"]["order_id"], "ORDER-1");
}

#[tokio::test]
async fn complete_checkout_without_auth_headers_is_unauthorized() {
    let server = test_server();
    let resp = server
        .post("/api/v1/checkout/complete")
        .json(&json!({ "shipping_address_id": "ADDR-1" }))
        .await;

    resp.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn complete_checkout_without_shipping_address_is_bad_request() {
    let server = test_server();
    let resp = auth_headers(server.post("/api/v1/checkout/complete"))
        .json(&json!({}))
        .await;

    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn initiate_returns_a_dry_run_summary() {
    let server = test_server();
    let resp = auth_headers(server.post("/api/v1/checkout/initiate"))
        .json(&json!({ "shipping_address_id": "ADDR-1" }))
        .await;

    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["data"]["items_available"], true);
}

#[tokio::test]
async fn correlation_id_is_echoed_back() {
    let server = test_server();
    let resp = server
        .get("/health")
        .add_header("X-Correlation-ID", "11111111-1111-1111-1111-111111111111")
        .await;

    resp.assert_status_ok();
    assert_eq!(
        resp.header("X-Correlation-ID"),
        "11111111-1111-1111-1111-111111111111"
    );
}
