//! Axum handlers for the `/api/v1/checkout` surface (spec §6).

use crate::models::{
    AddressValidationRequest, AddressValidationResponse, CheckoutComplete, CheckoutRequest,
    CheckoutSummary, Envelope, ShippingCalculationRequest, ShippingCalculationResponse,
};
use crate::principal::{Principal, RecognizedRoles, RequestContext};
use crate::saga::helpers::{calculate_shipping, cancel_checkout, initiate_checkout, validate_address};
use crate::saga::{complete_checkout, Downstreams};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use saga_web::{AppError, WebResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub downstreams: Arc<Downstreams>,
    /// Caller roles accepted on this surface (spec §6: `bearer, role CUSTOMER`).
    pub recognized_roles: Arc<[String]>,
}

impl RecognizedRoles for AppState {
    fn recognized_roles(&self) -> &[String] {
        &self.recognized_roles
    }
}

fn envelope<T>(data: T, status: StatusCode, downstreams: &Downstreams) -> Json<Envelope<T>> {
    Json(Envelope::ok(data, status, downstreams.clock.now()))
}

/// `POST /api/v1/checkout/initiate`
pub async fn initiate(
    State(state): State<AppState>,
    principal: Principal,
    ctx: RequestContext,
    Json(req): Json<CheckoutRequest>,
) -> WebResult<Json<Envelope<CheckoutSummary>>> {
    let _ = &principal;
    let summary = initiate_checkout(&state.downstreams, &ctx, &req)
        .await
        .map_err(AppError::from)?;
    Ok(envelope(summary, StatusCode::OK, &state.downstreams))
}

/// `POST /api/v1/checkout/complete`
pub async fn complete(
    State(state): State<AppState>,
    principal: Principal,
    ctx: RequestContext,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Envelope<CheckoutComplete>>), AppError> {
    let complete = complete_checkout(&state.downstreams, &ctx, &principal.user_id, &req)
        .await
        .map_err(AppError::from)?;
    Ok((
        StatusCode::CREATED,
        envelope(complete, StatusCode::CREATED, &state.downstreams),
    ))
}

/// `POST /api/v1/checkout/cancel?reservationId=`
pub async fn cancel(
    State(state): State<AppState>,
    _principal: Principal,
    ctx: RequestContext,
    Query(params): Query<HashMap<String, String>>,
) -> Result<StatusCode, AppError> {
    let reservation_id = params.get("reservationId").map(String::as_str);
    cancel_checkout(state.downstreams.inventory.as_ref(), &ctx, reservation_id)
        .await
        .map_err(AppError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/checkout/address/validate`
pub async fn validate_address_handler(
    State(state): State<AppState>,
    _principal: Principal,
    Json(req): Json<AddressValidationRequest>,
) -> WebResult<Json<Envelope<AddressValidationResponse>>> {
    let resp = validate_address(&req);
    Ok(envelope(resp, StatusCode::OK, &state.downstreams))
}

/// `POST /api/v1/checkout/shipping/calculate`
pub async fn calculate_shipping_handler(
    State(state): State<AppState>,
    _principal: Principal,
    Json(_req): Json<ShippingCalculationRequest>,
) -> WebResult<Json<Envelope<ShippingCalculationResponse>>> {
    let resp = calculate_shipping(&state.downstreams.default_currency_hint());
    Ok(envelope(resp, StatusCode::OK, &state.downstreams))
}
