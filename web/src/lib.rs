//! Axum web framework integration shared across orchestrator services.
//!
//! This crate carries the ambient HTTP concerns that every handler needs but
//! no single domain owns: a uniform [`AppError`] -> `IntoResponse` bridge,
//! correlation-id propagation, and small request extractors. Domain crates
//! (like the checkout saga orchestrator) depend on this crate and bring their
//! own `AppState` and handlers.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler.
//! 2. **Extract** data from the request (JSON body, headers, principal).
//! 3. **Call** into domain logic (here: the saga engine).
//! 4. **Map** the `Result` to an HTTP response via [`AppError`].
//!
//! # Example
//!
//! ```ignore
//! use saga_web::AppError;
//! use axum::{Json, extract::State};
//!
//! async fn handler(State(state): State<AppState>) -> Result<Json<Response>, AppError> {
//!     let data = do_work(&state).await.map_err(AppError::from)?;
//!     Ok(Json(data))
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{ClientIp, CorrelationId, UserAgent};
pub use middleware::{correlation_id_layer, CorrelationIdExt, CORRELATION_ID_HEADER};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
