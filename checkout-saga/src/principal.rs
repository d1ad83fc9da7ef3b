//! The authenticated caller and the per-request downstream call context.
//!
//! Bearer signature validation is out of scope (spec §1) — this extractor
//! only pulls the pieces the saga needs (the raw token to forward, the
//! `(userId, tenantId)` pair a prior auth layer is assumed to have already
//! validated and placed on the request, e.g. via a signed header or a
//! gateway-injected claim, and the caller's role, checked against the roles
//! this surface recognizes — spec §6: "bearer, role `CUSTOMER`"). What
//! matters here is that the token is never cached anywhere outside the
//! request (spec §9 "Global token cache is a bug").

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use saga_web::AppError;

/// Anything that can report which caller roles this HTTP surface accepts
/// (spec §6: "bearer, role `CUSTOMER`"). Implemented by `AppState` so the
/// extractors below can check a role without depending on the `handlers`
/// module directly.
pub trait RecognizedRoles {
    /// The roles this surface accepts.
    fn recognized_roles(&self) -> &[String];
}

/// The authenticated principal, extracted from request headers.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub tenant_id: String,
    pub role: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: RecognizedRoles + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::unauthorized("missing X-User-Id"))?
            .to_string();

        let tenant_id = parts
            .headers
            .get("X-Tenant-Id")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::unauthorized("missing X-Tenant-Id"))?
            .to_string();

        let role = parts
            .headers
            .get("X-User-Role")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::unauthorized("missing X-User-Role"))?
            .to_string();

        if !state.recognized_roles().iter().any(|r| r == &role) {
            return Err(AppError::forbidden(format!("role {role} is not permitted on this surface")));
        }

        Ok(Self { user_id, tenant_id, role })
    }
}

/// Per-request context threaded explicitly through every downstream client
/// call: the bearer token to forward and the tenant id header. Never stored
/// on `AppState` (spec §5, §9).
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub bearer_token: String,
    pub tenant_id: String,
}

impl RequestContext {
    #[must_use]
    pub const fn new(bearer_token: String, tenant_id: String) -> Self {
        Self {
            bearer_token,
            tenant_id,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: RecognizedRoles + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer_token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .filter(|s| !s.is_empty())
            .ok_or(AppError::unauthorized("missing bearer token"))?
            .to_string();

        let principal = Principal::from_request_parts(parts, state).await?;

        Ok(Self::new(bearer_token, principal.tenant_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    struct TestState(Vec<String>);
    impl RecognizedRoles for TestState {
        fn recognized_roles(&self) -> &[String] {
            &self.0
        }
    }

    fn customer_only() -> TestState {
        TestState(vec!["CUSTOMER".to_string()])
    }

    #[tokio::test]
    async fn principal_requires_all_headers() {
        let req = Request::builder()
            .header("X-User-Id", "u1")
            .header("X-Tenant-Id", "t1")
            .header("X-User-Role", "CUSTOMER")
            .body(())
            .unwrap();
        let (mut parts, ()) = req.into_parts();
        let principal = Principal::from_request_parts(&mut parts, &customer_only())
            .await
            .unwrap();
        assert_eq!(principal.user_id, "u1");
        assert_eq!(principal.tenant_id, "t1");
        assert_eq!(principal.role, "CUSTOMER");
    }

    #[tokio::test]
    async fn principal_missing_tenant_is_rejected() {
        let req = Request::builder()
            .header("X-User-Id", "u1")
            .header("X-User-Role", "CUSTOMER")
            .body(())
            .unwrap();
        let (mut parts, ()) = req.into_parts();
        assert!(Principal::from_request_parts(&mut parts, &customer_only())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn principal_with_unrecognized_role_is_forbidden() {
        let req = Request::builder()
            .header("X-User-Id", "u1")
            .header("X-Tenant-Id", "t1")
            .header("X-User-Role", "ADMIN")
            .body(())
            .unwrap();
        let (mut parts, ()) = req.into_parts();
        assert!(Principal::from_request_parts(&mut parts, &customer_only())
            .await
            .is_err());
    }
}
