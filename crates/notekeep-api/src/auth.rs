//! Caller identity.
//!
//! Authentication happens upstream. By the time a request reaches this
//! service the trusted identity header holds the caller's user id.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use notekeep_core::logging::OWNER_ID;
use notekeep_core::OwnerId;
use tracing::field::display;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that requires an identified caller.
///
/// Rejects with 401 when the identity header is missing or is not a UUID.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub owner: OwnerId,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let owner = parts
            .headers
            .get(&state.identity_header)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .map(OwnerId::from)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        tracing::Span::current().record(OWNER_ID, display(owner));

        Ok(AuthUser { owner })
    }
}
