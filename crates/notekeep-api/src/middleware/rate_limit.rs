//! Process-wide request rate limiting.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::{Quota, RateLimiter};
use notekeep_core::logging::{COMPONENT, SUBSYSTEM};

use crate::error::ApiError;
use crate::state::AppState;

pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Build a limiter allowing `requests` per `period_secs`.
///
/// Returns `None` when either value is zero, which disables limiting.
pub fn build_rate_limiter(requests: u64, period_secs: u64) -> Option<Arc<GlobalRateLimiter>> {
    let burst = NonZeroU32::new(u32::try_from(requests).unwrap_or(u32::MAX))?;
    let quota = Quota::with_period(Duration::from_secs(period_secs))?.allow_burst(burst);
    Some(Arc::new(RateLimiter::direct(quota)))
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(
                { SUBSYSTEM } = "api",
                { COMPONENT } = "rate_limit",
                "Rate limit exceeded"
            );
            return Err(ApiError::TooManyRequests(
                "Too many requests. Please wait before retrying.".to_string(),
            ));
        }
    }
    Ok(next.run(request).await)
}
