/// Rate Limiting System
use crate::{
    config::RateLimitSettings,
    error::{DirectoryError, DirectoryResult},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

const DEFAULT_RPS: NonZeroU32 = match NonZeroU32::new(50) {
    Some(n) => n,
    None => unreachable!(),
};
const DEFAULT_BURST: NonZeroU32 = match NonZeroU32::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// Global request limiter shared by every route
#[derive(Clone)]
pub struct RateLimiter {
    enabled: bool,
    limiter: Arc<GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimiter {
    pub fn new(settings: &RateLimitSettings) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(settings.requests_per_second).unwrap_or(DEFAULT_RPS),
        )
        .allow_burst(NonZeroU32::new(settings.burst_size).unwrap_or(DEFAULT_BURST));

        Self {
            enabled: settings.enabled,
            limiter: Arc::new(GovernorLimiter::direct(quota)),
        }
    }

    /// Check whether one more request may proceed
    pub fn check(&self) -> DirectoryResult<()> {
        if !self.enabled {
            return Ok(());
        }

        self.limiter
            .check()
            .map_err(|_| DirectoryError::RateLimitExceeded {
                retry_after: std::time::Duration::from_secs(1),
            })
    }
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    match limiter.check() {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::debug!(path = %request.uri().path(), "rate limit exceeded");
            e.into_response()
        }
    }
}
