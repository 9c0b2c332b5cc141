use std::{
    collections::VecDeque,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tracing::warn;

use crate::api::errors::ApiError;
use crate::api::router::AppState;

const LIMIT_MESSAGE: &str =
    "Too many login attempts from this IP, please try again after a 60 second pause";

/// Sliding-window limiter for login attempts, keyed by client IP
#[derive(Debug)]
pub struct LoginRateLimiter {
    max_attempts: u32,
    window: Duration,
    attempts: DashMap<String, VecDeque<Instant>>,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: DashMap::new(),
        }
    }

    /// Record an attempt, or return the seconds to wait when over the limit
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), u64> {
        let mut entry = self.attempts.entry(key.to_string()).or_default();

        while let Some(&oldest) = entry.front() {
            if now.duration_since(oldest) >= self.window {
                entry.pop_front();
            } else {
                break;
            }
        }

        if entry.len() >= self.max_attempts as usize {
            let retry_after = entry
                .front()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.window);
            return Err(retry_after.as_secs().max(1));
        }

        entry.push_back(now);
        Ok(())
    }

    /// Drop keys whose attempts have all left the window
    pub fn cleanup(&self) {
        let now = Instant::now();
        let window = self.window;
        self.attempts.retain(|_, attempts| {
            attempts
                .back()
                .is_some_and(|last| now.duration_since(*last) < window)
        });
    }
}

/// Rate limiting middleware for the login route
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = client_ip(&request);

    if let Err(retry_after) = state.login_limiter.check(&ip) {
        warn!(ip = %ip, "Login rate limit exceeded");
        return Err(ApiError::too_many_requests(LIMIT_MESSAGE, retry_after));
    }

    Ok(next.run(request).await)
}

/// Client address from proxy headers, falling back to the socket peer
fn client_ip(request: &Request) -> String {
    if let Some(ip) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
    {
        return ip.to_string();
    }

    if let Some(ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
    {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Periodically evict idle limiter entries
pub fn spawn_cleanup(limiter: Arc<LoginRateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            limiter.cleanup();
        }
    });
}
