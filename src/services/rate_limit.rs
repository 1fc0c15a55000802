// src/services/rate_limit.rs
// DOCUMENTATION: Per-client request throttling
// PURPOSE: Keyed token buckets guarding login and the contact form

use crate::errors::VenueError;
use actix_web::HttpRequest;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Token bucket per client address
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl ClientRateLimiter {
    /// A zero rate is treated as one request per minute
    pub fn per_minute(requests: u32) -> Self {
        let rate = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        ClientRateLimiter {
            limiter: RateLimiter::keyed(Quota::per_minute(rate)),
        }
    }

    pub fn check(&self, client: &str) -> Result<(), VenueError> {
        self.limiter.check_key(&client.to_string()).map_err(|_| {
            log::warn!("Rate limit exceeded for {}", client);
            VenueError::RateLimitExceeded
        })
    }

    /// Forget clients whose buckets are full again
    pub fn shrink(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }
}

/// Limiters shared by all workers
pub struct RateLimiters {
    pub login: ClientRateLimiter,
    pub contact: ClientRateLimiter,
}

impl RateLimiters {
    pub fn new(login_per_minute: u32, contact_per_minute: u32) -> Self {
        RateLimiters {
            login: ClientRateLimiter::per_minute(login_per_minute),
            contact: ClientRateLimiter::per_minute(contact_per_minute),
        }
    }
}

/// Periodically drop idle client buckets
pub fn start_rate_limit_cleanup_task(limiters: Arc<RateLimiters>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            limiters.login.shrink();
            limiters.contact.shrink();
        }
    });
}

/// Client address, honouring proxy headers
pub fn client_key(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_limit_is_per_client() {
        let limiter = ClientRateLimiter::per_minute(2);
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(matches!(
            limiter.check("10.0.0.1"),
            Err(VenueError::RateLimitExceeded)
        ));
        assert!(limiter.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_zero_rate_still_allows_one() {
        let limiter = ClientRateLimiter::per_minute(0);
        assert!(limiter.check("a").is_ok());
        assert!(limiter.check("a").is_err());
    }

    #[test]
    fn test_client_key_from_forwarded_header() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .to_http_request();
        assert_eq!(client_key(&req), "203.0.113.7");
    }
}
