// Folio - A flat-file CMS built with Rust
// Copyright (C) 2025 Folio Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

pub type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Paths whose POSTs count against the login quota
const CREDENTIAL_PATHS: &[&str] = &["/login", "/signup"];

/// Limiter allowing `max_attempts` credential submissions per minute.
/// Zero is treated as one.
pub fn create_login_rate_limiter(max_attempts: u32) -> SharedRateLimiter {
    let per_minute = NonZeroU32::new(max_attempts).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)))
}

pub async fn login_rate_limit_middleware(
    State(limiter): State<SharedRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let counted =
        request.method() == Method::POST && CREDENTIAL_PATHS.contains(&request.uri().path());

    if counted && limiter.check().is_err() {
        tracing::warn!(path = %request.uri().path(), "Login rate limit exceeded");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Router};
    use tower::ServiceExt;

    #[test]
    fn test_limiter_allows_quota_then_rejects() {
        let limiter = create_login_rate_limiter(3);
        for _ in 0..3 {
            assert!(limiter.check().is_ok());
        }
        assert!(limiter.check().is_err());
    }

    #[test]
    fn test_zero_means_one() {
        let limiter = create_login_rate_limiter(0);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    fn app(limiter: SharedRateLimiter) -> Router {
        Router::new()
            .route("/login", post(|| async { "ok" }))
            .route("/other", post(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                limiter,
                login_rate_limit_middleware,
            ))
    }

    fn post_to(path: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_middleware_limits_login_posts_only() {
        let limiter = create_login_rate_limiter(1);
        let app = app(limiter);

        let first = app.clone().oneshot(post_to("/login")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.clone().oneshot(post_to("/login")).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        let other = app.oneshot(post_to("/other")).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }
}
