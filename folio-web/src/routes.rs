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
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    gate::session_gate,
    handlers::{self, analytics, media, menus, pages, posts, seo, settings, users},
    rate_limit::login_rate_limit_middleware,
    request_logging::request_logging_middleware,
    security_headers::security_headers_middleware,
    uploads::UPLOADS_URL_PREFIX,
    AppState,
};

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// JSON endpoints mounted under `/admin/api`
fn admin_api() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/pages", get(pages::list_pages).post(pages::create_page))
        .route(
            "/pages/{id}",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/menus", get(menus::list_menus).post(menus::create_menu))
        .route(
            "/menus/{id}",
            get(menus::get_menu)
                .put(menus::update_menu)
                .delete(menus::delete_menu),
        )
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/analytics", get(analytics::analytics_summary))
        .route("/media", get(media::list_media).post(media::upload_media))
        .route("/media/{name}", delete(media::delete_media))
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.upload.max_size + MULTIPART_OVERHEAD;
    let headers_config = Arc::new(state.config.security.headers.clone());
    let uploads_dir = state.media.dir().to_path_buf();

    Router::new()
        // Health check
        .route("/.health", get(seo::health))
        // Generated assets
        .route("/theme.css", get(seo::theme_css))
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/robots.txt", get(seo::robots))
        .route("/ads.txt", get(seo::ads))
        // Auth
        .route(
            "/login",
            get(handlers::login_form).post(handlers::login),
        )
        .route(
            "/signup",
            get(handlers::signup_form).post(handlers::signup),
        )
        .route("/logout", get(handlers::logout).post(handlers::logout))
        .route("/api/session", get(handlers::current_session))
        // Admin
        .route("/admin", get(handlers::admin_root))
        .route("/admin/dashboard", get(handlers::dashboard))
        .nest("/admin/api", admin_api())
        // Public content
        .route("/", get(handlers::home))
        .route("/blog/{slug}", get(handlers::blog_post))
        .route("/{slug}", get(handlers::page_by_slug))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(uploads_dir))
        .fallback(handlers::not_found)
        // Middleware, innermost first
        .layer(middleware::from_fn_with_state(
            state.login_rate_limiter.clone(),
            login_rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            session_gate,
        ))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn_with_state(
            headers_config,
            security_headers_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_app_state, create_test_user, session_cookie};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use folio_core::models::user::Role;
    use tower::ServiceExt;

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let app = create_router(state);

        let response = app.oneshot(get("/.health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dashboard_without_cookie_redirects_to_login() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let app = create_router(state);

        let response = app.oneshot(get("/admin/dashboard", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_dashboard_with_valid_cookie_renders() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let user = create_test_user(&state, "ada@example.com", Role::Admin)
            .await
            .unwrap();
        let cookie = session_cookie(&state, &user.id).unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(get("/admin/dashboard", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_no_session() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(get("/admin/dashboard", Some("session=not.a.token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_login_with_cookie_redirects_to_dashboard() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let cookie = session_cookie(&state, "42").unwrap();
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(get("/login", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/dashboard");

        let response = app.oneshot(get("/login", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_root_redirects_to_dashboard() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let cookie = session_cookie(&state, "42").unwrap();
        let app = create_router(state);

        let response = app.oneshot(get("/admin", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/dashboard");
    }

    #[tokio::test]
    async fn test_dashboard_rejects_session_for_missing_user() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let cookie = session_cookie(&state, "nonexistent-id").unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(get("/admin/dashboard", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_endpoint() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let user = create_test_user(&state, "ada@example.com", Role::Editor)
            .await
            .unwrap();
        let cookie = session_cookie(&state, &user.id).unwrap();
        let orphan = session_cookie(&state, "gone").unwrap();
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(get("/api/session", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], user.id.as_str());
        assert_eq!(body["email"], "ada@example.com");
        assert!(body.get("password_hash").is_none());

        let response = app
            .clone()
            .oneshot(get("/api/session", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(get("/api/session", Some(&orphan)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_security_headers_applied() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let app = create_router(state);

        let response = app.oneshot(get("/.health", None)).await.unwrap();
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert!(response.headers().contains_key("content-security-policy"));
    }

    #[tokio::test]
    async fn test_unknown_page_is_not_found() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(get("/no-such-page", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/a/b/c", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_theme_css_uses_custom_css() {
        let (state, _tmp) = create_test_app_state().await.unwrap();
        let mut settings = state.db.settings.get().await;
        settings.custom_css = Some("body { color: red; }".to_string());
        state.db.settings.save(settings).await.unwrap();
        let app = create_router(state);

        let response = app.oneshot(get("/theme.css", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css; charset=utf-8"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"body { color: red; }");
    }
}
