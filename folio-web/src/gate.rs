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

//! Request gate: one session check per request, before any handler runs.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::session::SessionStore;

pub const PROTECTED_PREFIX: &str = "/admin";
pub const AUTH_PATHS: &[&str] = &["/login", "/signup"];
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Header carrying the request path to downstream handlers
pub const PATHNAME_HEADER: &str = "x-pathname";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

/// Path the gate saw, available to handlers as an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(pub String);

fn is_protected(path: &str) -> bool {
    path == PROTECTED_PREFIX
        || path
            .strip_prefix(PROTECTED_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// First matching rule wins
pub fn decide(path: &str, has_session: bool) -> GateDecision {
    if !has_session && is_protected(path) {
        GateDecision::RedirectToLogin
    } else if has_session && AUTH_PATHS.contains(&path) {
        GateDecision::RedirectToDashboard
    } else {
        GateDecision::Allow
    }
}

pub async fn session_gate(
    State(sessions): State<SessionStore>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let session = sessions.get_session(&jar);

    match decide(&path, session.is_some()) {
        GateDecision::RedirectToLogin => {
            tracing::debug!(%path, "No session, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        GateDecision::RedirectToDashboard => Redirect::to(DASHBOARD_PATH).into_response(),
        GateDecision::Allow => {
            if let Ok(value) = HeaderValue::from_str(&path) {
                request.headers_mut().insert(PATHNAME_HEADER, value);
            }
            request.extensions_mut().insert(ResolvedPath(path));
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_paths_without_session() {
        assert_eq!(decide("/admin", false), GateDecision::RedirectToLogin);
        assert_eq!(decide("/admin/", false), GateDecision::RedirectToLogin);
        assert_eq!(decide("/admin/dashboard", false), GateDecision::RedirectToLogin);
        assert_eq!(decide("/admin/api/posts/1", false), GateDecision::RedirectToLogin);
    }

    #[test]
    fn test_lookalike_prefix_is_public() {
        assert_eq!(decide("/administrator", false), GateDecision::Allow);
        assert_eq!(decide("/admins/list", false), GateDecision::Allow);
    }

    #[test]
    fn test_auth_pages_with_session() {
        assert_eq!(decide("/login", true), GateDecision::RedirectToDashboard);
        assert_eq!(decide("/signup", true), GateDecision::RedirectToDashboard);
        assert_eq!(decide("/login/help", true), GateDecision::Allow);
    }

    #[test]
    fn test_everything_else_allowed() {
        assert_eq!(decide("/login", false), GateDecision::Allow);
        assert_eq!(decide("/admin/dashboard", true), GateDecision::Allow);
        assert_eq!(decide("/", false), GateDecision::Allow);
        assert_eq!(decide("/blog/hello", true), GateDecision::Allow);
        assert_eq!(decide("/api/session", false), GateDecision::Allow);
    }
}
