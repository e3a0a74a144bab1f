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

//! Identity resolution: from a verified session to the full user record.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use folio_core::models::{
    session::Session,
    user::{PublicUser, User},
};
use folio_db::repositories::UserRepository;
use serde_json::json;
use std::convert::Infallible;

use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No cookie, or one that failed verification
    NoSession,
    /// The session verified but its user no longer exists
    UserNotFound,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::NoSession => "Not authenticated",
            Self::UserNotFound => "User not found",
        };
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

/// Look up a user by id. A missing user is `None`.
pub async fn find_user(users: &UserRepository, user_id: &str) -> Option<User> {
    users.find_by_id(user_id).await
}

/// The session the gate attached, or one read from the cookie when the
/// route sits outside the gate
pub fn request_session(parts: &Parts, state: &AppState) -> Option<Session> {
    if let Some(session) = parts.extensions.get::<Session>() {
        return Some(session.clone());
    }
    state
        .sessions
        .get_session(&CookieJar::from_headers(&parts.headers))
}

/// Resolve the signed-in user for a request
pub async fn resolve_user(parts: &Parts, state: &AppState) -> Result<CurrentUser, AuthRejection> {
    let session = request_session(parts, state).ok_or(AuthRejection::NoSession)?;

    match find_user(&state.db.users, &session.user_id).await {
        Some(user) => Ok(CurrentUser { user, session }),
        None => {
            tracing::warn!(user_id = %session.user_id, "Session refers to a missing user");
            Err(AuthRejection::UserNotFound)
        }
    }
}

/// Authenticated user, extracted from the session cookie
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

impl CurrentUser {
    pub fn public(&self) -> PublicUser {
        self.user.to_public()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state).await
    }
}

/// The signed-in user if any, for pages that render for everyone
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<PublicUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_user(parts, state).await.ok().map(|c| c.public())))
    }
}
