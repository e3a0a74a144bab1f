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
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use folio_core::models::user::{NewUser, Role, User};
use folio_db::StoreError;
use serde::Deserialize;

use super::shared::{base_context, render};
use crate::{
    error::AppResult,
    gate::{DASHBOARD_PATH, LOGIN_PATH},
    AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

async fn login_page(
    state: &AppState,
    status: StatusCode,
    error: Option<&str>,
    email: &str,
) -> AppResult<Response> {
    let mut context = base_context(state, None).await;
    context.insert("email", email);
    if let Some(error) = error {
        context.insert("error", error);
    }
    Ok((status, render(state, "login.html", &context)?).into_response())
}

async fn signup_page(
    state: &AppState,
    status: StatusCode,
    error: Option<&str>,
    form: Option<&SignupForm>,
) -> AppResult<Response> {
    let mut context = base_context(state, None).await;
    if let Some(form) = form {
        context.insert("name", &form.name);
        context.insert("email", &form.email);
    }
    if let Some(error) = error {
        context.insert("error", error);
    }
    Ok((status, render(state, "signup.html", &context)?).into_response())
}

pub async fn login_form(State(state): State<AppState>) -> AppResult<Response> {
    login_page(&state, StatusCode::OK, None, "").await
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let user = state.db.users.find_by_email(form.email.trim()).await;

    let verified = match &user {
        Some(user) => user.verify_password(&form.password).unwrap_or_else(|e| {
            tracing::error!(user_id = %user.id, "Password verification error: {:?}", e);
            false
        }),
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        tracing::info!(email = %form.email, "Failed login attempt");
        return login_page(
            &state,
            StatusCode::UNAUTHORIZED,
            Some(INVALID_CREDENTIALS),
            &form.email,
        )
        .await;
    };

    let jar = state.sessions.create_session(jar, &user.id)?;
    tracing::info!(user_id = %user.id, "User logged in");
    Ok((jar, Redirect::to(DASHBOARD_PATH)).into_response())
}

pub async fn signup_form(State(state): State<AppState>) -> AppResult<Response> {
    signup_page(&state, StatusCode::OK, None, None).await
}

/// Register a new account and sign it in. The very first account on a
/// fresh install becomes an admin; later ones are authors.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let role = if state.db.users.count().await == 0 {
        Role::Admin
    } else {
        Role::Author
    };

    let user = match User::from_new(NewUser {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
        role: Some(role),
        avatar_url: None,
    }) {
        Ok(user) => user,
        Err(e) => {
            return signup_page(
                &state,
                StatusCode::BAD_REQUEST,
                Some(&e.to_string()),
                Some(&form),
            )
            .await;
        }
    };

    let user = match state.db.users.create(user).await {
        Ok(user) => user,
        Err(e) => {
            if let Some(store_err) = e.downcast_ref::<StoreError>() {
                let (status, message) = match store_err {
                    StoreError::Conflict(_) => (
                        StatusCode::CONFLICT,
                        "An account with this email already exists".to_string(),
                    ),
                    StoreError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
                };
                return signup_page(&state, status, Some(&message), Some(&form)).await;
            }
            return Err(e.into());
        }
    };

    let jar = state.sessions.create_session(jar, &user.id)?;
    Ok((jar, Redirect::to(DASHBOARD_PATH)).into_response())
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (state.sessions.delete_session(jar), Redirect::to(LOGIN_PATH))
}
