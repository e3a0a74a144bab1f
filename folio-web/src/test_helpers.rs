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

use anyhow::Result;
use axum_extra::extract::CookieJar;
use folio_core::models::user::{Role, User};
use folio_db::init_data_dir;
use tempfile::TempDir;

use crate::{
    configuration::Configuration, session::SESSION_COOKIE, templates::init_templates, AppState,
};

/// App state over a throwaway data directory. Keep the `TempDir` alive for
/// the length of the test.
pub async fn create_test_app_state() -> Result<(AppState, TempDir)> {
    let tmp = TempDir::new()?;
    let root = tmp.path();

    let mut config = Configuration::default();
    config.session.secret = Some("test-secret".to_string());
    config.session.secure_cookies = false;
    config.path.data = root.join("data").to_string_lossy().to_string();
    config.path.templates = root.join("templates").to_string_lossy().to_string();
    config.upload.directory = root.join("uploads").to_string_lossy().to_string();

    let db = init_data_dir(&config.path.data).await?;
    let templates = init_templates(&config.path.templates, false)?;

    Ok((AppState::new(db, templates, config), tmp))
}

pub async fn create_test_user(state: &AppState, email: &str, role: Role) -> Result<User> {
    let user = User::new("Test User".to_string(), email.to_string(), "password123", role)?;
    state.db.users.create(user).await
}

/// `Cookie` header value carrying a fresh session for `user_id`
pub fn session_cookie(state: &AppState, user_id: &str) -> Result<String> {
    let jar = state.sessions.create_session(CookieJar::new(), user_id)?;
    let cookie = jar
        .get(SESSION_COOKIE)
        .ok_or_else(|| anyhow::anyhow!("session cookie was not set"))?;
    Ok(format!("{}={}", SESSION_COOKIE, cookie.value()))
}
