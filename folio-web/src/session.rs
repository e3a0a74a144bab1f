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

//! Session cookies backed by signed tokens.
//!
//! The jar is always passed in and handed back; nothing here reaches for
//! request-global state.

use anyhow::{Context, Result};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{DateTime, Duration, Utc};
use cookie::SameSite;
use folio_core::models::session::Session;
use time::OffsetDateTime;

use crate::token::TokenCodec;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone)]
pub struct SessionStore {
    codec: TokenCodec,
    ttl: Duration,
    secure: bool,
}

impl SessionStore {
    pub fn new(codec: TokenCodec, ttl: Duration, secure: bool) -> Self {
        Self { codec, ttl, secure }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn create_session(&self, jar: CookieJar, user_id: &str) -> Result<CookieJar> {
        self.create_session_at(jar, user_id, Utc::now())
    }

    /// Issue a token for `user_id` and set it as the session cookie
    pub fn create_session_at(
        &self,
        jar: CookieJar,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CookieJar> {
        let session = Session::new_at(user_id, self.ttl, now)?;
        let token = self
            .codec
            .issue_at(&session, self.ttl, now)
            .context("Failed to sign session token")?;

        let expires = OffsetDateTime::from_unix_timestamp(session.expires_at.timestamp())
            .context("Session expiry out of range")?;

        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .expires(expires);

        tracing::debug!(user_id = %user_id, expires_at = %session.expires_at, "Created session");
        Ok(jar.add(cookie))
    }

    /// The verified session, if the jar carries a valid one
    pub fn get_session(&self, jar: &CookieJar) -> Option<Session> {
        self.get_session_at(jar, Utc::now())
    }

    pub fn get_session_at(&self, jar: &CookieJar, now: DateTime<Utc>) -> Option<Session> {
        let cookie = jar.get(SESSION_COOKIE)?;
        self.codec.verify_at(cookie.value(), now)
    }

    /// Remove the session cookie. Deleting an absent session is fine.
    pub fn delete_session(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
    }
}
