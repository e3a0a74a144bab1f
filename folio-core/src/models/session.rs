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
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fixed session lifetime. There is no sliding refresh.
pub const SESSION_TTL_MINUTES: i64 = 60;

pub fn session_ttl() -> Duration {
    Duration::minutes(SESSION_TTL_MINUTES)
}

/// Authenticated session. The signed cookie is its only persisted form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with the default lifetime
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        Self::new_at(user_id, session_ttl(), Utc::now())
    }

    /// Errors when `now + ttl` falls outside the representable range
    pub fn new_at(user_id: impl Into<String>, ttl: Duration, now: DateTime<Utc>) -> Result<Self> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| anyhow::anyhow!("Session lifetime {} overflows the clock", ttl))?;
        Ok(Self {
            user_id: user_id.into(),
            expires_at,
        })
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
