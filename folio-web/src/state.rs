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

use folio_core::models::session::session_ttl;
use folio_db::Database;
use std::sync::Arc;

use crate::{
    configuration::Configuration,
    rate_limit::{create_login_rate_limiter, SharedRateLimiter},
    session::SessionStore,
    templates::TemplateEngine,
    token::TokenCodec,
    uploads::MediaLibrary,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub templates: TemplateEngine,
    pub config: Arc<Configuration>,
    pub sessions: SessionStore,
    pub login_rate_limiter: SharedRateLimiter,
    pub media: MediaLibrary,
}

impl AppState {
    pub fn new(db: Database, templates: TemplateEngine, config: Configuration) -> Self {
        let codec = TokenCodec::from_secret(config.session.secret.as_deref());
        let sessions = SessionStore::new(codec, session_ttl(), config.session.secure_cookies);
        let login_rate_limiter =
            create_login_rate_limiter(config.rate_limit.login_attempts_per_minute);
        let media = MediaLibrary::new(&config.upload.directory, config.upload.max_size);

        Self {
            db,
            templates,
            config: Arc::new(config),
            sessions,
            login_rate_limiter,
            media,
        }
    }
}
