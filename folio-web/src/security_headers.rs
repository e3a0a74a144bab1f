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
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::configuration::HeadersConfig;

/// Add the configured security headers to every response
pub async fn security_headers_middleware(
    State(config): State<Arc<HeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    apply_security_headers(&config, response.headers_mut());
    response
}

fn apply_security_headers(config: &HeadersConfig, headers: &mut HeaderMap) {
    let mut set = |name: &HeaderName, value: Option<&str>| {
        let Some(value) = value else { return };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                headers.insert(name.clone(), value);
            }
            Err(_) => tracing::warn!(header = %name, "Skipping invalid security header value"),
        }
    };

    if config.enable_csp {
        set(&header::CONTENT_SECURITY_POLICY, config.csp_content.as_deref());
    }
    if config.enable_hsts {
        set(&header::STRICT_TRANSPORT_SECURITY, config.hsts_content.as_deref());
    }
    if config.enable_frame_options {
        set(&header::X_FRAME_OPTIONS, config.frame_options_content.as_deref());
    }
    if config.enable_content_type_options {
        set(&header::X_CONTENT_TYPE_OPTIONS, Some("nosniff"));
    }
    set(&header::REFERRER_POLICY, config.referrer_policy.as_deref());
    set(
        &HeaderName::from_static("permissions-policy"),
        config.permissions_policy.as_deref(),
    );
}
