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

//! Default configuration values for Folio
//!
//! One function per field. `Configuration::load` falls back to these when
//! neither the environment nor a configuration file provides a value.

use std::{env, path::PathBuf};

// Server defaults
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    3000
}

// Session defaults
pub fn default_secure_cookies() -> bool {
    true
}

/// No secret by default; the token codec falls back to a built-in one and
/// warns at startup.
pub fn default_session_secret() -> Option<String> {
    None
}

// Upload defaults
pub fn default_max_upload_size() -> usize {
    10_485_760 // 10MB
}

pub fn default_uploads_directory() -> String {
    "uploads".to_string()
}

// Rate limit defaults
pub fn default_login_attempts_per_minute() -> u32 {
    5
}

// Security headers defaults
pub fn default_enable_hsts() -> bool {
    true
}

pub fn default_enable_csp() -> bool {
    true
}

pub fn default_enable_frame_options() -> bool {
    true
}

pub fn default_enable_content_type_options() -> bool {
    true
}

pub fn default_csp_content() -> Option<String> {
    Some("default-src 'self'; script-src 'self' 'unsafe-inline' https://www.googletagmanager.com; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; connect-src 'self' https://www.google-analytics.com; frame-ancestors 'none'; base-uri 'self'; form-action 'self';".to_string())
}

pub fn default_hsts_content() -> Option<String> {
    Some("max-age=31536000; includeSubDomains".to_string())
}

pub fn default_frame_options_content() -> Option<String> {
    Some("DENY".to_string())
}

pub fn default_referrer_policy() -> Option<String> {
    Some("strict-origin-when-cross-origin".to_string())
}

pub fn default_permissions_policy() -> Option<String> {
    Some("geolocation=(), camera=(), microphone=()".to_string())
}

// Path defaults
pub fn default_data_directory() -> String {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".folio").join("data"))
        .unwrap_or_else(|_| PathBuf::from("/var/folio/data"))
        .to_string_lossy()
        .to_string()
}

pub fn default_templates_directory() -> String {
    "templates".to_string()
}

pub fn default_development_mode() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        assert!(default_secure_cookies());
        assert!(default_session_secret().is_none());
    }

    #[test]
    fn test_data_directory_default() {
        let dir = default_data_directory();
        assert!(dir.ends_with(".folio/data") || dir == "/var/folio/data");
    }

    #[test]
    fn test_security_header_content_defaults() {
        let csp = default_csp_content().unwrap();
        assert!(csp.contains("default-src 'self'"));
        assert!(csp.contains("frame-ancestors 'none'"));

        assert_eq!(default_frame_options_content().as_deref(), Some("DENY"));
        assert!(default_hsts_content().unwrap().contains("max-age=31536000"));
    }
}
