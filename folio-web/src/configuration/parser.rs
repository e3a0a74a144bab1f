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

//! TOML configuration files for Folio
//!
//! Every key is optional so a file may set only what it cares about.
//! Files are merged in order, later files winning key by key.
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [session]
//! secret = "change-me"
//! secure_cookies = false
//!
//! [paths]
//! data = "/srv/folio/data"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: TomlServerConfig,
    pub session: TomlSessionConfig,
    pub upload: TomlUploadConfig,
    pub rate_limit: TomlRateLimitConfig,
    pub headers: TomlHeadersConfig,
    pub paths: TomlPathConfig,
    pub development_mode: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlSessionConfig {
    pub secure_cookies: Option<bool>,
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlUploadConfig {
    pub max_size: Option<usize>,
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlRateLimitConfig {
    pub login_attempts_per_minute: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlHeadersConfig {
    pub hsts: Option<bool>,
    pub csp: Option<bool>,
    pub frame_options: Option<bool>,
    pub content_type_options: Option<bool>,
    pub csp_content: Option<String>,
    pub hsts_content: Option<String>,
    pub frame_options_content: Option<String>,
    pub referrer_policy: Option<String>,
    pub permissions_policy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlPathConfig {
    pub data: Option<String>,
    pub templates: Option<String>,
}

/// Parse a TOML configuration file. A missing file parses as empty.
pub fn parse_toml_file<P: AsRef<Path>>(path: P) -> Result<TomlConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
}

/// Configuration file locations, lowest precedence first
pub fn get_config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/folio.conf")];

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".folio.conf"));
    }

    paths.push(PathBuf::from("./folio.toml"));
    paths
}

/// Overwrite `slot` when the later file sets a value
fn take<T>(slot: &mut Option<T>, later: Option<T>) {
    if later.is_some() {
        *slot = later;
    }
}

/// Merge configurations, later ones taking precedence key by key
pub fn merge_toml_configs(configs: Vec<TomlConfig>) -> TomlConfig {
    let mut merged = TomlConfig::default();

    for config in configs {
        take(&mut merged.server.host, config.server.host);
        take(&mut merged.server.port, config.server.port);

        take(&mut merged.session.secure_cookies, config.session.secure_cookies);
        take(&mut merged.session.secret, config.session.secret);

        take(&mut merged.upload.max_size, config.upload.max_size);
        take(&mut merged.upload.directory, config.upload.directory);

        take(
            &mut merged.rate_limit.login_attempts_per_minute,
            config.rate_limit.login_attempts_per_minute,
        );

        let (headers, later) = (&mut merged.headers, config.headers);
        take(&mut headers.hsts, later.hsts);
        take(&mut headers.csp, later.csp);
        take(&mut headers.frame_options, later.frame_options);
        take(&mut headers.content_type_options, later.content_type_options);
        take(&mut headers.csp_content, later.csp_content);
        take(&mut headers.hsts_content, later.hsts_content);
        take(&mut headers.frame_options_content, later.frame_options_content);
        take(&mut headers.referrer_policy, later.referrer_policy);
        take(&mut headers.permissions_policy, later.permissions_policy);

        take(&mut merged.paths.data, config.paths.data);
        take(&mut merged.paths.templates, config.paths.templates);

        take(&mut merged.development_mode, config.development_mode);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_empty_toml_file() -> Result<()> {
        let file = NamedTempFile::new()?;
        let config = parse_toml_file(file.path())?;
        assert_eq!(config, TomlConfig::default());
        Ok(())
    }

    #[test]
    fn test_parse_partial_config() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            r#"
development_mode = true

[server]
port = 8080

[session]
secret = "s3cret"
secure_cookies = false

[headers]
csp = false
"#
        )?;

        let config = parse_toml_file(file.path())?;
        assert_eq!(config.server.port, Some(8080));
        assert_eq!(config.server.host, None);
        assert_eq!(config.session.secret.as_deref(), Some("s3cret"));
        assert_eq!(config.session.secure_cookies, Some(false));
        assert_eq!(config.headers.csp, Some(false));
        assert_eq!(config.development_mode, Some(true));
        Ok(())
    }

    #[test]
    fn test_parse_nonexistent_file() -> Result<()> {
        let config = parse_toml_file("/nonexistent/folio.conf")?;
        assert_eq!(config, TomlConfig::default());
        Ok(())
    }

    #[test]
    fn test_parse_invalid_toml() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[server\nport = ")?;
        assert!(parse_toml_file(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_get_config_file_paths() {
        let paths = get_config_file_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from("/etc/folio.conf")));
        assert_eq!(paths.last(), Some(&PathBuf::from("./folio.toml")));
    }

    #[test]
    fn test_merge_later_wins_per_key() {
        let mut system = TomlConfig::default();
        system.server.host = Some("127.0.0.1".to_string());
        system.server.port = Some(3000);

        let mut user = TomlConfig::default();
        user.server.port = Some(9000);
        user.session.secret = Some("mine".to_string());

        let merged = merge_toml_configs(vec![system, user]);
        assert_eq!(merged.server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(merged.server.port, Some(9000));
        assert_eq!(merged.session.secret.as_deref(), Some("mine"));
    }

    #[test]
    fn test_empty_merge() {
        assert_eq!(merge_toml_configs(Vec::new()), TomlConfig::default());
    }
}
