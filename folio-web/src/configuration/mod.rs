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

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fmt::Display, str::FromStr};

pub mod defaults;
pub mod parser;

/// Server configuration, layered from defaults, configuration files and the
/// environment.
///
/// ```rust,no_run
/// use folio_web::configuration::Configuration;
///
/// let config = Configuration::load().expect("Failed to load configuration");
/// println!("Listening on {}", config.bind_addr());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Configuration {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
    pub rate_limit: RateLimitConfig,
    pub security: SecurityConfig,
    pub path: PathConfig,
    pub development_mode: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub secure_cookies: bool,
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    pub max_size: usize,
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub login_attempts_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    pub headers: HeadersConfig,
}

/// Security headers configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeadersConfig {
    pub enable_hsts: bool,
    pub enable_csp: bool,
    pub enable_frame_options: bool,
    pub enable_content_type_options: bool,
    pub csp_content: Option<String>,
    pub hsts_content: Option<String>,
    pub frame_options_content: Option<String>,
    pub referrer_policy: Option<String>,
    pub permissions_policy: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathConfig {
    pub data: String,
    pub templates: String,
}

/// Environment variable, then file value, then default. A set but
/// unparsable variable is an error rather than a silent fallback.
fn layered<T>(var: &str, file: Option<T>, default: impl FnOnce() -> T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {} environment variable: {}", var, e)),
        Err(_) => Ok(file.unwrap_or_else(default)),
    }
}

fn layered_opt(var: &str, file: Option<String>, default: Option<String>) -> Option<String> {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or(file)
        .or(default)
}

impl Configuration {
    /// Load configuration from environment variables and configuration files
    ///
    /// Later sources override earlier ones:
    /// 1. Default values
    /// 2. /etc/folio.conf
    /// 3. ~/.folio.conf
    /// 4. ./folio.toml
    /// 5. Environment variables
    pub fn load() -> Result<Self> {
        let toml_config = Self::load_toml_config();
        Self::from_layers(&toml_config)
    }

    fn load_toml_config() -> parser::TomlConfig {
        let mut configs = Vec::new();

        for path in parser::get_config_file_paths() {
            match parser::parse_toml_file(&path) {
                Ok(config) => configs.push(config),
                Err(e) => {
                    tracing::warn!("Ignoring configuration file {}: {:#}", path.display(), e);
                }
            }
        }

        parser::merge_toml_configs(configs)
    }

    /// Resolve every field against the environment and a merged file config
    pub fn from_layers(toml_config: &parser::TomlConfig) -> Result<Self> {
        let server = ServerConfig::load(toml_config)?;
        let session = SessionConfig::load(toml_config)?;
        let upload = UploadConfig::load(toml_config)?;
        let rate_limit = RateLimitConfig::load(toml_config)?;
        let security = SecurityConfig {
            headers: HeadersConfig::load(toml_config)?,
        };
        let path = PathConfig::load(toml_config);
        let development_mode = layered(
            "DEVELOPMENT_MODE",
            toml_config.development_mode,
            defaults::default_development_mode,
        )?;

        Ok(Self {
            server,
            session,
            upload,
            rate_limit,
            security,
            path,
            development_mode,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Configuration {
    /// Defaults only, ignoring the environment and configuration files
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: defaults::default_host(),
                port: defaults::default_port(),
            },
            session: SessionConfig {
                secure_cookies: defaults::default_secure_cookies(),
                secret: defaults::default_session_secret(),
            },
            upload: UploadConfig {
                max_size: defaults::default_max_upload_size(),
                directory: defaults::default_uploads_directory(),
            },
            rate_limit: RateLimitConfig {
                login_attempts_per_minute: defaults::default_login_attempts_per_minute(),
            },
            security: SecurityConfig {
                headers: HeadersConfig {
                    enable_hsts: defaults::default_enable_hsts(),
                    enable_csp: defaults::default_enable_csp(),
                    enable_frame_options: defaults::default_enable_frame_options(),
                    enable_content_type_options: defaults::default_enable_content_type_options(),
                    csp_content: defaults::default_csp_content(),
                    hsts_content: defaults::default_hsts_content(),
                    frame_options_content: defaults::default_frame_options_content(),
                    referrer_policy: defaults::default_referrer_policy(),
                    permissions_policy: defaults::default_permissions_policy(),
                },
            },
            path: PathConfig {
                data: defaults::default_data_directory(),
                templates: defaults::default_templates_directory(),
            },
            development_mode: defaults::default_development_mode(),
        }
    }
}

impl ServerConfig {
    fn load(toml_config: &parser::TomlConfig) -> Result<Self> {
        let file = &toml_config.server;
        Ok(Self {
            host: layered("HOST", file.host.clone(), defaults::default_host)?,
            port: layered("PORT", file.port, defaults::default_port)?,
        })
    }
}

impl SessionConfig {
    fn load(toml_config: &parser::TomlConfig) -> Result<Self> {
        let file = &toml_config.session;

        Ok(Self {
            secure_cookies: layered(
                "SECURE_COOKIES",
                file.secure_cookies,
                defaults::default_secure_cookies,
            )?,
            secret: layered_opt(
                "SESSION_SECRET",
                file.secret.clone(),
                defaults::default_session_secret(),
            )
            .filter(|s| !s.is_empty()),
        })
    }
}

impl UploadConfig {
    fn load(toml_config: &parser::TomlConfig) -> Result<Self> {
        let file = &toml_config.upload;
        Ok(Self {
            max_size: layered(
                "MAX_UPLOAD_SIZE",
                file.max_size,
                defaults::default_max_upload_size,
            )
            .context("Upload size limit")?,
            directory: layered(
                "UPLOADS_DIR",
                file.directory.clone(),
                defaults::default_uploads_directory,
            )?,
        })
    }
}

impl RateLimitConfig {
    fn load(toml_config: &parser::TomlConfig) -> Result<Self> {
        let login_attempts_per_minute = layered(
            "RATE_LIMIT_LOGIN_ATTEMPTS",
            toml_config.rate_limit.login_attempts_per_minute,
            defaults::default_login_attempts_per_minute,
        )?;
        if login_attempts_per_minute == 0 {
            anyhow::bail!("RATE_LIMIT_LOGIN_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            login_attempts_per_minute,
        })
    }
}

impl HeadersConfig {
    fn load(toml_config: &parser::TomlConfig) -> Result<Self> {
        let file = &toml_config.headers;

        Ok(Self {
            enable_hsts: layered(
                "SECURITY_HEADERS_HSTS",
                file.hsts,
                defaults::default_enable_hsts,
            )?,
            enable_csp: layered("SECURITY_HEADERS_CSP", file.csp, defaults::default_enable_csp)?,
            enable_frame_options: layered(
                "SECURITY_HEADERS_FRAME_OPTIONS",
                file.frame_options,
                defaults::default_enable_frame_options,
            )?,
            enable_content_type_options: layered(
                "SECURITY_HEADERS_CONTENT_TYPE_OPTIONS",
                file.content_type_options,
                defaults::default_enable_content_type_options,
            )?,
            csp_content: layered_opt(
                "SECURITY_HEADERS_CSP_CONTENT",
                file.csp_content.clone(),
                defaults::default_csp_content(),
            ),
            hsts_content: layered_opt(
                "SECURITY_HSTS_CONTENT",
                file.hsts_content.clone(),
                defaults::default_hsts_content(),
            ),
            frame_options_content: layered_opt(
                "SECURITY_FRAME_OPTIONS_CONTENT",
                file.frame_options_content.clone(),
                defaults::default_frame_options_content(),
            ),
            referrer_policy: layered_opt(
                "SECURITY_REFERRER_POLICY",
                file.referrer_policy.clone(),
                defaults::default_referrer_policy(),
            ),
            permissions_policy: layered_opt(
                "SECURITY_PERMISSIONS_POLICY",
                file.permissions_policy.clone(),
                defaults::default_permissions_policy(),
            ),
        })
    }
}

impl PathConfig {
    fn load(toml_config: &parser::TomlConfig) -> Self {
        let file = &toml_config.paths;
        Self {
            data: env::var("DATA_DIR")
                .ok()
                .or_else(|| file.data.clone())
                .unwrap_or_else(defaults::default_data_directory),
            templates: env::var("TEMPLATES_DIR")
                .ok()
                .or_else(|| file.templates.clone())
                .unwrap_or_else(defaults::default_templates_directory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "HOST",
        "PORT",
        "SESSION_SECRET",
        "SECURE_COOKIES",
        "MAX_UPLOAD_SIZE",
        "UPLOADS_DIR",
        "DATA_DIR",
        "TEMPLATES_DIR",
        "RATE_LIMIT_LOGIN_ATTEMPTS",
        "DEVELOPMENT_MODE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_nothing_set() -> Result<()> {
        clear_env();

        let config = Configuration::from_layers(&parser::TomlConfig::default())?;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.session.secure_cookies);
        assert!(config.session.secret.is_none());
        assert_eq!(config.rate_limit.login_attempts_per_minute, 5);
        assert!(!config.development_mode);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() -> Result<()> {
        clear_env();
        let mut file = parser::TomlConfig::default();
        file.server.port = Some(8080);
        file.session.secret = Some("from-file".to_string());

        env::set_var("PORT", "9090");
        let config = Configuration::from_layers(&file)?;
        clear_env();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.session.secret.as_deref(), Some("from-file"));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_is_error() {
        clear_env();
        env::set_var("SECURE_COOKIES", "sometimes");
        let result = Configuration::from_layers(&parser::TomlConfig::default());
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_empty_secret_treated_as_unset() -> Result<()> {
        clear_env();
        env::set_var("SESSION_SECRET", "");
        let config = Configuration::from_layers(&parser::TomlConfig::default())?;
        clear_env();

        assert!(config.session.secret.is_none());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_empty_env_secret_falls_back_to_file() -> Result<()> {
        clear_env();
        let mut file = parser::TomlConfig::default();
        file.session.secret = Some("from-file".to_string());

        env::set_var("SESSION_SECRET", "");
        let config = Configuration::from_layers(&file)?;
        clear_env();

        assert_eq!(config.session.secret.as_deref(), Some("from-file"));
        Ok(())
    }

    #[test]
    fn test_bind_addr() {
        let config = Configuration::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }
}
