// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. A missing bot
//! token is fatal: the server refuses to start rather than accept
//! unverifiable credentials.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TELEGRAM_BOT_TOKEN` | Bot token used to verify initData | Required |
//! | `TELEGRAM_AUTH_MAX_AGE` | Max initData age in seconds | `86400` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS with `TLS_KEY_PATH`) | Unset |
//! | `TLS_KEY_PATH` | PEM private key | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::path::PathBuf;

use crate::auth::DEFAULT_MAX_AUTH_AGE_SECS;

pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const MAX_AUTH_AGE_ENV: &str = "TELEGRAM_AUTH_MAX_AGE";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    PartialTls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Server configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bot_token: String,
    pub max_auth_age_secs: i64,
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &"<redacted>")
            .field("max_auth_age_secs", &self.max_auth_age_secs)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup(BOT_TOKEN_ENV)
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing(BOT_TOKEN_ENV))?;

        let max_auth_age_secs = match lookup(MAX_AUTH_AGE_ENV) {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    name: MAX_AUTH_AGE_ENV,
                    value,
                })?,
            None => DEFAULT_MAX_AUTH_AGE_SECS,
        };

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTls),
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("") => LogFormat::default(),
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(format) if format.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            Some(format) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: format.to_string(),
                })
            }
        };

        Ok(Self {
            bot_token,
            max_auth_age_secs,
            host,
            port,
            tls,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = AppConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "123:abc")])).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.max_auth_age_secs, DEFAULT_MAX_AUTH_AGE_SECS);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.tls, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn missing_or_blank_token_is_an_error() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing(BOT_TOKEN_ENV))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "  ")])),
            Err(ConfigError::Missing(BOT_TOKEN_ENV))
        ));
    }

    #[test]
    fn max_age_must_be_positive_integer() {
        for value in ["0", "-5", "a day"] {
            let result =
                AppConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "t"), (MAX_AUTH_AGE_ENV, value)]));
            assert!(
                matches!(result, Err(ConfigError::Invalid { name: MAX_AUTH_AGE_ENV, .. })),
                "value {value}"
            );
        }

        let config =
            AppConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "t"), (MAX_AUTH_AGE_ENV, "3600")]))
                .unwrap();
        assert_eq!(config.max_auth_age_secs, 3600);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let result = AppConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "t"), (PORT_ENV, "http")]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: PORT_ENV, .. })));
    }

    #[test]
    fn tls_requires_both_paths() {
        let result =
            AppConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "t"), (TLS_CERT_PATH_ENV, "c.pem")]));
        assert!(matches!(result, Err(ConfigError::PartialTls)));

        let config = AppConfig::from_lookup(lookup(&[
            (BOT_TOKEN_ENV, "t"),
            (TLS_CERT_PATH_ENV, "c.pem"),
            (TLS_KEY_PATH_ENV, "k.pem"),
        ]))
        .unwrap();
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: "c.pem".into(),
                key: "k.pem".into()
            })
        );
    }

    #[test]
    fn log_format_is_case_insensitive() {
        let config =
            AppConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "t"), (LOG_FORMAT_ENV, "JSON")]))
                .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = AppConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "123:secret")])).unwrap();
        assert!(!format!("{config:?}").contains("123:secret"));
    }
}
