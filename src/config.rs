// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into [`AppConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the database file | `./data` |
//! | `JWT_SECRET` | HS256 signing secret for access tokens | Required |
//! | `GOODS_SEED_FILE` | JSON array of goods loaded at startup | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory.
///
/// The database file [`DATABASE_FILE_NAME`] is created inside it.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
///
/// There is no default: the server refuses to start without a non-empty
/// secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the optional goods seed file.
pub const GOODS_SEED_FILE_ENV: &str = "GOODS_SEED_FILE";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DATABASE_FILE_NAME: &str = "shop.redb";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                reason: format!("expected `json` or `pretty`, got `{other}`"),
            }),
        }
    }
}

/// Settings resolved from the environment at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub goods_seed_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("data_dir", &self.data_dir)
            .field("jwt_secret", &"<redacted>")
            .field("goods_seed_file", &self.goods_seed_file)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host.trim().parse().map_err(|e| ConfigError::Invalid {
            name: HOST_ENV,
            reason: format!("{e}"),
        })?;

        let port = match lookup(PORT_ENV) {
            Some(value) => value.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid {
                name: JWT_SECRET_ENV,
                reason: "must not be empty".to_string(),
            });
        }

        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        let goods_seed_file = lookup(GOODS_SEED_FILE_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            data_dir: PathBuf::from(data_dir),
            jwt_secret,
            goods_seed_file,
            log_format,
        })
    }

    /// Path of the database file inside the data directory.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }
}
