// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration
//!
//! Read once at startup from a TOML file, overlaid with `AUDIT_*`
//! environment variables, then validated into a [`Config`] that is passed
//! to everything that needs it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use audit_storage::MongoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Directory holding the config file
pub const CONFIG_DIR_VAR: &str = "AUDIT_CONFIG_DIR";
/// Config file name, without the `.toml` extension
pub const CONFIG_NAME_VAR: &str = "AUDIT_CONFIG_NAME";

pub const ENV_VAR: &str = "AUDIT_ENV";
pub const PORT_VAR: &str = "AUDIT_SERVER_PORT";
pub const URI_VAR: &str = "AUDIT_DB_CONN_URI";
pub const DATABASE_VAR: &str = "AUDIT_DB_CONN_DATABASE";
pub const USERNAME_VAR: &str = "AUDIT_DB_CONN_USER";
pub const PASSWORD_VAR: &str = "AUDIT_DB_CONN_PASSWORD";

const DEFAULT_CONFIG_DIR: &str = "configs";
const DEFAULT_CONFIG_NAME: &str = "config";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("{setting} must be set via {var} env var")]
    MissingEnv {
        setting: &'static str,
        var: &'static str,
    },

    #[error("server.port must be between 1 and 65535, got {0}")]
    InvalidPort(String),

    #[error("env must be one of local, dev, prod, got {0:?}")]
    InvalidEnv(String),

    #[error("timeouts.{0} must be greater than zero")]
    InvalidTimeout(&'static str),
}

/// Deployment profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Environment::Local),
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(ConfigError::InvalidEnv(other.to_string())),
        }
    }
}

/// Validated daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub env: Environment,
    /// TCP port the RPC endpoint listens on
    pub port: u16,
    /// Log database connection
    pub db_conn: MongoConfig,
    /// Bound on connecting to and pinging the database at startup
    pub startup_timeout: Duration,
    /// Bound on closing the database connection at shutdown
    pub shutdown_timeout: Duration,
    /// Log file; stderr when unset
    pub log_path: Option<PathBuf>,
}

impl Config {
    /// Load from the process environment.
    ///
    /// The file is `$AUDIT_CONFIG_DIR/$AUDIT_CONFIG_NAME.toml`, defaulting to
    /// `configs/config.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(&config_path(&env), &env)
    }

    /// Load from an explicit file and set of environment variables
    pub fn load_from(path: &Path, env: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let mut raw: RawConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        raw.apply_env(env);
        raw.validate()
    }
}

/// Path of the config file for the given environment
pub fn config_path(env: &HashMap<String, String>) -> PathBuf {
    let dir = non_empty(env.get(CONFIG_DIR_VAR)).unwrap_or(DEFAULT_CONFIG_DIR);
    let name = non_empty(env.get(CONFIG_NAME_VAR)).unwrap_or(DEFAULT_CONFIG_NAME);
    Path::new(dir).join(format!("{}.toml", name))
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Config file as written, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    env: Option<String>,
    server: RawServer,
    db_conn: RawDbConn,
    timeouts: RawTimeouts,
    log: RawLog,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawServer {
    port: Option<i64>,
    /// Environment override that is not a number
    #[serde(skip)]
    unparsed_port: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDbConn {
    uri: Option<String>,
    username: Option<String>,
    password: Option<String>,
    database: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTimeouts {
    #[serde(with = "humantime_serde", default)]
    startup: Option<Duration>,
    #[serde(with = "humantime_serde", default)]
    shutdown: Option<Duration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLog {
    path: Option<PathBuf>,
}

impl RawConfig {
    /// Non-empty environment values win over the file
    fn apply_env(&mut self, env: &HashMap<String, String>) {
        let lookup = |var: &str| non_empty(env.get(var)).map(str::to_string);

        if let Some(value) = lookup(ENV_VAR) {
            self.env = Some(value);
        }
        if let Some(value) = lookup(PORT_VAR) {
            match value.parse() {
                Ok(port) => self.server.port = Some(port),
                Err(_) => self.server.unparsed_port = Some(value),
            }
        }
        if let Some(value) = lookup(URI_VAR) {
            self.db_conn.uri = Some(value);
        }
        if let Some(value) = lookup(DATABASE_VAR) {
            self.db_conn.database = Some(value);
        }
        if let Some(value) = lookup(USERNAME_VAR) {
            self.db_conn.username = Some(value);
        }
        if let Some(value) = lookup(PASSWORD_VAR) {
            self.db_conn.password = Some(value);
        }
    }

    fn validate(self) -> Result<Config, ConfigError> {
        let env = match self.env.as_deref().map(str::trim) {
            None | Some("") => Environment::default(),
            Some(value) => value.parse()?,
        };

        if let Some(value) = self.server.unparsed_port {
            return Err(ConfigError::InvalidPort(value));
        }
        let port = match self.server.port {
            None => return Err(ConfigError::Missing("server.port")),
            Some(port) => {
                u16::try_from(port)
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| ConfigError::InvalidPort(port.to_string()))?
            }
        };

        let uri = required(self.db_conn.uri).ok_or(ConfigError::Missing("db_conn.uri"))?;
        let username =
            required(self.db_conn.username).ok_or(ConfigError::MissingEnv {
                setting: "database username",
                var: USERNAME_VAR,
            })?;
        let password =
            required(self.db_conn.password).ok_or(ConfigError::MissingEnv {
                setting: "database password",
                var: PASSWORD_VAR,
            })?;
        let database =
            required(self.db_conn.database).ok_or(ConfigError::Missing("db_conn.database"))?;

        let startup_timeout = self.timeouts.startup.unwrap_or(DEFAULT_TIMEOUT);
        if startup_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("startup"));
        }
        let shutdown_timeout = self.timeouts.shutdown.unwrap_or(DEFAULT_TIMEOUT);
        if shutdown_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("shutdown"));
        }

        Ok(Config {
            env,
            port,
            db_conn: MongoConfig {
                uri,
                username,
                password,
                database,
            },
            startup_timeout,
            shutdown_timeout,
            log_path: self.log.path,
        })
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
