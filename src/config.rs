//! Operator configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file in the project root via `dotenvy`). Every key has a
//! default matching the stock SportRent layout, so a bare checkout works
//! without any configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::OpsError;

/// Environment variable that selects the Django settings module in children.
pub const SETTINGS_ENV_VAR: &str = "DJANGO_SETTINGS_MODULE";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line records.
    Text,
    /// One JSON object per record.
    Json,
}

/// Top-level operator configuration.
///
/// Loaded once at startup via [`OpsConfig::from_env`]. Relative paths are
/// resolved against `project_dir` by [`crate::domain::ProjectLayout`].
#[derive(Debug, Clone)]
pub struct OpsConfig {
    /// Project root: holds the application dir, manifest and environment.
    pub project_dir: PathBuf,

    /// Application directory containing `manage.py`.
    pub app_dir: PathBuf,

    /// Host the ASGI server binds to.
    pub host: String,

    /// Port the ASGI server binds to.
    pub port: u16,

    /// ASGI application target handed to daphne.
    pub asgi_target: String,

    /// Value exported as `DJANGO_SETTINGS_MODULE`.
    pub settings_module: String,

    /// Interpreter used to create the virtual environment. `None` tries
    /// `python3` then `python` on `PATH`.
    pub python: Option<String>,

    /// SQLite database file.
    pub database: PathBuf,

    /// Directory receiving `db-<timestamp>.sqlite3` copies.
    pub backups_dir: PathBuf,

    /// Directory the application writes its logs to.
    pub logs_dir: PathBuf,

    /// Pinned dependency manifest.
    pub requirements: PathBuf,

    /// Per-check timeout for `probe`, in seconds.
    pub probe_timeout_secs: u64,

    /// Log output format.
    pub log_format: LogFormat,
}

impl OpsConfig {
    /// Loads configuration from environment variables.
    ///
    /// The project root is `project_override` when given, else
    /// `SPORTRENT_PROJECT_DIR`, else the current directory. A `.env` file
    /// in that root is loaded first when present; already-set variables win.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidConfig`] if the current directory cannot be
    /// determined, `.env` is unreadable, or a numeric setting is invalid (see
    /// [`OpsConfig::from_lookup`]).
    pub fn from_env(project_override: Option<&Path>) -> Result<Self, OpsError> {
        let project_dir = match project_override {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var_os("SPORTRENT_PROJECT_DIR") {
                Some(dir) => PathBuf::from(dir),
                None => std::env::current_dir()
                    .map_err(|e| OpsError::InvalidConfig(format!("current directory: {e}")))?,
            },
        };

        let env_file = project_dir.join(".env");
        if env_file.is_file() {
            dotenvy::from_path(&env_file)
                .map_err(|e| OpsError::InvalidConfig(format!("{}: {e}", env_file.display())))?;
        }

        Self::from_lookup(project_dir, |key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidConfig`] if `SPORTRENT_PORT` is not a valid
    /// port number, or `SPORTRENT_PROBE_TIMEOUT_SECS` is not a positive
    /// number of seconds.
    pub fn from_lookup<F>(project_dir: PathBuf, lookup: F) -> Result<Self, OpsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_env(&lookup, "SPORTRENT_PORT", 8000_u16)?;
        let probe_timeout_secs = parse_env(&lookup, "SPORTRENT_PROBE_TIMEOUT_SECS", 5_u64)?;
        if probe_timeout_secs == 0 {
            return Err(OpsError::InvalidConfig(
                "SPORTRENT_PROBE_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        let log_format = match lookup("SPORTRENT_LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            project_dir,
            app_dir: path_or(&lookup, "SPORTRENT_APP_DIR", "sportrent"),
            host: lookup("SPORTRENT_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            asgi_target: lookup("SPORTRENT_ASGI_TARGET")
                .unwrap_or_else(|| "config.asgi:application".to_string()),
            settings_module: lookup("SPORTRENT_SETTINGS_MODULE")
                .unwrap_or_else(|| "config.settings".to_string()),
            python: lookup("SPORTRENT_PYTHON").filter(|p| !p.trim().is_empty()),
            database: path_or(&lookup, "SPORTRENT_DATABASE", "sportrent/db.sqlite3"),
            backups_dir: path_or(&lookup, "SPORTRENT_BACKUPS_DIR", "backups"),
            logs_dir: path_or(&lookup, "SPORTRENT_LOGS_DIR", "sportrent/logs"),
            requirements: path_or(&lookup, "SPORTRENT_REQUIREMENTS", "requirements.txt"),
            probe_timeout_secs,
            log_format,
        })
    }

    /// Returns the `host:port` authority the launcher binds to.
    ///
    /// IPv6 literals are bracketed (`[::1]:8000`) so the result can be used
    /// in URLs. Host names are kept as given.
    #[must_use]
    pub fn bind_address(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, self.port).to_string(),
            Err(_) => format!("{}:{}", self.host, self.port),
        }
    }
}

/// Parses a looked-up value as `T`, returning `default` when the key is
/// unset.
fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> Result<T, OpsError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| OpsError::InvalidConfig(format!("{key}={raw}: {e}"))),
        None => Ok(default),
    }
}

fn path_or<F>(lookup: &F, key: &str, default: &str) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| PathBuf::from(default), PathBuf::from)
}
