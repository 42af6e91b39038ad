use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DATA_DIR_VAR: &str = "COSMIC_DATA_DIR";
pub const BACKEND_VAR: &str = "COSMIC_BACKEND";
pub const LOG_VAR: &str = "COSMIC_LOG";

const APP_DIR_NAME: &str = "cosmictasks";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Which data-access implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// JSON files in the data directory.
    #[default]
    Json,
    /// In-memory demo data. Nothing is persisted.
    Fixture,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Json => "json",
            BackendKind::Fixture => "fixture",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(BackendKind::Json),
            "fixture" | "demo" => Ok(BackendKind::Fixture),
            _ => Err(Error::InvalidBackend(s.to_string())),
        }
    }
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the JSON collections and the session file.
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    /// `tracing` filter directive, e.g. `warn` or `cosmictasks=debug`.
    pub log_filter: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// 1. `COSMIC_DATA_DIR`, else `<data_local_dir>/cosmictasks`, else `./.cosmictasks`.
    /// 2. `COSMIC_BACKEND`: `json` (default) or `fixture`.
    /// 3. `COSMIC_LOG`: log filter, default `warn`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let backend = match lookup(BACKEND_VAR) {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => BackendKind::default(),
        };

        let log_filter = lookup(LOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config { data_dir, backend, log_filter })
    }

    /// Configuration rooted at `data_dir` with defaults for everything else.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Config {
            data_dir: data_dir.into(),
            backend: BackendKind::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(mut p) => {
            p.push(APP_DIR_NAME);
            p
        }
        None => PathBuf::from(format!(".{APP_DIR_NAME}")),
    }
}
