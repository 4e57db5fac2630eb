//! Configuration for the dashboard.
//!
//! Values resolve in order: built-in defaults, `~/.config/yodash/config.toml`,
//! then environment variables. Identity settings are fixed and never read
//! from the config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};
use crate::filter::DEFAULT_MIN_CONFIDENCE;
use crate::model::ModelVersion;
use crate::overlay::Size;

pub const DEFAULT_INFERENCE_URL: &str =
    "https://esh5kudyxk.execute-api.us-east-1.amazonaws.com/inference";
pub const DEFAULT_HISTORY_URL: &str = "https://95iva13c2d.execute-api.us-east-1.amazonaws.com/query";

pub const ENV_INFERENCE_URL: &str = "YODASH_INFERENCE_URL";
pub const ENV_HISTORY_URL: &str = "YODASH_HISTORY_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "YODASH_REQUEST_TIMEOUT_SECS";

const APP_DIR: &str = "yodash";

/// Displayed preview bounds, standing in for the browser's layout box.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub max_width: f64,
    pub max_height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_width: 960.0,
            max_height: 440.0,
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> Size {
        Size::new(self.max_width, self.max_height)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DashConfig {
    pub inference_url: String,
    pub history_url: String,
    /// No timeout unless set.
    pub request_timeout_secs: Option<u64>,
    pub viewport: ViewportConfig,
    pub default_model: ModelVersion,
    pub default_min_confidence: f64,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            history_url: DEFAULT_HISTORY_URL.to_string(),
            request_timeout_secs: None,
            viewport: ViewportConfig::default(),
            default_model: ModelVersion::default(),
            default_min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl DashConfig {
    /// Loads `path` (or the default location) and applies environment overrides.
    ///
    /// A missing file is not an error; an explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match config_file() {
                Ok(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DashConfig = toml::from_str(&content)?;
        tracing::debug!("[Config] Loaded {}", path.display());
        Ok(config)
    }

    /// Applies overrides from a variable lookup (the process environment in production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_INFERENCE_URL) {
            self.inference_url = url;
        }
        if let Some(url) = lookup(ENV_HISTORY_URL) {
            self.history_url = url;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                DashError::config(format!("{ENV_REQUEST_TIMEOUT_SECS}={raw:?}: {e}"))
            })?;
            self.request_timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Fixed identity provider client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySettings {
    pub authority: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub post_logout_redirect_uri: String,
    pub response_type: String,
    pub scope: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            authority: "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_Q1udERgxq"
                .to_string(),
            client_id: "1cndv0hnai7i8vtm8llvrincqq".to_string(),
            redirect_uri: "https://dv0l1l3woumqj.cloudfront.net/callback".to_string(),
            post_logout_redirect_uri: "https://dv0l1l3woumqj.cloudfront.net/".to_string(),
            response_type: "code".to_string(),
            scope: "email openid phone".to_string(),
        }
    }
}

/// Returns the yodash configuration directory (e.g. `~/.config/yodash/`).
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| DashError::config("Cannot find home directory"))
}

pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Identity provider session storage.
pub fn session_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("session.json"))
}

pub fn log_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join("logs"))
}
