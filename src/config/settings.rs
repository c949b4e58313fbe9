//! User settings, stored as JSON in the config directory.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::session::SessionDefaults;

/// Endpoint of a locally running assistant service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/chat";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings loaded from `settings.json`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Assistant chat endpoint.
    pub endpoint: String,

    /// Request timeout in seconds. Unset means wait for the transport.
    pub request_timeout_secs: Option<u64>,

    /// Delay before the welcome message appears.
    pub welcome_delay_ms: u64,

    pub welcome_message: Option<String>,

    pub error_message: Option<String>,

    pub starter_suggestions: Option<Vec<String>>,

    pub fallback_suggestions: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
            welcome_delay_ms: 500,
            welcome_message: None,
            error_message: None,
            starter_suggestions: None,
            fallback_suggestions: None,
        }
    }
}

impl Settings {
    /// Load settings from a path. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings, reporting a broken file and falling back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from_path(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring settings file");
                Self::default()
            }
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Session defaults with this file's overrides applied.
    ///
    /// Empty suggestion lists are ignored so there is always something to pick.
    pub fn to_session_defaults(&self) -> SessionDefaults {
        let mut defaults = SessionDefaults {
            welcome_delay: Duration::from_millis(self.welcome_delay_ms),
            ..SessionDefaults::default()
        };

        if let Some(text) = &self.welcome_message {
            defaults.welcome_message = text.clone();
        }
        if let Some(text) = &self.error_message {
            defaults.error_message = text.clone();
        }
        if let Some(list) = self.starter_suggestions.as_ref().filter(|l| !l.is_empty()) {
            defaults.starter_suggestions = list.clone();
        }
        if let Some(list) = self.fallback_suggestions.as_ref().filter(|l| !l.is_empty()) {
            defaults.fallback_suggestions = list.clone();
        }

        defaults
    }
}
