//! XDG Base Directory support.

use std::path::PathBuf;

const APP_DIR: &str = "giftchat";
const SETTINGS_FILE: &str = "settings.json";

/// XDG directory paths for Giftchat.
pub struct XdgDirs {
    /// Config directory (~/.config/giftchat or XDG_CONFIG_HOME/giftchat)
    pub config: PathBuf,
}

impl XdgDirs {
    /// Get XDG directories, respecting environment variables.
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            config: std::env::var("XDG_CONFIG_HOME")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| home.join(".config"))
                .join(APP_DIR),
        }
    }

    /// Ensure the config directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)
    }

    /// Default settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.config.join(SETTINGS_FILE)
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
