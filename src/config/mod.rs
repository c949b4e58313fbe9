//! Configuration management.

mod settings;
mod xdg;

pub use settings::{Settings, SettingsError, DEFAULT_ENDPOINT};
pub use xdg::XdgDirs;
