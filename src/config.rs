//! Configuration management.
//!
//! Settings come from an optional TOML file (`--config`, or
//! `brandscout.toml` in the working directory) with serde defaults for
//! every key, so a missing file simply means defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fetch::assets::HttpSettings;
use crate::fetch::browser::BrowserSettings;

/// Name of the settings file searched for in the working directory.
pub const SETTINGS_FILE: &str = "brandscout.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub browser: BrowserSettings,

    #[serde(default)]
    pub http: HttpSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Load settings from an explicit path, the working directory, or defaults.
///
/// An explicitly passed path must exist; the auto-discovered file is
/// optional.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => {
            let local = Path::new(SETTINGS_FILE);
            local.exists().then(|| local.to_path_buf())
        }
    };

    match path {
        Some(path) => {
            let raw = fs::read_to_string(&path)?;
            let settings = toml::from_str(&raw)?;
            tracing::debug!("Loaded settings from {}", path.display());
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert!(settings.browser.headless);
        assert_eq!(settings.browser.navigation_timeout_secs, 30);
        assert_eq!(settings.browser.ready_timeout_secs, 15);
        assert_eq!(settings.http.timeout_secs, 20);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            port = 9090

            [browser]
            headless = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9090);
        assert!(!settings.browser.headless);
        assert_eq!(settings.browser.navigation_timeout_secs, 30);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.server.port, 8080);
        assert!(settings.browser.chrome_args.is_empty());
    }
}
