//! Startup configuration for duprev.
//!
//! Reads `~/.config/duprev/config.toml` once before the terminal is
//! initialized. Every key is optional and every failure is soft: a missing or
//! unparseable file falls back to defaults so the app always starts. Parse
//! errors are printed to stderr, which is safe because `load()` runs before
//! raw mode is entered.

use serde::Deserialize;

/// Contents of `config.toml`. Missing keys take their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the dedup backend, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Theme name passed to `Theme::from_name`.
    pub theme: String,
    /// Scan status poll interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_owned(),
            theme: "catppuccin-mocha".to_owned(),
            poll_interval_ms: 1500,
        }
    }
}

/// Returns the path to the duprev config file.
///
/// Prefers `$XDG_CONFIG_HOME/duprev/config.toml`; falls back to
/// `~/.config/duprev/config.toml` when the env var is absent.
fn config_path() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| std::path::PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| std::path::PathBuf::from(".config"));
    base.join("duprev").join("config.toml")
}

/// Loads the config file, falling back to defaults on any error.
///
/// `DUPREV_BASE_URL` overrides the file's `base_url`, which makes one-off runs
/// against a different backend possible without editing the file.
pub fn load() -> Config {
    let path = config_path();
    let mut config = match std::fs::read_to_string(&path) {
        Ok(raw) => match toml::from_str(&raw) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("duprev: config parse error in {:?}: {}", path, e);
                Config::default()
            }
        },
        Err(_) => Config::default(),
    };
    if let Ok(url) = std::env::var("DUPREV_BASE_URL") {
        if !url.is_empty() {
            config.base_url = url;
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str("theme = \"dark\"").unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.poll_interval_ms, 1500);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: Config = toml::from_str("legacy_option = true").unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
    }
}
