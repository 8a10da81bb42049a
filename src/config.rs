// Persistent configuration: serial port name and baud rate.
// Stored as JSON in <config_dir>/pushlink/config.json

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default serial device path when nothing has been configured yet.
pub const DEFAULT_PORT_NAME: &str = "/dev/serial0";
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port_name: String,
    pub baud_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port_name: DEFAULT_PORT_NAME.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

impl Config {
    /// Path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|d| d.join("config.json"))
    }

    /// Load config from disk, falling back to defaults if missing,
    /// unreadable, or not valid JSON.
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("config at {} is not valid JSON: {e}", path.display());
                Self::default()
            }),
            Err(e) => {
                log::warn!("cannot read config at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save config to disk, creating the config directory if needed.
    pub fn save(&self) {
        let path = match Self::config_path() {
            Some(p) => p,
            None => return,
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    log::warn!("cannot save config to {}: {e}", path.display());
                } else {
                    log::info!("config saved to {}", path.display());
                }
            }
            Err(e) => log::warn!("cannot serialize config: {e}"),
        }
    }
}

fn config_dir() -> Option<PathBuf> {
    // macOS:   ~/Library/Application Support/pushlink/
    // Linux:   ~/.config/pushlink/
    // Windows: %APPDATA%/pushlink/

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").ok()?;
        Some(
            PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("pushlink"),
        )
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").ok()?;
        Some(PathBuf::from(appdata).join("pushlink"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let home = std::env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".config").join("pushlink"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.port_name, DEFAULT_PORT_NAME);
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
    }

    #[test]
    fn missing_fields_in_json_fall_back_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
    }

    #[test]
    fn round_trips_through_json() {
        let config = Config { port_name: "/dev/ttyACM0".into(), baud_rate: 9600 };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.port_name, "/dev/ttyACM0");
        assert_eq!(parsed.baud_rate, 9600);
    }
}
