use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_poll_interval() -> u64 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub webserver: WebServerConfig,
    #[serde(default)]
    pub dht22: Vec<SensorConfig>,
    #[serde(default)]
    pub ds18b20: Vec<Ds18b20Config>,
    #[serde(default)]
    pub relay: Vec<RelayConfig>,
    /// Seconds between read passes over the sensors.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

/// Presentation-layer knobs. Parsed here, consumed by the web frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebServerConfig {
    pub http_port: u16,
    pub http_address: String,
}

/// One temperature/humidity probe to register before the cycle starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub pin: u32,
    pub name: String,
    pub location: String,
}

/// One 1-Wire temperature probe, addressed by bus id. Parsed here, consumed
/// by the 1-Wire layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ds18b20Config {
    pub id: String,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub name: String,
    pub location: String,
    /// State the relay is driven to at startup.
    #[serde(default)]
    pub default: bool,
}

impl Config {
    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Template configuration printed by `--show-config-example`.
    pub fn example() -> Self {
        Self {
            webserver: WebServerConfig {
                http_port: 8080,
                http_address: "0.0.0.0".to_string(),
            },
            dht22: vec![SensorConfig {
                pin: 4,
                name: "Living Room".to_string(),
                location: "Home".to_string(),
            }],
            ds18b20: vec![Ds18b20Config {
                id: "28-000005e2a3c1".to_string(),
                name: "Bedroom".to_string(),
                location: "Home".to_string(),
            }],
            relay: vec![RelayConfig {
                name: "Light".to_string(),
                location: "Living Room".to_string(),
                default: true,
            }],
            poll_interval_secs: default_poll_interval(),
        }
    }

    pub fn example_json() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::example())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_round_trips_through_json() {
        let rendered = Config::example_json().unwrap();
        let parsed: Config = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.webserver.http_port, 8080);
        assert_eq!(parsed.dht22.len(), 1);
        assert_eq!(parsed.dht22[0].pin, 4);
        assert_eq!(parsed.dht22[0].name, "Living Room");
        assert_eq!(parsed.ds18b20[0].id, "28-000005e2a3c1");
        assert_eq!(parsed.ds18b20[0].name, "Bedroom");
        assert_eq!(parsed.relay[0].name, "Light");
        assert!(parsed.relay[0].default);
        assert_eq!(parsed.poll_interval_secs, 15);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = serde_json::from_str(
            r#"{"webserver": {"http_port": 9000, "http_address": "127.0.0.1"}}"#,
        )
        .unwrap();
        assert!(parsed.dht22.is_empty());
        assert!(parsed.ds18b20.is_empty());
        assert!(parsed.relay.is_empty());
        assert_eq!(parsed.poll_interval_secs, 15);
    }

    #[test]
    fn load_reads_a_file_from_disk() {
        let path = std::env::temp_dir().join("tentbox-config-test.json");
        fs::write(&path, Config::example_json().unwrap()).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.dht22[0].location, "Home");
        fs::remove_file(&path).ok();
    }
}
