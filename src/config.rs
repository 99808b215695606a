use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use tracing::Level;

use crate::error::ConfigError;

/// Shared secret and Windy station index for one registered station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationCredential {
    pub key: String,
    pub windy_index: u32,
}

/// Process-wide configuration, built once at startup and passed into the
/// handler. Stations are keyed by normalized nickname so registering a new
/// station is a configuration change only.
#[derive(Debug, Clone)]
pub struct Config {
    pub windy_api_key: String,
    pub log_level: Level,
    stations: HashMap<String, StationCredential>,
}

impl Config {
    pub fn new(
        windy_api_key: String,
        stations: HashMap<String, StationCredential>,
        log_level: Level,
    ) -> Self {
        let stations = stations
            .into_iter()
            .map(|(nickname, credential)| (normalize_station_id(&nickname), credential))
            .collect();
        Config { windy_api_key, log_level, stations }
    }

    /// Reads `WINDY_API_KEY`, `STATIONS` and `LOG_LEVEL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let windy_api_key = env::var("WINDY_API_KEY")
            .map_err(|_| ConfigError(String::from("WINDY_API_KEY environment variable not set")))?;
        let stations = parse_stations(
            &env::var("STATIONS")
                .map_err(|_| ConfigError(String::from("STATIONS environment variable not set")))?,
        )?;
        let log_level = match env::var("LOG_LEVEL") {
            Ok(raw) => Level::from_str(&raw)
                .map_err(|_| ConfigError(format!("unknown LOG_LEVEL '{}'", raw)))?,
            Err(_) => Level::INFO,
        };
        Ok(Config { windy_api_key, log_level, stations })
    }

    pub fn station(&self, station_id: &str) -> Option<&StationCredential> {
        self.stations.get(&normalize_station_id(station_id))
    }
}

/// Station ids match regardless of case and punctuation, so the nickname a
/// station reports ("Olliver Home") finds the configured entry
/// ("olliverhome").
fn normalize_station_id(station_id: &str) -> String {
    station_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Parses `nickname:windy_index:key` entries separated by commas.
fn parse_stations(raw: &str) -> Result<HashMap<String, StationCredential>, ConfigError> {
    let mut stations = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let mut parts = entry.splitn(3, ':');
        let (nickname, index, key) = match (parts.next(), parts.next(), parts.next()) {
            (Some(nickname), Some(index), Some(key))
                if !nickname.is_empty() && !key.is_empty() =>
            {
                (nickname, index, key)
            }
            _ => {
                return Err(ConfigError(format!(
                    "malformed STATIONS entry '{}', expected nickname:windy_index:key",
                    entry
                )))
            }
        };
        let windy_index = index.parse::<u32>().map_err(|_| {
            ConfigError(format!("station '{}' has non-numeric windy index '{}'", nickname, index))
        })?;
        stations.insert(
            normalize_station_id(nickname),
            StationCredential { key: key.to_string(), windy_index },
        );
    }
    if stations.is_empty() {
        return Err(ConfigError(String::from("STATIONS contains no station entries")));
    }
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_station_entries() {
        let stations = parse_stations("olliverhome:0:sekrit, lizardhubs:1:hunter2").unwrap();
        assert_eq!(
            stations.get("olliverhome"),
            Some(&StationCredential { key: String::from("sekrit"), windy_index: 0 })
        );
        assert_eq!(
            stations.get("lizardhubs"),
            Some(&StationCredential { key: String::from("hunter2"), windy_index: 1 })
        );
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(parse_stations("").is_err());
        assert!(parse_stations("olliverhome").is_err());
        assert!(parse_stations("olliverhome:zero:sekrit").is_err());
        assert!(parse_stations(":0:sekrit").is_err());
    }

    #[test]
    fn lookup_normalizes_nicknames() {
        let config = Config::new(
            String::from("api-key"),
            HashMap::from([(
                String::from("olliverhome"),
                StationCredential { key: String::from("sekrit"), windy_index: 0 },
            )]),
            Level::INFO,
        );
        assert!(config.station("Olliver Home").is_some());
        assert!(config.station("OLLIVER-HOME").is_some());
        assert!(config.station("lizardhubs").is_none());
    }
}
