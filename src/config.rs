use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: Option<DbConfig>,
    #[serde(default)]
    pub poller: Option<PollerConfig>,
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Capacity of the in-memory sensor reading buffer
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,
    /// Directory for the writable JSON files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory holding bundled seed files, read when the writable copy is missing
    #[serde(default)]
    pub seed_dir: Option<PathBuf>,
    /// Mirror accepted sensor readings into `sensor-readings.json`
    #[serde(default = "default_true")]
    pub sensor_file: bool,
    #[serde(default = "default_feedback_capacity")]
    pub feedback_capacity: usize,
    #[serde(default = "default_login_log_capacity")]
    pub login_log_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            memory_capacity: default_memory_capacity(),
            data_dir: default_data_dir(),
            seed_dir: None,
            sensor_file: true,
            feedback_capacity: default_feedback_capacity(),
            login_log_capacity: default_login_log_capacity(),
        }
    }
}

fn default_memory_capacity() -> usize {
    1000
}

fn default_data_dir() -> PathBuf {
    std::env::temp_dir().join("solar-monitor")
}

fn default_true() -> bool {
    true
}

fn default_feedback_capacity() -> usize {
    200
}

fn default_login_log_capacity() -> usize {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Full URL of the "latest readings" endpoint
    pub url: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_poll_limit")]
    pub limit: usize,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Disconnect a channel after this many polling intervals without an update.
    /// Unset keeps channels connected until an explicit disconnect.
    #[serde(default)]
    pub stale_after_missed_polls: Option<u32>,
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn stale_after(&self) -> Option<Duration> {
        self.stale_after_missed_polls
            .map(|k| self.interval() * k)
    }
}

fn default_interval_ms() -> u64 {
    3000
}

fn default_poll_limit() -> usize {
    20
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_cities")]
    pub cities: Vec<City>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            forecast_days: default_forecast_days(),
            timeout_ms: default_timeout_ms(),
            cities: default_cities(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

fn default_weather_url() -> String {
    "https://api.open-meteo.com/v1/forecast".into()
}

fn default_forecast_days() -> u8 {
    7
}

fn default_cities() -> Vec<City> {
    vec![
        City {
            name: "Fes".into(),
            latitude: 34.0331,
            longitude: -5.0003,
        },
        City {
            name: "Taza".into(),
            latitude: 34.21,
            longitude: -4.01,
        },
        City {
            name: "Rabat".into(),
            latitude: 34.0209,
            longitude: -6.8416,
        },
    ]
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    /// Afterwards, if DATABASE_URL env is set, override `database.url`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, anyhow::Error> {
        let expanded = expand_env_placeholders(raw)?;
        let mut cfg: Self = serde_yaml::from_str(&expanded)?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            match cfg.database {
                Some(ref mut db) => db.url = url,
                None => {
                    cfg.database = Some(DbConfig {
                        url,
                        max_connections: default_max_connections(),
                    })
                }
            }
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        anyhow::ensure!(self.server.port != 0, "server.port cannot be 0");
        anyhow::ensure!(
            self.storage.memory_capacity > 0,
            "storage.memory_capacity must be at least 1"
        );
        anyhow::ensure!(
            self.storage.feedback_capacity > 0 && self.storage.login_log_capacity > 0,
            "storage capacities must be at least 1"
        );
        if let Some(poller) = &self.poller {
            anyhow::ensure!(!poller.url.is_empty(), "poller.url cannot be empty");
            anyhow::ensure!(poller.interval_ms > 0, "poller.interval_ms must be positive");
            anyhow::ensure!(
                (1..=500).contains(&poller.limit),
                "poller.limit must be between 1 and 500"
            );
            anyhow::ensure!(
                poller.stale_after_missed_polls != Some(0),
                "poller.stale_after_missed_polls must be at least 1"
            );
        }
        anyhow::ensure!(
            (1..=16).contains(&self.weather.forecast_days),
            "weather.forecast_days must be between 1 and 16"
        );
        Ok(())
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
/// "$$" becomes a literal "$".
fn expand_env_placeholders(input: &str) -> Result<String, anyhow::Error> {
    use anyhow::Context;

    let mut out = String::with_capacity(input.len());
    let mut it = input.chars().peekable();

    while let Some(c) = it.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let close = match it.peek().copied() {
            Some('$') => {
                it.next();
                out.push('$');
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                continue;
            }
        };
        it.next();
        let var = read_until(&mut it, close)
            .with_context(|| format!("unterminated env placeholder: missing '{}'", close))?;
        let val = std::env::var(&var)
            .with_context(|| format!("missing environment variable: {}", var))?;
        out.push_str(&val);
    }

    Ok(out)
}

fn read_until<I>(it: &mut std::iter::Peekable<I>, end: char) -> Option<String>
where
    I: Iterator<Item = char>,
{
    let mut buf = String::new();
    for ch in it.by_ref() {
        if ch == end {
            return Some(buf);
        }
        buf.push(ch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_from_empty_document() {
        std::env::remove_var("DATABASE_URL");
        let cfg = Config::from_yaml("{}").unwrap();

        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.storage.memory_capacity, 1000);
        assert_eq!(cfg.storage.feedback_capacity, 200);
        assert_eq!(cfg.storage.login_log_capacity, 500);
        assert!(cfg.database.is_none());
        assert!(cfg.poller.is_none());
        assert_eq!(cfg.weather.cities.len(), 3);
        assert_eq!(cfg.weather.cities[0].name, "Fes");
    }

    #[test]
    #[serial]
    fn test_poller_section() {
        std::env::remove_var("DATABASE_URL");
        let cfg = Config::from_yaml(
            r#"
poller:
  url: "http://localhost:3000/api/v1/sensor-data"
  interval_ms: 5000
  stale_after_missed_polls: 3
"#,
        )
        .unwrap();

        let poller = cfg.poller.unwrap();
        assert_eq!(poller.limit, 20);
        assert_eq!(poller.interval(), Duration::from_secs(5));
        assert_eq!(poller.stale_after(), Some(Duration::from_secs(15)));
    }

    #[test]
    #[serial]
    fn test_placeholder_expansion() {
        std::env::remove_var("DATABASE_URL");
        std::env::set_var("SOLAR_TEST_PORT", "8123");
        let cfg = Config::from_yaml("server:\n  port: ${SOLAR_TEST_PORT}\n").unwrap();
        assert_eq!(cfg.server.port, 8123);
        std::env::remove_var("SOLAR_TEST_PORT");
    }

    #[test]
    fn test_missing_placeholder_is_an_error() {
        let err = expand_env_placeholders("url: $(SOLAR_DEFINITELY_UNSET_VAR)").unwrap_err();
        assert!(err.to_string().contains("SOLAR_DEFINITELY_UNSET_VAR"));
    }

    #[test]
    fn test_dollar_escape_and_plain_dollar() {
        let out = expand_env_placeholders("a: $$5\nb: $.path").unwrap();
        assert_eq!(out, "a: $5\nb: $.path");
    }

    #[test]
    #[serial]
    fn test_database_url_env_override() {
        let previous = std::env::var("DATABASE_URL").ok();
        std::env::set_var("DATABASE_URL", "postgres://override/solar");

        let cfg = Config::from_yaml("database:\n  url: postgres://default/solar\n").unwrap();
        assert_eq!(cfg.database.unwrap().url, "postgres://override/solar");

        match previous {
            Some(val) => std::env::set_var("DATABASE_URL", val),
            None => std::env::remove_var("DATABASE_URL"),
        }
    }

    #[test]
    #[serial]
    fn test_rejects_zero_capacity() {
        std::env::remove_var("DATABASE_URL");
        let err = Config::from_yaml("storage:\n  memory_capacity: 0\n").unwrap_err();
        assert!(err.to_string().contains("memory_capacity"));
    }
}
