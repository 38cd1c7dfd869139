//! JSON run configuration.
//!
//! One file describes the wiring and the delivery endpoint. Only the
//! external temperature section is mandatory; the LED, light sensor, and
//! API sections are optional and their absence disables the feature.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::defaults;
use crate::readers::photoresistor::RcTiming;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("could not parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub led: Option<LedConfig>,
    #[serde(default)]
    pub internal: InternalConfig,
    pub temperature: TemperatureConfig,
    pub light: Option<LightConfig>,
    pub api: Option<ApiConfig>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        fs::read_to_string(path)?.parse()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(raw).map_err(Into::into)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LedConfig {
    pub pin: u8,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InternalConfig {
    #[serde(default = "default_thermal_zone_file")]
    pub file: PathBuf,
}

impl Default for InternalConfig {
    fn default() -> Self {
        Self {
            file: default_thermal_zone_file(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "sensor", rename_all = "snake_case")]
pub enum TemperatureConfig {
    Dht22 {
        pin: u8,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    Ds18b20 {
        #[serde(default)]
        file: Option<PathBuf>,
        #[serde(default = "default_ds18b20_timeout")]
        timeout: f64,
        #[serde(default = "default_ds18b20_wait")]
        wait: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

impl TemperatureConfig {
    /// Whether this sensor needs direct GPIO access (the DS18B20 goes
    /// through the kernel 1-wire interface instead).
    pub fn needs_gpio(&self) -> bool {
        matches!(self, TemperatureConfig::Dht22 { .. })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LightConfig {
    /// Charging and sensing BCM pins, in that order.
    pub pins: [u8; 2],
    /// Capacitance in microfarads.
    pub capacitance: f64,
    /// Known series resistance in ohms.
    pub resistance: f64,
    #[serde(default = "default_voltage")]
    pub voltage: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_light_timeout")]
    pub timeout: f64,
}

impl LightConfig {
    pub fn rc_timing(&self) -> RcTiming {
        RcTiming {
            capacitance_uf: self.capacitance,
            resistance_ohm: self.resistance,
            voltage: self.voltage,
            samples: self.samples,
            timeout: Duration::from_secs_f64(self.timeout),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub endpoint: String,
    pub api_key: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_api_timeout")]
    pub timeout: u64,
    #[serde(default = "default_api_max_retries")]
    pub max_retries: u32,
}

fn default_thermal_zone_file() -> PathBuf {
    PathBuf::from(defaults::THERMAL_ZONE_FILE)
}

fn default_tolerance() -> f64 {
    defaults::DHT_TOLERANCE_CELSIUS
}

fn default_threshold() -> f64 {
    defaults::TEMP_WARN_THRESHOLD_CELSIUS
}

fn default_ds18b20_timeout() -> f64 {
    defaults::DS18B20_TIMEOUT_SECONDS
}

fn default_ds18b20_wait() -> f64 {
    defaults::DS18B20_POLL_INTERVAL_SECONDS
}

fn default_voltage() -> f64 {
    defaults::LIGHT_VOLTAGE
}

fn default_samples() -> usize {
    defaults::LIGHT_SAMPLES
}

fn default_light_timeout() -> f64 {
    defaults::LIGHT_TIMEOUT_SECONDS
}

fn default_api_timeout() -> u64 {
    defaults::API_REQUEST_TIMEOUT_SECONDS
}

fn default_api_max_retries() -> u32 {
    defaults::API_MAX_RETRIES
}
