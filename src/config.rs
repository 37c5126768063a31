//! Configuration loading using Figment
//!
//! Configuration is loaded from:
//! 1. a TOML file (base configuration)
//! 2. Environment variables (prefixed with `IIO_ADC_`)
//!
//! # Example configuration
//!
//! ```toml
//! iio_root = "/sys/bus/iio/devices"
//!
//! [application]
//! log_level = "info"
//!
//! [[channels]]
//! id = "supply"
//! device_index = 1
//! reference_voltage = 3.3
//! positive_pin = 0
//!
//! [[channels]]
//! id = "bridge"
//! positive_pin = 2
//! negative_pin = 3
//! ```

use figment::{
    providers::{Env, Format, Toml},
    value::{Uncased, UncasedStr},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use crate::analog_in::{ChannelConfig, DEFAULT_IIO_ROOT};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/iio_adc.toml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdcConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Root of the IIO device tree
    #[serde(default = "default_iio_root")]
    pub iio_root: PathBuf,
    /// Channel definitions
    #[serde(default)]
    pub channels: Vec<ChannelDefinition>,
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// A named analog channel in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelDefinition {
    /// Unique channel identifier
    pub id: String,
    /// Whether this channel is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// IIO device index
    #[serde(default = "default_device_index")]
    pub device_index: u32,
    /// Reference voltage (Vin)
    #[serde(default = "default_reference_voltage")]
    pub reference_voltage: f64,
    /// Positive input pin
    #[serde(default)]
    pub positive_pin: u32,
    /// Differential partner; omitted or negative means single-ended
    #[serde(default, deserialize_with = "deserialize_negative_pin")]
    pub negative_pin: Option<u32>,
}

impl ChannelDefinition {
    /// Channel selection for building an [`AnalogIn`](crate::AnalogIn).
    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            device_index: self.device_index,
            reference_voltage: self.reference_voltage,
            positive_pin: self.positive_pin,
            negative_pin: self.negative_pin,
        }
    }
}

// Default value functions
fn default_iio_root() -> PathBuf {
    PathBuf::from(DEFAULT_IIO_ROOT)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_device_index() -> u32 {
    ChannelConfig::default().device_index
}

fn default_reference_voltage() -> f64 {
    ChannelConfig::default().reference_voltage
}

/// Map a prefix-stripped env key (original case) to a config path.
///
/// `IIO_ROOT` is a top-level key containing an underscore; every other key
/// splits on its first underscore (`APPLICATION_LOG_LEVEL` is
/// `application.log_level`).
fn env_key(key: &UncasedStr) -> Uncased<'_> {
    let key = key.as_str().to_ascii_lowercase();
    if key == "iio_root" {
        Uncased::from(key)
    } else {
        Uncased::from(key.replacen('_', ".", 1))
    }
}

/// Accept the `-1` "no negative pin" convention alongside omission.
fn deserialize_negative_pin<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let pin = Option::<i64>::deserialize(deserializer)?;
    match pin {
        Some(pin) if pin >= 0 => u32::try_from(pin)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("negative_pin {} is too large", pin))),
        _ => Ok(None),
    }
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            iio_root: default_iio_root(),
            channels: Vec::new(),
        }
    }
}

impl AdcConfig {
    /// Load configuration from [`DEFAULT_CONFIG_PATH`] and environment variables
    ///
    /// Environment variables can override configuration with prefix `IIO_ADC_`.
    /// Example: `IIO_ADC_IIO_ROOT=/tmp/fake-iio`
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment<P: AsRef<Path>>(path: P) -> Figment {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("IIO_ADC_").map(env_key))
    }

    /// Validate configuration after loading
    ///
    /// Channel numbers and reference voltages are not range-checked; a wrong
    /// value shows up as a missing channel file when the channel is opened.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level = self.application.log_level.to_lowercase();
        if !valid_levels.contains(&level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            ));
        }

        let mut ids = std::collections::HashSet::new();
        for channel in &self.channels {
            if channel.id.trim().is_empty() {
                return Err("Channel ID must not be empty".to_string());
            }
            if !ids.insert(&channel.id) {
                return Err(format!("Duplicate channel ID: {}", channel.id));
            }
        }

        Ok(())
    }

    /// Get all enabled channels
    pub fn enabled_channels(&self) -> Vec<&ChannelDefinition> {
        self.channels.iter().filter(|ch| ch.enabled).collect()
    }
}
