//! Analog input channel backed by an IIO sysfs file.
//!
//! The MCP3002/3004/3008 device-tree overlay exposes each channel as a text
//! file under `/sys/bus/iio/devices/iio:deviceN/`. Single-ended channels are
//! `in_voltageP_raw`, differential pairs are `in_voltageP-voltageM_raw`.
//!
//! [`AnalogIn`] resolves that path once, checks it exists, and afterwards
//! re-reads the file on every access. No file handle is kept open and no value
//! is cached, so each call reflects the driver's state at that instant.
//!
//! # Clamping
//!
//! The driver is 10-bit, so raw codes nominally fall in `[0, 1023]`. Bounding
//! is the driver's responsibility: out-of-range raw codes pass straight through
//! [`AnalogIn::scaled_value`] and [`AnalogIn::voltage`].
//!
//! # Example
//!
//! ```no_run
//! use iio_adc::{AnalogIn, ChannelConfig};
//!
//! # fn example() -> iio_adc::Result<()> {
//! let ai = AnalogIn::new(ChannelConfig::default().positive_pin(2))?;
//! println!("raw={} volts={:.3}", ai.raw_value()?, ai.voltage()?);
//!
//! let diff = AnalogIn::new(ChannelConfig::default().positive_pin(0).differential(1))?;
//! println!("ch0-ch1: {}", diff.scaled_value()?);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{AdcError, Result};

/// Conventional sysfs location of IIO devices.
pub const DEFAULT_IIO_ROOT: &str = "/sys/bus/iio/devices";

/// Largest nominal raw code of the 10-bit converter.
pub const RAW_MAX: i64 = 1023;

/// Largest nominal value returned by [`AnalogIn::scaled_value`].
pub const SCALED_MAX: i64 = 65535;

/// Channel selection and reference voltage for an [`AnalogIn`].
///
/// None of these values are range-checked. The only validation happens when
/// the resolved channel file is looked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// IIO device instance (`iio:deviceN`)
    pub device_index: u32,
    /// Supply/reference voltage of the ADC (Vin)
    pub reference_voltage: f64,
    /// High input channel
    pub positive_pin: u32,
    /// Low input channel for differential reads, `None` for single-ended
    pub negative_pin: Option<u32>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            device_index: 1,
            reference_voltage: 3.3,
            positive_pin: 0,
            negative_pin: None,
        }
    }
}

impl ChannelConfig {
    /// Set the IIO device index.
    pub fn device_index(mut self, device_index: u32) -> Self {
        self.device_index = device_index;
        self
    }

    /// Set the reference voltage used by [`AnalogIn::voltage`].
    pub fn reference_voltage(mut self, reference_voltage: f64) -> Self {
        self.reference_voltage = reference_voltage;
        self
    }

    /// Set the positive (or only) input pin.
    pub fn positive_pin(mut self, positive_pin: u32) -> Self {
        self.positive_pin = positive_pin;
        self
    }

    /// Read differentially against `negative_pin`.
    pub fn differential(mut self, negative_pin: u32) -> Self {
        self.negative_pin = Some(negative_pin);
        self
    }

    /// Set the negative pin using the `-1` convention of the sysfs overlay
    /// tooling: any negative value selects single-ended mode.
    pub fn negative_pin_sentinel(mut self, negative_pin: i32) -> Self {
        self.negative_pin = u32::try_from(negative_pin).ok();
        self
    }

    /// Whether this selects a differential pin pair.
    pub fn is_differential(&self) -> bool {
        self.negative_pin.is_some()
    }

    /// Name of the channel file inside the device directory.
    pub fn file_name(&self) -> String {
        match self.negative_pin {
            Some(negative) => format!(
                "in_voltage{}-voltage{}_raw",
                self.positive_pin, negative
            ),
            None => format!("in_voltage{}_raw", self.positive_pin),
        }
    }

    /// Resolve the channel file path below an IIO root directory.
    pub fn path_in(&self, root: impl AsRef<Path>) -> PathBuf {
        root.as_ref()
            .join(format!("iio:device{}", self.device_index))
            .join(self.file_name())
    }
}

/// One consistent set of values derived from a single raw read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Raw code as reported by the driver
    pub raw: i64,
    /// Raw code widened to the 16-bit range
    pub scaled: i64,
    /// Raw code converted to volts
    pub voltage: f64,
}

/// Read-only analog input backed by an IIO channel file.
#[derive(Debug, Clone)]
pub struct AnalogIn {
    config: ChannelConfig,
    path: PathBuf,
}

impl AnalogIn {
    /// Open a channel below [`DEFAULT_IIO_ROOT`].
    pub fn new(config: ChannelConfig) -> Result<Self> {
        Self::with_root(DEFAULT_IIO_ROOT, config)
    }

    /// Open a channel below a custom IIO root directory.
    ///
    /// Fails with [`AdcError::ResourceNotFound`] if the resolved channel file
    /// does not exist. This is the only check ever made; later removal of the
    /// file surfaces as [`AdcError::ResourceUnavailable`] on read.
    pub fn with_root(root: impl AsRef<Path>, config: ChannelConfig) -> Result<Self> {
        let path = config.path_in(root);

        // try_exists errors (e.g. EACCES on a parent) count as missing
        if !path.try_exists().unwrap_or(false) {
            return Err(AdcError::ResourceNotFound { path });
        }

        debug!(
            path = %path.display(),
            device_index = config.device_index,
            positive_pin = config.positive_pin,
            negative_pin = ?config.negative_pin,
            reference_voltage = config.reference_voltage,
            "Created analog input"
        );

        Ok(Self { config, path })
    }

    /// Resolved channel file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Channel configuration this input was created with.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// IIO device index.
    pub fn device_index(&self) -> u32 {
        self.config.device_index
    }

    /// Reference voltage in volts.
    pub fn reference_voltage(&self) -> f64 {
        self.config.reference_voltage
    }

    /// Positive input pin.
    pub fn positive_pin(&self) -> u32 {
        self.config.positive_pin
    }

    /// Negative input pin, if differential.
    pub fn negative_pin(&self) -> Option<u32> {
        self.config.negative_pin
    }

    /// Whether this is a differential channel.
    pub fn is_differential(&self) -> bool {
        self.config.is_differential()
    }

    /// Read the raw ADC code.
    ///
    /// Nominally in `[0, 1023]`, but whatever integer the driver reports is
    /// returned as is, including negative values.
    pub fn raw_value(&self) -> Result<i64> {
        let contents =
            fs::read_to_string(&self.path).map_err(|source| AdcError::ResourceUnavailable {
                path: self.path.clone(),
                source,
            })?;

        let raw = contents
            .trim()
            .parse::<i64>()
            .map_err(|source| AdcError::ParseError {
                path: self.path.clone(),
                contents: contents.clone(),
                source,
            })?;

        trace!(path = %self.path.display(), raw, "Read raw value");
        Ok(raw)
    }

    /// Read the value widened from 10 to 16 bits, nominally `[0, 65535]`.
    pub fn scaled_value(&self) -> Result<i64> {
        Ok(raw_to_scaled(self.raw_value()?))
    }

    /// Read the input voltage, nominally `[0, reference_voltage]`.
    pub fn voltage(&self) -> Result<f64> {
        Ok(raw_to_voltage(self.raw_value()?, self.config.reference_voltage))
    }

    /// Read once and derive all three representations from that sample.
    pub fn read(&self) -> Result<Reading> {
        let raw = self.raw_value()?;
        Ok(Reading {
            raw,
            scaled: raw_to_scaled(raw),
            voltage: raw_to_voltage(raw, self.config.reference_voltage),
        })
    }
}

/// Widen a raw code to the 16-bit range, truncating toward zero.
pub fn raw_to_scaled(raw: i64) -> i64 {
    ((raw as f64 / RAW_MAX as f64) * SCALED_MAX as f64) as i64
}

/// Convert a raw code to volts for the given reference voltage.
pub fn raw_to_voltage(raw: i64, reference_voltage: f64) -> f64 {
    (raw as f64 * reference_voltage) / RAW_MAX as f64
}
