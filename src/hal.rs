//! [`Readable`] implementation for IIO analog inputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use iio_adc::capabilities::Readable;
//! use iio_adc::hal::{ReadMode, ReadableAnalogIn};
//!
//! let ai = AnalogIn::new(ChannelConfig::default())?;
//! let readable = ReadableAnalogIn::new(ai).with_mode(ReadMode::Voltage);
//!
//! let voltage = readable.read().await?;
//! println!("Channel 0: {:.4} V", voltage);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analog_in::{AnalogIn, Reading};
use crate::capabilities::Readable;

/// Which representation [`ReadableAnalogIn::read`] reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Raw 10-bit code
    Raw,
    /// Code widened to 16 bits
    Scaled,
    /// Volts relative to the reference voltage
    #[default]
    Voltage,
}

impl ReadMode {
    /// Unit label for this mode.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Raw | Self::Scaled => "counts",
            Self::Voltage => "V",
        }
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Scaled => write!(f, "scaled"),
            Self::Voltage => write!(f, "voltage"),
        }
    }
}

impl FromStr for ReadMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "scaled" => Ok(Self::Scaled),
            "voltage" => Ok(Self::Voltage),
            _ => anyhow::bail!(
                "Invalid read mode '{}'. Must be one of: raw, scaled, voltage",
                s
            ),
        }
    }
}

/// A wrapper that implements [`Readable`] for an IIO analog input.
///
/// Sysfs reads block, so each read runs on the blocking thread pool.
#[derive(Clone)]
pub struct ReadableAnalogIn {
    inner: Arc<AnalogIn>,
    mode: ReadMode,
}

impl ReadableAnalogIn {
    /// Create a wrapper reporting volts.
    pub fn new(inner: AnalogIn) -> Self {
        Self {
            inner: Arc::new(inner),
            mode: ReadMode::default(),
        }
    }

    /// Report a different representation.
    pub fn with_mode(mut self, mode: ReadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Get the read mode.
    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Get the underlying analog input.
    pub fn inner(&self) -> &AnalogIn {
        &self.inner
    }

    /// Read once on the blocking pool and derive every representation from
    /// that single sample, ignoring the read mode.
    pub async fn sample(&self) -> Result<Reading> {
        let inner = Arc::clone(&self.inner);

        tokio::task::spawn_blocking(move || inner.read())
            .await
            .context("Task join error")?
            .with_context(|| format!("Failed to read {}", self.inner.path().display()))
    }
}

#[async_trait]
impl Readable for ReadableAnalogIn {
    /// Read the configured representation from the channel.
    ///
    /// Raw and scaled codes are converted to `f64`, which is exact for
    /// magnitudes up to 2^53.
    async fn read(&self) -> Result<f64> {
        let inner = Arc::clone(&self.inner);
        let mode = self.mode;

        let value = tokio::task::spawn_blocking(move || match mode {
            ReadMode::Raw => inner.raw_value().map(|raw| raw as f64),
            ReadMode::Scaled => inner.scaled_value().map(|scaled| scaled as f64),
            ReadMode::Voltage => inner.voltage(),
        })
        .await
        .context("Task join error")?
        .with_context(|| format!("Failed to read {} from {}", mode, self.inner.path().display()))?;

        Ok(value)
    }
}

impl fmt::Debug for ReadableAnalogIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadableAnalogIn")
            .field("path", &self.inner.path())
            .field("mode", &self.mode)
            .finish()
    }
}
