//! Polling of every enabled channel in a configuration.
//!
//! Reads go through [`ReadableAnalogIn::sample`], so each channel is read on
//! the blocking pool and all printed values come from one raw sample. A
//! channel that fails (e.g. hot-unplugged) is reported and the pass moves on.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::analog_in::{AnalogIn, Reading};
use crate::config::AdcConfig;
use crate::hal::ReadableAnalogIn;

/// Outcome of reading one channel during a pass.
#[derive(Debug)]
pub struct ChannelSample {
    /// Channel identifier from configuration
    pub id: String,
    /// Reading, or the error that prevented it
    pub result: Result<Reading>,
}

impl ChannelSample {
    /// One output line for this sample.
    pub fn line(&self) -> String {
        match &self.result {
            Ok(reading) => format_reading(&self.id, reading),
            Err(e) => format!("{:<16} error: {:#}", self.id, e),
        }
    }
}

/// Format a reading as printed by the CLI.
pub fn format_reading(label: &str, reading: &Reading) -> String {
    format!(
        "{:<16} raw={:>5} scaled={:>6} voltage={:.4} V",
        label, reading.raw, reading.scaled, reading.voltage
    )
}

/// Set of opened channels polled together.
#[derive(Debug)]
pub struct Scanner {
    channels: Vec<(String, ReadableAnalogIn)>,
}

impl Scanner {
    /// Open every enabled channel below the configured IIO root.
    ///
    /// Fails on the first channel whose file does not exist.
    pub fn from_config(config: &AdcConfig) -> Result<Self> {
        let mut channels = Vec::new();
        for channel in config.enabled_channels() {
            let ai = AnalogIn::with_root(&config.iio_root, channel.channel_config())
                .with_context(|| format!("Failed to open channel '{}'", channel.id))?;
            channels.push((channel.id.clone(), ReadableAnalogIn::new(ai)));
        }

        info!(
            channels = channels.len(),
            root = %config.iio_root.display(),
            "Opened scan channels"
        );
        Ok(Self { channels })
    }

    /// Number of opened channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel is enabled.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Read every channel once, in configuration order.
    pub async fn pass(&self) -> Vec<ChannelSample> {
        let mut samples = Vec::with_capacity(self.channels.len());
        for (id, ai) in &self.channels {
            samples.push(ChannelSample {
                id: id.clone(),
                result: ai.sample().await,
            });
        }
        samples
    }

    /// Run `count` passes, `interval` apart.
    ///
    /// Successful readings go to `out`, failed channels to `err`. Only a
    /// failure to write output aborts the run.
    pub async fn run<O: Write, E: Write>(
        &self,
        count: u32,
        interval: Duration,
        out: &mut O,
        err: &mut E,
    ) -> Result<()> {
        for pass in 0..count {
            if pass > 0 {
                tokio::time::sleep(interval).await;
            }
            for sample in self.pass().await {
                match sample.result {
                    Ok(_) => writeln!(out, "{}", sample.line())?,
                    Err(_) => writeln!(err, "{}", sample.line())?,
                }
            }
        }
        Ok(())
    }
}
