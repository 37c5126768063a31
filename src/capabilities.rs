//! Hardware capability traits.
//!
//! Small async traits that let callers treat an analog channel like any other
//! scalar instrument. Each trait is `Send + Sync` and uses `anyhow::Result`.

use anyhow::Result;
use async_trait::async_trait;

/// Capability: Scalar Readout
///
/// Devices that produce single scalar values (voltmeters, ADC channels,
/// temperature sensors).
///
/// # Contract
/// - `read()` performs a fresh measurement and returns it
/// - Units are device-specific (document in implementation)
/// - No retry is performed on failure
#[async_trait]
pub trait Readable: Send + Sync {
    /// Read current value
    ///
    /// # Returns
    /// - Ok(value) on successful read
    /// - Err on hardware or parse error
    async fn read(&self) -> Result<f64>;
}
