//! # IIO ADC analog inputs
//!
//! Read-only access to analog channels that the Linux Industrial I/O (IIO)
//! subsystem exposes for an external 10-bit ADC (MCP3002/3004/3008 with the
//! matching device-tree overlay).
//!
//! ## Crate Structure
//!
//! - **`analog_in`**: [`AnalogIn`], the channel reader, and [`ChannelConfig`]
//!   for selecting single-ended or differential channels.
//! - **`error`**: [`AdcError`] covering missing, unreadable and unparsable
//!   channel files.
//! - **`capabilities`** / **`hal`**: the async [`Readable`] capability and its
//!   implementation for analog inputs.
//! - **`config`**: Figment-based loading of channel definitions.
//! - **`logging`**: `tracing-subscriber` setup for binaries.
//! - **`scan`**: polling every configured channel through the async wrapper.
//!
//! ## Example
//!
//! ```no_run
//! use iio_adc::{AnalogIn, ChannelConfig};
//!
//! # fn example() -> iio_adc::Result<()> {
//! let ai = AnalogIn::new(ChannelConfig::default().device_index(0).positive_pin(1))?;
//! let reading = ai.read()?;
//! println!("{} counts, {:.3} V", reading.raw, reading.voltage);
//! # Ok(())
//! # }
//! ```

pub mod analog_in;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod hal;
pub mod logging;
pub mod scan;

pub use analog_in::{
    raw_to_scaled, raw_to_voltage, AnalogIn, ChannelConfig, Reading, DEFAULT_IIO_ROOT, RAW_MAX,
    SCALED_MAX,
};
pub use capabilities::Readable;
pub use config::{AdcConfig, ChannelDefinition};
pub use error::{AdcError, Result};
pub use hal::{ReadMode, ReadableAnalogIn};
