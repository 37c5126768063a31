//! Analog input tests against a fake IIO sysfs tree.
//!
//! Each test builds `iio:deviceN/in_voltage*_raw` files inside a temporary
//! directory and points [`AnalogIn::with_root`] at it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use iio_adc::{AdcError, AnalogIn, ChannelConfig, Readable, ReadMode, ReadableAnalogIn};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Fake IIO root holding channel files.
struct FakeIio {
    dir: TempDir,
}

impl FakeIio {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create (or overwrite) the channel file for `config`.
    fn set(&self, config: &ChannelConfig, contents: &str) -> PathBuf {
        let path = config.path_in(self.root());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn open(&self, config: ChannelConfig, contents: &str) -> AnalogIn {
        self.set(&config, contents);
        AnalogIn::with_root(self.root(), config).unwrap()
    }
}

// =============================================================================
// Path resolution
// =============================================================================

#[test]
fn test_single_ended_path_shape() {
    for device in [0, 1, 7] {
        for pin in 0..8 {
            let config = ChannelConfig::default()
                .device_index(device)
                .positive_pin(pin)
                .negative_pin_sentinel(-1);
            let expected = format!(
                "/sys/bus/iio/devices/iio:device{}/in_voltage{}_raw",
                device, pin
            );
            assert_eq!(config.path_in("/sys/bus/iio/devices"), PathBuf::from(expected));
        }
    }
}

#[test]
fn test_differential_path_shape() {
    let config = ChannelConfig::default()
        .device_index(2)
        .positive_pin(1)
        .negative_pin_sentinel(0);
    assert_eq!(
        config.path_in("/sys/bus/iio/devices"),
        PathBuf::from("/sys/bus/iio/devices/iio:device2/in_voltage1-voltage0_raw")
    );
}

#[test]
fn test_resolved_path_exposed() {
    let iio = FakeIio::new();
    let config = ChannelConfig::default().positive_pin(3).differential(2);
    let expected = iio.set(&config, "0");

    let ai = AnalogIn::with_root(iio.root(), config).unwrap();
    assert_eq!(ai.path(), expected);
    assert!(ai.is_differential());
    assert_eq!(ai.positive_pin(), 3);
    assert_eq!(ai.negative_pin(), Some(2));
    assert_eq!(ai.device_index(), 1);
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_missing_device_not_found() {
    let iio = FakeIio::new();
    iio.set(&ChannelConfig::default(), "0");

    let config = ChannelConfig::default().device_index(99);
    let err = AnalogIn::with_root(iio.root(), config).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.path(), config.path_in(iio.root()));
    assert!(err.to_string().contains("iio:device99"));
}

#[test]
fn test_single_ended_file_does_not_satisfy_differential() {
    let iio = FakeIio::new();
    iio.set(&ChannelConfig::default().positive_pin(0), "0");

    let err = AnalogIn::with_root(iio.root(), ChannelConfig::default().differential(1))
        .unwrap_err();
    assert!(matches!(err, AdcError::ResourceNotFound { .. }));
}

#[test]
fn test_construction_does_not_read() {
    let iio = FakeIio::new();
    // Garbage contents only fail once a read happens
    let ai = iio.open(ChannelConfig::default(), "garbage");
    assert!(ai.raw_value().unwrap_err().is_parse_error());
}

// =============================================================================
// Conversions
// =============================================================================

#[test]
fn test_zero_reading() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default(), "0\n");

    assert_eq!(ai.raw_value().unwrap(), 0);
    assert_eq!(ai.scaled_value().unwrap(), 0);
    assert_eq!(ai.voltage().unwrap(), 0.0);
}

#[test]
fn test_full_scale_reading() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default().reference_voltage(3.3), "1023\n");

    assert_eq!(ai.raw_value().unwrap(), 1023);
    assert_eq!(ai.scaled_value().unwrap(), 65535);
    assert!((ai.voltage().unwrap() - 3.3).abs() < 1e-9);
}

#[test]
fn test_mid_scale_truncates() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default(), "511");

    let expected = ((511.0 / 1023.0) * 65535.0) as i64;
    assert_eq!(expected, 32735);
    assert_eq!(ai.scaled_value().unwrap(), expected);
}

#[test]
fn test_out_of_range_passes_through() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default(), "2000\n");

    let scaled = ai.scaled_value().unwrap();
    assert!(scaled > 65535);
    assert_eq!(scaled, 128123);

    let volts = ai.voltage().unwrap();
    assert!(volts > ai.reference_voltage());
}

#[test]
fn test_negative_raw_passes_through() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default().differential(1), "-5\n");

    assert_eq!(ai.raw_value().unwrap(), -5);
    assert_eq!(ai.scaled_value().unwrap(), -320);
    assert!(ai.voltage().unwrap() < 0.0);
}

#[test]
fn test_surrounding_whitespace_accepted() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default(), "  42 \n");
    assert_eq!(ai.raw_value().unwrap(), 42);
}

#[test]
fn test_voltage_uses_reference() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default().reference_voltage(5.0), "1023");
    assert!((ai.voltage().unwrap() - 5.0).abs() < 1e-9);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_non_numeric_parse_error() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default(), "not-a-number\n");

    let err = ai.raw_value().unwrap_err();
    match &err {
        AdcError::ParseError { contents, .. } => assert_eq!(contents, "not-a-number\n"),
        other => panic!("expected ParseError, got {other:?}"),
    }
    // Derived values propagate the same error
    assert!(ai.scaled_value().unwrap_err().is_parse_error());
    assert!(ai.voltage().unwrap_err().is_parse_error());
}

#[test]
fn test_empty_file_parse_error() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default(), "");
    assert!(ai.raw_value().unwrap_err().is_parse_error());
}

#[test]
fn test_removed_resource_unavailable() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default(), "100");
    assert_eq!(ai.raw_value().unwrap(), 100);

    fs::remove_file(ai.path()).unwrap();

    for _ in 0..3 {
        let err = ai.raw_value().unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(err.path(), ai.path());
    }
    assert!(ai.scaled_value().unwrap_err().is_unavailable());
    assert!(ai.voltage().unwrap_err().is_unavailable());
}

#[test]
fn test_recovers_when_resource_returns() {
    let iio = FakeIio::new();
    let config = ChannelConfig::default();
    let ai = iio.open(config, "1");

    fs::remove_file(ai.path()).unwrap();
    assert!(ai.raw_value().is_err());

    iio.set(&config, "2");
    assert_eq!(ai.raw_value().unwrap(), 2);
}

// =============================================================================
// Freshness and sharing
// =============================================================================

#[test]
fn test_every_read_is_fresh() {
    let iio = FakeIio::new();
    let config = ChannelConfig::default().positive_pin(5);
    let ai = iio.open(config, "10");

    assert_eq!(ai.raw_value().unwrap(), 10);
    iio.set(&config, "700");
    assert_eq!(ai.raw_value().unwrap(), 700);
    assert_eq!(ai.read().unwrap().raw, 700);
}

#[test]
fn test_independent_readers_same_path() {
    let iio = FakeIio::new();
    let config = ChannelConfig::default();
    let a = Arc::new(iio.open(config, "300"));
    let b = AnalogIn::with_root(iio.root(), config.reference_voltage(5.0)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let a = Arc::clone(&a);
            std::thread::spawn(move || a.raw_value().unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 300);
    }

    assert!((b.voltage().unwrap() - 300.0 * 5.0 / 1023.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_readable_capability() {
    let iio = FakeIio::new();
    let ai = iio.open(ChannelConfig::default(), "1023");

    let readable: Box<dyn Readable> =
        Box::new(ReadableAnalogIn::new(ai).with_mode(ReadMode::Scaled));
    assert_eq!(readable.read().await.unwrap(), 65535.0);
}
