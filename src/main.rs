//! CLI entry point for iio-adc
//!
//! Read one channel:
//! ```bash
//! iio-adc read --device 1 --pin 0
//! iio-adc read --pin 2 --negative 3 --format voltage
//! ```
//!
//! Poll every enabled channel from a configuration file:
//! ```bash
//! iio-adc scan --config config/iio_adc.toml --count 10 --interval-ms 500
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use iio_adc::logging::{self, OutputFormat, TracingConfig};
use iio_adc::scan::{format_reading, Scanner};
use iio_adc::{AdcConfig, AnalogIn, ChannelConfig, DEFAULT_IIO_ROOT};
use tracing::warn;

#[derive(Parser)]
#[command(name = "iio-adc")]
#[command(about = "Read MCP3xxx ADC channels through the Linux IIO sysfs interface", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true, default_value = "compact")]
    log_format: OutputFormat,

    /// Disable ANSI colors in pretty log output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a single channel once
    Read(ReadArgs),

    /// Read every enabled channel from a configuration file
    Scan {
        /// Configuration file
        #[arg(long, default_value = iio_adc::config::DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Number of passes over the channels
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Delay between passes in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

#[derive(Args, Debug)]
struct ReadArgs {
    /// Root of the IIO device tree
    #[arg(long, default_value = DEFAULT_IIO_ROOT)]
    root: PathBuf,

    /// IIO device index
    #[arg(long, default_value_t = 1)]
    device: u32,

    /// Positive input pin
    #[arg(long, default_value_t = 0)]
    pin: u32,

    /// Negative input pin for differential reads (-1 for single-ended)
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    negative: i32,

    /// Reference voltage (Vin) of the ADC
    #[arg(long, default_value_t = 3.3)]
    vref: f64,

    /// Which value to print
    #[arg(long, value_enum, default_value_t = Format::All)]
    format: Format,
}

impl ReadArgs {
    fn channel_config(&self) -> ChannelConfig {
        ChannelConfig::default()
            .device_index(self.device)
            .positive_pin(self.pin)
            .negative_pin_sentinel(self.negative)
            .reference_voltage(self.vref)
    }

    /// Open the channel and format the requested value.
    fn run(&self) -> Result<String> {
        let ai = AnalogIn::with_root(&self.root, self.channel_config())?;

        Ok(match self.format {
            Format::Raw => ai.raw_value()?.to_string(),
            Format::Scaled => ai.scaled_value()?.to_string(),
            Format::Voltage => format!("{:.4}", ai.voltage()?),
            Format::All => format_reading(&ai.path().display().to_string(), &ai.read()?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Raw,
    Scaled,
    Voltage,
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Read(args) => {
            let level = cli.log_level.as_deref().unwrap_or("warn");
            let level = logging::parse_log_level(level).map_err(anyhow::Error::msg)?;
            init_tracing(TracingConfig::new(level), cli.log_format, cli.no_color)?;

            println!("{}", args.run()?);
            Ok(())
        }
        Commands::Scan {
            config,
            count,
            interval_ms,
        } => {
            let mut adc_config = AdcConfig::load_from(&config)
                .with_context(|| format!("Failed to load {}", config.display()))?;
            if let Some(level) = cli.log_level {
                adc_config.application.log_level = level;
            }
            adc_config
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

            let tracing_config =
                TracingConfig::from_config(&adc_config).map_err(anyhow::Error::msg)?;
            init_tracing(tracing_config, cli.log_format, cli.no_color)?;

            let scanner = Scanner::from_config(&adc_config)?;
            if scanner.is_empty() {
                warn!("No enabled channels in configuration");
                return Ok(());
            }

            scanner
                .run(
                    count,
                    Duration::from_millis(interval_ms),
                    &mut std::io::stdout(),
                    &mut std::io::stderr(),
                )
                .await
        }
    }
}

fn init_tracing(config: TracingConfig, format: OutputFormat, no_color: bool) -> Result<()> {
    logging::init(config.with_format(format).with_ansi(!no_color)).map_err(anyhow::Error::msg)
}
