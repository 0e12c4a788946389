use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use peakdmm_core::{
    list_ports, AcquisitionConfig, AcquisitionLoop, OutputFormat, RecordWriter, SerialConfig,
    SerialService, TimestampOptions,
};
use std::io;
use std::time::Duration;

/// PeakTech 2025 multimeter reader. Prints one record per measurement to stdout.
#[derive(Debug, Parser)]
#[command(name = "peakdmm", version)]
struct Cli {
    /// Serial port device, e.g. /dev/ttyUSB0 or COM3
    #[arg(required_unless_present = "list")]
    port: Option<String>,

    /// List available ports and exit
    #[arg(short, long)]
    list: bool,

    /// JSON output, one object per line
    #[arg(short, long)]
    json: bool,

    /// Insert a unix epoch timestamp
    #[arg(short, long)]
    epoch: bool,

    /// Insert an ISO 8601 timestamp
    #[arg(short, long)]
    isotime: bool,

    /// Seconds to sleep after each reading
    #[arg(short, long, value_name = "SECONDS", default_value = "0", value_parser = parse_seconds)]
    sleep: Duration,

    /// Baud rate
    #[arg(short, long, default_value_t = peakdmm_core::serial_service::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
    debug!("{cli:?}");

    if cli.list {
        for port in list_ports() {
            println!("{port}");
        }
        return Ok(());
    }

    let port_name = cli.port.clone().unwrap_or_default();
    let serial = SerialService::open(SerialConfig {
        port_name: port_name.clone(),
        baud_rate: cli.baud,
        ..Default::default()
    })
    .with_context(|| format!("failed to open serial port {port_name}"))?;

    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };
    let config = AcquisitionConfig {
        timestamps: TimestampOptions {
            isotime: cli.isotime,
            epoch: cli.epoch,
        },
        sleep: cli.sleep,
        ..Default::default()
    };

    let sink = RecordWriter::new(io::stdout(), format);
    let mut acquisition = AcquisitionLoop::new(serial, sink, config);
    acquisition.run().context("output stream closed")?;
    Ok(())
}
