//! membw CLI: pick an OpenCL device and measure its memory bandwidth.

use anyhow::Result;
use clap::Parser;
use membw_core::{run_bench, BenchConfig, DeviceCatalog};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "membw")]
#[command(version)]
#[command(about = "OpenCL memory benchmark")]
#[command(
    long_about = "Measure sustained write, read, and copy bandwidth of an OpenCL device.

Each workload sweeps one large device-resident buffer and reports elapsed
time and achieved GB/s. Devices are addressed by the global ID shown by
--list."
)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// List available devices by global ID and exit
    #[arg(long)]
    list: bool,

    /// Run on the device with this global ID
    #[arg(long = "use", value_name = "ID", default_value_t = 0)]
    device: u32,

    /// Accepted for harness compatibility; has no effect
    #[arg(short = 't', value_name = "N", hide = true)]
    threads: Option<u32>,
}

fn main() -> Result<()> {
    let cli = parse_cli();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    if let Some(threads) = cli.threads {
        tracing::debug!("ignoring -t {}; there is no host-side worker pool", threads);
    }

    // Listing only enumerates and prints; it never creates a context,
    // builds the program, or runs a workload.
    if cli.list {
        let catalog = DeviceCatalog::enumerate()?;
        catalog.print_listing();
        return Ok(());
    }

    let config = BenchConfig::new(cli.device, cli.verbose);
    let timings = run_bench(&config)?;
    for timing in &timings {
        println!("{}", timing);
    }

    Ok(())
}

/// Parse arguments under the harness exit-code contract: usage errors are
/// fatal (exit 1) while --help and --version stay successful (exit 0).
fn parse_cli() -> Cli {
    use clap::error::ErrorKind;

    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => std::process::exit(0),
                _ => std::process::exit(1),
            }
        }
    }
}
