//! Weather Station Relay
//!
//! Fetches the current observation for one station, normalizes it, and
//! uploads it to Windguru. One station per invocation; schedule it with cron
//! or a systemd timer at the station's interval.
//!
//! Usage:
//!   windrelay --station rohrspitz             # fetch + upload
//!   windrelay --station kressbronn --dry-run  # fetch + print, no upload
//!   windrelay --list                          # show configured stations
//!
//! Environment:
//!   WINDSPEED_PASS_<STATION> - upload secret per station (may live in .env)
//!   RUST_LOG                 - log filter, overrides --verbose

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::debug;

use windrelay::config::Registry;
use windrelay::fetch::HttpTransport;
use windrelay::model::{RelayError, Result};
use windrelay::relay::{relay_station, RelayOutcome};

/// Relay current weather-station observations to Windguru
#[derive(Debug, Parser)]
#[command(name = "windrelay", version)]
struct Cli {
    /// Station identifier, e.g. rohrspitz or kressbronn
    #[arg(short, long, value_name = "STATION")]
    station: Option<String>,

    /// Station config file (defaults to ./stations.toml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fetch and parse only, print the record instead of uploading it
    #[arg(long)]
    dry_run: bool,

    /// List configured stations and exit
    #[arg(long)]
    list: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    // Load .env file if present
    dotenv::dotenv().ok();
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn setup_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("windrelay={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", level);
}

fn run(cli: &Cli) -> Result<()> {
    let registry = Registry::load(cli.config.as_deref(), |name| std::env::var(name).ok())?;

    if cli.list {
        print_stations(&registry);
        return Ok(());
    }

    let station_id = cli.station.as_deref().ok_or_else(|| {
        RelayError::Config(
            "no station specified, start windrelay with --station <station_name> (see --list)"
                .to_string(),
        )
    })?;

    let transport = HttpTransport::new()?;

    match relay_station(&transport, &registry, station_id, cli.dry_run)? {
        RelayOutcome::Uploaded(obs) => {
            println!("✓ {} uploaded ({})", obs.station_id, obs.timestamp);
        }
        RelayOutcome::DryRun(obs) => {
            println!("{:#?}", obs);
        }
        RelayOutcome::Rejected { observation, error } => {
            // Already logged with the full record; not fatal.
            println!("✗ {} not uploaded: {}", observation.station_id, error);
        }
    }

    Ok(())
}

fn print_stations(registry: &Registry) {
    println!("{:<18} {:<18} {:>8}  {:<6} {}", "STATION", "SOURCE", "INTERVAL", "SECRET", "NAME");
    for station in registry.stations() {
        println!(
            "{:<18} {:<18} {:>7}s  {:<6} {}",
            station.id,
            station.source.name(),
            station.interval_seconds,
            if station.secret.is_some() { "set" } else { "-" },
            station.name
        );
    }
}
