//! `AirDash` command line interface
//!
//! Usage:
//!   airdash show Berlin
//!   airdash show --lat 28.61 --lon 77.21
//!   airdash aqi --pm25 35.4 --pm10 80
//!   airdash serve --port 3000

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use airdash::dashboard::AirQualityReport;
use airdash::error::user_message;
use airdash::{
    AirDashConfig, DashboardService, LocationParser, LocationSource,
    OpenMeteoClient, logging, web,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "airdash", version, about = "Air quality dashboard")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the dashboard for a location
    Show {
        /// City name or "lat,lon"
        #[arg(conflicts_with_all = ["city", "lat"], allow_hyphen_values = true)]
        location: Option<String>,

        #[arg(long, conflicts_with = "lat")]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Compute the AQI for given concentrations without network access
    Aqi {
        /// PM2.5 concentration in µg/m³
        #[arg(long)]
        pm25: Option<f64>,

        /// PM10 concentration in µg/m³
        #[arg(long)]
        pm10: Option<f64>,
    },
    /// Run the JSON API
    Serve {
        /// Overrides the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn show_source(
    location: Option<String>,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<LocationSource> {
    if let Some(input) = location.or(city) {
        return LocationParser::parse(&input);
    }
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(LocationSource::Coordinates(
            LocationParser::validate_coordinates(lat, lon)?,
        )),
        _ => Ok(LocationSource::LastKnown),
    }
}

fn print_hints(config: &AirDashConfig, config_path: Option<&PathBuf>) {
    match config_path.cloned().or_else(AirDashConfig::get_config_path) {
        Some(path) if path.exists() => println!("Using config from {}", path.display()),
        Some(path) => println!("No config file at {} (using defaults)", path.display()),
        None => println!("No config directory found (using defaults)"),
    }
    println!("Log level: {} ({})", config.logging.level, config.logging.format);
    println!(
        "Default location: {} ({:.4}, {:.4})",
        config.defaults.location_name, config.defaults.latitude, config.defaults.longitude
    );
    println!();
    println!("Try `airdash show <city>`, `airdash aqi --pm25 <value>` or `airdash serve`.");
}

async fn run(cli: Cli) -> Result<()> {
    let config = AirDashConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;
    debug!("Loaded configuration: {:?}", config);

    match cli.command {
        None => print_hints(&config, cli.config.as_ref()),
        Some(Command::Aqi { pm25, pm10 }) => {
            print!("{}", AirQualityReport::from_concentrations(pm25, pm10)?);
        }
        Some(Command::Show {
            location,
            city,
            lat,
            lon,
        }) => {
            let source = show_source(location, city, lat, lon)?;
            let client = OpenMeteoClient::new(config.api.clone())?;
            let service = DashboardService::new(client, config.defaults.location());
            let snapshot = service.refresh(source).await?;
            print!("{snapshot}");
        }
        Some(Command::Serve { port }) => {
            let port = port.unwrap_or(config.server.port);
            let addr: SocketAddr = format!("{}:{}", config.server.bind_address, port)
                .parse()
                .with_context(|| {
                    format!("Invalid bind address: {}", config.server.bind_address)
                })?;
            let client = OpenMeteoClient::new(config.api.clone())?;
            let service = Arc::new(DashboardService::new(client, config.defaults.location()));
            info!("Serving dashboard API on {}", addr);
            web::run(service, addr).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}
