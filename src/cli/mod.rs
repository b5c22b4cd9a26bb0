//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions. Handlers
//! return the process exit status.

pub mod areas;
pub mod check;
pub mod config;
pub mod distance;
pub mod pick;

use crate::config::Config;
use crate::constants::api::GEOCODING_KEY_ENV;
use crate::error::Result;
use crate::geo::{get_geocoder, get_locator};
use crate::selection::session::{Session, SessionHandle};
use crate::selection::LocationSelector;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Locate a point, resolve its address and confirm it against the service area
#[derive(Parser)]
#[command(name = "pinpoint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check and confirm a single location
    Check(check::CheckArgs),

    /// Pick and confirm a location interactively
    Pick(pick::PickArgs),

    /// List the service locations
    Areas(areas::AreasArgs),

    /// Distance between two points
    Distance(distance::DistanceArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Check(args) => check::run(args).await,
        Commands::Pick(args) => pick::run(args).await,
        Commands::Areas(args) => areas::run(args),
        Commands::Distance(args) => distance::run(args),
        Commands::Config(args) => config::run(args),
    }
}

/// Log to stderr, filtered by RUST_LOG (default: warn)
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Start a selection session wired to the configured services
pub(crate) fn start_session(config: &Config) -> Result<SessionHandle> {
    let selector = LocationSelector::new(config.service_area()?);
    let geocoder = get_geocoder(config);
    if !geocoder.has_credential() {
        warn!(
            "No geocoding API key (set {} or geocoding.api_key); addresses will not be resolved",
            GEOCODING_KEY_ENV
        );
    }

    Ok(Session::spawn(
        selector,
        geocoder,
        get_locator(config),
        config.locate_timeout(),
    ))
}
