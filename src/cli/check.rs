//! Check command handler
//!
//! Runs one selection: choose the point, wait for its address, confirm.

use crate::cli::start_session;
use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::selection::Validation;
use clap::Args;
use std::time::Duration;
use tracing::warn;

/// Exit status when the point is outside the service area
const EXIT_OUTSIDE: i32 = 2;

/// Check command arguments
#[derive(Args)]
pub struct CheckArgs {
    /// Latitude
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Use the device location
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub here: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Stop waiting for the address after this many milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub wait_ms: u64,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the check command
pub async fn run(args: CheckArgs) -> Result<i32> {
    if args.list_formats {
        for format in available_formats() {
            println!("  {:6} - {}", format.name, format.description);
        }
        return Ok(0);
    }

    let formatter = get_formatter(&args.format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", args.format)))?;

    let config = Config::load()?;
    let handle = start_session(&config)?;

    if args.here {
        handle.use_my_location().await?;
        let snapshot = handle.wait_for(|s| !s.locating).await?;
        if let Some(reason) = snapshot.location_error {
            eprintln!("Error: could not determine your location: {}", reason);
            return Ok(1);
        }
    } else if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        handle.pick(Coordinates::new(lat, lng)).await?;
    } else {
        eprintln!("Error: No location specified. Use --lat/--lng or --here");
        return Ok(1);
    }

    // Confirmation does not need the address; stop waiting after a while
    let wait = handle.wait_for(|s| !s.address_lookup.is_pending());
    match tokio::time::timeout(Duration::from_millis(args.wait_ms), wait).await {
        Ok(result) => {
            result?;
        }
        Err(_) => warn!("Address lookup still pending after {} ms", args.wait_ms),
    }

    let snapshot = handle.confirm().await?;
    println!("{}", formatter.format(&snapshot, &config)?.trim_end());

    Ok(match snapshot.validation {
        Validation::OutsideServiceArea => EXIT_OUTSIDE,
        _ => 0,
    })
}
