//! Areas command handler
//!
//! Lists the configured service locations, optionally with distances
//! from a given point.

use crate::config::Config;
use crate::coord::distance::{distance_km, is_within_service_area};
use crate::coord::Coordinates;
use crate::error::Result;
use clap::Args;

/// Areas command arguments
#[derive(Args)]
pub struct AreasArgs {
    /// Show distances from this point ("lat,lng")
    #[arg(long, allow_hyphen_values = true)]
    pub near: Option<Coordinates>,
}

/// Run the areas command
pub fn run(args: AreasArgs) -> Result<i32> {
    let config = Config::load()?;
    let area = config.service_area()?;

    println!(
        "Service locations (within {} km of any):",
        area.max_distance_km()
    );

    for point in area.points() {
        match args.near {
            Some(near) => {
                let distance = distance_km(near, point.coords());
                let marker = if distance <= area.max_distance_km() { "*" } else { " " };
                println!(
                    " {} {:20} {}  {:>10.2} km",
                    marker,
                    point.label(),
                    point.coords(),
                    distance
                );
            }
            None => println!("   {:20} {}", point.label(), point.coords()),
        }
    }

    if let Some(near) = args.near {
        println!();
        if is_within_service_area(near, &area) {
            println!("{} is inside the service area", near);
        } else {
            println!("{} is outside the service area", near);
        }
    }

    Ok(0)
}
