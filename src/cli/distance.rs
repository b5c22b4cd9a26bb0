//! Distance command handler

use crate::coord::distance::distance_km;
use crate::coord::Coordinates;
use crate::error::Result;
use clap::Args;

/// Distance command arguments
#[derive(Args)]
pub struct DistanceArgs {
    /// First point ("lat,lng")
    #[arg(allow_hyphen_values = true)]
    pub from: Coordinates,

    /// Second point ("lat,lng")
    #[arg(allow_hyphen_values = true)]
    pub to: Coordinates,
}

/// Run the distance command
pub fn run(args: DistanceArgs) -> Result<i32> {
    println!("{:.3} km", distance_km(args.from, args.to));
    Ok(0)
}
