//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "service_area.max_distance_km")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    #[arg(allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<i32> {
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(0);
    }

    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(0);
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        (None, None) => {
            show_all_config(&config);
        }

        (Some(key), None) => {
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                eprintln!("Unknown config key: {}", key);
                eprintln!("\nAvailable keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                return Ok(1);
            }
        }

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        (None, Some(_)) => {
            eprintln!("Error: Must specify a key to set a value");
            return Ok(1);
        }
    }

    Ok(0)
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[service_area]");
    println!("max_distance_km = {}", config.service_area.max_distance_km);
    for location in &config.service_area.locations {
        println!("  {} ({})", location.label(), location.coords());
    }
    println!();

    println!("[geocoding]");
    println!("endpoint = \"{}\"", config.geocoding.endpoint);
    match config.geocoding_key() {
        Some(_) => println!("api_key = \"***\" # configured"),
        None => println!("api_key = \"\" # not configured"),
    }
    println!();

    println!("[device]");
    println!("provider = \"{}\"", config.device.provider);
    println!("timeout_ms = {}", config.device.timeout_ms);
    if let (Some(lat), Some(lng)) = (config.device.fixed_lat, config.device.fixed_lng) {
        println!("fixed_lat = {}", lat);
        println!("fixed_lng = {}", lng);
    }
    println!();

    println!("[map]");
    println!("initial_lat = {}", config.map.initial_lat);
    println!("initial_lng = {}", config.map.initial_lng);
    println!("zoom = {}", config.map.zoom);
    println!();

    println!("[url]");
    println!("default = \"{}\"", config.url.default);
    println!();

    println!("[url.providers]");
    for (name, template) in &config.url.providers {
        println!("{} = \"{}\"", name, template);
    }
}
