//! Pick command handler
//!
//! Interactive selection on stdin. Every point typed in is one
//! coordinate-change event, the way clicks and drag releases are on a map.

use crate::cli::start_session;
use crate::config::Config;
use crate::coord::{parse_coordinates, Coordinates};
use crate::error::Result;
use crate::format::text::TextFormatter;
use crate::format::url::UrlFormatter;
use crate::format::OutputFormatter;
use crate::selection::{AddressLookup, SelectionSnapshot};
use clap::Args;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

/// Pick command arguments
#[derive(Args)]
pub struct PickArgs {
    /// Start by asking for the device location
    #[arg(long)]
    pub here: bool,

    /// URL provider for the `url` command
    #[arg(long)]
    pub provider: Option<String>,
}

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Pick(Coordinates),
    Here,
    Confirm,
    Show,
    Url,
    Help,
    Quit,
    Empty,
}

/// Parse a line typed by the user
fn parse_input(line: &str) -> std::result::Result<Input, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" => Ok(Input::Empty),
        "pick" | "p" => parse_coordinates(rest)
            .map(Input::Pick)
            .map_err(|e| e.to_string()),
        "here" | "locate" => Ok(Input::Here),
        "confirm" | "c" => Ok(Input::Confirm),
        "show" | "s" => Ok(Input::Show),
        "url" => Ok(Input::Url),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        _ if line.contains(',') => parse_coordinates(line)
            .map(Input::Pick)
            .map_err(|e| e.to_string()),
        _ => Err(format!("Unknown command \"{}\" (type \"help\")", word)),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <lat>,<lng>      select a point (also: pick <lat>,<lng>)");
    println!("  here             use the device location");
    println!("  confirm          check the point against the service area");
    println!("  show             show the current state");
    println!("  url              print a map link for the point");
    println!("  quit             leave");
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Describe what changed between two snapshots, for updates that arrive
/// in the background
fn describe_update(previous: &SelectionSnapshot, current: &SelectionSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    match (&current.location_error, current.coordinates) {
        (Some(reason), _) if previous.location_error.as_ref() != Some(reason) => {
            lines.push(format!("Location error: {}", reason))
        }
        (None, Some(coords)) if previous.locating && !current.locating => {
            lines.push(format!("Your location: {}", coords))
        }
        _ => {}
    }

    let same_point = previous.coordinates == current.coordinates;
    if same_point && previous.address_lookup.is_pending() && !current.address_lookup.is_pending() {
        match (&current.address, &current.address_lookup) {
            (Some(address), _) => lines.push(format!("Address: {}", address)),
            (None, AddressLookup::Failed(reason)) => {
                lines.push(format!("Address: unavailable ({})", reason))
            }
            (None, _) => {}
        }
    }

    lines
}

/// Print background updates (addresses, device locations) as they land
fn spawn_update_printer(mut updates: watch::Receiver<SelectionSnapshot>) {
    tokio::spawn(async move {
        let mut previous = updates.borrow_and_update().clone();
        while updates.changed().await.is_ok() {
            let current = updates.borrow_and_update().clone();
            let lines = describe_update(&previous, &current);
            if !lines.is_empty() {
                println!();
                for line in lines {
                    println!("{}", line);
                }
                prompt();
            }
            previous = current;
        }
    });
}

/// Run the pick command
pub async fn run(args: PickArgs) -> Result<i32> {
    let config = Config::load()?;
    let handle = start_session(&config)?;
    let text = TextFormatter;

    println!("{}", text.format(&handle.snapshot(), &config)?.trim_end());
    print_help();
    spawn_update_printer(handle.subscribe());

    if args.here {
        handle.use_my_location().await?;
        println!("Fetching your location...");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();

    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Ok(Input::Pick(coords)) => {
                handle.pick(coords).await?;
                println!("Selected {}, looking up address...", coords);
            }
            Ok(Input::Here) => {
                handle.use_my_location().await?;
                println!("Fetching your location...");
            }
            Ok(Input::Confirm) => {
                let snapshot = handle.confirm().await?;
                if snapshot.coordinates.is_none() {
                    println!("Nothing to confirm yet: pick a point first");
                } else {
                    println!("{}", text.format(&snapshot, &config)?.trim_end());
                }
            }
            Ok(Input::Show) => {
                println!("{}", text.format(&handle.snapshot(), &config)?.trim_end());
            }
            Ok(Input::Url) => {
                match UrlFormatter.format_with_provider(
                    &handle.snapshot(),
                    &config,
                    args.provider.as_deref(),
                ) {
                    Ok(url) => println!("{}", url),
                    Err(e) => println!("{}", e),
                }
            }
            Ok(Input::Help) => print_help(),
            Ok(Input::Quit) => break,
            Ok(Input::Empty) => {}
            Err(e) => println!("{}", e),
        }
        prompt();
    }

    let confirmed = handle.snapshot().confirmed;
    Ok(if confirmed.is_some() { 0 } else { 1 })
}
