//! pinpoint CLI entry point
//!
//! Locate a point, resolve its address and confirm it against the service area

use pinpoint::cli;

#[tokio::main]
async fn main() {
    match cli::run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
