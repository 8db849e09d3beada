//! Semrel binary entry point.
//!
//! Parses arguments, runs the selected release-cycle mode, and maps any
//! fatal error to exit code 1 after printing a diagnostic.

use semrel::{cli, ui};

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        ui::output::error(format!("{:#}", e));
        std::process::exit(1);
    }
}
