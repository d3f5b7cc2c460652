//! Railway asset console - command-line front end
//!
//! Lists and exports railway asset collections stored as JSON files.
//!
//! # Usage
//!
//! ```bash
//! # Second page of active tracks, newest code first
//! railassets list -i vias.json -k track --filter estado=Ativo --sort codigo --desc --page 2
//!
//! # Every station in km 100-250 as a PDF report
//! railassets export -i estacoes.json -k station --filter km_inicial=100 --filter km_final=250 -f pdf
//! ```

use railassets::cli::CliInterface;
use railassets::error::Result;

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Run the selected subcommand
///
/// # Returns
/// * `Result<()>` - Success or error
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli);
    cli.execute().await
}

/// Initialize logging system based on the effective log level
///
/// Logs go to stderr so listings and CSV on stdout stay clean.
///
/// # Arguments
/// * `cli` - CLI interface with the merged configuration
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
