//! propwizard - Interactive configuration collector
//!
//! Command-line entry point: sets up logging, loads settings and runs the
//! requested command.

use clap::Parser;
use propwizard::cli::Cli;
use propwizard::config::load_settings;
use propwizard::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.debug);

    // Execute the command
    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("Starting propwizard");

    let mut settings = load_settings()?;
    cli.apply_overrides(&mut settings);
    settings.validate()?;

    cli.execute(settings)
}

fn init_logging(debug: bool) {
    let default_filter = if debug {
        "propwizard=debug"
    } else {
        "propwizard=warn"
    };

    // Logs go to stderr so they never mix with the question/answer exchange on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
