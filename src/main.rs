use std::process::ExitCode;

use clap::Parser;
use emx_rank::constants as C;
use emx_rank::{Cli, Config, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("emx-rank: {}", e);
            if e.is_config() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Logs go to stderr; RUST_LOG overrides the --verbose default
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        C::VERBOSE_LOG_FILTER
    } else {
        C::DEFAULT_LOG_FILTER
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> emx_rank::Result<()> {
    let config = Config::discover(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, config)?;
    let summary = emx_rank::run(&settings)?;

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
