use clap::Parser;
use fits_meta::cli::{self, Cli};
use fits_meta::commands;
use fits_meta::config::RunConfig;
use fits_meta::fits::FitsReader;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return cli::parse_error_exit(e),
    };

    init_tracing(cli.verbose);

    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", Cli::usage());
            return ExitCode::from(e.exit_code());
        }
    };

    let stdout = std::io::stdout().lock();
    match commands::run(&config, &FitsReader, stdout) {
        Ok(summary) => {
            if summary.failed > 0 {
                eprintln!("{} file(s) could not be read", summary.failed);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
