use crate::error::ConfigError;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use std::process::ExitCode;

/// Default location of the metadata key catalog
pub const DEFAULT_KEYS_FILE: &str = "/fits/metadata-keys.txt";
/// Default problem log written by `--verify`
pub const DEFAULT_PROBLEM_LOG: &str = "problems.txt";

/// Exit code used when help is requested
pub const HELP_EXIT_CODE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "fits-meta")]
#[command(version)]
#[command(about = "View, extract, and/or verify metadata from one or more FITS files", long_about = None)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Print the structure and every header keyword of each file (default)
    #[arg(long, overrides_with_all = ["metadata", "verify"])]
    pub info: bool,

    /// Extract the metadata keys listed in the key file
    #[arg(long, overrides_with_all = ["info", "verify"])]
    pub metadata: bool,

    /// Check each file against the FITS standard and log any problems
    #[arg(long, overrides_with_all = ["info", "metadata"])]
    pub verify: bool,

    /// Text file listing the desired metadata keys, one per line
    #[arg(long, value_name = "METADATA-KEYFILE", default_value = DEFAULT_KEYS_FILE)]
    pub keyfile: String,

    /// File that conformance problems are appended to
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PROBLEM_LOG)]
    pub problem_log: String,

    /// Output format for extracted metadata
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to an image file or a directory of images
    #[arg(value_name = "IMAGES_PATH")]
    pub images_path: Option<String>,
}

/// The single action performed on every file of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Info,
    Metadata,
    Verify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `name: value` lines under a `FILE:` heading
    Text,
    /// One JSON object per file per line
    Json,
    /// `file,name,value` rows
    Csv,
}

impl Cli {
    /// The action flag given last, or `Info` when none was given
    pub fn action(&self) -> ActionKind {
        if self.metadata {
            ActionKind::Metadata
        } else if self.verify {
            ActionKind::Verify
        } else {
            ActionKind::Info
        }
    }

    pub fn usage() -> String {
        Cli::command().render_usage().to_string()
    }
}

/// Print a clap parse failure and map it to the process exit code
pub fn parse_error_exit(err: clap::Error) -> ExitCode {
    // Printing only fails when stderr/stdout is gone; the exit code still matters
    let _ = err.print();
    ExitCode::from(exit_code_for(err.kind()))
}

/// Exit code for each kind of clap parse outcome
pub fn exit_code_for(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            HELP_EXIT_CODE
        }
        ErrorKind::DisplayVersion => 0,
        _ => ConfigError::BadOption(kind.to_string()).exit_code(),
    }
}
