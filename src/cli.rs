mod options;

use clap::{Parser, Subcommand};
pub use options::{ColorMode, OutputFormat};
use std::path::PathBuf;

/// Translate Palo Alto Networks log filters into KQL queries
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// TOML file with timezone and mapping overrides
    #[arg(short, long, global = true, env = "PAN2KQL_CONFIG")]
    pub config: Option<PathBuf>,

    /// IANA timezone the PAN timestamps are written in (e.g. "America/New_York")
    #[arg(long, global = true, env = "PAN2KQL_TIMEZONE")]
    pub timezone: Option<String>,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print only the translation and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Translate a single PAN filter (read from stdin when omitted)
    Translate {
        /// PAN filter expression
        query: Option<String>,

        /// Do not copy the translation to the clipboard
        #[arg(long)]
        no_clipboard: bool,

        /// Show how each pipeline stage rewrote the query
        #[arg(short, long)]
        explain: bool,
    },
    /// Translate every line of a file of PAN filters
    Batch {
        /// File with one PAN filter per line; blank lines and '#' comments are skipped
        file: PathBuf,

        /// Write the translations to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop at the first filter that fails to translate
        #[arg(long)]
        fail_fast: bool,
    },
    /// List the PAN → KQL field and operator mappings in effect
    Mappings,
    /// Print the effective configuration as TOML
    ShowConfig,
}

impl Default for Commands {
    /// Bare invocation prompts for one filter, like `translate` without a query
    fn default() -> Self {
        Commands::Translate {
            query: None,
            no_clipboard: false,
            explain: false,
        }
    }
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
