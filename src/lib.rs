pub mod batch;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod display;
pub mod translator;

use crate::batch::{read_queries, translate_batch};
use crate::clipboard::{SystemClipboard, copy_to_clipboard};
use crate::config::TranslatorConfig;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use config::{ConfigError, load_config};
pub use translator::{FormatError, Stage, StageStep, Translation, Translator, translate};

const PROMPT: &str = "Enter PAN filter to translate:\n  ";

/// JSON shape of a single translation
#[derive(Serialize)]
struct TranslateOutput<'a> {
    input: &'a str,
    output: &'a str,
    copied_to_clipboard: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<&'a [StageStep]>,
}

/// Send logs to stderr. `RUST_LOG` wins over the `-v`/`-q` flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Read one filter line, prompting only when a person is typing it
fn read_query(quiet: bool) -> anyhow::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() && !quiet {
        print!("{PROMPT}");
        io::stdout().flush()?;
    }

    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("Failed to read filter from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

fn batch_progress(len: usize, quiet: bool) -> ProgressBar {
    if quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>5}/{len:5} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    progress
}

fn effective_config(cli: &cli::Cli) -> anyhow::Result<TranslatorConfig> {
    let mut config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(timezone) = &cli.timezone {
        config.timezone = timezone.clone();
    }
    Ok(config)
}

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = cli_parse();
    init_tracing(cli.verbose, cli.quiet);
    cli.color.apply();

    let config = effective_config(&cli)?;
    let translator = Translator::new(&config).context("Invalid translator configuration")?;
    info!(
        timezone = %translator.timezone(),
        rules = translator.mappings().len(),
        "translator ready"
    );

    match cli.command.clone().unwrap_or_default() {
        Commands::Translate {
            query,
            no_clipboard,
            explain,
        } => {
            let query = match query {
                Some(query) => query,
                None => read_query(cli.quiet)?,
            };

            // A FormatError aborts here; nothing is printed or copied.
            let translation = translator.explain(&query)?;

            let copied = if no_clipboard || !config.clipboard {
                false
            } else {
                copy_to_clipboard(&mut SystemClipboard, &translation.output)
            };

            match cli.format {
                OutputFormat::Text => {
                    print!(
                        "{}",
                        display::format_translation_text(&translation, copied, explain, cli.quiet)
                    );
                }
                OutputFormat::Json => {
                    let output = TranslateOutput {
                        input: &translation.input,
                        output: &translation.output,
                        copied_to_clipboard: copied,
                        steps: explain.then_some(translation.steps.as_slice()),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
        }
        Commands::Batch {
            file,
            output,
            fail_fast,
        } => {
            let queries = read_queries(&file)
                .with_context(|| format!("Failed to read batch file '{}'", file.display()))?;

            let progress = batch_progress(queries.len(), cli.quiet);
            let report = translate_batch(&translator, &queries, fail_fast, &progress);
            progress.finish_and_clear();

            let rendered = match cli.format {
                OutputFormat::Text => display::format_batch_text(&report),
                OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&report)?),
            };

            if let Some(path) = &output {
                write_output_file(path, &rendered)?;
            } else {
                print!("{rendered}");
            }

            if !cli.quiet {
                eprintln!("{}", display::format_batch_summary(&report));
            }

            if report.failed() > 0 {
                warn!(failed = report.failed(), "some filters could not be translated");
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Mappings => match cli.format {
            OutputFormat::Text => {
                println!("{}", display::format_mappings_table(translator.mappings()));
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(translator.mappings().rules())?
                );
            }
        },
        Commands::ShowConfig => {
            let body = toml::to_string_pretty(&config)
                .context("Failed to serialize configuration")?;
            print!("{body}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
