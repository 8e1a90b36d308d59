use colored::Colorize;
use pan2kql::FormatError;
use std::process::ExitCode;

fn main() -> ExitCode {
    match pan2kql::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            if err.downcast_ref::<FormatError>().is_some() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}
