//! hq4gen - Command-line tool for regenerating the HQ4x lookup tables

use std::process::ExitCode;

use hq4gen::cli;

fn main() -> ExitCode {
    cli::run_cli()
}
