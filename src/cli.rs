//! Command-line interface implementation

use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, Hq4Config};
use crate::emit::{lite_weights_text, offsets_text, switch_statement, weights_text};
use crate::output::write_text;
use crate::pipeline::{load_table, run, GenerateError};
use crate::progress::{ConsoleProgress, ProgressEvent, ProgressReporter};
use crate::variant::Variant;

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Compile the HQ4x interpolation rules into renderer lookup tables
#[derive(Parser)]
#[command(name = "hq4gen")]
#[command(about = "Compile the HQ4x interpolation rules into renderer lookup tables")]
#[command(version)]
pub struct Cli {
    /// Use this config file instead of searching for hq4gen.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate the binary tables (the default)
    Build,
    /// Print the rules as a regenerated switch statement
    Switch {
        /// Row-index bit order of the printed cases
        #[arg(long, value_enum, default_value_t = Layout::Switch)]
        layout: Layout,
    },
    /// Print a table as commented C array rows
    Text {
        /// Which table to print
        #[arg(value_enum)]
        table: TextTable,
    },
}

/// Row-index bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Order used by the binary tables
    Table,
    /// Order used by the switch statement
    Switch,
}

/// Text table selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextTable {
    Offsets,
    Weights,
    LiteWeights,
}

/// Run the CLI application
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let reporter = ConsoleProgress::new()
        .with_colors(config.progress.color)
        .with_verbose(config.progress.verbose);

    let result = match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => run(&config, &reporter).map(|_| ()),
        Commands::Switch { layout } => print_switch(&config, &reporter, layout),
        Commands::Text { table } => print_text_table(&config, &reporter, table),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            reporter.report(ProgressEvent::Error { message: e.to_string() });
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn table_error(config: &Hq4Config, source: crate::error::TableError) -> GenerateError {
    GenerateError::Table { path: config.input.path.clone(), source }
}

fn stdout_error(source: io::Error) -> GenerateError {
    GenerateError::Io { path: Path::new("<stdout>").to_path_buf(), source }
}

fn print_switch(
    config: &Hq4Config,
    reporter: &dyn ProgressReporter,
    layout: Layout,
) -> Result<(), GenerateError> {
    let table = load_table(config, reporter)?;
    let variant = Variant::build(&table, false, false, layout == Layout::Table)
        .map_err(|e| table_error(config, e))?;
    reporter.report(ProgressEvent::VariantBuilt { name: variant.name() });

    write_text(&mut io::stdout().lock(), switch_statement(variant.table())).map_err(stdout_error)
}

fn print_text_table(
    config: &Hq4Config,
    reporter: &dyn ProgressReporter,
    which: TextTable,
) -> Result<(), GenerateError> {
    let table = load_table(config, reporter)?;
    let lite = which == TextTable::LiteWeights;
    let variant = Variant::build(&table, lite, false, true).map_err(|e| table_error(config, e))?;
    reporter.report(ProgressEvent::VariantBuilt { name: variant.name() });

    let lines = match which {
        TextTable::Offsets => offsets_text(variant.table()),
        TextTable::Weights => weights_text(variant.table()),
        TextTable::LiteWeights => lite_weights_text(variant.table()),
    }
    .map_err(|e| table_error(config, e))?;

    write_text(&mut io::stdout().lock(), lines).map_err(stdout_error)
}
