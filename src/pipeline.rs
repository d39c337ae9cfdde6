//! Generation pipeline orchestration.
//!
//! A run reads the pseudocode once, validates the parsed table, derives the
//! full and lite table-layout variants and writes the three binary tables.
//! Tables are written under staging names and renamed into place together,
//! so a failed run leaves the previous tables untouched.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::config::{ConfigError, Hq4Config};
use crate::emit::{lite_offsets_table, offsets_table, weights_table};
use crate::error::TableError;
use crate::expr::PixelExprTable;
use crate::output::{staging_path, write_binary_file};
use crate::parser::parse_str;
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::sanity::{sanity_check_with, SanityOptions};
use crate::variant::Variant;

/// Error during a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Input or output file error
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The rules could not be compiled into tables
    #[error("{}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },
}

/// The three binary tables of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Full-precision neighbour offsets
    pub offsets: Vec<u8>,
    /// Full-precision weights
    pub weights: Vec<u8>,
    /// Lite sample offsets
    pub lite_offsets: Vec<u8>,
}

/// Parse and validate pseudocode source.
pub fn compile_table(
    source: &str,
    sanity: &SanityOptions,
    reporter: &dyn ProgressReporter,
) -> Result<PixelExprTable, TableError> {
    let table = parse_str(source)?;
    reporter.report(ProgressEvent::Parsed { rows: table.len() });
    sanity_check_with(&table, sanity)?;
    reporter.report(ProgressEvent::Validated);
    Ok(table)
}

/// Derive the binary tables from a validated table.
pub fn build_artifacts(
    table: &PixelExprTable,
    reporter: &dyn ProgressReporter,
) -> Result<Artifacts, TableError> {
    let full = Variant::build(table, false, false, true)?;
    reporter.report(ProgressEvent::VariantBuilt { name: full.name() });
    let lite = Variant::build(table, true, false, true)?;
    reporter.report(ProgressEvent::VariantBuilt { name: lite.name() });

    Ok(Artifacts {
        offsets: offsets_table(full.table())?,
        weights: weights_table(full.table())?,
        lite_offsets: lite_offsets_table(lite.table())?,
    })
}

/// Compile pseudocode source straight into the binary tables.
pub fn generate_tables(
    source: &str,
    sanity: &SanityOptions,
    reporter: &dyn ProgressReporter,
) -> Result<Artifacts, TableError> {
    let table = compile_table(source, sanity, reporter)?;
    build_artifacts(&table, reporter)
}

/// Read and compile the configured input file.
pub fn load_table(
    config: &Hq4Config,
    reporter: &dyn ProgressReporter,
) -> Result<PixelExprTable, GenerateError> {
    let input = &config.input.path;
    reporter.report(ProgressEvent::Started { input: input.clone() });
    let source = read_input(input)?;
    compile_table(&source, &config.sanity, reporter)
        .map_err(|source| GenerateError::Table { path: input.clone(), source })
}

fn discard_staged(staged: &[PathBuf]) {
    for path in staged {
        let _ = fs::remove_file(path);
    }
}

fn read_input(path: &Path) -> Result<String, GenerateError> {
    fs::read_to_string(path)
        .map_err(|source| GenerateError::Io { path: path.to_path_buf(), source })
}

/// Run a full generation: read, compile, derive and write every table.
///
/// Returns the paths written, in order.
pub fn run(
    config: &Hq4Config,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<PathBuf>, GenerateError> {
    let start = Instant::now();
    let input = config.input.path.clone();

    let table = load_table(config, reporter)?;
    let artifacts = build_artifacts(&table, reporter)
        .map_err(|source| GenerateError::Table { path: input, source })?;

    let outputs = [
        (config.output.offsets_path(), &artifacts.offsets),
        (config.output.weights_path(), &artifacts.weights),
        (config.output.lite_offsets_path(), &artifacts.lite_offsets),
    ];

    // Stage every table first so a failed write leaves no partial set behind.
    let mut staged: Vec<PathBuf> = Vec::with_capacity(outputs.len());
    for (path, bytes) in &outputs {
        let staging = staging_path(path);
        if let Err(source) = write_binary_file(&staging, bytes) {
            discard_staged(&staged);
            let _ = fs::remove_file(&staging);
            return Err(GenerateError::Io { path: staging, source });
        }
        staged.push(staging);
    }

    let mut written = Vec::with_capacity(outputs.len());
    for (staging, (path, bytes)) in staged.iter().zip(outputs) {
        if let Err(source) = fs::rename(staging, &path) {
            discard_staged(&staged);
            return Err(GenerateError::Io { path, source });
        }
        reporter.report(ProgressEvent::ArtifactWritten { path: path.clone(), bytes: bytes.len() });
        written.push(path);
    }

    reporter.report(ProgressEvent::Completed {
        artifacts: written.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    });
    Ok(written)
}
