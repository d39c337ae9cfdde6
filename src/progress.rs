//! Generation progress reporting.
//!
//! Pipeline stages report [`ProgressEvent`]s to a [`ProgressReporter`]. The
//! console reporter prints a short summary by default and every stage in
//! verbose mode.
//!
//! # Example
//!
//! ```
//! use hq4gen::progress::{ConsoleProgress, ProgressEvent, ProgressReporter};
//!
//! let reporter = ConsoleProgress::with_output(Vec::new()).with_verbose(true);
//! reporter.report(ProgressEvent::Parsed { rows: 4096 });
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Events that can be reported during a generation run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Reading of the pseudocode started
    Started {
        /// Input file
        input: PathBuf,
    },
    /// The pseudocode was parsed into a complete table
    Parsed {
        /// Number of table rows
        rows: usize,
    },
    /// The parsed table passed the sanity checks
    Validated,
    /// A table variant was derived
    VariantBuilt {
        /// Variant name (e.g. "lite-table")
        name: String,
    },
    /// An artifact was written
    ArtifactWritten {
        /// Output file
        path: PathBuf,
        /// Number of bytes written
        bytes: usize,
    },
    /// The run finished successfully
    Completed {
        /// Number of artifacts written
        artifacts: usize,
        /// Total duration in milliseconds
        duration_ms: u64,
    },
    /// The run failed
    Error {
        /// Error message
        message: String,
    },
}

/// Trait for progress reporters.
pub trait ProgressReporter {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);

    /// Check if this reporter wants verbose output.
    fn is_verbose(&self) -> bool {
        false
    }
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    /// Create a new null progress reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    use_colors: bool,
    verbose: bool,
    /// Output writer (stderr unless replaced for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a new console progress reporter writing to stderr.
    pub fn new() -> Self {
        Self { use_colors: true, verbose: false, output: Mutex::new(Box::new(std::io::stderr())) }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { use_colors: false, verbose: false, output: Mutex::new(Box::new(output)) }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        let prefix = self.cyan("[hq4]");
        match event {
            ProgressEvent::Started { input } => {
                if self.verbose {
                    self.writeln(&format!("{} Reading {}", prefix, input.display()));
                }
            }
            ProgressEvent::Parsed { rows } => {
                if self.verbose {
                    self.writeln(&format!("{} Parsed {} rows", prefix, rows));
                }
            }
            ProgressEvent::Validated => {
                if self.verbose {
                    self.writeln(&format!("{} Sanity checks passed", prefix));
                }
            }
            ProgressEvent::VariantBuilt { name } => {
                if self.verbose {
                    self.writeln(&format!("{} Built variant {}", prefix, name));
                }
            }
            ProgressEvent::ArtifactWritten { path, bytes } => {
                self.writeln(&format!(
                    "{} {} {} ({} bytes)",
                    prefix,
                    self.green("wrote"),
                    path.display(),
                    bytes
                ));
            }
            ProgressEvent::Completed { artifacts, duration_ms } => {
                self.writeln(&format!(
                    "{} {} table{} generated in {}",
                    self.green("[done]"),
                    artifacts,
                    if artifacts == 1 { "" } else { "s" },
                    format_duration(duration_ms)
                ));
            }
            ProgressEvent::Error { message } => {
                self.writeln(&format!("{} {}", self.red("[error]"), message));
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Format a duration in milliseconds to a human-readable string.
fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}
