//! Configuration schema types for `hq4gen.toml`
//!
//! Every section is optional; a missing file or section means the defaults,
//! which regenerate the three tables next to `HQ4xScaler.in` in the current
//! directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::sanity::SanityOptions;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "hq4gen.toml";

/// Pseudocode input section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// File holding the `switch (pattern)` block
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { path: default_input_path() }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("HQ4xScaler.in")
}

/// Output artifact section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the tables are written to
    #[serde(default = "default_out_dir")]
    pub dir: PathBuf,
    /// Full-precision offsets table
    #[serde(default = "default_offsets")]
    pub offsets: String,
    /// Full-precision weights table
    #[serde(default = "default_weights")]
    pub weights: String,
    /// Lite offsets table
    #[serde(default = "default_lite_offsets")]
    pub lite_offsets: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            offsets: default_offsets(),
            weights: default_weights(),
            lite_offsets: default_lite_offsets(),
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_offsets() -> String {
    "HQ4xOffsets.dat".to_string()
}

fn default_weights() -> String {
    "HQ4xWeights.dat".to_string()
}

fn default_lite_offsets() -> String {
    "HQ4xLiteOffsets.dat".to_string()
}

impl OutputConfig {
    pub fn offsets_path(&self) -> PathBuf {
        self.dir.join(&self.offsets)
    }

    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(&self.weights)
    }

    pub fn lite_offsets_path(&self) -> PathBuf {
        self.dir.join(&self.lite_offsets)
    }
}

/// Progress output section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Report every pipeline stage, not just the summary
    #[serde(default)]
    pub verbose: bool,
    /// Use ANSI colors on the console
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { verbose: false, color: default_color() }
    }
}

fn default_color() -> bool {
    true
}

/// Complete `hq4gen.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hq4Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Opt-in strict table checks
    #[serde(default)]
    pub sanity: SanityOptions,
    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "output.weights")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: '{}' {}", CONFIG_FILE_NAME, self.field, self.message)
    }
}

impl Hq4Config {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.input.path.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "input.path".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        let outputs = [
            ("output.offsets", &self.output.offsets),
            ("output.weights", &self.output.weights),
            ("output.lite_offsets", &self.output.lite_offsets),
        ];
        for (i, (field, name)) in outputs.iter().enumerate() {
            if name.is_empty() {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a non-empty file name".to_string(),
                });
            } else if outputs[..i].iter().any(|(_, other)| other == name) {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: format!("reuses the file name '{}'", name),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Resolve relative input and output paths against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.input.path.is_relative() {
            self.input.path = base.join(&self.input.path);
        }
        if self.output.dir.is_relative() {
            self.output.dir = base.join(&self.output.dir);
        }
        self
    }
}
