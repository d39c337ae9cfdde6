//! HQ4x table generator - Library for compiling the HQ4x interpolation rules
//!
//! This library provides functionality to:
//! - Parse the `switch (pattern)` pseudocode into a table of weight vectors
//! - Check the table against the constraints of the renderer
//! - Derive permuted and lite variants of the table
//! - Emit the binary offsets and weights tables used by the GPU scaler

pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod expr;
pub mod lite;
pub mod neighbours;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod progress;
pub mod sanity;
pub mod variant;
