//! Configuration for the table generator
//!
//! Provides types and parsing for the optional `hq4gen.toml` file.

pub mod loader;
pub mod schema;

pub use loader::{default_config, find_config, find_config_from, load_config, ConfigError};
pub use schema::*;
