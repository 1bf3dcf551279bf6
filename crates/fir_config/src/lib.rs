//! Parsing and validation of `fir.toml` project files and annotation files.
//!
//! A project file names the circuit to read and write, tunes the validation
//! rules, and may carry wiring annotations inline. Annotation files hold the
//! same records on their own, as JSON or TOML.

#![warn(missing_docs)]

pub mod annotations;
pub mod error;
pub mod loader;
pub mod types;

pub use annotations::{load_annotations, parse_annotations_json, parse_annotations_toml};
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
