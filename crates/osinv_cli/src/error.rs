//! Errors raised by the command line layer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("nothing to do (please specify either '--list' or '--host <INVENTORY_NAME>')")]
    NothingToDo,

    #[error("Failed to read config file {path:?}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Unsupported config file format: {0:?} (expected .toml, .yaml or .yml)")]
    UnsupportedConfigFormat(PathBuf),
}
