//! osinv - Ansible dynamic inventory for OpenStack resource snapshots.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Config error
//! - 4: Template error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use osinv_core::InventoryError;
use osinv_templates::TemplateError;

mod cli;
mod config;
mod error;
mod inventory;

use cli::Cli;
use error::CliError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the inventory only
    let default_level = if cli.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    // Already initialized is fine
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .try_init();

    match inventory::execute(&cli) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(ExitCodes::SUCCESS)
        }
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<CliError>() {
            return match err {
                CliError::NothingToDo => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::CONFIG_ERROR,
            };
        }
        if let Some(err) = cause.downcast_ref::<InventoryError>() {
            return if err.is_template_error() {
                ExitCodes::TEMPLATE_ERROR
            } else {
                ExitCodes::CONFIG_ERROR
            };
        }
        if cause.downcast_ref::<TemplateError>().is_some() {
            return ExitCodes::TEMPLATE_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}
