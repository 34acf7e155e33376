//! The inventory run: load, render, print.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use osinv_core::{build_host, build_list, ResourceStore};
use osinv_templates::TemplateRenderer;

use crate::cli::{Cli, Mode};
use crate::config::Settings;
use crate::error::CliError;

/// Produce the JSON document for the requested mode.
///
/// Nothing is printed here so that a failed run leaves stdout empty.
pub fn execute(cli: &Cli) -> Result<String> {
    let mode = cli.mode().ok_or(CliError::NothingToDo)?;
    let settings = Settings::resolve(cli)?;

    let renderer = TemplateRenderer::compile(settings.sources)
        .context("Failed to compile templates")?;
    let store = ResourceStore::load(&cli.info)
        .with_context(|| format!("Failed to load OpenStack info from {:?}", cli.info))?;

    let output = match mode {
        Mode::List => {
            info!("Listing inventory of {} resources", store.len());
            serde_json::to_value(build_list(&store, &renderer)?)?
        }
        Mode::Host(name) => {
            info!("Looking up host '{}'", name);
            Value::Object(build_host(&store, &renderer, &name)?)
        }
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(json)
}
