//! Configuration loading and template resolution.
//!
//! A template is taken from the command line or environment first, then from
//! the config file, then from the built-in defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use osinv_templates::{TemplateKind, TemplateSources};

use crate::cli::Cli;
use crate::error::CliError;

/// Contents of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub templates: FileTemplates,
}

/// Templates set in a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileTemplates {
    pub name: Option<String>,
    pub groups: Option<String>,
    pub filter: Option<String>,
    pub host_vars: Option<String>,
}

impl FileTemplates {
    pub fn get(&self, kind: TemplateKind) -> Option<&str> {
        match kind {
            TemplateKind::Name => self.name.as_deref(),
            TemplateKind::Groups => self.groups.as_deref(),
            TemplateKind::Filter => self.filter.as_deref(),
            TemplateKind::HostVars => self.host_vars.as_deref(),
        }
    }
}

impl FileConfig {
    /// Load a config file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        debug!("Loading config from {:?}", path);

        let content = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let invalid = |message: String| CliError::InvalidConfig {
            path: path.to_path_buf(),
            message,
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| invalid(e.to_string())),
            Some("yaml" | "yml") => {
                if content.trim().is_empty() {
                    return Ok(Self::default());
                }
                serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))
            }
            _ => Err(CliError::UnsupportedConfigFormat(path.to_path_buf())),
        }
    }
}

/// Templates for a run.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub sources: TemplateSources,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self, CliError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, &file))
    }

    fn merge(cli: &Cli, file: &FileConfig) -> Self {
        let mut sources = TemplateSources::default();
        for kind in TemplateKind::ALL {
            if let Some(source) = cli.template(kind) {
                debug!("Using {} template from command line or environment", kind);
                sources.set(kind, source);
            } else if let Some(source) = file.templates.get(kind) {
                debug!("Using {} template from config file", kind);
                sources.set(kind, source);
            }
        }

        Self { sources }
    }
}
