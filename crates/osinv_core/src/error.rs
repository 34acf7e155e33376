//! Error types for the inventory engine.

use thiserror::Error;

use osinv_templates::{TemplateError, TemplateKind};

/// Result type alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Errors that can occur while building an inventory.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Template error for resource {resource}")]
    Template {
        resource: String,
        #[source]
        source: TemplateError,
    },

    #[error("Unexpected value returned from {kind} template for resource {resource}: {message}")]
    TemplateResult {
        kind: TemplateKind,
        resource: String,
        message: String,
    },

    #[error("Inventory name was not unique across resources: '{name}' was a duplicate (resource {resource})")]
    DuplicateName { name: String, resource: String },
}

impl InventoryError {
    pub(crate) fn template(resource: &str, source: TemplateError) -> Self {
        Self::Template {
            resource: resource.to_string(),
            source,
        }
    }

    pub(crate) fn result(kind: TemplateKind, resource: &str, message: impl Into<String>) -> Self {
        Self::TemplateResult {
            kind,
            resource: resource.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error comes from a template or its output rather than
    /// from the snapshot.
    pub fn is_template_error(&self) -> bool {
        matches!(
            self,
            Self::Template { .. } | Self::TemplateResult { .. } | Self::DuplicateName { .. }
        )
    }
}

/// Failure to read a structured literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("not a sequence or mapping literal")]
    NotStructured,

    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },
}
