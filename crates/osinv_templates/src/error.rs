//! Error types for templates.

use thiserror::Error;

use crate::kind::TemplateKind;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while compiling or rendering templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template syntax error in {kind} template: {message} (template was '{source_text}')")]
    Syntax {
        kind: TemplateKind,
        message: String,
        source_text: String,
    },

    #[error("Error rendering {kind} template: {message} (template was '{source_text}')")]
    Render {
        kind: TemplateKind,
        message: String,
        source_text: String,
    },

    #[error("Template not compiled: {0}")]
    NotCompiled(TemplateKind),
}

impl TemplateError {
    /// The template the error originated from.
    pub fn kind(&self) -> TemplateKind {
        match self {
            Self::Syntax { kind, .. } | Self::Render { kind, .. } => *kind,
            Self::NotCompiled(kind) => *kind,
        }
    }

    /// Whether the error was raised while compiling rather than rendering.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}
