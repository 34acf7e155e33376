//! Template compilation and rendering.

use minijinja::value::{Value as JinjaValue, ValueKind};
use minijinja::{AutoEscape, Environment, ErrorKind, Output, State};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{TemplateError, TemplateResult};
use crate::kind::TemplateKind;

/// Context variable that always refers to the whole attribute mapping of a
/// resource. An attribute of the same name stays reachable through it.
pub const RESOURCE_VARIABLE: &str = "resource";

/// Renders a compiled template against a resource context.
///
/// This is the only capability the inventory engine needs from a template
/// language, so the engine can be exercised with any implementation.
pub trait Evaluator {
    fn render(&self, kind: TemplateKind, context: &Map<String, Value>) -> TemplateResult<String>;
}

/// Template sources for the four inventory templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSources {
    pub name: String,
    pub groups: String,
    pub filter: String,
    pub host_vars: String,
}

impl Default for TemplateSources {
    fn default() -> Self {
        Self {
            name: TemplateKind::Name.default_source().to_string(),
            groups: TemplateKind::Groups.default_source().to_string(),
            filter: TemplateKind::Filter.default_source().to_string(),
            host_vars: TemplateKind::HostVars.default_source().to_string(),
        }
    }
}

impl TemplateSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the source of a template.
    pub fn get(&self, kind: TemplateKind) -> &str {
        match kind {
            TemplateKind::Name => &self.name,
            TemplateKind::Groups => &self.groups,
            TemplateKind::Filter => &self.filter,
            TemplateKind::HostVars => &self.host_vars,
        }
    }

    /// Replace the source of a template.
    pub fn set(&mut self, kind: TemplateKind, source: impl Into<String>) {
        let slot = match kind {
            TemplateKind::Name => &mut self.name,
            TemplateKind::Groups => &mut self.groups,
            TemplateKind::Filter => &mut self.filter,
            TemplateKind::HostVars => &mut self.host_vars,
        };
        *slot = source.into();
    }

    pub fn with(mut self, kind: TemplateKind, source: impl Into<String>) -> Self {
        self.set(kind, source);
        self
    }
}

/// Compiled inventory templates.
pub struct TemplateRenderer {
    env: Environment<'static>,
    sources: TemplateSources,
}

impl TemplateRenderer {
    /// Compile all four templates.
    ///
    /// Every template is parsed up front so that a syntax error is reported
    /// before any resource is processed.
    pub fn compile(sources: TemplateSources) -> TemplateResult<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_formatter(python_formatter);

        for kind in TemplateKind::ALL {
            let source = sources.get(kind).to_string();
            env.add_template_owned(kind.as_str(), source.clone())
                .map_err(|e| TemplateError::Syntax {
                    kind,
                    message: e.to_string(),
                    source_text: source,
                })?;
            debug!("Compiled {} template", kind);
        }

        Ok(Self { env, sources })
    }

    /// Compile the built-in default templates.
    pub fn with_defaults() -> TemplateResult<Self> {
        Self::compile(TemplateSources::default())
    }

    /// Source text of a compiled template.
    pub fn source(&self, kind: TemplateKind) -> &str {
        self.sources.get(kind)
    }

    /// Render a template against a resource's attributes.
    pub fn render(&self, kind: TemplateKind, context: &Map<String, Value>) -> TemplateResult<String> {
        let template = self
            .env
            .get_template(kind.as_str())
            .map_err(|_| TemplateError::NotCompiled(kind))?;

        let rendered = template
            .render(build_context(context))
            .map_err(|e| TemplateError::Render {
                kind,
                message: e.to_string(),
                source_text: self.source(kind).to_string(),
            })?;

        trace!("Rendered {} template as {:?}", kind, rendered);
        Ok(rendered)
    }
}

impl Evaluator for TemplateRenderer {
    fn render(&self, kind: TemplateKind, context: &Map<String, Value>) -> TemplateResult<String> {
        TemplateRenderer::render(self, kind, context)
    }
}

/// Expose every attribute at the top level, plus the attribute mapping itself.
fn build_context(attributes: &Map<String, Value>) -> JinjaValue {
    let mut context = attributes.clone();
    context.insert(
        RESOURCE_VARIABLE.to_string(),
        Value::Object(attributes.clone()),
    );
    JinjaValue::from_serialize(&context)
}

/// Print booleans and none the way the inventory templates expect them
/// (`True`, `False`, `None`).
fn python_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &JinjaValue,
) -> Result<(), minijinja::Error> {
    let literal = match value.kind() {
        ValueKind::Bool if value.is_true() => "True",
        ValueKind::Bool => "False",
        ValueKind::None => "None",
        _ => return minijinja::escape_formatter(out, state, value),
    };
    out.write_str(literal).map_err(|_| {
        minijinja::Error::new(ErrorKind::WriteFailure, "failed to write template output")
    })
}
