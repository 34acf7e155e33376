//! # osinv_templates
//!
//! Template compilation and rendering for osinv.
//!
//! Four Jinja-style templates drive the inventory: the inventory name, the
//! group names, the resource filter and the host variables. They are compiled
//! once and rendered for every resource with the resource's attributes as the
//! context.
//!
//! ## Example
//!
//! ```rust,no_run
//! use osinv_templates::{TemplateKind, TemplateRenderer, TemplateSources};
//!
//! let sources = TemplateSources::new().with(TemplateKind::Groups, "{{ metadata.group }}");
//! let renderer = TemplateRenderer::compile(sources).unwrap();
//!
//! let context = serde_json::json!({"uuid": "r1", "metadata": {"group": "web"}});
//! let groups = renderer
//!     .render(TemplateKind::Groups, context.as_object().unwrap())
//!     .unwrap();
//! assert_eq!(groups, "web");
//! ```

pub mod error;
pub mod kind;
pub mod renderer;

pub use error::{TemplateError, TemplateResult};
pub use kind::{
    TemplateKind, DEFAULT_FILTER_TEMPLATE, DEFAULT_GROUPS_TEMPLATE, DEFAULT_HOST_VARS_TEMPLATE,
    DEFAULT_NAME_TEMPLATE,
};
pub use renderer::{Evaluator, TemplateRenderer, TemplateSources, RESOURCE_VARIABLE};
