//! Terraform fragments produced from effective configuration.
//!
//! Three shapes are rendered: the `required_providers` entry, the provider
//! configuration block, and the per-component variables and resources. The
//! first two use templates built into this module; the component resources
//! come from a [`TemplateStore`] so hosts can swap them out.
//!
//! Interpolated values are escaped as HCL string contents, including `${` and
//! `%{`. A configuration value such as `${var.key}` therefore renders as that
//! literal text, not as a Terraform reference. Earlier releases of the plugin
//! only quoted values and let such sequences through as interpolations.

mod store;
mod template;
mod version;

use camino::Utf8Path;
use serde::Serialize;

use crate::error::RenderError;
use crate::merge::{EffectiveComponentConfig, EffectiveSiteConfig};

pub use store::{EmbeddedTemplates, RESOURCES_TEMPLATE, StaticTemplates, TemplateStore, load_template};
pub use template::{Template, TemplateContext, TemplateValue, escape_hcl, render_template};
pub use version::version_constraint;

/// Registry address of the Honeycomb Terraform provider.
pub const PROVIDER_SOURCE: &str = "honeycombio/honeycombio";

const PROVIDERS: &str = r#"honeycombio = {
  source  = "{{ source }}"
  version = "{{ version }}"
}
"#;

const PROVIDER_CONFIG: &str = r#"provider "honeycombio" {
  {{ property "api_key" config.api_key }}
  {{ property "api_url" config.url }}
}
"#;

const VARIABLES: &str = r#"honeycomb = {
  {{ property "api_key" config.api_key }}
}
"#;

/// Variables and resources contributed to one component's module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentSnippets {
    /// Entries for the component's `variables` block.
    pub variables: String,
    /// Resource blocks added next to the component.
    pub resources: String,
}

/// Renders the `required_providers` entry for the Honeycomb provider.
///
/// # Errors
///
/// Returns a [`RenderError`] if the built-in template fails to render.
///
/// ```rust
/// let block = honeycomb_plugin::render::render_providers("0.18.1")?;
/// assert!(block.contains(r#"source  = "honeycombio/honeycombio""#));
/// assert!(block.contains(r#"version = "~> 0.18.1""#));
/// # Ok::<_, honeycomb_plugin::error::RenderError>(())
/// ```
pub fn render_providers(provider_version: &str) -> Result<String, RenderError> {
    let context = TemplateContext::new()
        .with_text("source", PROVIDER_SOURCE)
        .with_text("version", version_constraint(provider_version));
    render_template(PROVIDERS, &context)
}

/// Renders the `provider "honeycombio"` configuration block for a site.
///
/// `api_key` and `api_url` lines are omitted when the corresponding
/// setting is blank.
///
/// # Errors
///
/// Returns a [`RenderError`] if the built-in template fails to render.
pub fn render_resources(site: &EffectiveSiteConfig) -> Result<String, RenderError> {
    let context = TemplateContext::new().with_settings("config", site.settings());
    render_template(PROVIDER_CONFIG, &context)
}

/// Renders the variables and resources for `component` within a site.
///
/// The resource template is read from `store` at [`RESOURCES_TEMPLATE`] and
/// receives `component`, `version` and the effective settings under
/// `config`.
///
/// # Errors
///
/// Returns [`RenderError::TemplateNotFound`] when the store lacks the
/// resource template, and [`RenderError::InTemplate`] when it fails to
/// render.
pub fn render_component<S>(
    store: &S,
    component: &str,
    version: &str,
    config: &EffectiveComponentConfig,
) -> Result<ComponentSnippets, RenderError>
where
    S: TemplateStore + ?Sized,
{
    let context = TemplateContext::new()
        .with_text("component", component)
        .with_text("version", version)
        .with_settings("config", config.settings());

    let variables = render_template(VARIABLES, &context)?;

    let path = Utf8Path::new(RESOURCES_TEMPLATE);
    let source = load_template(store, path)?;
    let resources =
        render_template(source, &context).map_err(|err| RenderError::InTemplate {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;

    Ok(ComponentSnippets {
        variables,
        resources,
    })
}
