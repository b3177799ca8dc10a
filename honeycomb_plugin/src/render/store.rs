//! Read-only lookup of template sources by path.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::RenderError;

/// Path of the per-component resource template.
pub const RESOURCES_TEMPLATE: &str = "templates/resources.tmpl";

const EMBEDDED: &[(&str, &str)] = &[(
    RESOURCES_TEMPLATE,
    include_str!("../../templates/resources.tmpl"),
)];

/// Source of template text keyed by path.
pub trait TemplateStore {
    /// Returns the template stored at `path`, if any.
    fn template(&self, path: &Utf8Path) -> Option<&str>;
}

/// Templates compiled into the plugin binary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedTemplates;

impl TemplateStore for EmbeddedTemplates {
    fn template(&self, path: &Utf8Path) -> Option<&str> {
        EMBEDDED
            .iter()
            .find(|(name, _)| *name == path.as_str())
            .map(|(_, source)| *source)
    }
}

/// In-memory templates supplied at runtime.
///
/// ```rust
/// use camino::Utf8Path;
/// use honeycomb_plugin::render::{StaticTemplates, TemplateStore};
///
/// let store = StaticTemplates::new().with_template("templates/resources.tmpl", "# none\n");
/// assert_eq!(store.template(Utf8Path::new("templates/resources.tmpl")), Some("# none\n"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StaticTemplates {
    templates: BTreeMap<Utf8PathBuf, String>,
}

impl StaticTemplates {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// Adds or replaces the template at `path`.
    #[must_use]
    pub fn with_template(mut self, path: impl Into<Utf8PathBuf>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    /// Adds or replaces the template at `path`.
    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>, source: impl Into<String>) {
        self.templates.insert(path.into(), source.into());
    }
}

impl TemplateStore for StaticTemplates {
    fn template(&self, path: &Utf8Path) -> Option<&str> {
        self.templates.get(path).map(String::as_str)
    }
}

/// Fetches `path` from `store`.
///
/// # Errors
///
/// Returns [`RenderError::TemplateNotFound`] when the store has no such entry.
pub fn load_template<'a, S>(store: &'a S, path: &Utf8Path) -> Result<&'a str, RenderError>
where
    S: TemplateStore + ?Sized,
{
    store
        .template(path)
        .ok_or_else(|| RenderError::TemplateNotFound {
            path: path.to_path_buf(),
        })
}
