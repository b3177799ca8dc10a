//! Façade the host orchestrator calls into.
//!
//! [`HoneycombPlugin`] owns every configuration map the host has pushed and
//! answers render requests by resolving the effective configuration on the
//! fly. Setters take `&mut self` and queries take `&self`; a host that
//! dispatches calls from several threads must wrap the plugin in its own
//! lock.

mod schema;
mod settings;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::{
    ComponentConfig, Decode, GlobalConfig, RawConfig, SiteComponentConfig, SiteConfig,
};
use crate::error::{PluginError, PluginResult};
use crate::merge::{
    EffectiveComponentConfig, EffectiveSiteConfig, resolve_site, resolve_site_component,
};
use crate::render::{self, ComponentSnippets, EmbeddedTemplates, TemplateStore};

pub use schema::ValidationSchema;
pub use settings::{DEFAULT_PROVIDER_VERSION, ENV_PREFIX, PluginSettings};

/// Name the plugin registers under with the host.
pub const IDENTIFIER: &str = "honeycomb";

/// In-memory plugin state and request dispatch.
///
/// # Examples
///
/// ```rust
/// use honeycomb_plugin::HoneycombPlugin;
/// use serde_json::json;
///
/// let mut plugin = HoneycombPlugin::new();
/// let global = json!({"api_key": "G", "dataset": "d1"});
/// let site = json!({"api_key": "", "dataset": "d2"});
/// plugin.set_global(global.as_object().ok_or("not an object")?)?;
/// plugin.set_site("eu", site.as_object().ok_or("not an object")?)?;
///
/// let effective = plugin.site_settings("eu");
/// assert_eq!(effective.settings().api_key, "G");
/// assert_eq!(effective.settings().dataset, "d2");
///
/// let block = plugin.render_resources("eu")?;
/// assert!(block.contains(r#"api_key = "G""#));
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct HoneycombPlugin<S = EmbeddedTemplates> {
    settings: PluginSettings,
    global: Option<GlobalConfig>,
    sites: BTreeMap<String, SiteConfig>,
    components: BTreeMap<String, ComponentConfig>,
    templates: S,
}

impl HoneycombPlugin {
    /// Creates a plugin with default settings and the bundled templates.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(PluginSettings::default())
    }

    /// Creates a plugin with `settings` and the bundled templates.
    #[must_use]
    pub fn with_settings(settings: PluginSettings) -> Self {
        Self::with_templates(settings, EmbeddedTemplates)
    }

    /// Creates a plugin whose settings come from defaults and `HONEYCOMB_*`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Settings`] when the environment holds values of
    /// the wrong type.
    pub fn from_env() -> PluginResult<Self> {
        PluginSettings::load().map(Self::with_settings)
    }
}

impl Default for HoneycombPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TemplateStore> HoneycombPlugin<S> {
    /// Creates a plugin that reads resource templates from `templates`.
    #[must_use]
    pub const fn with_templates(settings: PluginSettings, templates: S) -> Self {
        Self {
            settings,
            global: None,
            sites: BTreeMap::new(),
            components: BTreeMap::new(),
            templates,
        }
    }

    /// Name reported to the host for registration.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        IDENTIFIER
    }

    /// Current plugin settings.
    #[must_use]
    pub const fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    /// Records the target environment and, when non-blank, the provider
    /// version to pin.
    pub fn configure(&mut self, environment: &str, provider_version: &str) {
        self.settings.apply(environment, provider_version);
        debug!(
            environment,
            provider_version = %self.settings.provider_version,
            "configured plugin"
        );
    }

    /// Schema describing the keys accepted at every scope.
    #[must_use]
    pub fn validation_schema(&self) -> ValidationSchema {
        ValidationSchema::new()
    }

    /// Stores the global configuration, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Decode`] when a value has the wrong type; the
    /// stored configuration is left unchanged.
    pub fn set_global(&mut self, raw: &RawConfig) -> PluginResult<()> {
        let config = decode_scope::<GlobalConfig>(raw, || "global".to_owned())?;
        self.global = Some(config);
        debug!("stored global configuration");
        Ok(())
    }

    /// Stores the configuration of `site`.
    ///
    /// The site's own settings are replaced; component overrides already
    /// stored for the site are kept. Earlier releases of the plugin reset
    /// them here, which dropped overrides the host sent before the site
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Decode`] when a value has the wrong type; the
    /// stored configuration is left unchanged.
    pub fn set_site(&mut self, site: &str, raw: &RawConfig) -> PluginResult<()> {
        let mut config = decode_scope::<SiteConfig>(raw, || format!("site '{site}'"))?;
        if let Some(previous) = self.sites.remove(site) {
            config.components = previous.components;
        }
        self.sites.insert(site.to_owned(), config);
        debug!(site, "stored site configuration");
        Ok(())
    }

    /// Stores the overrides for `component` within `site`.
    ///
    /// An empty site record is created when `site` has not been configured
    /// yet.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Decode`] when a value has the wrong type; the
    /// stored configuration is left unchanged.
    pub fn set_site_component(
        &mut self,
        site: &str,
        component: &str,
        raw: &RawConfig,
    ) -> PluginResult<()> {
        let config = decode_scope::<SiteComponentConfig>(raw, || {
            format!("component '{component}' of site '{site}'")
        })?;
        let entry = self.sites.entry(site.to_owned()).or_insert_with(|| {
            debug!(site, "creating implicit site record");
            SiteConfig::default()
        });
        entry.insert_component(component, config);
        debug!(site, component, "stored site component configuration");
        Ok(())
    }

    /// Stores the version the host deploys `component` at.
    ///
    /// The map carries no keys the plugin reads; it is accepted for parity
    /// with the other setters.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other setters.
    pub fn set_component_version(
        &mut self,
        component: &str,
        version: &str,
        raw: &RawConfig,
    ) -> PluginResult<()> {
        self.components
            .insert(component.to_owned(), ComponentConfig::new(version));
        debug!(component, version, ignored_keys = raw.len(), "stored component version");
        Ok(())
    }

    /// Effective configuration of `site`.
    #[must_use]
    pub fn site_settings(&self, site: &str) -> EffectiveSiteConfig {
        resolve_site(self.global.as_ref(), self.sites.get(site))
    }

    /// Effective configuration of `component` within `site`.
    #[must_use]
    pub fn site_component_settings(&self, site: &str, component: &str) -> EffectiveComponentConfig {
        let overrides = self
            .sites
            .get(site)
            .and_then(|config| config.component(component));
        resolve_site_component(&self.site_settings(site), overrides)
    }

    /// Version stored for `component`, blank when unknown.
    #[must_use]
    pub fn component_version(&self, component: &str) -> &str {
        self.components
            .get(component)
            .map_or("", |config| config.version.as_str())
    }

    /// Renders the `required_providers` entry for `site`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Render`] if rendering fails.
    pub fn render_providers(&self, site: &str) -> PluginResult<String> {
        debug!(site, version = %self.settings.provider_version, "rendering providers");
        render::render_providers(&self.settings.provider_version).map_err(PluginError::from)
    }

    /// Renders the provider configuration block for `site`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Render`] if rendering fails.
    pub fn render_resources(&self, site: &str) -> PluginResult<String> {
        debug!(site, "rendering provider configuration");
        render::render_resources(&self.site_settings(site)).map_err(PluginError::from)
    }

    /// Renders the variables and resources for `component` within `site`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Render`] when the resource template is missing
    /// or fails to render.
    pub fn render_component(&self, site: &str, component: &str) -> PluginResult<ComponentSnippets> {
        debug!(site, component, "rendering component");
        let config = self.site_component_settings(site, component);
        render::render_component(
            &self.templates,
            component,
            self.component_version(component),
            &config,
        )
        .map_err(PluginError::from)
    }
}

fn decode_scope<T: Decode>(raw: &RawConfig, scope: impl FnOnce() -> String) -> PluginResult<T> {
    T::decode(raw).map_err(|source| {
        let described = scope();
        warn!(scope = %described, keys = ?source.keys(), "rejected configuration");
        PluginError::decode(described, source)
    })
}
