//! Effective configuration for a site or a component within a site.
//!
//! Resolution overlays narrow scopes onto broad ones field by field:
//! site-component over site over global. A blank string or `false` at the
//! narrow scope means "inherit". Because `false` doubles as "unset", a
//! broader `track_deployments = true` cannot be switched off further down
//! the chain; this mirrors how existing deployments already behave.

use serde::Serialize;

use crate::config::{BaseSettings, GlobalConfig, SiteComponentConfig, SiteConfig};

/// Fully resolved settings for a site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EffectiveSiteConfig {
    settings: BaseSettings,
}

impl EffectiveSiteConfig {
    /// Resolved provider settings.
    #[must_use]
    pub const fn settings(&self) -> &BaseSettings {
        &self.settings
    }

    /// Consumes the wrapper, returning the resolved settings.
    #[must_use]
    pub fn into_settings(self) -> BaseSettings {
        self.settings
    }
}

/// Fully resolved settings for one component within a site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EffectiveComponentConfig {
    settings: BaseSettings,
}

impl EffectiveComponentConfig {
    /// Resolved provider settings.
    #[must_use]
    pub const fn settings(&self) -> &BaseSettings {
        &self.settings
    }

    /// Consumes the wrapper, returning the resolved settings.
    #[must_use]
    pub fn into_settings(self) -> BaseSettings {
        self.settings
    }
}

/// Resolves the effective configuration of a site.
///
/// A missing `global` or `site` behaves as an all-default record, so an
/// unknown site resolves to a copy of the global settings.
///
/// # Examples
///
/// ```rust
/// use honeycomb_plugin::config::{BaseSettings, GlobalConfig, SiteConfig};
/// use honeycomb_plugin::merge::resolve_site;
///
/// let global = GlobalConfig {
///     settings: BaseSettings { api_key: "G".into(), dataset: "d1".into(), ..Default::default() },
/// };
/// let site = SiteConfig {
///     settings: BaseSettings { dataset: "d2".into(), ..Default::default() },
///     ..Default::default()
/// };
///
/// let effective = resolve_site(Some(&global), Some(&site));
/// assert_eq!(effective.settings().api_key, "G");
/// assert_eq!(effective.settings().dataset, "d2");
/// ```
#[must_use]
pub fn resolve_site(global: Option<&GlobalConfig>, site: Option<&SiteConfig>) -> EffectiveSiteConfig {
    let unset = BaseSettings::default();
    let narrow = site.map_or(&unset, |config| &config.settings);
    let broad = global.map(|config| config.settings.clone()).unwrap_or_default();
    let api_key = pick(&narrow.api_key, broad.api_key.clone());
    EffectiveSiteConfig {
        settings: BaseSettings {
            api_key,
            ..overlay(narrow, broad)
        },
    }
}

/// Resolves the effective configuration of a component within a site.
///
/// `dataset`, `type`, `url` and `track_deployments` follow the usual
/// narrow-over-broad rule. The API key always comes from `site`: credentials
/// are managed per site, and an `api_key` stored on the component is never
/// read.
#[must_use]
pub fn resolve_site_component(
    site: &EffectiveSiteConfig,
    component: Option<&SiteComponentConfig>,
) -> EffectiveComponentConfig {
    let unset = BaseSettings::default();
    let narrow = component.map_or(&unset, |config| &config.settings);
    EffectiveComponentConfig {
        settings: overlay(narrow, site.settings.clone()),
    }
}

/// Overlays every field except `api_key`, which is taken from `broad`.
fn overlay(narrow: &BaseSettings, broad: BaseSettings) -> BaseSettings {
    BaseSettings {
        api_key: broad.api_key,
        dataset: pick(&narrow.dataset, broad.dataset),
        provider_type: pick(&narrow.provider_type, broad.provider_type),
        url: pick(&narrow.url, broad.url),
        track_deployments: narrow.track_deployments || broad.track_deployments,
    }
}

fn pick(narrow: &str, broad: String) -> String {
    if narrow.is_empty() {
        broad
    } else {
        narrow.to_owned()
    }
}
