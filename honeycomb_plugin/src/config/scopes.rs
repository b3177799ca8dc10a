//! Records for the global, site, site-component and component scopes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::DecodeError;

use super::decode::{Decode, RawConfig};
use super::settings::BaseSettings;

/// Settings applied to every site unless a narrower scope overrides them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalConfig {
    /// Provider settings at the global scope.
    #[serde(flatten)]
    pub settings: BaseSettings,
}

impl Decode for GlobalConfig {
    fn decode(raw: &RawConfig) -> Result<Self, DecodeError> {
        BaseSettings::decode(raw).map(|settings| Self { settings })
    }
}

/// Per-site overrides plus the site's component overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Partial settings; blank fields inherit from the global scope.
    #[serde(flatten)]
    pub settings: BaseSettings,
    /// Component overrides for this site, keyed by component name.
    #[serde(skip)]
    pub components: BTreeMap<String, SiteComponentConfig>,
}

impl SiteConfig {
    /// Looks up the overrides stored for `component`.
    #[must_use]
    pub fn component(&self, component: &str) -> Option<&SiteComponentConfig> {
        self.components.get(component)
    }

    /// Stores `config` for `component`, replacing any previous value.
    pub fn insert_component(&mut self, component: impl Into<String>, config: SiteComponentConfig) {
        self.components.insert(component.into(), config);
    }
}

impl Decode for SiteConfig {
    fn decode(raw: &RawConfig) -> Result<Self, DecodeError> {
        BaseSettings::decode(raw).map(|settings| Self {
            settings,
            components: BTreeMap::new(),
        })
    }
}

/// Overrides for one component within one site.
///
/// The `api_key` field is decoded so the host may send it, but the merge
/// never reads it: credentials are site-scoped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteComponentConfig {
    /// Partial settings; blank fields inherit from the effective site.
    #[serde(flatten)]
    pub settings: BaseSettings,
}

impl Decode for SiteComponentConfig {
    fn decode(raw: &RawConfig) -> Result<Self, DecodeError> {
        BaseSettings::decode(raw).map(|settings| Self { settings })
    }
}

/// Site-independent component metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentConfig {
    /// Component version reported by the host.
    pub version: String,
}

impl ComponentConfig {
    /// Creates a record for a component deployed at `version`.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}
