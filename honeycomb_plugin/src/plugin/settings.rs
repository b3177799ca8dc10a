//! The plugin's own settings: target environment and provider version.

use std::collections::BTreeMap;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::error::PluginResult;

/// Provider version used when neither the environment nor the host sets one.
pub const DEFAULT_PROVIDER_VERSION: &str = "0.18.1";

/// Prefix for environment variables read by [`PluginSettings::load`].
pub const ENV_PREFIX: &str = "HONEYCOMB_";

/// Settings that shape rendering but are not part of the merge chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Deployment environment announced by the host.
    pub environment: String,
    /// Version of the `honeycombio/honeycombio` Terraform provider.
    pub provider_version: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            environment: String::new(),
            provider_version: DEFAULT_PROVIDER_VERSION.to_owned(),
        }
    }
}

impl PluginSettings {
    /// Layers defaults under `HONEYCOMB_ENVIRONMENT` and
    /// `HONEYCOMB_PROVIDER_VERSION`.
    ///
    /// Both variables are taken verbatim as text, so `0.19`, `1.0` or `true`
    /// reach the settings exactly as written instead of as numbers or flags.
    /// The environment is read when this is called.
    #[must_use]
    pub fn figment() -> Figment {
        let from_env: BTreeMap<String, String> = Env::prefixed(ENV_PREFIX)
            .only(&["environment", "provider_version"])
            .iter()
            .map(|(key, value)| (key.as_str().to_owned(), value))
            .collect();
        Figment::from(Serialized::defaults(Self::default())).merge(Serialized::defaults(from_env))
    }

    /// Loads settings from defaults and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PluginError::Settings`] when a value cannot be
    /// extracted.
    pub fn load() -> PluginResult<Self> {
        Self::from_figment(&Self::figment())
    }

    /// Extracts settings from a caller-supplied figment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PluginError::Settings`] when extraction fails.
    pub fn from_figment(figment: &Figment) -> PluginResult<Self> {
        Ok(figment.extract()?)
    }

    /// Applies the host's `configure` call.
    ///
    /// The environment is always recorded; a blank provider version keeps the
    /// current one.
    pub fn apply(&mut self, environment: &str, provider_version: &str) {
        environment.clone_into(&mut self.environment);
        if !provider_version.is_empty() {
            provider_version.clone_into(&mut self.provider_version);
        }
    }
}
