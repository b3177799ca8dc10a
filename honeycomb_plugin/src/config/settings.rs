//! Provider connection settings shared by every scope.

use serde::{Deserialize, Serialize};

/// Wire names of the keys the host sends for [`BaseSettings`].
pub mod keys {
    /// Honeycomb API key.
    pub const API_KEY: &str = "api_key";
    /// Dataset events and markers are written to.
    pub const DATASET: &str = "dataset";
    /// Provider type discriminator.
    pub const TYPE: &str = "type";
    /// Honeycomb API endpoint.
    pub const URL: &str = "url";
    /// Whether deployments should be recorded as markers.
    pub const TRACK_DEPLOYMENTS: &str = "track_deployments";

    /// Every string-valued key, in declaration order.
    pub const STRING_KEYS: [&str; 4] = [API_KEY, DATASET, TYPE, URL];
}

/// Honeycomb connection and feature toggles.
///
/// Every scope embeds this shape. At the site and site-component levels a
/// blank string or `false` means the field is not set at that scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSettings {
    /// Honeycomb API key.
    pub api_key: String,
    /// Dataset name.
    pub dataset: String,
    /// Provider type discriminator.
    #[serde(rename = "type")]
    pub provider_type: String,
    /// API endpoint override.
    pub url: String,
    /// Record deployments as markers.
    pub track_deployments: bool,
}

impl BaseSettings {
    /// Whether every field is at its zero value.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self == &Self::default()
    }
}
