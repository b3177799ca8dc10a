//! Declarative description of the configuration keys the plugin accepts.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::config::keys;

/// JSON-Schema documents for each configuration scope.
///
/// The host's schema collaborator enforces these; the plugin itself only
/// checks value types while decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSchema {
    /// Schema for the global configuration map.
    pub global_config_schema: Value,
    /// Schema for a site configuration map.
    pub site_config_schema: Value,
    /// Schema for a site-component configuration map.
    pub site_component_config_schema: Value,
    /// Schema for a component configuration map.
    pub component_config_schema: Value,
}

impl ValidationSchema {
    /// Builds the schema set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_config_schema: settings_schema(true),
            site_config_schema: settings_schema(true),
            // Credentials are site-scoped, so components do not accept them.
            site_component_config_schema: settings_schema(false),
            component_config_schema: json!({ "type": "object" }),
        }
    }
}

impl Default for ValidationSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn settings_schema(with_api_key: bool) -> Value {
    let mut properties = Map::new();
    if with_api_key {
        properties.insert(
            keys::API_KEY.to_owned(),
            string_property("Honeycomb API key"),
        );
    }
    properties.insert(
        keys::DATASET.to_owned(),
        string_property("Dataset deployment markers are written to"),
    );
    properties.insert(keys::TYPE.to_owned(), string_property("Provider type"));
    properties.insert(keys::URL.to_owned(), string_property("Honeycomb API URL"));
    properties.insert(
        keys::TRACK_DEPLOYMENTS.to_owned(),
        json!({
            "type": "boolean",
            "description": "Record component deployments as markers",
        }),
    );
    json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
    })
}

fn string_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}
