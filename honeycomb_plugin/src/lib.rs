//! Honeycomb configuration plugin for infrastructure orchestration hosts.
//!
//! The host pushes layered configuration (global, per site, per component
//! within a site, and per component version) into a [`HoneycombPlugin`].
//! The plugin merges those layers with narrow-over-broad precedence and
//! renders Terraform fragments for the `honeycombio/honeycombio` provider:
//!
//! - [`config`] decodes untyped host maps into typed scope records;
//! - [`merge`] resolves the effective configuration of a site or component;
//! - [`render`] turns effective configuration into HCL text;
//! - [`plugin`] holds the state and dispatches host calls.
//!
//! Transport to the host and schema enforcement live outside this crate.
//!
//! # Example
//!
//! ```rust
//! use honeycomb_plugin::HoneycombPlugin;
//! use serde_json::json;
//!
//! let mut plugin = HoneycombPlugin::new();
//! let site = json!({"api_key": "secret", "track_deployments": true});
//! plugin.set_site("eu", site.as_object().ok_or("not an object")?)?;
//! plugin.set_component_version("api", "1.4.0", &serde_json::Map::new())?;
//!
//! let providers = plugin.render_providers("eu")?;
//! assert!(providers.contains("~> 0.18.1"));
//!
//! let component = plugin.render_component("eu", "api")?;
//! assert!(component.variables.contains(r#"api_key = "secret""#));
//! assert!(component.resources.contains("Deployed api 1.4.0"));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod merge;
pub mod plugin;
pub mod render;

pub use config::{BaseSettings, Decode, RawConfig};
pub use error::{DecodeError, PluginError, PluginResult, RenderError};
pub use merge::{EffectiveComponentConfig, EffectiveSiteConfig};
pub use plugin::{HoneycombPlugin, PluginSettings, ValidationSchema};
pub use render::ComponentSnippets;
