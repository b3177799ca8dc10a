//! Unit tests for decoding host maps into scope records.

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::{BaseSettings, Decode, GlobalConfig, RawConfig, SiteComponentConfig, SiteConfig};
use crate::error::DecodeError;

fn raw(value: Value) -> RawConfig {
    match value {
        Value::Object(map) => map,
        other => panic!("test input must be an object, got {other}"),
    }
}

#[fixture]
fn full_map() -> RawConfig {
    raw(json!({
        "api_key": "secret",
        "dataset": "orders",
        "type": "honeycomb",
        "url": "https://api.eu1.honeycomb.io",
        "track_deployments": true,
    }))
}

#[rstest]
fn decodes_every_known_key(full_map: RawConfig) {
    let settings = BaseSettings::decode(&full_map).unwrap_or_else(|e| panic!("decode: {e}"));
    assert_eq!(
        settings,
        BaseSettings {
            api_key: "secret".into(),
            dataset: "orders".into(),
            provider_type: "honeycomb".into(),
            url: "https://api.eu1.honeycomb.io".into(),
            track_deployments: true,
        }
    );
}

#[rstest]
fn ignores_unknown_keys(mut full_map: RawConfig) {
    full_map.insert("region".into(), json!(["eu", "us"]));
    full_map.insert("retries".into(), json!(3));
    let settings = BaseSettings::decode(&full_map).unwrap_or_else(|e| panic!("decode: {e}"));
    assert_eq!(settings.dataset, "orders");
}

#[rstest]
#[case(json!({}))]
#[case(json!({"api_key": null, "track_deployments": null}))]
fn missing_and_null_keys_default(#[case] input: Value) {
    let settings = BaseSettings::decode(&raw(input)).unwrap_or_else(|e| panic!("decode: {e}"));
    assert!(settings.is_unset());
}

#[rstest]
#[case(json!({"track_deployments": "yes"}), "track_deployments", "a boolean", "a string")]
#[case(json!({"api_key": 42}), "api_key", "a string", "a number")]
#[case(json!({"url": {"host": "x"}}), "url", "a string", "an object")]
fn rejects_mistyped_values(
    #[case] input: Value,
    #[case] key: &str,
    #[case] expected: &'static str,
    #[case] found: &'static str,
) {
    let err = BaseSettings::decode(&raw(input)).err();
    assert_eq!(err, Some(DecodeError::invalid_type(key, expected, found)));
}

#[test]
fn reports_every_mistyped_key() {
    let input = raw(json!({"dataset": 1, "type": false, "track_deployments": "no"}));
    let err = BaseSettings::decode(&input).err();
    let keys = err.as_ref().map(DecodeError::keys).unwrap_or_default();
    assert_eq!(keys, vec!["dataset", "type", "track_deployments"]);
}

#[rstest]
fn scope_records_share_the_settings_decoder(full_map: RawConfig) {
    let global = GlobalConfig::decode(&full_map).unwrap_or_else(|e| panic!("global: {e}"));
    let site = SiteConfig::decode(&full_map).unwrap_or_else(|e| panic!("site: {e}"));
    let component =
        SiteComponentConfig::decode(&full_map).unwrap_or_else(|e| panic!("component: {e}"));
    assert_eq!(global.settings, site.settings);
    assert_eq!(site.settings, component.settings);
    assert!(site.components.is_empty());
}

#[test]
fn site_components_are_keyed_case_sensitively() {
    let mut site = SiteConfig::default();
    site.insert_component("API", SiteComponentConfig::default());
    assert!(site.component("API").is_some());
    assert!(site.component("api").is_none());
}
