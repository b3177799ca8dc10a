//! Plugin settings layered from defaults and `HONEYCOMB_*` variables.

use anyhow::Result;
use figment::providers::Serialized;
use honeycomb_plugin::plugin::DEFAULT_PROVIDER_VERSION;
use honeycomb_plugin::{HoneycombPlugin, PluginError, PluginSettings};
use rstest::rstest;

fn to_figment<T>(result: Result<T, PluginError>) -> Result<T, figment::Error> {
    result.map_err(|err| figment::Error::from(err.to_string()))
}

#[rstest]
fn defaults_apply_without_environment() -> Result<()> {
    figment::Jail::try_with(|jail| {
        jail.clear_env();
        let settings = to_figment(PluginSettings::load())?;
        if settings != PluginSettings::default() {
            return Err(figment::Error::from("expected default settings"));
        }
        if settings.provider_version != DEFAULT_PROVIDER_VERSION {
            return Err(figment::Error::from("unexpected default provider version"));
        }
        Ok(())
    })?;
    Ok(())
}

#[rstest]
fn environment_overrides_defaults() -> Result<()> {
    figment::Jail::try_with(|jail| {
        jail.clear_env();
        jail.set_env("HONEYCOMB_PROVIDER_VERSION", "0.20.0");
        jail.set_env("HONEYCOMB_ENVIRONMENT", "staging");
        let plugin = to_figment(HoneycombPlugin::from_env())?;
        if plugin.settings().environment != "staging" {
            return Err(figment::Error::from("environment should come from env"));
        }
        let block = to_figment(plugin.render_providers("eu"))?;
        if !block.contains("\"~> 0.20.0\"") {
            return Err(figment::Error::from(format!("unexpected block: {block}")));
        }
        Ok(())
    })?;
    Ok(())
}

#[rstest]
fn unrelated_variables_are_ignored() -> Result<()> {
    figment::Jail::try_with(|jail| {
        jail.clear_env();
        jail.set_env("HONEYCOMB_API_KEY", "not-a-setting");
        let settings = to_figment(PluginSettings::load())?;
        if settings != PluginSettings::default() {
            return Err(figment::Error::from("API key must not leak into settings"));
        }
        Ok(())
    })?;
    Ok(())
}

#[rstest]
#[expect(
    clippy::panic_in_result_fn,
    reason = "Assertions give clearer intent for this negative path"
)]
fn configure_overrides_environment() -> Result<()> {
    figment::Jail::try_with(|jail| {
        jail.clear_env();
        jail.set_env("HONEYCOMB_PROVIDER_VERSION", "0.20.0");
        let mut plugin = to_figment(HoneycombPlugin::from_env())?;
        plugin.configure("production", "0.23.0");
        assert_eq!(plugin.settings().provider_version, "0.23.0");
        plugin.configure("production", "");
        assert_eq!(plugin.settings().provider_version, "0.23.0");
        Ok(())
    })?;
    Ok(())
}

#[rstest]
#[case("0.19", "\"~> 0.19\"")]
#[case("1", "\"~> 1\"")]
#[case("1.0", "\"~> 1.0\"")]
#[case(">= 0.20", "\">= 0.20\"")]
fn numeric_looking_versions_stay_text(
    #[case] version: &'static str,
    #[case] constraint: &'static str,
) -> Result<()> {
    figment::Jail::try_with(|jail| {
        jail.clear_env();
        jail.set_env("HONEYCOMB_PROVIDER_VERSION", version);
        let plugin = to_figment(HoneycombPlugin::from_env())?;
        if plugin.settings().provider_version != version {
            return Err(figment::Error::from(format!(
                "provider version should be {version:?}, got {:?}",
                plugin.settings().provider_version
            )));
        }
        let block = to_figment(plugin.render_providers("eu"))?;
        if !block.contains(constraint) {
            return Err(figment::Error::from(format!("unexpected block: {block}")));
        }
        Ok(())
    })?;
    Ok(())
}

#[rstest]
#[case("true")]
#[case("1")]
#[case("[1, 2]")]
fn environment_name_is_kept_verbatim(#[case] environment: &'static str) -> Result<()> {
    figment::Jail::try_with(|jail| {
        jail.clear_env();
        jail.set_env("HONEYCOMB_ENVIRONMENT", environment);
        let settings = to_figment(PluginSettings::load())?;
        if settings.environment != environment {
            return Err(figment::Error::from(format!(
                "environment should be {environment:?}, got {:?}",
                settings.environment
            )));
        }
        Ok(())
    })?;
    Ok(())
}

#[rstest]
fn mistyped_layer_is_a_settings_error() {
    let figment = PluginSettings::figment().merge(Serialized::default("provider_version", [1, 2]));
    let result = PluginSettings::from_figment(&figment);
    assert!(
        matches!(result, Err(PluginError::Settings(_))),
        "expected a settings error, got {result:?}"
    );
}
