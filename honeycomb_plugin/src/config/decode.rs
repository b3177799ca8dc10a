//! Explicit field-by-field decoding of host-supplied maps.

use serde_json::{Map, Value};

use crate::error::DecodeError;

use super::settings::{BaseSettings, keys};

/// Untyped key/value map as delivered by the host orchestrator.
pub type RawConfig = Map<String, Value>;

/// Decoding from an untyped host map into a typed record.
pub trait Decode: Sized {
    /// Decodes `raw`, ignoring unknown keys and defaulting missing ones.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] naming every present key whose value has the
    /// wrong JSON type.
    fn decode(raw: &RawConfig) -> Result<Self, DecodeError>;
}

impl Decode for BaseSettings {
    fn decode(raw: &RawConfig) -> Result<Self, DecodeError> {
        let mut reader = FieldReader::new(raw);
        let settings = Self {
            api_key: reader.string(keys::API_KEY),
            dataset: reader.string(keys::DATASET),
            provider_type: reader.string(keys::TYPE),
            url: reader.string(keys::URL),
            track_deployments: reader.flag(keys::TRACK_DEPLOYMENTS),
        };
        reader.finish().map(|()| settings)
    }
}

/// Collects typed values from a [`RawConfig`], recording every mismatch.
struct FieldReader<'a> {
    raw: &'a RawConfig,
    failures: Vec<DecodeError>,
}

impl<'a> FieldReader<'a> {
    const fn new(raw: &'a RawConfig) -> Self {
        Self {
            raw,
            failures: Vec::new(),
        }
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.raw.get(key).filter(|value| !value.is_null())
    }

    fn string(&mut self, key: &str) -> String {
        match self.present(key) {
            None => String::new(),
            Some(Value::String(value)) => value.clone(),
            Some(other) => {
                self.reject(key, "a string", other);
                String::new()
            }
        }
    }

    fn flag(&mut self, key: &str) -> bool {
        match self.present(key) {
            None => false,
            Some(Value::Bool(value)) => *value,
            Some(other) => {
                self.reject(key, "a boolean", other);
                false
            }
        }
    }

    fn reject(&mut self, key: &str, expected: &'static str, found: &Value) {
        self.failures
            .push(DecodeError::invalid_type(key, expected, json_type_name(found)));
    }

    fn finish(self) -> Result<(), DecodeError> {
        DecodeError::from_failures(self.failures).map_or(Ok(()), Err)
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
