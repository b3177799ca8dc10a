//! Typed configuration records for every scope of the merge chain.
//!
//! The host pushes untyped maps; [`Decode`] turns them into the records
//! below by extracting each known key explicitly. Unknown keys are ignored
//! and missing or `null` keys keep their zero value, so an empty string or
//! `false` always means "inherit from the broader scope".

mod decode;
mod scopes;
mod settings;

pub use decode::{Decode, RawConfig};
pub use scopes::{ComponentConfig, GlobalConfig, SiteComponentConfig, SiteConfig};
pub use settings::{BaseSettings, keys};

#[cfg(test)]
mod tests;
