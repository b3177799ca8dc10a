//! Error types produced while decoding configuration and rendering blocks.

mod aggregate;
mod types;

pub use aggregate::AggregatedDecodeErrors;
pub use types::{DecodeError, PluginError, PluginResult, RenderError};
