//! Primary error enums for the plugin.

use camino::Utf8PathBuf;
use figment::Error as FigmentError;
use thiserror::Error;

use super::aggregate::AggregatedDecodeErrors;

/// Result alias used by the plugin façade.
pub type PluginResult<T> = Result<T, PluginError>;

/// Failure to coerce an inbound configuration value into its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// A present key carried a value of the wrong JSON type.
    #[error("invalid type for '{key}': expected {expected}, found {found}")]
    InvalidType {
        /// Wire name of the offending key.
        key: String,
        /// Type the key is declared with.
        expected: &'static str,
        /// JSON type actually supplied by the host.
        found: &'static str,
    },

    /// More than one key in the same map failed to decode.
    #[error("multiple configuration values could not be decoded:\n{0}")]
    Multiple(AggregatedDecodeErrors),
}

impl DecodeError {
    /// Builds an invalid-type error for `key`.
    #[must_use]
    pub fn invalid_type(key: &str, expected: &'static str, found: &'static str) -> Self {
        Self::InvalidType {
            key: key.to_owned(),
            expected,
            found,
        }
    }

    /// Collapses a list of field failures into a single error.
    ///
    /// Returns `None` for an empty list, the failure itself for a single
    /// entry, and [`Self::Multiple`] otherwise.
    #[must_use]
    pub fn from_failures(mut failures: Vec<Self>) -> Option<Self> {
        match failures.len() {
            0 => None,
            1 => failures.pop(),
            _ => Some(Self::Multiple(AggregatedDecodeErrors::new(failures))),
        }
    }

    /// Returns the wire keys that failed to decode, in input order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::InvalidType { key, .. } => vec![key.as_str()],
            Self::Multiple(errors) => errors.iter().flat_map(Self::keys).collect(),
        }
    }
}

/// Failure while producing a Terraform fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The template store has no entry for the requested path.
    #[error("template '{path}' not found in the template store")]
    TemplateNotFound {
        /// Path that was looked up.
        path: Utf8PathBuf,
    },

    /// A `{{` was never closed.
    #[error("unterminated tag starting at byte {offset}")]
    UnterminatedTag {
        /// Byte offset of the opening braces.
        offset: usize,
    },

    /// A tag named a directive the renderer does not know.
    #[error("unknown directive '{name}' at byte {offset}")]
    UnknownDirective {
        /// Directive name as written.
        name: String,
        /// Byte offset of the tag.
        offset: usize,
    },

    /// A directive was called with the wrong arguments.
    #[error("invalid arguments for '{directive}' at byte {offset}: {message}")]
    InvalidArguments {
        /// Directive whose arguments were rejected.
        directive: &'static str,
        /// Byte offset of the tag.
        offset: usize,
        /// What was wrong with the arguments.
        message: String,
    },

    /// A tag referenced a value missing from the render context.
    #[error("unknown template variable '{path}'")]
    UnknownVariable {
        /// Dotted variable path.
        path: String,
    },

    /// An `end` tag appeared without an open `if` block.
    #[error("'end' at byte {offset} has no matching 'if'")]
    UnexpectedEnd {
        /// Byte offset of the tag.
        offset: usize,
    },

    /// An `if` block was still open at the end of the template.
    #[error("'if' block opened at byte {offset} is never closed")]
    UnclosedBlock {
        /// Byte offset of the `if` tag.
        offset: usize,
    },

    /// A stored template failed to render.
    #[error("failed to render template '{path}': {source}")]
    InTemplate {
        /// Path of the template in the store.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: Box<RenderError>,
    },
}

/// Errors surfaced to the host orchestrator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PluginError {
    /// An inbound configuration map could not be decoded.
    #[error("failed to decode {scope} configuration: {source}")]
    Decode {
        /// Human-readable description of the scope being set.
        scope: String,
        /// Underlying decoding failure.
        #[source]
        source: DecodeError,
    },

    /// Rendering a Terraform fragment failed.
    #[error("failed to render terraform: {0}")]
    Render(#[from] RenderError),

    /// Plugin settings could not be extracted from their sources.
    #[error("failed to load plugin settings: {0}")]
    Settings(#[from] Box<FigmentError>),
}

impl PluginError {
    /// Wraps a decode failure with the scope it occurred in.
    #[must_use]
    pub fn decode(scope: impl Into<String>, source: DecodeError) -> Self {
        Self::Decode {
            scope: scope.into(),
            source,
        }
    }
}

impl From<FigmentError> for PluginError {
    fn from(e: FigmentError) -> Self {
        Self::Settings(Box::new(e))
    }
}
