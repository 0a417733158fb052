use std::path::PathBuf;

/// Errors raised while declaring resources and their capabilities/requirements.
///
/// Matching never produces an error; an unmatched requirement is a plain `false`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed version or version-range text.
    #[error("invalid version '{input}': {reason}")]
    VersionParse { input: String, reason: String },

    /// A capability, requirement or resource violates its namespace rules.
    #[error("invalid declaration in namespace '{namespace}': {reason}")]
    InvalidDeclaration { namespace: String, reason: String },

    /// A well-known directive carries a value outside its domain.
    #[error("invalid value '{value}' for directive '{directive}'")]
    InvalidDirective { directive: String, value: String },

    /// Failed to parse namespace configuration or a resource descriptor.
    #[error("failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file not found.
    #[error("configuration not found at {0}")]
    ConfigNotFound(PathBuf),

    /// I/O error reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn version(input: &str, reason: impl Into<String>) -> Self {
        Self::VersionParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn declaration(namespace: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            namespace: namespace.to_string(),
            reason: reason.into(),
        }
    }
}
