//! Error types for resolver-env

/// Result type for environment operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by wire construction and environment updates.
///
/// Every environment error leaves the environment exactly as it was before
/// the failing call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The same resource instance was installed twice
    #[error("resource already installed: {resource}")]
    DuplicateResource { resource: String },

    /// A wire map names uninstalled resources or misattributes wires
    #[error("inconsistent wire map: {reason}")]
    InconsistentWireMap { reason: String },

    /// A wire whose requirement is not satisfied by its capability
    #[error("{requirement} is not satisfied by {capability}: {reason}")]
    UnsatisfiedWire {
        requirement: String,
        capability: String,
        reason: String,
    },
}

impl Error {
    pub(crate) fn inconsistent(reason: impl Into<String>) -> Self {
        Self::InconsistentWireMap {
            reason: reason.into(),
        }
    }
}
