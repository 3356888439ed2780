//! Error types for artefact resolution.
//!
//! Every variant describes a build configuration problem. Resolution raises
//! them synchronously on the access that triggered it and never retries.

use lazy_artefact_common::{PathResolveError, ProviderError, TaskOutputError};
use thiserror::Error;

/// Errors arising from resolving a lazy artefact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// The value needs a path resolver but none was supplied.
    #[error("cannot resolve artefact file value ({value}) because a path resolver was not provided")]
    MissingResolver {
        /// Description of the offending value.
        value: String,
    },

    /// The value matched no known shape and could not be converted to a file.
    #[error("cannot convert provided value ({value}) to a file")]
    Unresolvable {
        /// Description of the offending value.
        value: String,
        /// Why the path resolver rejected the value.
        #[source]
        source: PathResolveError,
    },

    /// A task value did not declare exactly one output file.
    #[error(transparent)]
    TaskOutput(#[from] TaskOutputError),

    /// The deferred value had no value.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;
