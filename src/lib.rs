//! Lazy, type-dispatching resolution of publishable build artefacts.
//!
//! A [`LazyPublishArtefact`] wraps a deferred value and turns it into an
//! artefact descriptor the first time a descriptor field is read. The value
//! may be a file-system location, a raw path, an archive task, a generic
//! task with one output file, or anything a path resolver can convert.
//!
//! # Modules
//!
//! - [`artefact`] - Descriptor contract, file name derivation, and lazy
//!   resolution
//! - [`config`] - TOML configuration for building lazy artefacts

pub mod artefact;
pub mod config;

pub use artefact::descriptor::{ArtefactMetadata, DefaultPublishArtefact, PublishArtefact};
pub use artefact::error::ArtefactError;
pub use artefact::file::ArtefactFile;
pub use artefact::lazy::LazyPublishArtefact;
pub use artefact::value::ArtefactValue;
pub use config::{ConfigError, PublishConfig};
