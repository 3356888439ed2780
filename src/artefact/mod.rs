//! Artefact descriptors and their lazy resolution.
//!
//! # Sub-modules
//!
//! - [`archive`] - Descriptor backed by an archive task (`ArchivePublishArtefact`).
//! - [`descriptor`] - The `PublishArtefact` contract and the default descriptor.
//! - [`error`] - Resolution errors (`ArtefactError`).
//! - [`file`] - File name derivation (`ArtefactFile`).
//! - [`lazy`] - Deferred, memoized resolution (`LazyPublishArtefact`).
//! - [`value`] - Shapes a deferred value can take (`ArtefactValue`).

pub mod archive;
pub mod descriptor;
pub mod error;
pub mod file;
pub mod lazy;
pub mod value;
