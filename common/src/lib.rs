//! Collaborators for lazy artefact resolution: deferred values, the build
//! task model, task dependency tracking, and file path resolution.
//!
//! # Modules
//!
//! - [`deferred`] - Deferred values forced at most once (`Provider`)
//! - [`dependency`] - Dependency nodes and task dependency factories
//! - [`path`] - File-system locations, file notations, and path resolvers
//! - [`task`] - Build tasks, archive tasks, and single-output lookup

pub mod deferred;
pub mod dependency;
pub mod path;
pub mod task;

pub use deferred::{Provider, ProviderError};
pub use dependency::{Buildable, DependencyContext, TaskDependency, TaskDependencyFactory};
pub use path::{BaseDirResolver, FileNotation, FileSystemLocation, PathResolveError, PathResolver};
pub use task::{Archive, ArchiveTask, OutputTask, Task, TaskOutputError, single_output_file};
