//! Artefacts resolved from a deferred value on first access.
//!
//! A [`LazyPublishArtefact`] forces its provider the first time a descriptor
//! field is read, picks a resolution strategy from the shape of the value,
//! and caches the resulting descriptor. Build dependencies are reported from
//! the provider itself and never trigger resolution.

use super::archive::ArchivePublishArtefact;
use super::descriptor::{ArtefactMetadata, DefaultPublishArtefact, PublishArtefact};
use super::error::{ArtefactError, Result};
use super::file::ArtefactFile;
use super::value::{ArtefactValue, Shape};
use camino::{Utf8Path, Utf8PathBuf};
use lazy_artefact_common::{
    Buildable, PathResolveError, PathResolver, Provider, TaskDependency, TaskDependencyFactory,
    single_output_file,
};
use log::{debug, trace, warn};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

const LOG_TARGET: &str = "lazy_artefact::resolve";

/// An artefact whose descriptor is computed from a deferred value.
///
/// The descriptor is computed at most once per artefact. Failed resolutions
/// are not cached: the provider keeps its forced value, and each later
/// access re-runs the dispatch over it and reports the same error.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use lazy_artefact::{LazyPublishArtefact, PublishArtefact};
/// use lazy_artefact_common::{BaseDirResolver, Provider};
/// use std::sync::Arc;
///
/// let provider = Arc::new(Provider::new(|| Utf8PathBuf::from("build/libs/app-1.0.jar")));
/// let artefact = LazyPublishArtefact::new(provider, Arc::new(BaseDirResolver::new("/work")))
///     .with_version("1.0");
///
/// assert!(!artefact.is_resolved());
/// assert_eq!(artefact.name().unwrap(), "app");
/// assert_eq!(artefact.extension().unwrap(), "jar");
/// assert!(artefact.is_resolved());
/// ```
pub struct LazyPublishArtefact<V> {
    provider: Arc<Provider<V>>,
    version: Option<String>,
    resolver: Option<Arc<dyn PathResolver>>,
    dependency_factory: TaskDependencyFactory,
    delegate: OnceCell<Box<dyn PublishArtefact>>,
}

impl<V> LazyPublishArtefact<V>
where
    V: ArtefactValue + 'static,
{
    /// Create an artefact with no associated project.
    #[must_use]
    pub fn new(provider: Arc<Provider<V>>, resolver: Arc<dyn PathResolver>) -> Self {
        Self::build(provider, Some(resolver))
    }

    /// Create an artefact that cannot resolve opaque values.
    ///
    /// Resolution of a value that is not a location, path, or task fails
    /// with [`ArtefactError::MissingResolver`].
    #[deprecated(note = "supply a path resolver through `LazyPublishArtefact::new`")]
    #[must_use]
    pub fn without_resolver(provider: Arc<Provider<V>>) -> Self {
        warn!(
            target: LOG_TARGET,
            "lazy artefact created without a path resolver; opaque values will fail to resolve",
        );
        Self::build(provider, None)
    }

    const fn build(provider: Arc<Provider<V>>, resolver: Option<Arc<dyn PathResolver>>) -> Self {
        Self {
            provider,
            version: None,
            resolver,
            dependency_factory: TaskDependencyFactory::with_no_associated_project(),
            delegate: OnceCell::new(),
        }
    }

    /// Use `version` to separate names from classifiers in file names.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Report dependencies through `factory`.
    #[must_use]
    pub fn with_dependency_factory(mut self, factory: TaskDependencyFactory) -> Self {
        self.dependency_factory = factory;
        self
    }

    /// Return the version used for file name derivation.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Return whether the descriptor has been computed.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.delegate.get().is_some()
    }

    /// Resolve the artefact and snapshot every descriptor field.
    ///
    /// # Errors
    ///
    /// Returns an error if the artefact cannot be resolved.
    pub fn metadata(&self) -> Result<ArtefactMetadata> {
        ArtefactMetadata::capture(self)
    }

    fn delegate(&self) -> Result<&dyn PublishArtefact> {
        if let Some(delegate) = self.delegate.get() {
            trace!(target: LOG_TARGET, "reusing resolved artefact {delegate:?}");
            return Ok(&**delegate);
        }
        self.delegate
            .get_or_try_init(|| self.resolve())
            .map(|delegate| &**delegate)
    }

    fn resolve(&self) -> Result<Box<dyn PublishArtefact>> {
        let value = self.provider.force()?;
        let shape = Shape::of(value);
        debug!(
            target: LOG_TARGET,
            "resolving artefact from {} as {}",
            value.describe(),
            shape.label(),
        );

        match shape {
            Shape::Location(location) => Ok(self.describe_file(location.as_file())),
            Shape::Path(path) => Ok(self.describe_file(&path)),
            Shape::Archive(task) => Ok(Box::new(ArchivePublishArtefact::new(
                task,
                self.dependency_factory.clone(),
            ))),
            Shape::Task(task) => {
                let file = single_output_file(task.as_ref())?;
                Ok(self.describe_file(&file))
            }
            Shape::Unrecognised => {
                let file = self.resolve_with_resolver(value)?;
                Ok(self.describe_file(&file))
            }
        }
    }

    fn resolve_with_resolver(&self, value: &V) -> Result<Utf8PathBuf> {
        let Some(resolver) = &self.resolver else {
            return Err(ArtefactError::MissingResolver {
                value: value.describe(),
            });
        };
        let unresolvable = |source| ArtefactError::Unresolvable {
            value: value.describe(),
            source,
        };
        let notation = value
            .file_notation()
            .ok_or_else(|| PathResolveError::UnsupportedNotation {
                notation: value.describe(),
            })
            .map_err(unresolvable)?;
        resolver.resolve(&notation).map_err(unresolvable)
    }

    fn describe_file(&self, file: &Utf8Path) -> Box<dyn PublishArtefact> {
        let derived = ArtefactFile::new(file, self.version.as_deref());
        Box::new(DefaultPublishArtefact::new(
            derived.name(),
            derived.extension(),
            derived.extension(),
            derived.classifier().map(str::to_owned),
            file.to_path_buf(),
            self.dependency_factory.empty(),
        ))
    }
}

impl<V> PublishArtefact for LazyPublishArtefact<V>
where
    V: ArtefactValue + 'static,
{
    fn name(&self) -> Result<String> {
        self.delegate()?.name()
    }

    fn extension(&self) -> Result<String> {
        self.delegate()?.extension()
    }

    fn artefact_type(&self) -> Result<String> {
        self.delegate()?.artefact_type()
    }

    fn classifier(&self) -> Result<Option<String>> {
        self.delegate()?.classifier()
    }

    fn file(&self) -> Result<Utf8PathBuf> {
        self.delegate()?.file()
    }

    /// Always the current time; the date is not part of the resolved
    /// descriptor.
    fn date(&self) -> SystemTime {
        SystemTime::now()
    }

    fn build_dependencies(&self) -> TaskDependency {
        let node: Arc<dyn Buildable> = Arc::clone(&self.provider) as Arc<dyn Buildable>;
        self.dependency_factory.visiting_dependencies(node)
    }

    fn should_be_published(&self) -> Result<bool> {
        self.delegate()?.should_be_published()
    }
}

impl<V> fmt::Debug for LazyPublishArtefact<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyPublishArtefact")
            .field("provider", &self.provider)
            .field("version", &self.version)
            .field("has_resolver", &self.resolver.is_some())
            .field("dependency_factory", &self.dependency_factory)
            .field("delegate", &self.delegate.get())
            .finish()
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail fast when a descriptor field does not resolve"
)]
#[path = "lazy_tests.rs"]
mod tests;
