//! Publication settings loaded from TOML.
//!
//! `PublishConfig` captures the settings a build needs to create lazy
//! artefacts: the version used to split file names, the project that owns
//! the artefacts' task dependencies, and the directory relative notations
//! are resolved against. Every field is optional, and a missing
//! configuration file yields the defaults.
//!
//! ```toml
//! version = "1.0"
//! project = ":lib"
//!
//! [resolver]
//! base_dir = "build"
//! ```

use crate::artefact::lazy::LazyPublishArtefact;
use crate::artefact::value::ArtefactValue;
use camino::{Utf8Path, Utf8PathBuf};
use lazy_artefact_common::{BaseDirResolver, Provider, TaskDependencyFactory};
use log::debug;
use serde::Deserialize;
use std::io;
use std::sync::Arc;
use thiserror::Error;

const LOG_TARGET: &str = "lazy_artefact::config";

/// Errors arising from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid TOML for [`PublishConfig`].
    #[error("invalid publish configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for creating lazy artefacts.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Version used to separate names from classifiers in file names.
    ///
    /// Blank values are treated as absent.
    pub version: Option<String>,
    /// Project path that qualifies relative task paths, such as `:lib`.
    pub project: Option<String>,
    /// Path resolution settings.
    pub resolver: ResolverConfig,
}

/// Settings for the path resolver used by lazy artefacts.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Directory that relative notations are resolved against. Relative
    /// values are taken relative to the project root.
    pub base_dir: Option<Utf8PathBuf>,
}

impl PublishConfig {
    /// Parse configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is malformed or has
    /// unknown fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_artefact::PublishConfig;
    ///
    /// let config = PublishConfig::from_toml_str("version = \"1.0\"\n").unwrap();
    /// assert_eq!(config.version(), Some("1.0"));
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |candidate| {
            match std::fs::read_to_string(candidate) {
                Ok(source) => Ok(Some(source)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err),
            }
        })
    }

    /// Load configuration using the supplied reader.
    ///
    /// The reader returns `Ok(None)` when no configuration exists. This
    /// variant lets tests stand in for the file system.
    ///
    /// # Errors
    ///
    /// Returns an error when the reader fails or the content is invalid.
    pub fn load_with<F>(path: &Utf8Path, read: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> io::Result<Option<String>>,
    {
        let contents = read(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        contents.map_or_else(
            || {
                debug!(target: LOG_TARGET, "no publish configuration at {path}; using defaults");
                Ok(Self::default())
            },
            |text| {
                debug!(target: LOG_TARGET, "loading publish configuration from {path}");
                Self::from_toml_str(&text)
            },
        )
    }

    /// Return the configured version, ignoring blank values.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .map(str::trim)
            .filter(|version| !version.is_empty())
    }

    /// Build the path resolver for a project rooted at `root`.
    #[must_use]
    pub fn resolver(&self, root: &Utf8Path) -> BaseDirResolver {
        self.resolver.base_dir.as_ref().map_or_else(
            || BaseDirResolver::new(root),
            |base_dir| BaseDirResolver::new(root.join(base_dir)),
        )
    }

    /// Build the dependency factory for the configured project.
    #[must_use]
    pub fn dependency_factory(&self) -> TaskDependencyFactory {
        self.project
            .as_deref()
            .map(str::trim)
            .filter(|project| !project.is_empty())
            .map_or_else(TaskDependencyFactory::with_no_associated_project, |project| {
                TaskDependencyFactory::for_project(project)
            })
    }

    /// Create a lazy artefact over `provider` using these settings.
    #[must_use]
    pub fn artefact<V>(&self, provider: Arc<Provider<V>>, root: &Utf8Path) -> LazyPublishArtefact<V>
    where
        V: ArtefactValue + 'static,
    {
        let mut artefact = LazyPublishArtefact::new(provider, Arc::new(self.resolver(root)))
            .with_dependency_factory(self.dependency_factory());
        if let Some(version) = self.version() {
            artefact = artefact.with_version(version);
        }
        artefact
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail fast when a configuration does not load"
)]
mod tests {
    use super::*;
    use crate::artefact::descriptor::PublishArtefact;
    use rstest::rstest;

    #[rstest]
    fn defaults_leave_everything_unset() {
        let config = PublishConfig::default();

        assert!(config.version().is_none());
        assert!(config.dependency_factory().project().is_none());
        assert_eq!(
            config.resolver(Utf8Path::new("/work")).base_dir(),
            Utf8Path::new("/work")
        );
    }

    #[rstest]
    fn deserialises_all_fields() {
        let source = concat!(
            "version = \"1.0\"\n",
            "project = \":lib\"\n",
            "[resolver]\n",
            "base_dir = \"build\"\n",
        );

        let config = PublishConfig::from_toml_str(source)
            .expect("expected configuration to parse successfully");

        assert_eq!(config.version(), Some("1.0"));
        assert_eq!(config.dependency_factory().project(), Some(":lib"));
        assert_eq!(
            config.resolver(Utf8Path::new("/work")).base_dir(),
            Utf8Path::new("/work/build")
        );
    }

    #[rstest]
    #[case("version = \"  \"\n")]
    #[case("version = \"\"\n")]
    fn blank_version_is_absent(#[case] source: &str) {
        let config = PublishConfig::from_toml_str(source).expect("valid TOML");
        assert!(config.version().is_none());
    }

    #[rstest]
    fn absolute_base_dir_replaces_root() {
        let config = PublishConfig::from_toml_str("[resolver]\nbase_dir = \"/dist\"\n")
            .expect("valid TOML");
        assert_eq!(
            config.resolver(Utf8Path::new("/work")).base_dir(),
            Utf8Path::new("/dist")
        );
    }

    #[rstest]
    fn rejects_unknown_fields() {
        let outcome = PublishConfig::from_toml_str("classifier = \"sources\"\n");
        assert!(matches!(outcome, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    fn load_with_treats_missing_file_as_defaults() {
        let config = PublishConfig::load_with(Utf8Path::new("publish.toml"), |_| Ok(None))
            .expect("missing configuration is not an error");
        assert_eq!(config, PublishConfig::default());
    }

    #[rstest]
    fn load_with_reports_read_failures() {
        let outcome = PublishConfig::load_with(Utf8Path::new("publish.toml"), |_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        });
        let err = outcome.expect_err("read failure");
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("publish.toml"));
    }

    #[rstest]
    fn artefact_uses_configured_settings() {
        let config = PublishConfig::from_toml_str(concat!(
            "version = \"1.0\"\n",
            "project = \":lib\"\n",
            "[resolver]\n",
            "base_dir = \"build\"\n",
        ))
        .expect("valid TOML");
        let provider = Arc::new(Provider::new(|| "libs/mylib-1.0-sources.jar").built_by("jar"));

        let artefact = config.artefact(provider, Utf8Path::new("/work"));

        assert!(
            artefact
                .build_dependencies()
                .dependencies()
                .contains(":lib:jar")
        );
        assert_eq!(artefact.classifier(), Ok(Some("sources".to_owned())));
        assert_eq!(
            artefact.file(),
            Ok(Utf8PathBuf::from("/work/build/libs/mylib-1.0-sources.jar"))
        );
    }
}
