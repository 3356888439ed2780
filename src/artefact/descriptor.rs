//! The artefact descriptor contract consumed by publishing pipelines.

use super::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use lazy_artefact_common::TaskDependency;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// A publishable artefact.
///
/// Field accessors may trigger resolution of a deferred value and therefore
/// return [`Result`]. [`PublishArtefact::date`] and
/// [`PublishArtefact::build_dependencies`] never resolve anything.
pub trait PublishArtefact: fmt::Debug + Send + Sync {
    /// Return the artefact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the artefact cannot be resolved.
    fn name(&self) -> Result<String>;

    /// Return the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the artefact cannot be resolved.
    fn extension(&self) -> Result<String>;

    /// Return the artefact type.
    ///
    /// # Errors
    ///
    /// Returns an error if the artefact cannot be resolved.
    fn artefact_type(&self) -> Result<String>;

    /// Return the classifier, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the artefact cannot be resolved.
    fn classifier(&self) -> Result<Option<String>>;

    /// Return the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the artefact cannot be resolved.
    fn file(&self) -> Result<Utf8PathBuf>;

    /// Return the artefact's point-in-time marker.
    fn date(&self) -> SystemTime;

    /// Return the tasks that must run before the artefact exists.
    fn build_dependencies(&self) -> TaskDependency;

    /// Return whether the artefact should be published.
    ///
    /// # Errors
    ///
    /// Returns an error if the artefact cannot be resolved.
    fn should_be_published(&self) -> Result<bool>;
}

/// Serializable snapshot of a resolved artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtefactMetadata {
    /// Artefact name.
    pub name: String,
    /// File extension.
    pub extension: String,
    /// Artefact type.
    #[serde(rename = "type")]
    pub artefact_type: String,
    /// Classifier, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub classifier: Option<String>,
    /// Backing file.
    pub file: Utf8PathBuf,
}

impl ArtefactMetadata {
    /// Read every descriptor field of `artefact`.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error raised by `artefact`.
    pub fn capture(artefact: &dyn PublishArtefact) -> Result<Self> {
        Ok(Self {
            name: artefact.name()?,
            extension: artefact.extension()?,
            artefact_type: artefact.artefact_type()?,
            classifier: artefact.classifier()?,
            file: artefact.file()?,
        })
    }
}

/// A descriptor with fixed field values.
#[derive(Debug, Clone)]
pub struct DefaultPublishArtefact {
    name: String,
    extension: String,
    artefact_type: String,
    classifier: Option<String>,
    date: Option<SystemTime>,
    file: Utf8PathBuf,
    dependency: TaskDependency,
}

impl DefaultPublishArtefact {
    /// Create a descriptor with no explicit date.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        artefact_type: impl Into<String>,
        classifier: Option<String>,
        file: impl Into<Utf8PathBuf>,
        dependency: TaskDependency,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            artefact_type: artefact_type.into(),
            classifier,
            date: None,
            file: file.into(),
            dependency,
        }
    }

    /// Pin the descriptor's date.
    #[must_use]
    pub const fn with_date(mut self, date: SystemTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Return the backing file without going through the contract.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.file
    }
}

impl PublishArtefact for DefaultPublishArtefact {
    fn name(&self) -> Result<String> {
        Ok(self.name.clone())
    }

    fn extension(&self) -> Result<String> {
        Ok(self.extension.clone())
    }

    fn artefact_type(&self) -> Result<String> {
        Ok(self.artefact_type.clone())
    }

    fn classifier(&self) -> Result<Option<String>> {
        Ok(self.classifier.clone())
    }

    fn file(&self) -> Result<Utf8PathBuf> {
        Ok(self.file.clone())
    }

    fn date(&self) -> SystemTime {
        self.date.unwrap_or_else(SystemTime::now)
    }

    fn build_dependencies(&self) -> TaskDependency {
        self.dependency.clone()
    }

    fn should_be_published(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail fast when a fixed descriptor cannot be captured"
)]
mod tests {
    use super::*;
    use lazy_artefact_common::TaskDependencyFactory;
    use rstest::{fixture, rstest};
    use serde_json::Value;
    use std::time::Duration;

    #[fixture]
    fn sources_jar() -> DefaultPublishArtefact {
        DefaultPublishArtefact::new(
            "mylib",
            "jar",
            "jar",
            Some("sources".to_owned()),
            "/out/mylib-1.0-sources.jar",
            TaskDependencyFactory::for_project(":lib").for_task("sourcesJar"),
        )
    }

    #[rstest]
    fn fields_are_returned_verbatim(sources_jar: DefaultPublishArtefact) {
        assert_eq!(sources_jar.name(), Ok("mylib".to_owned()));
        assert_eq!(sources_jar.extension(), Ok("jar".to_owned()));
        assert_eq!(sources_jar.artefact_type(), Ok("jar".to_owned()));
        assert_eq!(sources_jar.classifier(), Ok(Some("sources".to_owned())));
        assert_eq!(sources_jar.path(), Utf8Path::new("/out/mylib-1.0-sources.jar"));
        assert_eq!(sources_jar.should_be_published(), Ok(true));
        assert!(
            sources_jar
                .build_dependencies()
                .dependencies()
                .contains(":lib:sourcesJar")
        );
    }

    #[rstest]
    fn pinned_date_is_stable(sources_jar: DefaultPublishArtefact) {
        let pinned = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let artefact = sources_jar.with_date(pinned);
        assert_eq!(artefact.date(), pinned);
        assert_eq!(artefact.date(), pinned);
    }

    #[rstest]
    fn metadata_serialises_type_and_skips_missing_classifier() {
        let artefact = DefaultPublishArtefact::new(
            "app",
            "zip",
            "zip",
            None,
            "/out/app.zip",
            TaskDependencyFactory::with_no_associated_project().empty(),
        );
        let metadata = ArtefactMetadata::capture(&artefact).expect("fixed descriptor");
        let json = serde_json::to_value(&metadata).expect("serialise metadata");

        assert_eq!(json.get("type").and_then(Value::as_str), Some("zip"));
        assert_eq!(json.get("file").and_then(Value::as_str), Some("/out/app.zip"));
        assert!(json.get("classifier").is_none());
    }
}
