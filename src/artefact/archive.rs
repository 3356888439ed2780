//! Descriptor backed by an archive task.
//!
//! Fields are read from the task's archive naming properties on every
//! access, so changes made to the task before publication are reflected.

use super::descriptor::PublishArtefact;
use super::error::Result;
use camino::Utf8PathBuf;
use lazy_artefact_common::{ArchiveTask, TaskDependency, TaskDependencyFactory};
use std::sync::Arc;
use std::time::SystemTime;

/// An artefact produced by an archive task.
#[derive(Debug, Clone)]
pub struct ArchivePublishArtefact {
    task: Arc<dyn ArchiveTask>,
    dependency_factory: TaskDependencyFactory,
}

impl ArchivePublishArtefact {
    /// Describe the archive produced by `task`.
    #[must_use]
    pub const fn new(task: Arc<dyn ArchiveTask>, dependency_factory: TaskDependencyFactory) -> Self {
        Self {
            task,
            dependency_factory,
        }
    }
}

impl PublishArtefact for ArchivePublishArtefact {
    fn name(&self) -> Result<String> {
        Ok([self.task.base_name(), self.task.appendix()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-"))
    }

    fn extension(&self) -> Result<String> {
        Ok(self.task.extension().unwrap_or_default().to_owned())
    }

    fn artefact_type(&self) -> Result<String> {
        self.extension()
    }

    fn classifier(&self) -> Result<Option<String>> {
        Ok(self
            .task
            .classifier()
            .filter(|c| !c.is_empty())
            .map(str::to_owned))
    }

    fn file(&self) -> Result<Utf8PathBuf> {
        Ok(self.task.archive_file())
    }

    fn date(&self) -> SystemTime {
        SystemTime::now()
    }

    fn build_dependencies(&self) -> TaskDependency {
        self.dependency_factory.for_task(self.task.path())
    }

    fn should_be_published(&self) -> Result<bool> {
        Ok(self.task.is_enabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_artefact_common::Archive;
    use rstest::rstest;

    fn describe(archive: Archive) -> ArchivePublishArtefact {
        ArchivePublishArtefact::new(
            Arc::new(archive),
            TaskDependencyFactory::for_project(":lib"),
        )
    }

    #[rstest]
    fn fields_come_from_archive_properties() {
        let artefact = describe(
            Archive::new("sourcesJar", "mylib", "jar", "/lib/build/libs")
                .with_version("1.0")
                .with_classifier("sources"),
        );

        assert_eq!(artefact.name(), Ok("mylib".to_owned()));
        assert_eq!(artefact.extension(), Ok("jar".to_owned()));
        assert_eq!(artefact.artefact_type(), Ok("jar".to_owned()));
        assert_eq!(artefact.classifier(), Ok(Some("sources".to_owned())));
        assert_eq!(
            artefact.file(),
            Ok(Utf8PathBuf::from("/lib/build/libs/mylib-1.0-sources.jar"))
        );
        assert_eq!(artefact.should_be_published(), Ok(true));
    }

    #[rstest]
    #[case(Archive::new("t", "dist", "zip", "/o").with_appendix("docs"), "dist-docs")]
    #[case(Archive::new("t", "dist", "zip", "/o"), "dist")]
    #[case(Archive::new("t", "x", "zip", "/o").without_base_name().with_appendix("docs"), "docs")]
    #[case(Archive::new("t", "x", "zip", "/o").without_base_name(), "")]
    fn name_joins_base_and_appendix(#[case] archive: Archive, #[case] expected: &str) {
        assert_eq!(describe(archive).name(), Ok(expected.to_owned()));
    }

    #[rstest]
    fn missing_extension_and_empty_classifier() {
        let artefact = describe(
            Archive::new("t", "dist", "zip", "/o")
                .without_extension()
                .with_classifier(""),
        );
        assert_eq!(artefact.extension(), Ok(String::new()));
        assert_eq!(artefact.classifier(), Ok(None));
    }

    #[rstest]
    fn disabled_archive_is_not_published() {
        let artefact = describe(Archive::new("t", "dist", "zip", "/o").disabled());
        assert_eq!(artefact.should_be_published(), Ok(false));
    }

    #[rstest]
    fn depends_on_the_archive_task() {
        let artefact = describe(Archive::new("distZip", "dist", "zip", "/o"));
        let tasks: Vec<_> = artefact
            .build_dependencies()
            .dependencies()
            .into_iter()
            .collect();
        assert_eq!(tasks, vec![":lib:distZip".to_owned()]);
    }
}
