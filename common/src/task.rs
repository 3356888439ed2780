//! Build tasks as seen by artefact resolution.
//!
//! Resolution never runs tasks. It only reads a task's declared output files
//! or, for archive tasks, the properties that name the archive.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use thiserror::Error;

/// Errors arising from looking up a task's single output file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskOutputError {
    /// The task declares no output files.
    #[error("expected task '{task}' output files to contain exactly one file, however, it contains no files")]
    NoFiles {
        /// Path of the task.
        task: String,
    },

    /// The task declares more than one output file.
    #[error("expected task '{task}' output files to contain exactly one file, however, it contains {count} files")]
    MultipleFiles {
        /// Path of the task.
        task: String,
        /// Number of declared output files.
        count: usize,
    },
}

/// A build task.
pub trait Task: fmt::Debug + Send + Sync {
    /// Return the task path, such as `:lib:jar` or `jar`.
    fn path(&self) -> &str;

    /// Return the task's declared output files.
    fn output_files(&self) -> Vec<Utf8PathBuf>;

    /// Return whether the task is enabled.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// A task that produces a single named archive.
///
/// The archive file name follows
/// `base[-appendix][-version][-classifier][.extension]`, omitting parts that
/// are unset or empty.
pub trait ArchiveTask: Task {
    /// Return the archive base name.
    fn base_name(&self) -> Option<&str>;

    /// Return the archive appendix.
    fn appendix(&self) -> Option<&str> {
        None
    }

    /// Return the archive version.
    fn version(&self) -> Option<&str> {
        None
    }

    /// Return the archive classifier.
    fn classifier(&self) -> Option<&str> {
        None
    }

    /// Return the archive extension, without a leading dot.
    fn extension(&self) -> Option<&str>;

    /// Return the directory the archive is written to.
    fn destination_dir(&self) -> &Utf8Path;

    /// Return the archive file name.
    fn archive_file_name(&self) -> String {
        let mut name = [
            self.base_name(),
            self.appendix(),
            self.version(),
            self.classifier(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
        if let Some(ext) = self.extension().filter(|candidate| !candidate.is_empty()) {
            name.push('.');
            name.push_str(ext);
        }
        name
    }

    /// Return the full path of the archive.
    fn archive_file(&self) -> Utf8PathBuf {
        self.destination_dir().join(self.archive_file_name())
    }
}

/// Return the only output file of `task`.
///
/// # Errors
///
/// Returns [`TaskOutputError`] when the task declares zero or several
/// output files.
pub fn single_output_file(task: &dyn Task) -> Result<Utf8PathBuf, TaskOutputError> {
    let mut files = task.output_files();
    match files.len() {
        0 => Err(TaskOutputError::NoFiles {
            task: task.path().to_owned(),
        }),
        1 => files.pop().ok_or_else(|| TaskOutputError::NoFiles {
            task: task.path().to_owned(),
        }),
        count => Err(TaskOutputError::MultipleFiles {
            task: task.path().to_owned(),
            count,
        }),
    }
}

/// A task with a fixed list of output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTask {
    path: String,
    outputs: Vec<Utf8PathBuf>,
    enabled: bool,
}

impl OutputTask {
    /// Create an enabled task declaring `outputs`.
    #[must_use]
    pub fn new(path: impl Into<String>, outputs: Vec<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            outputs,
            enabled: true,
        }
    }

    /// Mark the task as disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl Task for OutputTask {
    fn path(&self) -> &str {
        &self.path
    }

    fn output_files(&self) -> Vec<Utf8PathBuf> {
        self.outputs.clone()
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// An archive task such as a jar or zip task.
///
/// # Examples
///
/// ```
/// use lazy_artefact_common::{Archive, ArchiveTask};
///
/// let jar = Archive::new(":lib:jar", "mylib", "jar", "build/libs")
///     .with_version("1.0")
///     .with_classifier("sources");
/// assert_eq!(jar.archive_file_name(), "mylib-1.0-sources.jar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    path: String,
    base_name: Option<String>,
    appendix: Option<String>,
    version: Option<String>,
    classifier: Option<String>,
    extension: Option<String>,
    destination_dir: Utf8PathBuf,
    enabled: bool,
}

impl Archive {
    /// Create an enabled archive task.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        base_name: impl Into<String>,
        extension: impl Into<String>,
        destination_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            path: path.into(),
            base_name: Some(base_name.into()),
            appendix: None,
            version: None,
            classifier: None,
            extension: Some(extension.into()),
            destination_dir: destination_dir.into(),
            enabled: true,
        }
    }

    /// Set the archive appendix.
    #[must_use]
    pub fn with_appendix(mut self, appendix: impl Into<String>) -> Self {
        self.appendix = Some(appendix.into());
        self
    }

    /// Set the archive version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the archive classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Clear the archive base name.
    #[must_use]
    pub fn without_base_name(mut self) -> Self {
        self.base_name = None;
        self
    }

    /// Clear the archive extension.
    #[must_use]
    pub fn without_extension(mut self) -> Self {
        self.extension = None;
        self
    }

    /// Mark the task as disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl Task for Archive {
    fn path(&self) -> &str {
        &self.path
    }

    fn output_files(&self) -> Vec<Utf8PathBuf> {
        vec![self.archive_file()]
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl ArchiveTask for Archive {
    fn base_name(&self) -> Option<&str> {
        self.base_name.as_deref()
    }

    fn appendix(&self) -> Option<&str> {
        self.appendix.as_deref()
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    fn destination_dir(&self) -> &Utf8Path {
        &self.destination_dir
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail fast when output lookup does not behave as expected"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn archive_name_includes_all_parts() {
        let archive = Archive::new("zip", "dist", "zip", "/out")
            .with_appendix("docs")
            .with_version("2.1")
            .with_classifier("all");
        assert_eq!(archive.archive_file_name(), "dist-docs-2.1-all.zip");
        assert_eq!(
            archive.archive_file(),
            Utf8PathBuf::from("/out/dist-docs-2.1-all.zip")
        );
    }

    #[rstest]
    fn archive_name_skips_missing_and_empty_parts() {
        let archive = Archive::new("tar", "dist", "", "/out").with_classifier("");
        assert_eq!(archive.archive_file_name(), "dist");

        let unnamed = Archive::new("jar", "x", "jar", "/out")
            .without_base_name()
            .with_appendix("api");
        assert_eq!(unnamed.archive_file_name(), "api.jar");
    }

    #[rstest]
    fn archive_outputs_its_archive() {
        let archive = Archive::new("jar", "mylib", "jar", "/out");
        assert_eq!(
            single_output_file(&archive),
            Ok(Utf8PathBuf::from("/out/mylib.jar"))
        );
    }

    #[rstest]
    fn single_output_file_rejects_empty_outputs() {
        let task = OutputTask::new(":docs", Vec::new());
        assert_eq!(
            single_output_file(&task),
            Err(TaskOutputError::NoFiles {
                task: ":docs".to_owned()
            })
        );
    }

    #[rstest]
    fn single_output_file_rejects_several_outputs() {
        let task = OutputTask::new(
            ":docs",
            vec![Utf8PathBuf::from("a.html"), Utf8PathBuf::from("b.html")],
        );
        let err = single_output_file(&task).expect_err("two outputs");
        assert_eq!(
            err,
            TaskOutputError::MultipleFiles {
                task: ":docs".to_owned(),
                count: 2
            }
        );
        assert!(err.to_string().contains("contains 2 files"));
    }

    #[rstest]
    fn disabled_task_reports_disabled() {
        assert!(!OutputTask::new("t", Vec::new()).disabled().is_enabled());
        assert!(!Archive::new("t", "a", "zip", "/").disabled().is_enabled());
    }
}
