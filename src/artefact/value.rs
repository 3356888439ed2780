//! Shapes a deferred artefact value can take.
//!
//! [`ArtefactValue`] exposes capability probes rather than a single tag, so
//! one value may qualify for several shapes. [`Shape::of`] applies the
//! probes in priority order and the first match wins.

use camino::{Utf8Path, Utf8PathBuf};
use lazy_artefact_common::{
    Archive, ArchiveTask, FileNotation, FileSystemLocation, OutputTask, Task,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// A value that a lazy artefact can be resolved from.
///
/// Every probe defaults to "not this shape". Values that match none of the
/// probes may still offer a [`FileNotation`] for a path resolver.
pub trait ArtefactValue: fmt::Debug + Send + Sync {
    /// Return the value as a file-system location.
    fn as_location(&self) -> Option<FileSystemLocation> {
        None
    }

    /// Return the value as a raw path.
    fn as_path(&self) -> Option<Utf8PathBuf> {
        None
    }

    /// Return the value as an archive task.
    fn as_archive_task(&self) -> Option<Arc<dyn ArchiveTask>> {
        None
    }

    /// Return the value as a generic task.
    fn as_task(&self) -> Option<Arc<dyn Task>> {
        None
    }

    /// Return a notation a path resolver can convert into a file.
    fn file_notation(&self) -> Option<FileNotation> {
        None
    }

    /// Describe the value in error messages.
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

/// The resolution strategy selected for a value.
#[derive(Debug)]
pub(crate) enum Shape {
    Location(FileSystemLocation),
    Path(Utf8PathBuf),
    Archive(Arc<dyn ArchiveTask>),
    Task(Arc<dyn Task>),
    Unrecognised,
}

impl Shape {
    /// Classify `value`, preferring locations, then paths, then archive
    /// tasks, then generic tasks.
    pub(crate) fn of(value: &dyn ArtefactValue) -> Self {
        value
            .as_location()
            .map(Self::Location)
            .or_else(|| value.as_path().map(Self::Path))
            .or_else(|| value.as_archive_task().map(Self::Archive))
            .or_else(|| value.as_task().map(Self::Task))
            .unwrap_or(Self::Unrecognised)
    }

    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::Location(_) => "file-system location",
            Self::Path(_) => "path",
            Self::Archive(_) => "archive task",
            Self::Task(_) => "task",
            Self::Unrecognised => "unrecognised value",
        }
    }
}

impl ArtefactValue for FileSystemLocation {
    fn as_location(&self) -> Option<FileSystemLocation> {
        Some(self.clone())
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl ArtefactValue for Utf8PathBuf {
    fn as_path(&self) -> Option<Utf8PathBuf> {
        Some(self.clone())
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl ArtefactValue for &'static Utf8Path {
    fn as_path(&self) -> Option<Utf8PathBuf> {
        Some(self.to_path_buf())
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

/// Native paths count as raw paths only when they are valid UTF-8; other
/// paths are left to the path resolver.
impl ArtefactValue for PathBuf {
    fn as_path(&self) -> Option<Utf8PathBuf> {
        Utf8Path::from_path(self).map(Utf8Path::to_path_buf)
    }

    fn file_notation(&self) -> Option<FileNotation> {
        Some(FileNotation::Native(self.clone()))
    }

    fn describe(&self) -> String {
        self.display().to_string()
    }
}

impl ArtefactValue for String {
    fn file_notation(&self) -> Option<FileNotation> {
        Some(FileNotation::Text(self.clone()))
    }

    fn describe(&self) -> String {
        self.clone()
    }
}

impl ArtefactValue for &'static str {
    fn file_notation(&self) -> Option<FileNotation> {
        Some(FileNotation::from(*self))
    }

    fn describe(&self) -> String {
        (*self).to_owned()
    }
}

impl ArtefactValue for Arc<Archive> {
    fn as_archive_task(&self) -> Option<Arc<dyn ArchiveTask>> {
        Some(Arc::clone(self) as Arc<dyn ArchiveTask>)
    }

    fn as_task(&self) -> Option<Arc<dyn Task>> {
        Some(Arc::clone(self) as Arc<dyn Task>)
    }

    fn describe(&self) -> String {
        format!("task '{}'", self.path())
    }
}

impl ArtefactValue for Arc<OutputTask> {
    fn as_task(&self) -> Option<Arc<dyn Task>> {
        Some(Arc::clone(self) as Arc<dyn Task>)
    }

    fn describe(&self) -> String {
        format!("task '{}'", self.path())
    }
}

impl ArtefactValue for Box<dyn ArtefactValue> {
    fn as_location(&self) -> Option<FileSystemLocation> {
        (**self).as_location()
    }

    fn as_path(&self) -> Option<Utf8PathBuf> {
        (**self).as_path()
    }

    fn as_archive_task(&self) -> Option<Arc<dyn ArchiveTask>> {
        (**self).as_archive_task()
    }

    fn as_task(&self) -> Option<Arc<dyn Task>> {
        (**self).as_task()
    }

    fn file_notation(&self) -> Option<FileNotation> {
        (**self).file_notation()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct Opaque;

    impl ArtefactValue for Opaque {}

    #[rstest]
    fn classifies_each_builtin_shape() {
        let location = FileSystemLocation::RegularFile(Utf8PathBuf::from("/o/a.jar"));
        assert!(matches!(Shape::of(&location), Shape::Location(_)));
        assert!(matches!(
            Shape::of(&Utf8PathBuf::from("a.jar")),
            Shape::Path(_)
        ));
        assert!(matches!(
            Shape::of(&Arc::new(Archive::new("jar", "a", "jar", "/o"))),
            Shape::Archive(_)
        ));
        assert!(matches!(
            Shape::of(&Arc::new(OutputTask::new("t", Vec::new()))),
            Shape::Task(_)
        ));
        assert!(matches!(Shape::of(&"a.jar"), Shape::Unrecognised));
        assert!(matches!(Shape::of(&Opaque), Shape::Unrecognised));
    }

    #[rstest]
    fn archive_outranks_generic_task() {
        let archive = Arc::new(Archive::new("jar", "a", "jar", "/o"));
        assert!(archive.as_task().is_some());
        assert_eq!(Shape::of(&archive).label(), "archive task");
    }

    #[rstest]
    fn boxed_values_forward_probes() {
        let boxed: Box<dyn ArtefactValue> = Box::new(Utf8PathBuf::from("libs/a.jar"));
        assert_eq!(boxed.as_path(), Some(Utf8PathBuf::from("libs/a.jar")));
        assert_eq!(boxed.describe(), "libs/a.jar");
    }

    #[rstest]
    fn default_description_uses_debug() {
        assert_eq!(Opaque.describe(), "Opaque");
        assert!(Opaque.file_notation().is_none());
    }
}
