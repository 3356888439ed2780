//! File-system locations, file notations, and path resolution.
//!
//! Values that do not identify a file directly can still be turned into one
//! by a [`PathResolver`]. [`BaseDirResolver`] resolves textual and native
//! notations relative to a base directory without touching the file system.

use camino::{Utf8Path, Utf8PathBuf};
use log::trace;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const LOG_TARGET: &str = "lazy_artefact_common::path";

/// Prefix of `file:` URIs accepted by [`BaseDirResolver`].
const FILE_SCHEME: &str = "file:";

/// A location on disk, either a regular file or a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileSystemLocation {
    /// A regular file.
    RegularFile(Utf8PathBuf),
    /// A directory.
    Directory(Utf8PathBuf),
}

impl FileSystemLocation {
    /// Return the location as a file path.
    #[must_use]
    pub fn as_file(&self) -> &Utf8Path {
        match self {
            Self::RegularFile(path) | Self::Directory(path) => path,
        }
    }
}

impl fmt::Display for FileSystemLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegularFile(path) => write!(f, "file '{path}'"),
            Self::Directory(path) => write!(f, "directory '{path}'"),
        }
    }
}

/// A value that a [`PathResolver`] can attempt to convert into a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNotation {
    /// A textual path or `file:` URI.
    Text(String),
    /// A native path that may not be valid UTF-8.
    Native(PathBuf),
}

impl From<&str> for FileNotation {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FileNotation {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<PathBuf> for FileNotation {
    fn from(value: PathBuf) -> Self {
        Self::Native(value)
    }
}

impl fmt::Display for FileNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Native(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Errors arising from converting a notation into a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathResolveError {
    /// The notation was empty or whitespace.
    #[error("a file path must not be empty")]
    Empty,

    /// The notation uses a URI scheme other than `file:`.
    #[error("cannot convert URI \"{uri}\" to a file")]
    UnsupportedScheme {
        /// The rejected URI.
        uri: String,
    },

    /// The native path is not valid UTF-8.
    #[error("path {path} is not valid UTF-8")]
    NonUtf8 {
        /// Lossy rendering of the rejected path.
        path: String,
    },

    /// The value offers no notation the resolver understands.
    #[error("cannot convert {notation} to a file")]
    UnsupportedNotation {
        /// Description of the value.
        notation: String,
    },
}

/// Converts file notations into concrete paths.
#[cfg_attr(test, mockall::automock)]
pub trait PathResolver: Send + Sync {
    /// Resolve `notation` into a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the notation cannot be interpreted as a file.
    fn resolve(&self, notation: &FileNotation) -> Result<Utf8PathBuf, PathResolveError>;
}

/// Resolves notations relative to a base directory.
///
/// # Examples
///
/// ```
/// use lazy_artefact_common::{BaseDirResolver, FileNotation, PathResolver};
///
/// let resolver = BaseDirResolver::new("/work/app");
/// let file = resolver.resolve(&FileNotation::from("build/libs/app.jar")).unwrap();
/// assert_eq!(file.as_str(), "/work/app/build/libs/app.jar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirResolver {
    base_dir: Utf8PathBuf,
}

impl BaseDirResolver {
    /// Create a resolver rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Return the base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    fn resolve_text(&self, text: &str) -> Result<Utf8PathBuf, PathResolveError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PathResolveError::Empty);
        }
        if let Some(rest) = trimmed.strip_prefix(FILE_SCHEME) {
            return Ok(file_uri_path(rest));
        }
        if has_uri_scheme(trimmed) {
            return Err(PathResolveError::UnsupportedScheme {
                uri: trimmed.to_owned(),
            });
        }
        Ok(self.anchor(Utf8Path::new(trimmed)))
    }

    fn anchor(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl PathResolver for BaseDirResolver {
    fn resolve(&self, notation: &FileNotation) -> Result<Utf8PathBuf, PathResolveError> {
        let resolved = match notation {
            FileNotation::Text(text) => self.resolve_text(text),
            FileNotation::Native(path) => Utf8PathBuf::from_path_buf(path.clone())
                .map(|utf8| self.anchor(&utf8))
                .map_err(|rejected| PathResolveError::NonUtf8 {
                    path: rejected.display().to_string(),
                }),
        }?;
        trace!(target: LOG_TARGET, "resolved {notation} to {resolved}");
        Ok(resolved)
    }
}

/// Strip the authority part of a `file:` URI.
fn file_uri_path(rest: &str) -> Utf8PathBuf {
    let path = rest
        .strip_prefix("//localhost")
        .or_else(|| rest.strip_prefix("//"))
        .unwrap_or(rest);
    Utf8PathBuf::from(path)
}

/// Return whether `text` starts with a URI scheme such as `https://`.
///
/// Single-letter schemes are treated as Windows drive letters.
fn has_uri_scheme(text: &str) -> bool {
    text.split_once("://").is_some_and(|(scheme, _)| {
        scheme.len() > 1
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail fast when a notation does not resolve as expected"
)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn resolver() -> BaseDirResolver {
        BaseDirResolver::new("/work/app")
    }

    #[rstest]
    #[case("build/libs/app.jar", "/work/app/build/libs/app.jar")]
    #[case("  build/app.zip  ", "/work/app/build/app.zip")]
    #[case("/opt/dist/app.jar", "/opt/dist/app.jar")]
    #[case("file:///opt/dist/app.jar", "/opt/dist/app.jar")]
    #[case("file://localhost/opt/app.jar", "/opt/app.jar")]
    #[case("file:/opt/app.jar", "/opt/app.jar")]
    fn resolves_text_notations(resolver: BaseDirResolver, #[case] text: &str, #[case] expected: &str) {
        let resolved = resolver
            .resolve(&FileNotation::from(text))
            .expect("notation should resolve");
        assert_eq!(resolved, Utf8PathBuf::from(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_text(resolver: BaseDirResolver, #[case] text: &str) {
        assert_eq!(
            resolver.resolve(&FileNotation::from(text)),
            Err(PathResolveError::Empty)
        );
    }

    #[rstest]
    fn rejects_remote_uri(resolver: BaseDirResolver) {
        let err = resolver
            .resolve(&FileNotation::from("https://example.test/app.jar"))
            .expect_err("remote URIs are not files");
        assert!(matches!(err, PathResolveError::UnsupportedScheme { .. }));
    }

    #[rstest]
    fn resolves_native_paths(resolver: BaseDirResolver) {
        let resolved = resolver
            .resolve(&FileNotation::from(PathBuf::from("out/app.jar")))
            .expect("UTF-8 native path");
        assert_eq!(resolved, Utf8PathBuf::from("/work/app/out/app.jar"));
    }

    #[cfg(unix)]
    #[rstest]
    fn rejects_non_utf8_native_paths(resolver: BaseDirResolver) {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = PathBuf::from(OsStr::from_bytes(b"out/\xFF.jar"));
        let err = resolver
            .resolve(&FileNotation::from(raw))
            .expect_err("non-UTF-8 path");
        assert!(matches!(err, PathResolveError::NonUtf8 { .. }));
    }

    #[rstest]
    fn location_exposes_its_file() {
        let dir = FileSystemLocation::Directory(Utf8PathBuf::from("/work/out"));
        assert_eq!(dir.as_file(), Utf8Path::new("/work/out"));
        assert_eq!(dir.to_string(), "directory '/work/out'");
    }

    #[rstest]
    fn mocked_resolver_is_consulted() {
        let mut mock = MockPathResolver::new();
        mock.expect_resolve()
            .withf(|notation| *notation == FileNotation::from("app.jar"))
            .times(1)
            .returning(|_| Ok(Utf8PathBuf::from("/mocked/app.jar")));

        let resolved = mock.resolve(&FileNotation::from("app.jar"));
        assert_eq!(resolved, Ok(Utf8PathBuf::from("/mocked/app.jar")));
    }
}
