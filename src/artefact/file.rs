//! Artefact coordinates derived from a file name.
//!
//! File names follow `name[-version][-classifier].extension`. When the
//! version is known it separates the name from the classifier; otherwise the
//! name is everything before the last dot.

use camino::Utf8Path;

/// Name, extension, and classifier derived from an artefact file.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use lazy_artefact::ArtefactFile;
///
/// let file = ArtefactFile::new(Utf8Path::new("libs/mylib-1.0-sources.jar"), Some("1.0"));
/// assert_eq!(file.name(), "mylib");
/// assert_eq!(file.extension(), "jar");
/// assert_eq!(file.classifier(), Some("sources"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactFile {
    name: String,
    extension: String,
    classifier: Option<String>,
}

impl ArtefactFile {
    /// Derive coordinates from the final component of `file`.
    #[must_use]
    pub fn new(file: &Utf8Path, version: Option<&str>) -> Self {
        let file_name = file.file_name().unwrap_or_default();
        version
            .filter(|v| !v.is_empty())
            .and_then(|v| split_around_version(file_name, v))
            .unwrap_or_else(|| split_at_extension(file_name))
    }

    /// Return the artefact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the extension, or an empty string when the file has none.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Return the classifier, if any.
    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    fn from_parts(name: &str, extension: &str, classifier: &str) -> Self {
        Self {
            name: name.to_owned(),
            extension: extension.to_owned(),
            classifier: (!classifier.is_empty()).then(|| classifier.to_owned()),
        }
    }
}

/// Split `file_name` using the first `-<version>` marker.
///
/// Returns `None` when the marker is absent or is not followed by the end of
/// the name, a classifier, or the final extension.
fn split_around_version(file_name: &str, version: &str) -> Option<ArtefactFile> {
    let marker = format!("-{version}");
    let start = file_name.find(&marker)?;
    let (name, rest) = file_name.split_at(start);
    let after = rest.strip_prefix(marker.as_str())?;

    if after.is_empty() {
        return Some(ArtefactFile::from_parts(name, "", ""));
    }
    if let Some(tail) = after.strip_prefix('-') {
        let (classifier, extension) = tail.rsplit_once('.').unwrap_or((tail, ""));
        return Some(ArtefactFile::from_parts(name, extension, classifier));
    }
    after
        .strip_prefix('.')
        .filter(|extension| !extension.contains('.'))
        .map(|extension| ArtefactFile::from_parts(name, extension, ""))
}

fn split_at_extension(file_name: &str) -> ArtefactFile {
    let (name, extension) = file_name.rsplit_once('.').unwrap_or((file_name, ""));
    ArtefactFile::from_parts(name, extension, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn derive(path: &str, version: Option<&str>) -> (String, String, Option<String>) {
        let file = ArtefactFile::new(Utf8Path::new(path), version);
        (
            file.name().to_owned(),
            file.extension().to_owned(),
            file.classifier().map(str::to_owned),
        )
    }

    #[rstest]
    #[case("mylib-1.0-sources.jar", Some("1.0"), "mylib", "jar", Some("sources"))]
    #[case("mylib-1.0.jar", Some("1.0"), "mylib", "jar", None)]
    #[case("/build/libs/mylib-1.0.jar", Some("1.0"), "mylib", "jar", None)]
    #[case("mylib-1.0", Some("1.0"), "mylib", "", None)]
    #[case("mylib-1.0-javadoc", Some("1.0"), "mylib", "", Some("javadoc"))]
    #[case("mylib-1.0-all.tar.gz", Some("1.0"), "mylib", "gz", Some("all.tar"))]
    #[case("mylib-1.0.tar.gz", Some("1.0"), "mylib-1.0.tar", "gz", None)]
    #[case("mylib-1.0.jar", None, "mylib-1.0", "jar", None)]
    #[case("mylib-1.0.jar", Some(""), "mylib-1.0", "jar", None)]
    #[case("mylib-1.0.jar", Some("2.0"), "mylib-1.0", "jar", None)]
    #[case("mylib-1.0x.jar", Some("1.0"), "mylib-1.0x", "jar", None)]
    #[case("README", None, "README", "", None)]
    #[case(".profile", None, "", "profile", None)]
    #[case("", Some("1.0"), "", "", None)]
    fn derives_coordinates(
        #[case] path: &str,
        #[case] version: Option<&str>,
        #[case] name: &str,
        #[case] extension: &str,
        #[case] classifier: Option<&str>,
    ) {
        assert_eq!(
            derive(path, version),
            (
                name.to_owned(),
                extension.to_owned(),
                classifier.map(str::to_owned)
            )
        );
    }

    // Only the first `-<version>` marker is considered, even when a later
    // one would split cleanly.
    #[rstest]
    fn first_version_marker_wins() {
        let (name, extension, classifier) = derive("app-1.0-1.0-tests.jar", Some("1.0"));
        assert_eq!(name, "app");
        assert_eq!(extension, "jar");
        assert_eq!(classifier.as_deref(), Some("1.0-tests"));

        let (fallback_name, fallback_extension, fallback_classifier) =
            derive("lib-1.0x-1.0.jar", Some("1.0"));
        assert_eq!(fallback_name, "lib-1.0x-1.0");
        assert_eq!(fallback_extension, "jar");
        assert_eq!(fallback_classifier, None);
    }

    #[rstest]
    fn handles_multibyte_names() {
        let (name, extension, classifier) = derive("bibliothèque-1.0-données.zip", Some("1.0"));
        assert_eq!(name, "bibliothèque");
        assert_eq!(extension, "zip");
        assert_eq!(classifier.as_deref(), Some("données"));
    }
}
