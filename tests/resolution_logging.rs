//! Log output emitted while lazy artefacts resolve.
//!
//! Kept in its own test binary because `logtest` installs a process-wide
//! logger.

use camino::Utf8PathBuf;
use lazy_artefact::{LazyPublishArtefact, PublishArtefact};
use lazy_artefact_common::{BaseDirResolver, Provider};
use log::Level;
use logtest::Logger;
use std::sync::Arc;

const RESOLVE_TARGET: &str = "lazy_artefact::resolve";

#[test]
#[expect(deprecated, reason = "the resolver-less constructor must log a warning")]
fn resolution_is_logged_once_and_reuse_is_traced() {
    let mut logger = Logger::start();

    let provider = Arc::new(Provider::new(|| Utf8PathBuf::from("libs/mylib-1.0.jar")));
    let artefact = LazyPublishArtefact::new(provider, Arc::new(BaseDirResolver::new("/work")))
        .with_version("1.0");
    assert_eq!(artefact.name(), Ok("mylib".to_owned()));
    assert_eq!(artefact.extension(), Ok("jar".to_owned()));

    let legacy = LazyPublishArtefact::without_resolver(Arc::new(Provider::of("app.jar")));
    assert!(legacy.name().is_err());

    let mut resolutions = 0;
    let mut reuses = 0;
    let mut warnings = 0;
    while let Some(record) = logger.pop() {
        if record.target() != RESOLVE_TARGET {
            continue;
        }
        let message = record.args().to_string();
        match record.level() {
            Level::Debug if message.contains("libs/mylib-1.0.jar as path") => resolutions += 1,
            Level::Trace if message.contains("reusing resolved artefact") => reuses += 1,
            Level::Warn if message.contains("without a path resolver") => warnings += 1,
            _ => {}
        }
    }

    assert_eq!(resolutions, 1, "expected a single resolution to be logged");
    assert_eq!(reuses, 1, "expected the second access to reuse the descriptor");
    assert_eq!(warnings, 1, "expected the legacy constructor to warn");
}
