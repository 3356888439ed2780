//! Behaviour-driven tests for lazy artefact resolution.
//!
//! Scenarios build a lazy artefact over a counting provider and check which
//! descriptor, dependency set, or error each kind of deferred value yields.
//! Tests use the rstest-bdd v0.5.0 mutable world pattern.

use camino::Utf8PathBuf;
use lazy_artefact::{ArtefactError, ArtefactValue, LazyPublishArtefact, PublishArtefact};
use lazy_artefact_common::{
    Archive, BaseDirResolver, OutputTask, Provider, TaskDependencyFactory, TaskOutputError,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

type Value = Box<dyn ArtefactValue>;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

struct ResolutionWorld {
    calls: Arc<AtomicUsize>,
    provider: Option<Arc<Provider<Value>>>,
    version: Option<String>,
    project: Option<String>,
    without_resolver: bool,
    artefact: Option<LazyPublishArtefact<Value>>,
    outcome: Option<Result<String, ArtefactError>>,
    dependencies: Option<BTreeSet<String>>,
}

#[expect(
    clippy::expect_used,
    reason = "steps fail fast when the scenario skipped a prerequisite"
)]
impl ResolutionWorld {
    fn defer(&mut self, value: Value, producer: Option<String>) {
        let counter = Arc::clone(&self.calls);
        let mut provider = Provider::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            value
        });
        if let Some(task) = producer {
            provider = provider.built_by(task);
        }
        self.provider = Some(Arc::new(provider));
    }

    #[expect(deprecated, reason = "scenarios cover the resolver-less construction path")]
    fn artefact(&mut self) -> &LazyPublishArtefact<Value> {
        if self.artefact.is_none() {
            let provider = Arc::clone(self.provider.as_ref().expect("provider set"));
            let base = if self.without_resolver {
                LazyPublishArtefact::without_resolver(provider)
            } else {
                LazyPublishArtefact::new(provider, Arc::new(BaseDirResolver::new("/work")))
            };
            let factory = self
                .project
                .as_deref()
                .map_or_else(TaskDependencyFactory::with_no_associated_project, |project| {
                    TaskDependencyFactory::for_project(project)
                });
            let mut artefact = base.with_dependency_factory(factory);
            if let Some(version) = self.version.as_deref() {
                artefact = artefact.with_version(version);
            }
            self.artefact = Some(artefact);
        }
        self.artefact.as_ref().expect("artefact built above")
    }

    fn resolved(&self) -> &LazyPublishArtefact<Value> {
        self.artefact.as_ref().expect("artefact requested")
    }

    fn outcome(&self) -> &Result<String, ArtefactError> {
        self.outcome.as_ref().expect("name requested")
    }

    fn dependencies(&self) -> &BTreeSet<String> {
        self.dependencies.as_ref().expect("dependencies requested")
    }
}

#[fixture]
fn world() -> ResolutionWorld {
    ResolutionWorld {
        calls: Arc::new(AtomicUsize::new(0)),
        provider: None,
        version: None,
        project: None,
        without_resolver: false,
        artefact: None,
        outcome: None,
        dependencies: None,
    }
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a deferred file \"{path}\"")]
fn given_deferred_path(world: &mut ResolutionWorld, path: String) {
    world.defer(Box::new(Utf8PathBuf::from(path)), None);
}

#[given("a path \"{path}\" deferred behind task \"{task}\"")]
fn given_deferred_path_built_by(world: &mut ResolutionWorld, path: String, task: String) {
    world.defer(Box::new(Utf8PathBuf::from(path)), Some(task));
}

#[given("a deferred archive \"{base}\" with classifier \"{classifier}\" and extension \"{extension}\"")]
fn given_deferred_archive(
    world: &mut ResolutionWorld,
    base: String,
    classifier: String,
    extension: String,
) {
    let archive = Archive::new("archive", base, extension, "/work/build/libs")
        .with_version("9.9")
        .with_classifier(classifier);
    world.defer(Box::new(Arc::new(archive)), None);
}

#[given("a deferred opaque value \"{text}\"")]
fn given_deferred_opaque(world: &mut ResolutionWorld, text: String) {
    world.defer(Box::new(text), None);
}

#[given("a deferred task \"{task}\" with {count} output files")]
fn given_deferred_task(world: &mut ResolutionWorld, task: String, count: usize) {
    let outputs = (0..count)
        .map(|index| Utf8PathBuf::from(format!("/work/out/part-{index}.html")))
        .collect();
    world.defer(Box::new(Arc::new(OutputTask::new(task, outputs))), None);
}

#[given("the artefact version \"{version}\"")]
fn given_version(world: &mut ResolutionWorld, version: String) {
    world.version = Some(version);
}

#[given("the owning project \"{project}\"")]
fn given_project(world: &mut ResolutionWorld, project: String) {
    world.project = Some(project);
}

#[given("no path resolver")]
fn given_no_resolver(world: &mut ResolutionWorld) {
    world.without_resolver = true;
}

#[when("the artefact name is requested")]
fn when_name_requested(world: &mut ResolutionWorld) {
    let outcome = world.artefact().name();
    world.outcome = Some(outcome);
}

#[when("the build dependencies are requested")]
fn when_dependencies_requested(world: &mut ResolutionWorld) {
    let dependencies = world.artefact().build_dependencies().dependencies();
    world.dependencies = Some(dependencies);
}

#[then("the name is \"{expected}\"")]
fn then_name_is(world: &mut ResolutionWorld, expected: String) {
    assert_eq!(world.outcome(), &Ok(expected));
}

#[then("the extension is \"{expected}\"")]
fn then_extension_is(world: &mut ResolutionWorld, expected: String) {
    assert_eq!(world.resolved().extension(), Ok(expected));
}

#[then("the classifier is \"{expected}\"")]
fn then_classifier_is(world: &mut ResolutionWorld, expected: String) {
    assert_eq!(world.resolved().classifier(), Ok(Some(expected)));
}

#[then("the value was forced {count} times")]
fn then_forced(world: &mut ResolutionWorld, count: usize) {
    assert_eq!(world.calls.load(Ordering::SeqCst), count);
}

#[then("the dependencies contain \"{task}\"")]
fn then_dependencies_contain(world: &mut ResolutionWorld, task: String) {
    let dependencies = world.dependencies();
    let expected = BTreeSet::from([task]);
    assert!(
        dependencies.is_superset(&expected),
        "expected {expected:?} in {dependencies:?}"
    );
}

#[then("resolution fails because no path resolver was provided")]
fn then_missing_resolver(world: &mut ResolutionWorld) {
    assert!(matches!(
        world.outcome(),
        Err(ArtefactError::MissingResolver { .. })
    ));
}

#[then("resolution fails because the task has {count} output files")]
fn then_task_output_error(world: &mut ResolutionWorld, count: usize) {
    let outcome = world.outcome();
    assert!(
        matches!(
            outcome,
            Err(ArtefactError::TaskOutput(TaskOutputError::MultipleFiles { count: actual, .. }))
                if *actual == count
        ),
        "unexpected outcome {outcome:?}"
    );
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/lazy_artefact.feature",
    name = "Derive coordinates from a versioned file name"
)]
fn scenario_versioned_file_name(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lazy_artefact.feature",
    name = "Report dependencies before resolution"
)]
fn scenario_dependencies_before_resolution(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lazy_artefact.feature",
    name = "Resolve an archive task from its naming properties"
)]
fn scenario_archive_task(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lazy_artefact.feature",
    name = "Resolve an opaque value through the path resolver"
)]
fn scenario_opaque_with_resolver(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lazy_artefact.feature",
    name = "Reject an opaque value without a path resolver"
)]
fn scenario_opaque_without_resolver(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/lazy_artefact.feature",
    name = "Reject a task with several output files"
)]
fn scenario_task_with_several_outputs(world: ResolutionWorld) {
    let _ = world;
}
