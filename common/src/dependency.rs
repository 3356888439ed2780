//! Task dependency tracking for lazily resolved artefacts.
//!
//! A [`TaskDependency`] holds dependency nodes rather than task paths. The
//! nodes are only visited when [`TaskDependency::dependencies`] is called, so
//! building a dependency graph never forces the values behind the nodes.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Separator between project and task segments in a task path.
const PATH_SEPARATOR: char = ':';

/// A node that can report the tasks it depends on.
pub trait Buildable: Send + Sync {
    /// Add this node's task dependencies to `context`.
    fn visit_dependencies(&self, context: &mut DependencyContext);
}

/// Accumulates task paths while dependency nodes are visited.
///
/// Relative task paths are qualified with the owning project path when the
/// context belongs to a project.
#[derive(Debug, Default)]
pub struct DependencyContext {
    project: Option<String>,
    tasks: BTreeSet<String>,
}

impl DependencyContext {
    /// Create an empty context, optionally associated with a project path.
    #[must_use]
    pub fn new(project: Option<&str>) -> Self {
        Self {
            project: project.map(str::to_owned),
            tasks: BTreeSet::new(),
        }
    }

    /// Record a dependency on the task at `path`.
    pub fn add_task(&mut self, path: &str) {
        let qualified = qualify(self.project.as_deref(), path);
        self.tasks.insert(qualified);
    }

    /// Visit a nested dependency node.
    pub fn add(&mut self, node: &dyn Buildable) {
        node.visit_dependencies(self);
    }

    /// Consume the context and return the collected task paths.
    #[must_use]
    pub fn into_tasks(self) -> BTreeSet<String> {
        self.tasks
    }
}

/// Qualify a relative task path with the project path.
fn qualify(project: Option<&str>, path: &str) -> String {
    match project.filter(|_| !path.starts_with(PATH_SEPARATOR)) {
        None => path.to_owned(),
        Some(prefix) if prefix.ends_with(PATH_SEPARATOR) => format!("{prefix}{path}"),
        Some(prefix) => format!("{prefix}{PATH_SEPARATOR}{path}"),
    }
}

/// A deferred set of task dependencies.
///
/// # Examples
///
/// ```
/// use lazy_artefact_common::TaskDependencyFactory;
///
/// let factory = TaskDependencyFactory::for_project(":lib");
/// let dependency = factory.for_task("jar");
/// assert!(dependency.dependencies().contains(":lib:jar"));
/// ```
#[derive(Clone, Default)]
pub struct TaskDependency {
    project: Option<String>,
    nodes: Vec<Arc<dyn Buildable>>,
}

impl TaskDependency {
    /// Visit every node and return the qualified task paths.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<String> {
        let mut context = DependencyContext::new(self.project.as_deref());
        for node in &self.nodes {
            context.add(node.as_ref());
        }
        context.into_tasks()
    }

    /// Return whether no dependency nodes were registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Buildable for TaskDependency {
    fn visit_dependencies(&self, context: &mut DependencyContext) {
        for node in &self.nodes {
            context.add(node.as_ref());
        }
    }
}

impl fmt::Debug for TaskDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDependency")
            .field("project", &self.project)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// A dependency node naming a single task.
#[derive(Debug, Clone)]
struct TaskPathNode(String);

impl Buildable for TaskPathNode {
    fn visit_dependencies(&self, context: &mut DependencyContext) {
        context.add_task(&self.0);
    }
}

/// Creates [`TaskDependency`] values for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDependencyFactory {
    project: Option<String>,
}

impl TaskDependencyFactory {
    /// A factory that leaves task paths unqualified.
    #[must_use]
    pub const fn with_no_associated_project() -> Self {
        Self { project: None }
    }

    /// A factory that qualifies relative task paths with `project`.
    #[must_use]
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
        }
    }

    /// Return the associated project path, if any.
    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// A dependency that visits `node` when queried.
    #[must_use]
    pub fn visiting_dependencies(&self, node: Arc<dyn Buildable>) -> TaskDependency {
        TaskDependency {
            project: self.project.clone(),
            nodes: vec![node],
        }
    }

    /// A dependency on a single task.
    #[must_use]
    pub fn for_task(&self, task_path: impl Into<String>) -> TaskDependency {
        self.visiting_dependencies(Arc::new(TaskPathNode(task_path.into())))
    }

    /// A dependency with no tasks.
    #[must_use]
    pub fn empty(&self) -> TaskDependency {
        TaskDependency {
            project: self.project.clone(),
            nodes: Vec::new(),
        }
    }
}
