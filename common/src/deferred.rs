//! Deferred values that are computed on first demand and cached.
//!
//! A [`Provider`] wraps a producer closure. Forcing the provider runs the
//! closure at most once; every later force returns the cached value. A
//! provider also acts as a dependency node: the tasks registered with
//! [`Provider::built_by`] are reported without forcing the value.

use crate::dependency::{Buildable, DependencyContext};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;

type Producer<T> = Box<dyn FnOnce() -> Option<T> + Send>;

/// Errors arising from forcing a deferred value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider has no value to offer.
    #[error("cannot query the value of {provider} because it has no value available")]
    MissingValue {
        /// Display name of the provider.
        provider: String,
    },

    /// An earlier force panicked inside the producer, which was consumed.
    #[error("cannot query the value of {provider} because its producer failed")]
    ProducerFailed {
        /// Display name of the provider.
        provider: String,
    },
}

/// A deferred value of type `T`, forced at most once.
///
/// # Examples
///
/// ```
/// use lazy_artefact_common::Provider;
///
/// let provider = Provider::new(|| 40 + 2);
/// assert_eq!(provider.force().ok(), Some(&42));
/// ```
pub struct Provider<T> {
    display_name: String,
    producers: Vec<String>,
    producer: Mutex<Option<Producer<T>>>,
    value: OnceCell<Option<T>>,
}

impl<T> Provider<T> {
    /// Create a provider whose value is computed by `produce`.
    #[must_use]
    pub fn new<F>(produce: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::from_producer(Box::new(move || Some(produce())))
    }

    /// Create a provider whose producer may report that no value exists.
    #[must_use]
    pub fn optional<F>(produce: F) -> Self
    where
        F: FnOnce() -> Option<T> + Send + 'static,
    {
        Self::from_producer(Box::new(produce))
    }

    /// Create a provider that already holds `value`.
    #[must_use]
    pub fn of(value: T) -> Self {
        Self {
            display_name: "fixed provider".to_owned(),
            producers: Vec::new(),
            producer: Mutex::new(None),
            value: OnceCell::with_value(Some(value)),
        }
    }

    /// Create a provider with no value.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            display_name: "absent provider".to_owned(),
            producers: Vec::new(),
            producer: Mutex::new(None),
            value: OnceCell::with_value(None),
        }
    }

    fn from_producer(producer: Producer<T>) -> Self {
        Self {
            display_name: "provider".to_owned(),
            producers: Vec::new(),
            producer: Mutex::new(Some(producer)),
            value: OnceCell::new(),
        }
    }

    /// Record a task that produces this provider's value.
    #[must_use]
    pub fn built_by(mut self, task_path: impl Into<String>) -> Self {
        self.producers.push(task_path.into());
        self
    }

    /// Replace the name used in error messages.
    #[must_use]
    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Return the name used in error messages.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Return the task paths registered with [`Self::built_by`].
    #[must_use]
    pub fn producers(&self) -> &[String] {
        &self.producers
    }

    /// Return whether the value has already been computed.
    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.value.get().is_some()
    }

    /// Compute the value if needed and return it.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingValue`] when the producer yielded no
    /// value. The outcome is cached, so an absent provider keeps failing
    /// without re-running its producer.
    ///
    /// Returns [`ProviderError::ProducerFailed`] when an earlier force
    /// panicked inside the producer. The cell stays empty in that case.
    pub fn force(&self) -> Result<&T, ProviderError> {
        self.value
            .get_or_try_init(|| {
                let producer = self
                    .producer
                    .lock()
                    .ok()
                    .and_then(|mut guard| guard.take());
                producer
                    .map(|produce| produce())
                    .ok_or_else(|| ProviderError::ProducerFailed {
                        provider: self.display_name.clone(),
                    })
            })?
            .as_ref()
            .ok_or_else(|| ProviderError::MissingValue {
                provider: self.display_name.clone(),
            })
    }
}

impl<T> Buildable for Provider<T>
where
    T: Send + Sync,
{
    fn visit_dependencies(&self, context: &mut DependencyContext) {
        for task in self.producers() {
            context.add_task(task);
        }
    }
}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("display_name", &self.display_name)
            .field("producers", &self.producers)
            .field("forced", &self.is_forced())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail fast when a provider does not behave as expected"
)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> Provider<String> {
        let calls = Arc::clone(counter);
        Provider::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            "value".to_owned()
        })
    }

    #[rstest]
    fn force_runs_producer_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let provider = counting(&counter);

        assert!(!provider.is_forced());
        assert_eq!(provider.force().expect("value"), "value");
        assert_eq!(provider.force().expect("value"), "value");
        assert!(provider.is_forced());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn fixed_provider_is_already_forced() {
        let provider = Provider::of(7_u8);
        assert!(provider.is_forced());
        assert_eq!(provider.force().ok(), Some(&7));
    }

    #[rstest]
    fn absent_provider_reports_missing_value() {
        let provider = Provider::<String>::absent().named("archive location");
        let err = provider.force().expect_err("absent provider must fail");
        assert_eq!(
            err,
            ProviderError::MissingValue {
                provider: "archive location".to_owned()
            }
        );
        assert!(err.to_string().contains("archive location"));
    }

    #[rstest]
    fn panicking_producer_is_not_reported_as_missing() {
        let provider = Provider::<String>::new(|| panic!("producer exploded")).named("jar file");

        let outcome = catch_unwind(AssertUnwindSafe(|| provider.force().map(Clone::clone)));
        assert!(outcome.is_err());

        assert_eq!(
            provider.force(),
            Err(ProviderError::ProducerFailed {
                provider: "jar file".to_owned()
            })
        );
        assert!(!provider.is_forced());
    }

    #[rstest]
    fn builders_record_name_and_producers() {
        let provider = Provider::of(1_u8).named("version code").built_by("generate");

        assert_eq!(provider.display_name(), "version code");
        assert_eq!(provider.producers(), ["generate".to_owned()]);
    }

    #[rstest]
    fn optional_provider_caches_missing_outcome() {
        let counter = Arc::new(AtomicUsize::new(0));
        let calls = Arc::clone(&counter);
        let provider = Provider::<u8>::optional(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            None
        });

        assert!(provider.force().is_err());
        assert!(provider.force().is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn visiting_reports_producers_without_forcing() {
        let counter = Arc::new(AtomicUsize::new(0));
        let provider = counting(&counter).built_by("jar").built_by(":app:assemble");

        let mut context = DependencyContext::new(None);
        provider.visit_dependencies(&mut context);

        let tasks: Vec<_> = context.into_tasks().into_iter().collect();
        assert_eq!(tasks, vec![":app:assemble".to_owned(), "jar".to_owned()]);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
