//! The guard that joins data loaders before a navigation proceeds

use futures::future::join_all;
use tokio::time::Instant;

use super::loader::{LoaderError, LoaderRegistry};
use super::observer::{GuardObserver, TracingGuardObserver};

/// How a single loader settled
#[derive(Debug)]
pub struct LoaderSettlement {
    /// Name the loader was registered under
    pub name: String,
    /// What the loader produced
    pub outcome: Result<(), LoaderError>,
}

impl LoaderSettlement {
    /// Whether the loader settled with an error
    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Result of a guard evaluation
#[derive(Debug)]
pub struct GuardReport {
    /// Whether navigation may proceed
    pub allowed: bool,
    /// One entry per loader, in registration order
    pub settlements: Vec<LoaderSettlement>,
}

impl GuardReport {
    /// Loaders that settled with an error
    pub fn failures(&self) -> impl Iterator<Item = &LoaderSettlement> {
        self.settlements.iter().filter(|s| s.is_failure())
    }

    /// Whether every loader settled successfully
    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Guard that runs every registered data loader before allowing navigation
///
/// The loaders are started together and joined: the guard waits for all of
/// them, never just the first. A failing loader is reported to the observer
/// and otherwise ignored, so the guard never denies navigation. A loader
/// that never settles keeps the guard pending; there is no timeout.
pub struct DataLoaderGuard<C, O = TracingGuardObserver> {
    registry: LoaderRegistry<C>,
    observer: O,
}

impl<C> DataLoaderGuard<C, TracingGuardObserver> {
    /// Create a guard over a registry, logging failures with `tracing`
    pub fn new(registry: LoaderRegistry<C>) -> Self {
        Self {
            registry,
            observer: TracingGuardObserver,
        }
    }
}

impl<C, O> DataLoaderGuard<C, O> {
    /// Replace the observer
    pub fn with_observer<O2>(self, observer: O2) -> DataLoaderGuard<C, O2> {
        DataLoaderGuard {
            registry: self.registry,
            observer,
        }
    }

    /// The loaders this guard runs
    pub fn registry(&self) -> &LoaderRegistry<C> {
        &self.registry
    }
}

impl<C, O> DataLoaderGuard<C, O>
where
    O: GuardObserver,
{
    /// Decide whether navigation to `context` may proceed
    ///
    /// Resolves to `true` once every loader has settled, whatever they
    /// produced. With no loaders registered it resolves on the first poll.
    pub async fn can_activate(&self, context: &C) -> bool {
        self.evaluate(context).await.allowed
    }

    /// Run every loader for `context` and report how each one settled
    pub async fn evaluate(&self, context: &C) -> GuardReport {
        if self.registry.is_empty() {
            return GuardReport {
                allowed: true,
                settlements: Vec::new(),
            };
        }

        let loader_count = self.registry.len();
        let start = Instant::now();
        self.observer.on_evaluate_start(loader_count);

        let pending: Vec<_> = self
            .registry
            .iter()
            .map(|loader| loader.load(context))
            .collect();
        let outcomes = join_all(pending).await;

        let settlements: Vec<LoaderSettlement> = self
            .registry
            .names()
            .zip(outcomes)
            .map(|(name, outcome)| LoaderSettlement {
                name: name.to_string(),
                outcome,
            })
            .collect();

        let mut failed = 0;
        for settlement in &settlements {
            if let Err(err) = &settlement.outcome {
                failed += 1;
                self.observer.on_loader_failed(&settlement.name, err);
            }
        }
        self.observer.on_settled(loader_count, failed, start.elapsed());

        // Failures never deny navigation
        GuardReport {
            allowed: true,
            settlements,
        }
    }
}
