//! Guard observation and logging

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::loader::LoaderError;

/// Observer trait for data loader guard events
pub trait GuardObserver: Send + Sync {
    /// Called before the loaders are started
    fn on_evaluate_start(&self, loader_count: usize);

    /// Called once per loader that settled with an error
    fn on_loader_failed(&self, loader: &str, error: &LoaderError);

    /// Called once every loader has settled
    fn on_settled(&self, loader_count: usize, failed: usize, elapsed: Duration);
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpGuardObserver;

impl GuardObserver for NoOpGuardObserver {
    fn on_evaluate_start(&self, _loader_count: usize) {}

    fn on_loader_failed(&self, _loader: &str, _error: &LoaderError) {}

    fn on_settled(&self, _loader_count: usize, _failed: usize, _elapsed: Duration) {}
}

/// An observer that logs guard events using the `tracing` crate
///
/// Failed loaders are logged at ERROR, one line each, followed by a summary.
/// Everything else goes to DEBUG.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingGuardObserver;

impl GuardObserver for TracingGuardObserver {
    fn on_evaluate_start(&self, loader_count: usize) {
        tracing::debug!(loaders = loader_count, "running data loaders");
    }

    fn on_loader_failed(&self, loader: &str, error: &LoaderError) {
        tracing::error!(loader = %loader, error = %error, "data loader failed");
    }

    fn on_settled(&self, loader_count: usize, failed: usize, elapsed: Duration) {
        if failed > 0 {
            tracing::error!(
                loaders = loader_count,
                failed = failed,
                elapsed_ms = elapsed.as_millis() as u64,
                "some data loaders failed, allowing navigation anyway"
            );
        } else {
            tracing::debug!(
                loaders = loader_count,
                elapsed_ms = elapsed.as_millis() as u64,
                "all data loaders settled"
            );
        }
    }
}

/// An observer that records guard events
///
/// Mostly useful in tests.
#[derive(Debug, Default)]
pub struct StatsGuardObserver {
    evaluations: AtomicU32,
    settlements: AtomicU32,
    failed_loaders: Mutex<Vec<String>>,
}

impl StatsGuardObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of evaluations that started loaders
    pub fn evaluations(&self) -> u32 {
        self.evaluations.load(Ordering::SeqCst)
    }

    /// Number of evaluations where every loader settled
    pub fn settlements(&self) -> u32 {
        self.settlements.load(Ordering::SeqCst)
    }

    /// Names of loaders reported as failed, in report order
    pub fn failed_loaders(&self) -> Vec<String> {
        self.failed_loaders
            .lock()
            .map(|names| names.clone())
            .unwrap_or_default()
    }
}

impl GuardObserver for StatsGuardObserver {
    fn on_evaluate_start(&self, _loader_count: usize) {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
    }

    fn on_loader_failed(&self, loader: &str, _error: &LoaderError) {
        if let Ok(mut names) = self.failed_loaders.lock() {
            names.push(loader.to_string());
        }
    }

    fn on_settled(&self, _loader_count: usize, _failed: usize, _elapsed: Duration) {
        self.settlements.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: GuardObserver + ?Sized> GuardObserver for std::sync::Arc<T> {
    fn on_evaluate_start(&self, loader_count: usize) {
        (**self).on_evaluate_start(loader_count)
    }

    fn on_loader_failed(&self, loader: &str, error: &LoaderError) {
        (**self).on_loader_failed(loader, error)
    }

    fn on_settled(&self, loader_count: usize, failed: usize, elapsed: Duration) {
        (**self).on_settled(loader_count, failed, elapsed)
    }
}

impl<T: GuardObserver + ?Sized> GuardObserver for Box<T> {
    fn on_evaluate_start(&self, loader_count: usize) {
        (**self).on_evaluate_start(loader_count)
    }

    fn on_loader_failed(&self, loader: &str, error: &LoaderError) {
        (**self).on_loader_failed(loader, error)
    }

    fn on_settled(&self, loader_count: usize, failed: usize, elapsed: Duration) {
        (**self).on_settled(loader_count, failed, elapsed)
    }
}
