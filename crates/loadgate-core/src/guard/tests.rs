//! Scenario tests for the data loader guard

use super::*;
use futures::FutureExt;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Clone)]
struct RouteSnapshot {
    path: String,
}

fn route(path: &str) -> RouteSnapshot {
    RouteSnapshot {
        path: path.to_string(),
    }
}

/// Loader that counts calls and settles after `delay`
fn delayed(
    calls: &Arc<AtomicU32>,
    delay: Duration,
    outcome: fn() -> Result<(), LoaderError>,
) -> impl DataLoader<RouteSnapshot> {
    let calls = Arc::clone(calls);
    loader_fn(move |_: &RouteSnapshot| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::time::sleep(delay).await;
            outcome()
        }
    })
}

fn ok() -> Result<(), LoaderError> {
    Ok(())
}

fn fail() -> Result<(), LoaderError> {
    Err(LoaderError::failed("repository unavailable"))
}

/// Log sink shared between a test and its subscriber
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

struct LogBufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn empty_registry_allows_without_suspending() {
    let guard = DataLoaderGuard::new(LoaderRegistry::<RouteSnapshot>::new());

    let allowed = guard.can_activate(&route("/personal-files")).now_or_never();

    assert_eq!(allowed, Some(true));
}

#[test]
fn empty_registry_reports_nothing_to_the_observer() {
    let observer = Arc::new(StatsGuardObserver::new());
    let guard =
        DataLoaderGuard::new(LoaderRegistry::<RouteSnapshot>::new()).with_observer(observer.clone());

    let report = guard
        .evaluate(&route("/libraries"))
        .now_or_never()
        .expect("ready on first poll");

    assert!(report.allowed);
    assert!(report.settlements.is_empty());
    assert_eq!(observer.evaluations(), 0);
}

#[tokio::test(start_paused = true)]
async fn all_loaders_resolve_then_allows() {
    let calls = Arc::new(AtomicU32::new(0));
    let observer = Arc::new(StatsGuardObserver::new());
    let registry = LoaderRegistry::new()
        .with_loader("profile", delayed(&calls, Duration::from_millis(20), ok))
        .with_loader("repository", delayed(&calls, Duration::from_millis(40), ok));
    let guard = DataLoaderGuard::new(registry).with_observer(observer.clone());

    let report = guard.evaluate(&route("/favorites")).await;

    assert!(report.allowed);
    assert!(report.all_succeeded());
    assert_eq!(report.settlements.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(observer.settlements(), 1);
    assert!(observer.failed_loaders().is_empty());
}

#[tokio::test(start_paused = true)]
async fn waits_for_the_slowest_loader() {
    let calls = Arc::new(AtomicU32::new(0));
    let registry = LoaderRegistry::new()
        .with_loader("fast", delayed(&calls, Duration::from_millis(10), ok))
        .with_loader("slow", delayed(&calls, Duration::from_millis(100), ok));
    let guard = DataLoaderGuard::new(registry);
    let start = Instant::now();

    assert!(guard.can_activate(&route("/recent-files")).await);

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    // Started together, not one after the other
    assert!(elapsed < Duration::from_millis(110));
}

#[tokio::test(start_paused = true)]
async fn failing_loader_is_observed_but_does_not_block_activation() {
    // Fail-open: a failing loader never denies navigation. Kept as-is until
    // it is settled whether required preconditions should be able to block.
    let calls = Arc::new(AtomicU32::new(0));
    let observer = Arc::new(StatsGuardObserver::new());
    let registry = LoaderRegistry::new()
        .with_loader("profile", delayed(&calls, Duration::from_millis(5), ok))
        .with_loader("repository", delayed(&calls, Duration::from_millis(50), fail));
    let guard = DataLoaderGuard::new(registry).with_observer(observer.clone());

    let report = guard.evaluate(&route("/shared")).await;

    assert!(report.allowed);
    assert!(!report.all_succeeded());
    let failures: Vec<_> = report.failures().map(|s| s.name.as_str()).collect();
    assert_eq!(failures, vec!["repository"]);
    assert_eq!(observer.failed_loaders(), vec!["repository".to_string()]);
    assert_eq!(observer.settlements(), 1);
}

#[tokio::test(start_paused = true)]
async fn default_observer_logs_each_failed_loader_and_a_summary() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::ERROR)
        .finish();
    let _default = tracing::subscriber::set_default(subscriber);

    let calls = Arc::new(AtomicU32::new(0));
    let registry = LoaderRegistry::new()
        .with_loader("profile", delayed(&calls, Duration::from_millis(5), ok))
        .with_loader("repository", delayed(&calls, Duration::from_millis(20), fail))
        .with_loader("branches", delayed(&calls, Duration::from_millis(10), fail));
    let guard = DataLoaderGuard::new(registry);

    assert!(guard.can_activate(&route("/shared")).await);

    let output = logs.contents();
    let failure_lines: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("data loader failed"))
        .collect();
    assert_eq!(failure_lines.len(), 2, "log output:\n{}", output);
    assert!(failure_lines.iter().any(|line| line.contains("loader=repository")));
    assert!(failure_lines.iter().any(|line| line.contains("loader=branches")));
    assert!(failure_lines
        .iter()
        .all(|line| line.contains("ERROR") && line.contains("repository unavailable")));
    assert!(!output.contains("loader=profile"));
    assert!(output.contains("allowing navigation anyway"));
}

#[tokio::test(start_paused = true)]
async fn early_failure_still_waits_for_the_rest() {
    let calls = Arc::new(AtomicU32::new(0));
    let registry = LoaderRegistry::new()
        .with_loader("broken", delayed(&calls, Duration::from_millis(1), fail))
        .with_loader("slow", delayed(&calls, Duration::from_millis(80), ok));
    let guard = DataLoaderGuard::new(registry);
    let start = Instant::now();

    let report = guard.evaluate(&route("/trashcan")).await;

    assert!(report.allowed);
    assert!(start.elapsed() >= Duration::from_millis(80));
    assert!(report.settlements[1].outcome.is_ok());
}

#[tokio::test(start_paused = true)]
async fn every_loader_failing_still_allows() {
    let calls = Arc::new(AtomicU32::new(0));
    let observer = Arc::new(StatsGuardObserver::new());
    let registry = LoaderRegistry::new()
        .with_loader("a", delayed(&calls, Duration::from_millis(3), fail))
        .with_loader("b", delayed(&calls, Duration::from_millis(7), fail))
        .with_loader("c", delayed(&calls, Duration::from_millis(1), fail));
    let guard = DataLoaderGuard::new(registry).with_observer(observer.clone());

    assert!(guard.can_activate(&route("/search")).await);
    assert_eq!(
        observer.failed_loaders(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}

#[tokio::test]
async fn every_loader_sees_the_same_context() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut registry = LoaderRegistry::new();
    for name in ["profile", "repository", "settings"] {
        let seen = Arc::clone(&seen);
        registry.register(
            name,
            loader_fn(move |route: &RouteSnapshot| {
                seen.lock().unwrap().push(route.path.clone());
                async { Ok(()) }
            }),
        );
    }
    let guard = DataLoaderGuard::new(registry).with_observer(NoOpGuardObserver);

    assert!(guard.can_activate(&route("/libraries/site-1")).await);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|p| p == "/libraries/site-1"));
}

#[tokio::test]
async fn loaders_run_fresh_on_each_evaluation() {
    let calls = Arc::new(AtomicU32::new(0));
    let registry =
        LoaderRegistry::new().with_loader("profile", delayed(&calls, Duration::ZERO, ok));
    let guard = DataLoaderGuard::new(registry);

    assert!(guard.can_activate(&route("/a")).await);
    assert!(guard.can_activate(&route("/b")).await);

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn hanging_loader_keeps_the_guard_pending() {
    let registry = LoaderRegistry::new().with_loader(
        "never",
        loader_fn(|_: &RouteSnapshot| futures::future::pending::<Result<(), LoaderError>>()),
    );
    let guard = DataLoaderGuard::new(registry);

    let outcome =
        tokio::time::timeout(Duration::from_secs(60), guard.can_activate(&route("/stuck"))).await;

    assert!(outcome.is_err());
}

#[tokio::test]
async fn anyhow_errors_are_reported_as_failures() {
    let registry = LoaderRegistry::new().with_loader(
        "remote",
        loader_fn(|_: &RouteSnapshot| async {
            Err(anyhow::anyhow!("503 from discovery endpoint").into())
        }),
    );
    let guard = DataLoaderGuard::new(registry);

    let report = guard.evaluate(&route("/")).await;

    assert!(report.allowed);
    let failure = report.failures().next().expect("one failure");
    assert_eq!(failure.name, "remote");
    assert!(matches!(failure.outcome, Err(LoaderError::Other(_))));
}
