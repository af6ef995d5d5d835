//! Data loader guard
//!
//! Before a navigation is allowed to proceed, every registered data loader
//! is invoked with the navigation context and the guard waits for all of
//! them to settle. Loader failures are reported but never block the
//! navigation: the guard always resolves to `true`.
//!
//! # Example
//!
//! ```rust,no_run
//! use loadgate_core::guard::{loader_fn, DataLoaderGuard, LoaderError, LoaderRegistry};
//!
//! #[derive(Clone)]
//! struct RouteSnapshot {
//!     path: String,
//! }
//!
//! async fn navigate(route: RouteSnapshot) -> bool {
//!     let registry = LoaderRegistry::new()
//!         .with_loader("user-profile", loader_fn(|route: &RouteSnapshot| {
//!             let path = route.path.clone();
//!             async move {
//!                 if path.is_empty() {
//!                     return Err(LoaderError::failed("empty route"));
//!                 }
//!                 Ok(())
//!             }
//!         }));
//!
//!     DataLoaderGuard::new(registry).can_activate(&route).await
//! }
//! ```

mod gate;
mod loader;
mod observer;

pub use gate::{DataLoaderGuard, GuardReport, LoaderSettlement};
pub use loader::{
    loader_fn, DataLoader, FnLoader, LoaderError, LoaderFuture, LoaderRegistry, RegisteredLoader,
};
pub use observer::{GuardObserver, NoOpGuardObserver, StatsGuardObserver, TracingGuardObserver};

#[cfg(test)]
mod tests;
