//! Data loaders and the registry that holds them

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;

/// Future returned by a data loader
pub type LoaderFuture = BoxFuture<'static, Result<(), LoaderError>>;

/// Error reported by a data loader
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The loader could not fetch what it needed
    #[error("{message}")]
    Failed { message: String },

    /// Any other error bubbling out of the loader
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoaderError {
    /// Create a failed loader error
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// An asynchronous producer of a precondition for a navigation context
///
/// Each call to `load` starts a fresh operation. Loaders that need parts of
/// the context inside the future clone them out first.
pub trait DataLoader<C>: Send + Sync {
    /// Start loading for the given context
    fn load(&self, context: &C) -> LoaderFuture;
}

impl<C, T: DataLoader<C> + ?Sized> DataLoader<C> for Arc<T> {
    fn load(&self, context: &C) -> LoaderFuture {
        (**self).load(context)
    }
}

impl<C, T: DataLoader<C> + ?Sized> DataLoader<C> for Box<T> {
    fn load(&self, context: &C) -> LoaderFuture {
        (**self).load(context)
    }
}

/// A data loader backed by a closure, see [`loader_fn`]
#[derive(Clone)]
pub struct FnLoader<F> {
    f: F,
}

/// Build a data loader from a closure returning a future
pub fn loader_fn<C, F, Fut>(f: F) -> FnLoader<F>
where
    F: Fn(&C) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), LoaderError>> + Send + 'static,
{
    FnLoader { f }
}

impl<C, F, Fut> DataLoader<C> for FnLoader<F>
where
    F: Fn(&C) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), LoaderError>> + Send + 'static,
{
    fn load(&self, context: &C) -> LoaderFuture {
        (self.f)(context).boxed()
    }
}

/// A loader together with the name it was registered under
pub struct RegisteredLoader<C> {
    name: String,
    loader: Arc<dyn DataLoader<C>>,
}

impl<C> RegisteredLoader<C> {
    /// Name used in logs and reports
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start the loader for a context
    pub fn load(&self, context: &C) -> LoaderFuture {
        self.loader.load(context)
    }
}

impl<C> Clone for RegisteredLoader<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            loader: Arc::clone(&self.loader),
        }
    }
}

impl<C> fmt::Debug for RegisteredLoader<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredLoader")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered, append-only collection of data loaders
///
/// Populated while the application is composed and then handed to a
/// [`DataLoaderGuard`](super::DataLoaderGuard), which only reads it.
pub struct LoaderRegistry<C> {
    loaders: Vec<RegisteredLoader<C>>,
}

impl<C> LoaderRegistry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Append a loader, builder style
    pub fn with_loader<L>(mut self, name: impl Into<String>, loader: L) -> Self
    where
        L: DataLoader<C> + 'static,
    {
        self.register(name, loader);
        self
    }

    /// Append a loader
    pub fn register<L>(&mut self, name: impl Into<String>, loader: L)
    where
        L: DataLoader<C> + 'static,
    {
        let name = name.into();
        tracing::trace!(loader = %name, "registering data loader");
        self.loaders.push(RegisteredLoader {
            name,
            loader: Arc::new(loader),
        });
    }

    /// Number of registered loaders
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Whether no loader has been registered
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Loader names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaders.iter().map(RegisteredLoader::name)
    }

    /// Iterate loaders in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, RegisteredLoader<C>> {
        self.loaders.iter()
    }
}

impl<C> Default for LoaderRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for LoaderRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            loaders: self.loaders.clone(),
        }
    }
}

impl<C> fmt::Debug for LoaderRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
