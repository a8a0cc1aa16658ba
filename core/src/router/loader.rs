//! Deferred view loading
//!
//! A [`ViewLoader`] wraps a factory that produces the view for a route. The
//! factory runs the first time the route is visited and the result is kept;
//! a failed load is not kept, so the next visit tries again.

use crate::error::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

type ViewFactory<V> = Arc<dyn Fn() -> BoxFuture<'static, Result<V>> + Send + Sync>;

/// Lazily resolved view for a route
pub struct ViewLoader<V> {
    factory: ViewFactory<V>,
    cell: Arc<OnceCell<Arc<V>>>,
}

impl<V: Send + Sync + 'static> ViewLoader<V> {
    /// Create a loader from an async factory
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || factory().boxed()),
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Load the view, running the factory only if nothing is loaded yet
    ///
    /// Concurrent first loads share a single factory call.
    pub async fn load(&self) -> Result<Arc<V>> {
        let view = self
            .cell
            .get_or_try_init(|| async { (self.factory)().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(view))
    }
}

impl<V> ViewLoader<V> {
    /// Whether the view has been loaded
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

impl<V> Clone for ViewLoader<V> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<V> fmt::Debug for ViewLoader<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewLoader")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_factory_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader = ViewLoader::new(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok("RecordsPage")
            }
        });

        assert!(!loader.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let shared = loader.clone();
        let (a, b) = futures::join!(loader.load(), shared.load());
        assert_eq!(*a.unwrap(), "RecordsPage");
        assert_eq!(*b.unwrap(), "RecordsPage");
        assert_eq!(*loader.load().await.unwrap(), "RecordsPage");

        assert!(loader.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader = ViewLoader::new(move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(Error::Status {
                        status: 503,
                        body: "chunk unavailable".to_string(),
                    })
                } else {
                    Ok(attempt)
                }
            }
        });

        assert!(loader.load().await.is_err());
        assert!(!loader.is_loaded());
        assert_eq!(*loader.load().await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_shows_state() {
        let loader = ViewLoader::new(|| async { Ok(()) });
        assert_eq!(format!("{:?}", loader), "ViewLoader { loaded: false }");
    }
}
