//! Cache eviction keyed by operation name.
//!
//! Write operations that invalidate cached query results are registered once at startup
//! with the caches they touch. After the operation succeeds, every listed cache is cleared
//! through a [`CacheStore`].
//!
//! ```
//! use recordkit::{CacheStore, DbResult, EvictRegistry};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct Cleared(Mutex<Vec<String>>);
//!
//! impl CacheStore for Cleared {
//!     fn remove_all(&self, cache_name: &str) -> DbResult<()> {
//!         self.0.lock().unwrap().push(cache_name.to_string());
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = EvictRegistry::new();
//! registry.register("update_user", "users, user_stats")?;
//!
//! let store = Cleared::default();
//! registry.evict("update_user", &store)?;
//! assert_eq!(*store.0.lock().unwrap(), ["users", "user_stats"]);
//! # Ok::<(), recordkit::DbError>(())
//! ```

use crate::error::{DbError, DbResult};
use std::collections::HashMap;
use std::future::Future;

/// A cache backend that can drop every entry of a named cache.
pub trait CacheStore: Send + Sync {
    fn remove_all(&self, cache_name: &str) -> DbResult<()>;
}

/// Operation name → cache names to clear after it.
#[derive(Debug, Clone, Default)]
pub struct EvictRegistry {
    entries: HashMap<String, Vec<String>>,
}

impl EvictRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `cache_names` (comma-separated, trimmed) for `operation`.
    ///
    /// Registering the same operation again replaces its list.
    pub fn register(&mut self, operation: &str, cache_names: &str) -> DbResult<&mut Self> {
        let operation = operation.trim();
        if operation.is_empty() {
            return Err(DbError::config("operation name must not be blank"));
        }
        let names: Vec<String> = cache_names
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(DbError::config(format!(
                "operation '{operation}' must name at least one cache"
            )));
        }
        self.entries.insert(operation.to_string(), names);
        Ok(self)
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.entries.contains_key(operation.trim())
    }

    /// The caches registered for `operation`.
    ///
    /// An unregistered operation is a configuration error.
    pub fn cache_names(&self, operation: &str) -> DbResult<&[String]> {
        self.entries
            .get(operation.trim())
            .map(Vec::as_slice)
            .ok_or_else(|| {
                DbError::config(format!(
                    "no cache names registered for operation '{}'",
                    operation.trim()
                ))
            })
    }

    /// Clear every cache registered for `operation`, in registration order.
    pub fn evict<S>(&self, operation: &str, store: &S) -> DbResult<()>
    where
        S: CacheStore + ?Sized,
    {
        for name in self.cache_names(operation)? {
            store.remove_all(name)?;
            tracing::debug!(operation = operation.trim(), cache = %name, "cache evicted");
        }
        Ok(())
    }

    /// Run `op`, then evict the caches registered for `operation` if it succeeded.
    ///
    /// The registration is checked before `op` runs.
    pub async fn evict_after<S, F, Fut, T>(&self, operation: &str, store: &S, op: F) -> DbResult<T>
    where
        S: CacheStore + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = DbResult<T>>,
    {
        self.cache_names(operation)?;
        let value = op().await?;
        self.evict(operation, store)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl CacheStore for Recorder {
        fn remove_all(&self, cache_name: &str) -> DbResult<()> {
            self.0.lock().unwrap().push(cache_name.to_string());
            Ok(())
        }
    }

    impl Recorder {
        fn cleared(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    #[test]
    fn register_trims_names() {
        let mut r = EvictRegistry::new();
        r.register(" save_user ", " users ,, user_list ").unwrap();
        assert_eq!(r.cache_names("save_user").unwrap(), ["users", "user_list"]);
        assert!(r.contains("save_user"));
    }

    #[test]
    fn blank_registrations_are_rejected() {
        let mut r = EvictRegistry::new();
        assert!(r.register("", "a").unwrap_err().is_config());
        assert!(r.register("op", " , ").unwrap_err().is_config());
    }

    #[test]
    fn unregistered_operation_is_a_config_error() {
        let r = EvictRegistry::new();
        assert!(r.cache_names("missing").unwrap_err().is_config());
        assert!(r.evict("missing", &Recorder::default()).unwrap_err().is_config());
    }

    #[tokio::test]
    async fn evicts_only_after_success() {
        let mut r = EvictRegistry::new();
        r.register("op", "a,b").unwrap();
        let store = Recorder::default();

        let err = r
            .evict_after("op", &store, || async { Err::<(), _>(DbError::execution("boom")) })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Execution(_)));
        assert!(store.cleared().is_empty());

        let n = r
            .evict_after("op", &store, || async { Ok(3) })
            .await
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(store.cleared(), ["a", "b"]);
    }

    #[tokio::test]
    async fn missing_registration_skips_the_operation() {
        let r = EvictRegistry::new();
        let store = Recorder::default();
        let ran = AtomicBool::new(false);
        let ran_ref = &ran;
        let result = r
            .evict_after("op", &store, move || async move {
                ran_ref.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(result.unwrap_err().is_config());
        assert!(!ran.load(Ordering::SeqCst));
    }
}
