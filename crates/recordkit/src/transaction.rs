//! Transaction helpers: the [`transaction!`] macro and operation-name based transaction
//! selection.
//!
//! # Example
//!
//! ```ignore
//! use recordkit::{DbResult, TxExecutor};
//!
//! async fn transfer<E: TxExecutor>(exec: &E) -> DbResult<()> {
//!     recordkit::transaction!(exec, {
//!         exec.execute("UPDATE account SET balance = balance - ? WHERE id = ?", &recordkit::params![100, 1]).await?;
//!         exec.execute("UPDATE account SET balance = balance + ? WHERE id = ?", &recordkit::params![100, 2]).await?;
//!         Ok(())
//!     })
//! }
//! ```

use crate::client::TxExecutor;
use crate::error::{DbError, DbResult};
use std::collections::HashSet;
use std::future::Future;

/// Runs the given block inside a database transaction.
///
/// - Begins a transaction via [`TxExecutor::begin`].
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`. A failed rollback is reported together with the original error.
///
/// The block must evaluate to `recordkit::DbResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($executor:expr, $body:block) => {{
        #[allow(unused_imports)]
        use $crate::TxExecutor as _;

        let __recordkit_tx = &$executor;
        __recordkit_tx.begin().await?;

        let __recordkit_tx_body_result: $crate::DbResult<_> = async { $body }.await;
        match __recordkit_tx_body_result {
            Ok(value) => {
                __recordkit_tx.commit().await?;
                Ok(value)
            }
            Err(error) => match __recordkit_tx.rollback().await {
                Ok(()) => Err(error),
                Err(rollback_err) => Err($crate::DbError::Other(format!(
                    "{error} (rollback failed: {rollback_err})"
                ))),
            },
        }
    }};
}

/// Names of operations that must run inside a transaction.
///
/// Names are trimmed; blank entries are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxMethods {
    methods: HashSet<String>,
}

impl TxMethods {
    /// Build from a list of operation names. At least one non-blank name is required.
    pub fn new<I, S>(methods: I) -> DbResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let methods: HashSet<String> = methods
            .into_iter()
            .map(|m| m.as_ref().trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if methods.is_empty() {
            return Err(DbError::config("transaction method names must not be empty"));
        }
        Ok(Self { methods })
    }

    /// Build from a comma-separated list such as `"save, transfer"`.
    pub fn parse(list: &str) -> DbResult<Self> {
        Self::new(list.split(','))
    }

    pub fn requires_tx(&self, name: &str) -> bool {
        self.methods.contains(name.trim())
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(String::as_str)
    }

    /// Run `op` inside a transaction on `executor` when `name` is listed, directly otherwise.
    pub async fn run<E, F, Fut, T>(&self, executor: &E, name: &str, op: F) -> DbResult<T>
    where
        E: TxExecutor,
        F: FnOnce() -> Fut,
        Fut: Future<Output = DbResult<T>>,
    {
        if !self.requires_tx(name) {
            return op().await;
        }
        tracing::trace!(operation = name, "running in transaction");
        transaction!(executor, { op().await })
    }
}
