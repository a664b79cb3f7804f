//! Executor traits: the seam between generated SQL and a database driver.
//!
//! recordkit never opens connections. The embedding application implements [`Executor`] over
//! its driver (binding parameters with [`fill_statement`](crate::fill_statement) or
//! [`Dialect::fill_statement`](crate::Dialect::fill_statement)) and hands it to
//! [`Db`](crate::Db).

use crate::error::{DbError, DbResult};
use crate::record::Record;
use crate::value::Value;
use std::future::Future;
use std::sync::Arc;

/// Runs SQL with positional `?` parameters.
///
/// Rows returned by [`Executor::query`] should be loaded records
/// ([`Record::from_columns`]), with nothing marked modified.
pub trait Executor: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<Vec<Record>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = DbResult<u64>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// Extra rows are ignored.
    fn query_opt(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<Option<Record>>> + Send {
        async move { Ok(self.query(sql, params).await?.into_iter().next()) }
    }

    /// Execute a query and return the first row.
    ///
    /// Semantics:
    /// - 0 rows: returns [`DbError::NotFound`]
    /// - 1 or more rows: returns the first row
    fn query_one(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<Record>> + Send {
        async move {
            self.query_opt(sql, params)
                .await?
                .ok_or_else(|| DbError::not_found("Expected 1 row, got 0"))
        }
    }

    /// Execute a query and read the first column of the first row as an integer.
    ///
    /// Used for `COUNT` queries. Integral text (some drivers return counts as decimals) is
    /// parsed.
    fn query_i64(&self, sql: &str, params: &[Value]) -> impl Future<Output = DbResult<i64>> + Send {
        async move {
            let row = self.query_one(sql, params).await?;
            let value = row
                .entries()?
                .next()
                .map(|(_, v)| v.clone())
                .ok_or_else(|| DbError::execution("query returned a row without columns"))?;
            match &value {
                Value::Int(n) => Ok(*n),
                Value::Real(f) if f.fract() == 0.0 => Ok(*f as i64),
                Value::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                    DbError::execution(format!("expected an integer result, got '{s}'"))
                }),
                other => Err(DbError::execution(format!(
                    "expected an integer result, got {}",
                    other.type_name()
                ))),
            }
        }
    }
}

/// An [`Executor`] that can scope its statements in a transaction.
///
/// Use through the [`transaction!`](crate::transaction) macro rather than directly.
pub trait TxExecutor: Executor {
    fn begin(&self) -> impl Future<Output = DbResult<()>> + Send;

    fn commit(&self) -> impl Future<Output = DbResult<()>> + Send;

    fn rollback(&self) -> impl Future<Output = DbResult<()>> + Send;
}

impl<E: Executor> Executor for &E {
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<Vec<Record>>> + Send {
        (**self).query(sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = DbResult<u64>> + Send {
        (**self).execute(sql, params)
    }
}

impl<E: Executor> Executor for Arc<E> {
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<Vec<Record>>> + Send {
        (**self).query(sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = DbResult<u64>> + Send {
        (**self).execute(sql, params)
    }
}

impl<E: TxExecutor> TxExecutor for &E {
    fn begin(&self) -> impl Future<Output = DbResult<()>> + Send {
        (**self).begin()
    }

    fn commit(&self) -> impl Future<Output = DbResult<()>> + Send {
        (**self).commit()
    }

    fn rollback(&self) -> impl Future<Output = DbResult<()>> + Send {
        (**self).rollback()
    }
}

impl<E: TxExecutor> TxExecutor for Arc<E> {
    fn begin(&self) -> impl Future<Output = DbResult<()>> + Send {
        (**self).begin()
    }

    fn commit(&self) -> impl Future<Output = DbResult<()>> + Send {
        (**self).commit()
    }

    fn rollback(&self) -> impl Future<Output = DbResult<()>> + Send {
        (**self).rollback()
    }
}
