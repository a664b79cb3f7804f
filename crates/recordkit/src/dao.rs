//! Query-only containers backing DAO-mode records.
//!
//! A DAO-mode [`Record`](crate::Record) is a metadata template: it names a table shape but must
//! never carry row state. Its column store and modify-flag set are the process-wide
//! [`DAO_MAP`] and [`DAO_SET`], which refuse every call (reads included) with
//! [`DbError::ReadOnly`]. There is no way to leave this state.
//!
//! Both types are zero-sized and stateless, so sharing them across threads needs no locking.

use crate::error::{DbError, DbResult};
use crate::value::Value;

/// Column store that refuses every operation.
#[derive(Debug)]
pub struct DaoMap {
    _private: (),
}

/// Modify-flag set that refuses every operation.
#[derive(Debug)]
pub struct DaoSet {
    _private: (),
}

/// Shared column store of all DAO-mode records.
pub static DAO_MAP: DaoMap = DaoMap { _private: () };

/// Shared modify-flag set of all DAO-mode records.
pub static DAO_SET: DaoSet = DaoSet { _private: () };

impl DaoMap {
    pub fn get(&self, _column: &str) -> DbResult<Option<&Value>> {
        Err(DbError::ReadOnly)
    }

    pub fn insert(&self, _column: &str, _value: Value) -> DbResult<Option<Value>> {
        Err(DbError::ReadOnly)
    }

    pub fn extend<I>(&self, _entries: I) -> DbResult<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Err(DbError::ReadOnly)
    }

    pub fn remove(&self, _column: &str) -> DbResult<Option<Value>> {
        Err(DbError::ReadOnly)
    }

    pub fn len(&self) -> DbResult<usize> {
        Err(DbError::ReadOnly)
    }

    pub fn is_empty(&self) -> DbResult<bool> {
        Err(DbError::ReadOnly)
    }

    pub fn contains_key(&self, _column: &str) -> DbResult<bool> {
        Err(DbError::ReadOnly)
    }

    pub fn contains_value(&self, _value: &Value) -> DbResult<bool> {
        Err(DbError::ReadOnly)
    }

    pub fn keys(&self) -> DbResult<std::iter::Empty<&str>> {
        Err(DbError::ReadOnly)
    }

    pub fn iter(&self) -> DbResult<std::iter::Empty<(&str, &Value)>> {
        Err(DbError::ReadOnly)
    }

    pub fn clear(&self) -> DbResult<()> {
        Err(DbError::ReadOnly)
    }
}

impl DaoSet {
    pub fn contains(&self, _column: &str) -> DbResult<bool> {
        Err(DbError::ReadOnly)
    }

    pub fn insert(&self, _column: &str) -> DbResult<bool> {
        Err(DbError::ReadOnly)
    }

    pub fn extend<I>(&self, _columns: I) -> DbResult<()>
    where
        I: IntoIterator<Item = String>,
    {
        Err(DbError::ReadOnly)
    }

    pub fn remove(&self, _column: &str) -> DbResult<bool> {
        Err(DbError::ReadOnly)
    }

    pub fn retain<F>(&self, _keep: F) -> DbResult<()>
    where
        F: FnMut(&str) -> bool,
    {
        Err(DbError::ReadOnly)
    }

    pub fn len(&self) -> DbResult<usize> {
        Err(DbError::ReadOnly)
    }

    pub fn is_empty(&self) -> DbResult<bool> {
        Err(DbError::ReadOnly)
    }

    pub fn iter(&self) -> DbResult<std::iter::Empty<&str>> {
        Err(DbError::ReadOnly)
    }

    pub fn clear(&self) -> DbResult<()> {
        Err(DbError::ReadOnly)
    }
}
