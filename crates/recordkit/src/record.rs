//! Change-tracked rows.
//!
//! A [`Record`] is one table row as an ordered column → [`Value`] map plus the set of columns
//! modified since it was created or loaded ("modify flags"). Insertion order is significant:
//! it fixes the column order of generated INSERT statements.
//!
//! ```
//! use recordkit::{Record, Value};
//!
//! let mut user = Record::new();
//! user.set("name", "alice")?.set("age", 30)?;
//! assert_eq!(user.get("age")?, Some(&Value::Int(30)));
//! assert!(user.is_modified("name")?);
//! # Ok::<(), recordkit::DbError>(())
//! ```

use crate::dao::{DAO_MAP, DAO_SET, DaoMap, DaoSet};
use crate::error::{DbError, DbResult};
use crate::value::Value;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};

enum Columns {
    Owned(IndexMap<String, Value>),
    Dao(&'static DaoMap),
}

enum ModifyFlag {
    Owned(HashSet<String>),
    Dao(&'static DaoSet),
}

/// One row of a table with per-column change tracking.
pub struct Record {
    columns: Columns,
    modify_flag: ModifyFlag,
    /// Value each modified column held before its first change since load or persist.
    originals: HashMap<String, Value>,
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl Record {
    /// Create an empty record for a new row.
    pub fn new() -> Self {
        Self {
            columns: Columns::Owned(IndexMap::new()),
            modify_flag: ModifyFlag::Owned(HashSet::new()),
            originals: HashMap::new(),
        }
    }

    /// Create a query-only record. Every access to its columns or modify flags fails with
    /// [`DbError::ReadOnly`].
    pub fn dao() -> Self {
        Self {
            columns: Columns::Dao(&DAO_MAP),
            modify_flag: ModifyFlag::Dao(&DAO_SET),
            originals: HashMap::new(),
        }
    }

    /// Create a record from loaded column values. Nothing is marked modified.
    pub fn from_columns<I, K, V>(columns: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            columns: Columns::Owned(
                columns
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            modify_flag: ModifyFlag::Owned(HashSet::new()),
            originals: HashMap::new(),
        }
    }

    pub fn is_dao(&self) -> bool {
        matches!(self.columns, Columns::Dao(_))
    }

    /// Get a column value. `Ok(None)` when the column is absent.
    pub fn get(&self, column: &str) -> DbResult<Option<&Value>> {
        match &self.columns {
            Columns::Owned(map) => Ok(map.get(column)),
            Columns::Dao(map) => map.get(column),
        }
    }

    /// Get a column as text.
    pub fn get_str(&self, column: &str) -> DbResult<Option<&str>> {
        Ok(self.get(column)?.and_then(Value::as_str))
    }

    /// Get a column as an integer.
    pub fn get_i64(&self, column: &str) -> DbResult<Option<i64>> {
        Ok(self.get(column)?.and_then(Value::as_i64))
    }

    /// Decode a JSON text column into `T`. `Ok(None)` when the column is absent or null.
    pub fn get_json<T: DeserializeOwned>(&self, column: &str) -> DbResult<Option<T>> {
        match self.get(column)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Text(text)) => Ok(Some(crate::json::decode_json(text)?)),
            Some(Value::Json(value)) => Ok(Some(serde_json::from_value(value.clone())?)),
            Some(other) => Err(DbError::Serialization(format!(
                "column '{column}' holds {} and cannot be decoded as JSON",
                other.type_name()
            ))),
        }
    }

    /// Set a column value and mark it modified.
    ///
    /// Re-setting an existing column keeps its position. The first change to a loaded column
    /// remembers its previous value (see [`Record::original`]).
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> DbResult<&mut Self> {
        match &mut self.columns {
            Columns::Owned(map) => {
                let previous = map.insert(column.to_string(), value.into());
                if let Some(previous) = previous {
                    self.originals
                        .entry(column.to_string())
                        .or_insert(previous);
                }
            }
            Columns::Dao(map) => {
                map.insert(column, value.into())?;
            }
        }
        match &mut self.modify_flag {
            ModifyFlag::Owned(set) => {
                set.insert(column.to_string());
            }
            ModifyFlag::Dao(set) => {
                set.insert(column)?;
            }
        }
        Ok(self)
    }

    /// Set several columns at once, marking each modified.
    pub fn set_columns<I, K, V>(&mut self, columns: I) -> DbResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (k, v) in columns {
            self.set(k.as_ref(), v)?;
        }
        Ok(self)
    }

    /// Remove a column and its modify flag.
    pub fn remove(&mut self, column: &str) -> DbResult<Option<Value>> {
        let removed = match &mut self.columns {
            Columns::Owned(map) => map.shift_remove(column),
            Columns::Dao(map) => map.remove(column)?,
        };
        match &mut self.modify_flag {
            ModifyFlag::Owned(set) => {
                set.remove(column);
            }
            ModifyFlag::Dao(set) => {
                set.remove(column)?;
            }
        }
        self.originals.remove(column);
        Ok(removed)
    }

    /// Keep only the named columns, dropping the rest (and their flags).
    pub fn keep(&mut self, columns: &[&str]) -> DbResult<&mut Self> {
        match (&mut self.columns, &mut self.modify_flag) {
            (Columns::Owned(map), ModifyFlag::Owned(set)) => {
                map.retain(|k, _| columns.contains(&k.as_str()));
                set.retain(|k| columns.contains(&k.as_str()));
                self.originals.retain(|k, _| columns.contains(&k.as_str()));
            }
            (Columns::Dao(map), _) => map.clear()?,
            (_, ModifyFlag::Dao(set)) => set.clear()?,
        }
        Ok(self)
    }

    pub fn contains(&self, column: &str) -> DbResult<bool> {
        match &self.columns {
            Columns::Owned(map) => Ok(map.contains_key(column)),
            Columns::Dao(map) => map.contains_key(column),
        }
    }

    pub fn len(&self) -> DbResult<usize> {
        match &self.columns {
            Columns::Owned(map) => Ok(map.len()),
            Columns::Dao(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> DbResult<bool> {
        match &self.columns {
            Columns::Owned(map) => Ok(map.is_empty()),
            Columns::Dao(map) => map.is_empty(),
        }
    }

    /// Iterate `(column, value)` pairs in insertion order.
    pub fn entries(&self) -> DbResult<Box<dyn Iterator<Item = (&str, &Value)> + '_>> {
        match &self.columns {
            Columns::Owned(map) => Ok(Box::new(map.iter().map(|(k, v)| (k.as_str(), v)))),
            Columns::Dao(map) => Ok(Box::new(map.iter()?)),
        }
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> DbResult<Vec<&str>> {
        Ok(self.entries()?.map(|(k, _)| k).collect())
    }

    /// Remove every column and flag.
    pub fn clear(&mut self) -> DbResult<()> {
        match &mut self.columns {
            Columns::Owned(map) => map.clear(),
            Columns::Dao(map) => map.clear()?,
        }
        self.clear_modify_flag()
    }

    /// Whether the column was modified since creation, load, or the last
    /// [`clear_modify_flag`](Self::clear_modify_flag).
    pub fn is_modified(&self, column: &str) -> DbResult<bool> {
        match &self.modify_flag {
            ModifyFlag::Owned(set) => Ok(set.contains(column)),
            ModifyFlag::Dao(set) => set.contains(column),
        }
    }

    /// The set of modified columns.
    pub fn modified_columns(&self) -> DbResult<HashSet<String>> {
        match &self.modify_flag {
            ModifyFlag::Owned(set) => Ok(set.clone()),
            ModifyFlag::Dao(set) => Ok(set.iter()?.map(str::to_string).collect()),
        }
    }

    /// Whether any column is modified.
    pub fn has_modified(&self) -> DbResult<bool> {
        match &self.modify_flag {
            ModifyFlag::Owned(set) => Ok(!set.is_empty()),
            ModifyFlag::Dao(set) => set.is_empty().map(|empty| !empty),
        }
    }

    /// The value `column` had when the record was loaded or last persisted.
    ///
    /// Falls back to the current value when the column has not been changed since, and is
    /// `Ok(None)` for a column that did not exist then and does not exist now.
    pub fn original(&self, column: &str) -> DbResult<Option<&Value>> {
        match self.originals.get(column) {
            Some(value) => Ok(Some(value)),
            None => self.get(column),
        }
    }

    /// Forget all modifications. Called after a successful persist.
    pub fn clear_modify_flag(&mut self) -> DbResult<()> {
        match &mut self.modify_flag {
            ModifyFlag::Owned(set) => {
                set.clear();
                self.originals.clear();
                Ok(())
            }
            ModifyFlag::Dao(set) => set.clear(),
        }
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.columns, &self.modify_flag) {
            (Columns::Owned(map), ModifyFlag::Owned(set)) => f
                .debug_struct("Record")
                .field("columns", map)
                .field("modified", set)
                .finish(),
            _ => f.write_str("Record(dao)"),
        }
    }
}

impl Clone for Record {
    fn clone(&self) -> Self {
        let columns = match &self.columns {
            Columns::Owned(map) => Columns::Owned(map.clone()),
            Columns::Dao(map) => Columns::Dao(*map),
        };
        let modify_flag = match &self.modify_flag {
            ModifyFlag::Owned(set) => ModifyFlag::Owned(set.clone()),
            ModifyFlag::Dao(set) => ModifyFlag::Dao(*set),
        };
        Self {
            columns,
            modify_flag,
            originals: self.originals.clone(),
        }
    }
}

impl PartialEq for Record {
    /// Records compare by column values only; modify flags are ignored.
    fn eq(&self, other: &Self) -> bool {
        match (&self.columns, &other.columns) {
            (Columns::Owned(a), Columns::Owned(b)) => a == b,
            _ => false,
        }
    }
}
