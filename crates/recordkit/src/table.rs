//! Table metadata.

use crate::error::{DbError, DbResult};
use std::collections::HashSet;

/// Immutable facts about one mapped table.
///
/// Names are trimmed on construction; primary-key checks are exact, case-sensitive
/// matches against the trimmed key list.
///
/// # Example
///
/// ```rust
/// use recordkit::Table;
///
/// let users = Table::new("users", &["id"])?.with_columns(["id", "name", "email"]);
/// assert!(users.has_column_label("email"));
/// assert!(users.is_primary_key("id"));
/// # Ok::<(), recordkit::DbError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    primary_key: Vec<String>,
    column_labels: HashSet<String>,
}

impl Table {
    /// Create table metadata. Fails when the name is blank or no primary key is given.
    pub fn new(name: &str, primary_key: &[&str]) -> DbResult<Self> {
        let name = checked_table_name(name)?;
        let primary_key = trim_primary_keys(primary_key)?;
        Ok(Self {
            name,
            primary_key,
            column_labels: HashSet::new(),
        })
    }

    /// Create table metadata from a comma-separated primary key such as `"user_id, role_id"`.
    pub fn with_key_list(name: &str, primary_key: &str) -> DbResult<Self> {
        let keys: Vec<&str> = primary_key.split(',').collect();
        Self::new(name, &keys)
    }

    /// Register the known column labels. Columns outside this set are skipped by model
    /// INSERT/UPDATE generation.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.column_labels
            .extend(columns.into_iter().map(|c| c.as_ref().trim().to_string()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn has_column_label(&self, column: &str) -> bool {
        self.column_labels.contains(column)
    }

    pub fn column_labels(&self) -> impl Iterator<Item = &str> {
        self.column_labels.iter().map(String::as_str)
    }

    pub fn is_primary_key(&self, column: &str) -> bool {
        is_primary_key(column, &self.primary_key)
    }
}

/// Exact, case-sensitive membership test against trimmed primary keys.
pub fn is_primary_key<S: AsRef<str>>(column: &str, primary_key: &[S]) -> bool {
    primary_key.iter().any(|k| k.as_ref() == column)
}

/// Trim a table name, rejecting blank names.
pub fn checked_table_name(name: &str) -> DbResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DbError::config("table name can not be blank"));
    }
    Ok(name.to_string())
}

/// Trim every primary-key column name, rejecting an empty list or blank entries.
pub fn trim_primary_keys<S: AsRef<str>>(primary_key: &[S]) -> DbResult<Vec<String>> {
    if primary_key.is_empty() {
        return Err(DbError::config("primary key can not be empty"));
    }
    primary_key
        .iter()
        .map(|k| {
            let k = k.as_ref().trim();
            if k.is_empty() {
                Err(DbError::config("primary key column name can not be blank"))
            } else {
                Ok(k.to_string())
            }
        })
        .collect()
}
