//! SQL dialects.
//!
//! A [`Dialect`] turns table metadata plus a [`Record`] into SQL text and an ordered parameter
//! list. The statements are the same across databases apart from identifier quoting, the
//! metadata probe, pagination, and Oracle's sequence handling, so most operations are provided
//! methods driven by [`Dialect::quote`].
//!
//! All operations are pure: they perform no I/O and the same inputs always produce the same
//! SQL. Placeholders are positional `?`.
//!
//! ```
//! use recordkit::{DialectKind, Record, Table};
//!
//! let users = Table::new("users", &["id"])?.with_columns(["id", "name"]);
//! let mut user = Record::new();
//! user.set("id", 7)?.set("name", "alice")?;
//!
//! let built = DialectKind::Mysql.dialect().model_insert(&users, &user)?;
//! assert_eq!(built.sql, "INSERT INTO `users`(`id`, `name`) VALUES(?, ?)");
//! assert_eq!(built.params.len(), 2);
//! # Ok::<(), recordkit::DbError>(())
//! ```

pub mod generic;
mod mysql;
mod oracle;
mod sqlite;

pub use mysql::MysqlDialect;
pub use oracle::OracleDialect;
pub use sqlite::Sqlite3Dialect;

use crate::bind::{self, StatementBinder};
use crate::error::{DbError, DbResult};
use crate::json::{JsonCodec, JsonMode, encode_json_fields};
use crate::record::Record;
use crate::table::{Table, checked_table_name, is_primary_key, trim_primary_keys};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier quote pair. Either side may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub open: &'static str,
    pub close: &'static str,
}

impl Quote {
    /// MySQL-style back quotes.
    pub const BACKTICK: Self = Self {
        open: "`",
        close: "`",
    };

    /// No quoting; the database applies its default case folding.
    pub const NONE: Self = Self {
        open: "",
        close: "",
    };

    pub fn push(&self, out: &mut String, ident: &str) {
        out.push_str(self.open);
        out.push_str(ident);
        out.push_str(self.close);
    }

    pub fn quote(&self, ident: &str) -> String {
        let mut out = String::with_capacity(ident.len() + self.open.len() + self.close.len());
        self.push(&mut out, ident);
        out
    }
}

/// SQL text with its positional parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuiltSql {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltSql {
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}

impl fmt::Display for BuiltSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Database-specific SQL generation.
pub trait Dialect: Send + Sync + fmt::Debug {
    /// Human-readable dialect name.
    fn name(&self) -> &'static str;

    /// Identifier quoting for this database.
    fn quote(&self) -> Quote;

    fn is_oracle(&self) -> bool {
        false
    }

    /// Primary key column assumed when a caller does not name one.
    fn default_primary_key(&self) -> &'static str {
        "id"
    }

    /// A query returning no rows whose result-set metadata describes the table.
    fn probe_sql(&self, table_name: &str) -> DbResult<String> {
        let table_name = checked_table_name(table_name)?;
        Ok(format!(
            "SELECT * FROM {} WHERE 1 = 2",
            self.quote().quote(&table_name)
        ))
    }

    fn find_all_sql(&self, table_name: &str) -> DbResult<String> {
        let table_name = checked_table_name(table_name)?;
        Ok(format!("SELECT * FROM {}", self.quote().quote(&table_name)))
    }

    /// Render one VALUES entry for an INSERT, binding `value` unless the dialect inlines it.
    fn push_insert_value(
        &self,
        values: &mut String,
        params: &mut Vec<Value>,
        _is_primary_key: bool,
        value: &Value,
    ) {
        values.push('?');
        params.push(value.clone());
    }

    /// INSERT for a mapped table. Columns unknown to `table` are skipped.
    fn model_insert(&self, table: &Table, record: &Record) -> DbResult<BuiltSql> {
        write_insert(self, table.name(), table.primary_key(), record, Some(table))
    }

    /// INSERT for a generic table. Every record entry is written.
    fn db_insert(
        &self,
        table_name: &str,
        primary_key: &[&str],
        record: &Record,
    ) -> DbResult<BuiltSql> {
        let table_name = checked_table_name(table_name)?;
        let primary_key = trim_primary_keys(primary_key)?;
        write_insert(self, &table_name, &primary_key, record, None)
    }

    /// UPDATE for a mapped table. SET holds modified, known, non-key columns; WHERE binds
    /// `ids` positionally against the table's primary key.
    ///
    /// `ids` are the key values the row had when it was loaded, so a record whose key
    /// columns were changed in memory still updates its own row
    /// (see [`Record::original`]).
    fn model_update(&self, table: &Table, ids: &[Value], record: &Record) -> DbResult<BuiltSql> {
        write_update(
            self.quote(),
            table.name(),
            table.primary_key(),
            ids,
            record,
            Some(table),
        )
    }

    /// UPDATE for a generic table. `ids` are the original key values, bound positionally
    /// against `primary_key`.
    fn db_update(
        &self,
        table_name: &str,
        primary_key: &[&str],
        ids: &[Value],
        record: &Record,
    ) -> DbResult<BuiltSql> {
        let table_name = checked_table_name(table_name)?;
        let primary_key = trim_primary_keys(primary_key)?;
        write_update(self.quote(), &table_name, &primary_key, ids, record, None)
    }

    fn model_delete_by_id(&self, table: &Table) -> String {
        write_delete_by_id(self.quote(), table.name(), table.primary_key())
    }

    fn db_delete_by_id(&self, table_name: &str, primary_key: &[&str]) -> DbResult<String> {
        let table_name = checked_table_name(table_name)?;
        let primary_key = trim_primary_keys(primary_key)?;
        Ok(write_delete_by_id(self.quote(), &table_name, &primary_key))
    }

    /// DELETE whose WHERE clause is built from every entry of `record`.
    fn db_delete(&self, table_name: &str, record: &Record) -> DbResult<BuiltSql> {
        generic::delete_by_record(self.quote(), table_name, record)
    }

    fn model_find_by_id(&self, table: &Table, columns: &str) -> String {
        let quote = self.quote();
        let mut sql = String::from("SELECT ");
        generic::push_select_list(&mut sql, quote, columns);
        sql.push_str(" FROM ");
        quote.push(&mut sql, table.name());
        sql.push_str(" WHERE ");
        generic::push_equalities(&mut sql, quote, table.primary_key());
        sql
    }

    fn db_find_by_id(&self, table_name: &str, primary_key: &[&str]) -> DbResult<String> {
        generic::find_columns_by_id(self.quote(), table_name, "*", primary_key)
    }

    fn db_find_columns(&self, table_name: &str, columns: &str) -> DbResult<String> {
        generic::find_columns(self.quote(), table_name, columns)
    }

    fn db_find_columns_by_id(
        &self,
        table_name: &str,
        columns: &str,
        primary_key: &[&str],
    ) -> DbResult<String> {
        generic::find_columns_by_id(self.quote(), table_name, columns, primary_key)
    }

    /// `SELECT COUNT(1)` over equality predicates on a comma-separated field list.
    fn exists_by_fields(&self, table_name: &str, fields: &str) -> DbResult<String> {
        generic::exists_by_fields(self.quote(), table_name, fields)
    }

    /// Wrap `base_sql` so it returns page `page_number` (1-based) of `page_size` rows.
    fn paginate(&self, page_number: i64, page_size: i64, base_sql: &str) -> DbResult<String>;

    /// Bind parameters positionally with temporal normalization.
    fn fill_statement(&self, binder: &mut dyn StatementBinder, params: &[Value]) -> DbResult<()> {
        bind::fill_statement(binder, params)
    }

    /// Encode `json_fields` (present, non-null) and build a generic INSERT.
    fn db_insert_with_json(
        &self,
        codec: &dyn JsonCodec,
        table_name: &str,
        primary_key: &[&str],
        record: &mut Record,
        json_fields: &[&str],
    ) -> DbResult<BuiltSql> {
        encode_json_fields(codec, record, json_fields, JsonMode::Insert)?;
        self.db_insert(table_name, primary_key, record)
    }

    /// Encode `json_fields` (present, nulls included) and build a generic UPDATE.
    fn db_update_with_json(
        &self,
        codec: &dyn JsonCodec,
        table_name: &str,
        primary_key: &[&str],
        ids: &[Value],
        record: &mut Record,
        json_fields: &[&str],
    ) -> DbResult<BuiltSql> {
        encode_json_fields(codec, record, json_fields, JsonMode::Update)?;
        self.db_update(table_name, primary_key, ids, record)
    }
}

/// Validate paging arguments and return `(offset, end)` where `end = page_number * page_size`.
pub(crate) fn page_bounds(page_number: i64, page_size: i64) -> DbResult<(i64, i64)> {
    if page_number < 1 || page_size < 1 {
        return Err(DbError::config(format!(
            "page_number and page_size must be >= 1, got {page_number} and {page_size}"
        )));
    }
    let end = page_number
        .checked_mul(page_size)
        .ok_or_else(|| DbError::config("page bounds overflow"))?;
    Ok((end - page_size, end))
}

fn write_insert<D, S>(
    dialect: &D,
    table_name: &str,
    primary_key: &[S],
    record: &Record,
    table: Option<&Table>,
) -> DbResult<BuiltSql>
where
    D: Dialect + ?Sized,
    S: AsRef<str>,
{
    let quote = dialect.quote();
    let mut sql = String::from("INSERT INTO ");
    quote.push(&mut sql, table_name);
    sql.push('(');
    let mut values = String::from(") VALUES(");
    let mut params = Vec::new();

    let mut count = 0;
    for (col, value) in record.entries()? {
        if table.is_some_and(|t| !t.has_column_label(col)) {
            continue;
        }
        if count > 0 {
            sql.push_str(", ");
            values.push_str(", ");
        }
        count += 1;
        quote.push(&mut sql, col);
        dialect.push_insert_value(
            &mut values,
            &mut params,
            is_primary_key(col, primary_key),
            value,
        );
    }

    sql.push_str(&values);
    sql.push(')');
    Ok(BuiltSql::new(sql, params))
}

fn write_update<S: AsRef<str>>(
    quote: Quote,
    table_name: &str,
    primary_key: &[S],
    ids: &[Value],
    record: &Record,
    table: Option<&Table>,
) -> DbResult<BuiltSql> {
    if ids.len() != primary_key.len() {
        return Err(DbError::config(format!(
            "table '{table_name}' has {} primary key column(s) but {} id value(s) were given",
            primary_key.len(),
            ids.len()
        )));
    }

    let mut sql = String::from("UPDATE ");
    quote.push(&mut sql, table_name);
    sql.push_str(" SET ");
    let mut params = Vec::new();

    for (col, value) in record.entries()? {
        if !record.is_modified(col)?
            || is_primary_key(col, primary_key)
            || table.is_some_and(|t| !t.has_column_label(col))
        {
            continue;
        }
        if !params.is_empty() {
            sql.push_str(", ");
        }
        quote.push(&mut sql, col);
        sql.push_str(" = ?");
        params.push(value.clone());
    }

    sql.push_str(" WHERE ");
    generic::push_equalities(&mut sql, quote, primary_key);
    params.extend(ids.iter().cloned());
    Ok(BuiltSql::new(sql, params))
}

fn write_delete_by_id<S: AsRef<str>>(quote: Quote, table_name: &str, primary_key: &[S]) -> String {
    let mut sql = String::from("DELETE FROM ");
    quote.push(&mut sql, table_name);
    sql.push_str(" WHERE ");
    generic::push_equalities(&mut sql, quote, primary_key);
    sql
}

static MYSQL: MysqlDialect = MysqlDialect;
static ORACLE: OracleDialect = OracleDialect;
static SQLITE3: Sqlite3Dialect = Sqlite3Dialect;

/// The supported database families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[serde(alias = "mariadb")]
    Mysql,
    Oracle,
    #[serde(alias = "sqlite")]
    Sqlite3,
}

impl DialectKind {
    /// The shared dialect instance for this family.
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            Self::Mysql => &MYSQL,
            Self::Oracle => &ORACLE,
            Self::Sqlite3 => &SQLITE3,
        }
    }
}

impl FromStr for DialectKind {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "oracle" => Ok(Self::Oracle),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite3),
            other => Err(DbError::config(format!("unknown dialect: {other}"))),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dialect().name())
    }
}

/// Look up a dialect by name (`mysql`, `oracle`, `sqlite3`, ...).
pub fn dialect_for(name: &str) -> DbResult<&'static dyn Dialect> {
    Ok(name.parse::<DialectKind>()?.dialect())
}
