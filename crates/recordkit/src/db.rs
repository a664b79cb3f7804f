//! The record facade: generate SQL with the configured dialect, run it through an
//! [`Executor`], and keep records' modify flags in step.
//!
//! ```ignore
//! use recordkit::{Db, DbConfig, DialectKind, Record, Table};
//!
//! let db = Db::new(DbConfig::new().with_dialect(DialectKind::Sqlite3), executor);
//! let users = Table::new("users", &["id"])?.with_columns(["id", "name"]);
//!
//! let mut user = Record::new();
//! user.set("id", 1)?.set("name", "alice")?;
//! db.save(&users, &mut user).await?;
//!
//! user.set("name", "bob")?;
//! db.update(&users, &mut user).await?; // UPDATE `users` SET `name` = ? WHERE `id` = ?
//! ```

use crate::client::Executor;
use crate::config::DbConfig;
use crate::dialect::{BuiltSql, Dialect, page_bounds};
use crate::error::{DbError, DbResult};
use crate::json::{JsonCodec, JsonMode, SerdeJsonCodec, encode_json_fields};
use crate::record::Record;
use crate::table::Table;
use crate::value::Value;

/// One page of a paginated query.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub list: Vec<T>,
    /// 1-based.
    pub page_number: i64,
    pub page_size: i64,
    pub total_page: i64,
    pub total_row: i64,
}

impl<T> Page<T> {
    pub fn is_first_page(&self) -> bool {
        self.page_number == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.page_number >= self.total_page
    }
}

/// Record-level database access over an [`Executor`].
pub struct Db<E> {
    config: DbConfig,
    executor: E,
    codec: Box<dyn JsonCodec>,
}

impl<E: Executor> Db<E> {
    pub fn new(config: DbConfig, executor: E) -> Self {
        Self {
            config,
            executor,
            codec: Box::new(SerdeJsonCodec),
        }
    }

    /// Replace the JSON codec used by the `*_with_json` operations.
    pub fn with_codec(mut self, codec: impl JsonCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.config.dialect()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    fn log_sql(&self, sql: &str, params: &[Value]) {
        if !self.config.show_sql {
            return;
        }
        if self.config.dev_mode {
            tracing::debug!(
                target: "recordkit.sql",
                dialect = self.dialect().name(),
                sql,
                params = ?params,
                "sql"
            );
        } else {
            tracing::debug!(
                target: "recordkit.sql",
                dialect = self.dialect().name(),
                sql,
                params = params.len(),
                "sql"
            );
        }
    }

    async fn execute_built(&self, built: &BuiltSql) -> DbResult<u64> {
        self.log_sql(&built.sql, &built.params);
        self.executor.execute(&built.sql, &built.params).await
    }

    /// Run a statement directly. Returns the number of affected rows.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        self.log_sql(sql, params);
        self.executor.execute(sql, params).await
    }

    /// Run a query directly.
    pub async fn find(&self, sql: &str, params: &[Value]) -> DbResult<Vec<Record>> {
        self.log_sql(sql, params);
        self.executor.query(sql, params).await
    }

    /// Run a query and return its first row, if any.
    pub async fn find_first(&self, sql: &str, params: &[Value]) -> DbResult<Option<Record>> {
        self.log_sql(sql, params);
        self.executor.query_opt(sql, params).await
    }

    /// Insert `record` into `table`. Columns unknown to the table are skipped.
    ///
    /// On success the record's modify flags are cleared. A record with no column known to
    /// the table is a `Config` error and nothing is executed.
    pub async fn save(&self, table: &Table, record: &mut Record) -> DbResult<bool> {
        check_known_columns(table, record)?;
        let built = self.dialect().model_insert(table, record)?;
        self.finish_write(&built, record).await
    }

    /// Encode `json_fields`, then insert like [`Db::save`].
    ///
    /// Null JSON fields are left null.
    pub async fn save_with_json(
        &self,
        table: &Table,
        record: &mut Record,
        json_fields: &[&str],
    ) -> DbResult<bool> {
        check_known_columns(table, record)?;
        encode_json_fields(self.codec.as_ref(), record, json_fields, JsonMode::Insert)?;
        let built = self.dialect().model_insert(table, record)?;
        self.finish_write(&built, record).await
    }

    /// Update the modified, non-key columns of `record`.
    ///
    /// The row is matched by the key values the record held when it was loaded or last
    /// persisted, so changing a key column in memory does not retarget the statement.
    /// Returns `Ok(false)` without touching the database when there is nothing to write.
    pub async fn update(&self, table: &Table, record: &mut Record) -> DbResult<bool> {
        let ids = original_key_values(table, record)?;
        let built = self.dialect().model_update(table, &ids, record)?;
        self.finish_update(table, &built, record).await
    }

    /// Encode `json_fields` (nulls included), then update like [`Db::update`].
    pub async fn update_with_json(
        &self,
        table: &Table,
        record: &mut Record,
        json_fields: &[&str],
    ) -> DbResult<bool> {
        let ids = original_key_values(table, record)?;
        encode_json_fields(self.codec.as_ref(), record, json_fields, JsonMode::Update)?;
        let built = self.dialect().model_update(table, &ids, record)?;
        self.finish_update(table, &built, record).await
    }

    async fn finish_update(
        &self,
        table: &Table,
        built: &BuiltSql,
        record: &mut Record,
    ) -> DbResult<bool> {
        if built.params.len() == table.primary_key().len() {
            tracing::warn!(table = table.name(), "update skipped: no modified columns");
            return Ok(false);
        }
        self.finish_write(built, record).await
    }

    async fn finish_write(&self, built: &BuiltSql, record: &mut Record) -> DbResult<bool> {
        let affected = self.execute_built(built).await?;
        if affected >= 1 {
            record.clear_modify_flag()?;
        }
        Ok(affected >= 1)
    }

    /// Delete the row of `table` whose primary key equals `ids`, in key order.
    pub async fn delete_by_id(&self, table: &Table, ids: &[Value]) -> DbResult<bool> {
        check_ids(table, ids)?;
        let sql = self.dialect().model_delete_by_id(table);
        Ok(self.execute(&sql, ids).await? >= 1)
    }

    /// Delete rows matching every column of `record`.
    pub async fn delete(&self, table_name: &str, record: &Record) -> DbResult<bool> {
        let built = self.dialect().db_delete(table_name, record)?;
        Ok(self.execute_built(&built).await? >= 1)
    }

    pub async fn find_by_id(&self, table: &Table, ids: &[Value]) -> DbResult<Option<Record>> {
        self.find_columns_by_id(table, "*", ids).await
    }

    /// Like [`Db::find_by_id`] but a missing row is [`DbError::NotFound`].
    pub async fn find_by_id_strict(&self, table: &Table, ids: &[Value]) -> DbResult<Record> {
        self.find_by_id(table, ids).await?.ok_or_else(|| {
            DbError::not_found(format!("no row in '{}' with id {ids:?}", table.name()))
        })
    }

    /// Load selected columns (comma-separated, or `*`) of one row by primary key.
    pub async fn find_columns_by_id(
        &self,
        table: &Table,
        columns: &str,
        ids: &[Value],
    ) -> DbResult<Option<Record>> {
        check_ids(table, ids)?;
        let sql = self.dialect().model_find_by_id(table, columns);
        self.find_first(&sql, ids).await
    }

    pub async fn find_all(&self, table_name: &str) -> DbResult<Vec<Record>> {
        let sql = self.dialect().find_all_sql(table_name)?;
        self.find(&sql, &[]).await
    }

    /// Whether a row exists whose comma-separated `fields` equal `values`, in order.
    pub async fn exists(&self, table_name: &str, fields: &str, values: &[Value]) -> DbResult<bool> {
        let sql = self.dialect().exists_by_fields(table_name, fields)?;
        self.log_sql(&sql, values);
        Ok(self.executor.query_i64(&sql, values).await? > 0)
    }

    /// Fetch page `page_number` (1-based) of `select` + `sql_except_select`.
    ///
    /// `sql_except_select` is the query from its `FROM` onward. The total row count comes
    /// from `SELECT COUNT(*)` over the same clause with any trailing `ORDER BY` removed.
    pub async fn paginate(
        &self,
        page_number: i64,
        page_size: i64,
        select: &str,
        sql_except_select: &str,
        params: &[Value],
    ) -> DbResult<Page<Record>> {
        page_bounds(page_number, page_size)?;

        let count_sql = count_sql(sql_except_select);
        self.log_sql(&count_sql, params);
        let total_row = self.executor.query_i64(&count_sql, params).await?;

        let total_page = total_row / page_size + i64::from(total_row % page_size != 0);
        if total_row == 0 || page_number > total_page {
            return Ok(Page {
                list: Vec::new(),
                page_number,
                page_size,
                total_page,
                total_row,
            });
        }

        let base = format!("{} {}", select.trim(), sql_except_select.trim());
        let sql = self.dialect().paginate(page_number, page_size, &base)?;
        let list = self.find(&sql, params).await?;
        Ok(Page {
            list,
            page_number,
            page_size,
            total_page,
            total_row,
        })
    }
}

fn check_ids(table: &Table, ids: &[Value]) -> DbResult<()> {
    if ids.len() != table.primary_key().len() {
        return Err(DbError::config(format!(
            "table '{}' has {} primary key column(s) but {} id value(s) were given",
            table.name(),
            table.primary_key().len(),
            ids.len()
        )));
    }
    Ok(())
}

fn check_known_columns(table: &Table, record: &Record) -> DbResult<()> {
    if !record.entries()?.any(|(column, _)| table.has_column_label(column)) {
        return Err(DbError::config(format!(
            "record has no column known to table '{}'",
            table.name()
        )));
    }
    Ok(())
}

fn original_key_values(table: &Table, record: &Record) -> DbResult<Vec<Value>> {
    table
        .primary_key()
        .iter()
        .map(|pk| {
            record.original(pk)?.cloned().ok_or_else(|| {
                DbError::config(format!(
                    "primary key '{pk}' of table '{}' has no value in the record",
                    table.name()
                ))
            })
        })
        .collect()
}

/// Byte offset of a trailing top-level `ORDER BY`, if any.
fn trailing_order_by(sql: &str) -> Option<usize> {
    let lower = sql.to_ascii_lowercase();
    let pos = lower.rfind("order by")?;
    let at_word_start = pos == 0 || lower.as_bytes()[pos - 1].is_ascii_whitespace();
    (at_word_start && !lower[pos..].contains(')')).then_some(pos)
}

fn count_sql(sql_except_select: &str) -> String {
    let mut from = sql_except_select.trim();
    if let Some(pos) = trailing_order_by(from) {
        from = from[..pos].trim_end();
    }
    if from.to_ascii_lowercase().contains("group by") {
        format!("SELECT COUNT(*) FROM (SELECT 1 {from}) count_alias")
    } else {
        format!("SELECT COUNT(*) {from}")
    }
}
