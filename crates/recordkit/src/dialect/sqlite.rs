use super::{Dialect, Quote, page_bounds};
use crate::error::DbResult;
use crate::table::checked_table_name;

/// SQLite 3. Accepts MySQL-style back quotes and `LIMIT offset, count`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite3Dialect;

impl Dialect for Sqlite3Dialect {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn quote(&self) -> Quote {
        Quote::BACKTICK
    }

    /// The metadata query leaves the table name unquoted.
    fn probe_sql(&self, table_name: &str) -> DbResult<String> {
        let table_name = checked_table_name(table_name)?;
        Ok(format!("SELECT * FROM {table_name} WHERE 1 = 2"))
    }

    fn paginate(&self, page_number: i64, page_size: i64, base_sql: &str) -> DbResult<String> {
        let (offset, _) = page_bounds(page_number, page_size)?;
        Ok(format!("{base_sql} LIMIT {offset}, {page_size}"))
    }
}
