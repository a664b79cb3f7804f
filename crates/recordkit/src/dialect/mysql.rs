use super::{Dialect, Quote, page_bounds};
use crate::error::DbResult;

/// MySQL / MariaDB.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn quote(&self) -> Quote {
        Quote::BACKTICK
    }

    fn paginate(&self, page_number: i64, page_size: i64, base_sql: &str) -> DbResult<String> {
        let (offset, _) = page_bounds(page_number, page_size)?;
        Ok(format!("{base_sql} LIMIT {offset}, {page_size}"))
    }
}
