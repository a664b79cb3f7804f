use super::{Dialect, Quote, page_bounds};
use crate::error::DbResult;
use crate::table::checked_table_name;
use crate::value::Value;

/// Suffix marking a sequence reference such as `seq_user.nextval`.
const NEXTVAL_SUFFIX: &str = ".nextval";

/// Oracle. Identifiers are left unquoted.
///
/// A primary key whose value is text ending in `.nextval` is written into the VALUES list
/// verbatim instead of being bound, so inserts can draw keys from a sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "Oracle"
    }

    fn quote(&self) -> Quote {
        Quote::NONE
    }

    fn is_oracle(&self) -> bool {
        true
    }

    fn default_primary_key(&self) -> &'static str {
        "ID"
    }

    fn probe_sql(&self, table_name: &str) -> DbResult<String> {
        let table_name = checked_table_name(table_name)?;
        Ok(format!("SELECT * FROM {table_name} WHERE rownum < 1"))
    }

    fn push_insert_value(
        &self,
        values: &mut String,
        params: &mut Vec<Value>,
        is_primary_key: bool,
        value: &Value,
    ) {
        match value {
            Value::Text(seq) if is_primary_key && seq.ends_with(NEXTVAL_SUFFIX) => {
                values.push_str(seq);
            }
            _ => {
                values.push('?');
                params.push(value.clone());
            }
        }
    }

    /// ROWNUM is assigned as rows are produced, so the lower bound has to be applied one
    /// level above the upper bound.
    fn paginate(&self, page_number: i64, page_size: i64, base_sql: &str) -> DbResult<String> {
        let (start, end) = page_bounds(page_number, page_size)?;
        Ok(format!(
            "SELECT * FROM ( SELECT row_.*, rownum rownum_ FROM ( {base_sql} ) row_ WHERE rownum <= {end} ) table_alias WHERE table_alias.rownum_ > {start}"
        ))
    }
}
