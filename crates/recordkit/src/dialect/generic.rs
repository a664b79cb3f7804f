//! SQL helpers for generic (not model-mapped) table access.
//!
//! These statements have the same shape on every supported database, so each dialect calls
//! them with its own [`Quote`].

use super::{BuiltSql, Quote};
use crate::error::{DbError, DbResult};
use crate::record::Record;
use crate::table::{checked_table_name, trim_primary_keys};

/// Append `<col> = ? AND <col> = ? ...` for each column.
pub(crate) fn push_equalities<S: AsRef<str>>(sql: &mut String, quote: Quote, columns: &[S]) {
    for (i, col) in columns.iter().enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }
        quote.push(sql, col.as_ref());
        sql.push_str(" = ?");
    }
}

/// Render a select list: `*` passes through, anything else is split on commas, trimmed and
/// quoted one identifier at a time.
pub(crate) fn push_select_list(sql: &mut String, quote: Quote, columns: &str) {
    let columns = columns.trim();
    if columns == "*" {
        sql.push('*');
        return;
    }
    for (i, col) in columns.split(',').enumerate() {
        if i > 0 {
            sql.push(',');
        }
        quote.push(sql, col.trim());
    }
}

/// `SELECT <columns> FROM <table>`
pub fn find_columns(quote: Quote, table_name: &str, columns: &str) -> DbResult<String> {
    let table_name = checked_table_name(table_name)?;
    let mut sql = String::from("SELECT ");
    push_select_list(&mut sql, quote, columns);
    sql.push_str(" FROM ");
    quote.push(&mut sql, &table_name);
    Ok(sql)
}

/// `SELECT <columns> FROM <table> WHERE <pk1> = ? AND ...`
pub fn find_columns_by_id<S: AsRef<str>>(
    quote: Quote,
    table_name: &str,
    columns: &str,
    primary_key: &[S],
) -> DbResult<String> {
    let primary_key = trim_primary_keys(primary_key)?;
    let mut sql = find_columns(quote, table_name, columns)?;
    sql.push_str(" WHERE ");
    push_equalities(&mut sql, quote, &primary_key);
    Ok(sql)
}

/// `DELETE FROM <table> WHERE <col1> = ? AND ...` with one predicate per record entry.
///
/// A record without columns would delete the whole table and is rejected.
pub fn delete_by_record(quote: Quote, table_name: &str, record: &Record) -> DbResult<BuiltSql> {
    let table_name = checked_table_name(table_name)?;
    let mut sql = String::from("DELETE FROM ");
    quote.push(&mut sql, &table_name);
    sql.push_str(" WHERE ");

    let mut params = Vec::new();
    for (i, (col, value)) in record.entries()?.enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }
        quote.push(&mut sql, col);
        sql.push_str(" = ?");
        params.push(value.clone());
    }

    if params.is_empty() {
        return Err(DbError::config(format!(
            "delete from '{table_name}' by record requires at least one column"
        )));
    }
    Ok(BuiltSql::new(sql, params))
}

/// `SELECT COUNT(1) FROM <table> WHERE <f1> = ? AND <f2> = ? ...`
///
/// `fields` is a comma-separated list. Blank entries are ignored; with no fields left the
/// statement has no WHERE clause.
pub fn exists_by_fields(quote: Quote, table_name: &str, fields: &str) -> DbResult<String> {
    let table_name = checked_table_name(table_name)?;
    let mut sql = String::from("SELECT COUNT(1) FROM ");
    quote.push(&mut sql, &table_name);

    let fields: Vec<&str> = fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    if !fields.is_empty() {
        sql.push_str(" WHERE ");
        push_equalities(&mut sql, quote, &fields);
    }
    Ok(sql)
}
