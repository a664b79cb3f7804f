//! # recordkit
//!
//! Dialect-driven SQL generation over change-tracked records.
//!
//! ## Features
//!
//! - **One code path, three databases**: MySQL, Oracle and SQLite share insert/update/delete/
//!   find generation; dialects differ only in quoting, the metadata probe, pagination and
//!   Oracle sequence handling
//! - **Partial updates**: a [`Record`] remembers which columns were set since it was loaded,
//!   so UPDATE writes only those and never the primary key
//! - **Composite primary keys** everywhere
//! - **Query-only records**: [`Record::dao`] refuses every access with [`DbError::ReadOnly`]
//! - **JSON columns**: structured values are encoded right before the parameter list is built
//! - **Bring your own driver**: implement [`Executor`] and hand it to [`Db`]
//!
//! ## Generating SQL
//!
//! ```
//! use recordkit::{DialectKind, Record, Table, Value};
//!
//! let user_role = Table::new("user_role", &["user_id", "role_id"])?
//!     .with_columns(["user_id", "role_id", "granted_by"]);
//!
//! let mut row = Record::from_columns([
//!     ("user_id", Value::Int(1)),
//!     ("role_id", Value::Int(2)),
//!     ("granted_by", Value::from("root")),
//! ]);
//! row.set("granted_by", "admin")?;
//!
//! // key values as loaded
//! let ids = [Value::Int(1), Value::Int(2)];
//! let built = DialectKind::Oracle.dialect().model_update(&user_role, &ids, &row)?;
//! assert_eq!(
//!     built.sql,
//!     "UPDATE user_role SET granted_by = ? WHERE user_id = ? AND role_id = ?"
//! );
//! assert_eq!(built.params, recordkit::params!["admin", 1, 2]);
//!
//! let page = DialectKind::Mysql.dialect().paginate(3, 20, "SELECT * FROM user_role")?;
//! assert_eq!(page, "SELECT * FROM user_role LIMIT 40, 20");
//! # Ok::<(), recordkit::DbError>(())
//! ```

pub mod bind;
pub mod cache;
pub mod client;
pub mod config;
pub mod dao;
pub mod db;
pub mod dialect;
pub mod error;
pub mod json;
pub mod prelude;
pub mod record;
pub mod table;
pub mod transaction;
pub mod value;

pub use bind::{BindValue, StatementBinder, fill_statement, to_bind_value};
pub use cache::{CacheStore, EvictRegistry};
pub use client::{Executor, TxExecutor};
pub use config::DbConfig;
pub use dao::{DAO_MAP, DAO_SET, DaoMap, DaoSet};
pub use db::{Db, Page};
pub use dialect::{
    BuiltSql, Dialect, DialectKind, MysqlDialect, OracleDialect, Quote, Sqlite3Dialect,
    dialect_for,
};
pub use error::{DbError, DbResult};
pub use json::{JsonCodec, JsonMode, SerdeJsonCodec, encode_json_fields};
pub use record::Record;
pub use table::Table;
pub use transaction::TxMethods;
pub use value::Value;
