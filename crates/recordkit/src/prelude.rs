//! Convenient imports for typical `recordkit` usage.
//!
//! ```ignore
//! use recordkit::prelude::*;
//! ```

pub use crate::{
    Db, DbConfig, DbError, DbResult, Dialect, DialectKind, Executor, Page, Record, Table,
    TxExecutor, Value, params,
};
