#![allow(dead_code)]

use recordkit::{DbError, DbResult, Executor, Record, TxExecutor, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One statement seen by [`MockExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Records every statement and replays queued results.
///
/// Queries pop from `rows` (empty result when the queue is drained); statements return
/// `affected`, or fail when their SQL contains `fail_on`.
#[derive(Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<Call>>,
    rows: Mutex<VecDeque<Vec<Record>>>,
    affected: Mutex<u64>,
    fail_on: Mutex<Option<String>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        let exec = Self::default();
        *exec.affected.lock().unwrap() = 1;
        exec
    }

    pub fn affecting(self, n: u64) -> Self {
        *self.affected.lock().unwrap() = n;
        self
    }

    pub fn failing_on(self, fragment: &str) -> Self {
        *self.fail_on.lock().unwrap() = Some(fragment.to_string());
        self
    }

    pub fn push_rows(&self, rows: Vec<Record>) {
        self.rows.lock().unwrap().push_back(rows);
    }

    pub fn push_count(&self, n: i64) {
        self.push_rows(vec![Record::from_columns([("COUNT(*)", n)])]);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.sql).collect()
    }

    fn record(&self, sql: &str, params: &[Value]) -> DbResult<()> {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        match self.fail_on.lock().unwrap().as_deref() {
            Some(fragment) if sql.contains(fragment) => {
                Err(DbError::execution(format!("rejected: {sql}")))
            }
            _ => Ok(()),
        }
    }
}

impl Executor for MockExecutor {
    async fn query(&self, sql: &str, params: &[Value]) -> DbResult<Vec<Record>> {
        self.record(sql, params)?;
        Ok(self.rows.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        self.record(sql, params)?;
        Ok(*self.affected.lock().unwrap())
    }
}

impl TxExecutor for MockExecutor {
    async fn begin(&self) -> DbResult<()> {
        self.record("BEGIN", &[])
    }

    async fn commit(&self) -> DbResult<()> {
        self.record("COMMIT", &[])
    }

    async fn rollback(&self) -> DbResult<()> {
        self.record("ROLLBACK", &[])
    }
}
