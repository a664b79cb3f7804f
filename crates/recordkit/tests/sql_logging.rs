mod common;

use common::MockExecutor;
use recordkit::{Db, DbConfig, Record, Table};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture() -> (Captured, tracing::subscriber::DefaultGuard) {
    let out = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(out.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    (out, tracing::subscriber::set_default(subscriber))
}

fn users() -> Table {
    Table::new("users", &["id"]).unwrap().with_columns(["id", "name"])
}

fn alice() -> Record {
    let mut r = Record::new();
    r.set("id", 1).unwrap().set("name", "alice").unwrap();
    r
}

#[tokio::test]
async fn show_sql_logs_statement_and_parameter_count() {
    let (out, _guard) = capture();
    let db = Db::new(DbConfig::new().show_sql(true), MockExecutor::new());

    db.save(&users(), &mut alice()).await.unwrap();

    let logs = out.text();
    assert!(logs.contains("recordkit.sql"), "{logs}");
    assert!(logs.contains("INSERT INTO `users`(`id`, `name`) VALUES(?, ?)"), "{logs}");
    assert!(logs.contains("params=2"), "{logs}");
}

#[tokio::test]
async fn dev_mode_logs_parameter_values() {
    let (out, _guard) = capture();
    let db = Db::new(DbConfig::new().dev_mode(true), MockExecutor::new());

    db.save(&users(), &mut alice()).await.unwrap();

    let logs = out.text();
    assert!(logs.contains(r#"Text("alice")"#), "{logs}");
}

#[tokio::test]
async fn sql_is_silent_by_default() {
    let (out, _guard) = capture();
    let db = Db::new(DbConfig::new(), MockExecutor::new());

    db.save(&users(), &mut alice()).await.unwrap();

    assert!(!out.text().contains("INSERT"));
}

#[tokio::test]
async fn skipped_update_warns() {
    let (out, _guard) = capture();
    let db = Db::new(DbConfig::new(), MockExecutor::new());
    let mut loaded = Record::from_columns([("id", 1)]);

    assert!(!db.update(&users(), &mut loaded).await.unwrap());

    let logs = out.text();
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("update skipped"), "{logs}");
}
