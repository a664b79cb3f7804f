mod common;

use common::MockExecutor;
use recordkit::{Db, DbConfig, DbError, DialectKind, Record, Table, Value, params};

fn users() -> Table {
    Table::new("users", &["id"])
        .unwrap()
        .with_columns(["id", "name", "email", "meta"])
}

fn db(kind: DialectKind) -> Db<MockExecutor> {
    Db::new(DbConfig::new().with_dialect(kind), MockExecutor::new())
}

#[tokio::test]
async fn save_then_update_writes_only_changes() {
    let db = db(DialectKind::Mysql);
    let table = users();

    let mut user = Record::new();
    user.set("id", 1).unwrap().set("name", "alice").unwrap();
    assert!(db.save(&table, &mut user).await.unwrap());
    assert!(!user.has_modified().unwrap());

    user.set("email", "a@x.io").unwrap();
    assert!(db.update(&table, &mut user).await.unwrap());
    assert!(!user.has_modified().unwrap());

    let calls = db.executor().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].sql, "INSERT INTO `users`(`id`, `name`) VALUES(?, ?)");
    assert_eq!(calls[0].params, params![1, "alice"]);
    assert_eq!(calls[1].sql, "UPDATE `users` SET `email` = ? WHERE `id` = ?");
    assert_eq!(calls[1].params, params!["a@x.io", 1]);
}

#[tokio::test]
async fn update_with_nothing_modified_is_skipped() {
    let db = db(DialectKind::Sqlite3);
    let mut user = Record::from_columns([("id", Value::Int(1)), ("name", Value::from("a"))]);

    assert!(!db.update(&users(), &mut user).await.unwrap());
    assert!(db.executor().calls().is_empty());

    // a modified key alone does not produce a SET clause
    user.set("id", 2).unwrap();
    assert!(!db.update(&users(), &mut user).await.unwrap());
    assert!(db.executor().calls().is_empty());
}

#[tokio::test]
async fn update_after_key_change_targets_the_loaded_row() {
    let db = db(DialectKind::Mysql);
    let mut user = Record::from_columns([("id", Value::Int(7)), ("name", Value::from("a"))]);
    user.set("id", 8).unwrap().set("name", "b").unwrap();

    assert!(db.update(&users(), &mut user).await.unwrap());

    let calls = db.executor().calls();
    assert_eq!(calls[0].sql, "UPDATE `users` SET `name` = ? WHERE `id` = ?");
    assert_eq!(calls[0].params, params!["b", 7]);

    // once persisted, the in-memory key is the row's key
    user.set("name", "c").unwrap();
    db.update(&users(), &mut user).await.unwrap();
    assert_eq!(db.executor().calls()[1].params, params!["c", 8]);
}

#[tokio::test]
async fn update_with_json_after_key_change_targets_the_loaded_row() {
    let db = db(DialectKind::Sqlite3);
    let mut doc = Record::from_columns([("id", Value::Int(3)), ("meta", Value::Null)]);
    doc.set("id", 4)
        .unwrap()
        .set("meta", serde_json::json!({"k": 1}))
        .unwrap();

    db.update_with_json(&users(), &mut doc, &["meta"]).await.unwrap();

    let calls = db.executor().calls();
    assert_eq!(calls[0].sql, "UPDATE `users` SET `meta` = ? WHERE `id` = ?");
    assert_eq!(calls[0].params, params![r#"{"k":1}"#, 3]);
}

#[tokio::test]
async fn save_without_known_columns_is_rejected() {
    let db = db(DialectKind::Mysql);
    let mut row = Record::new();
    row.set("nickname", "al").unwrap().set("age", 3).unwrap();

    let err = db.save(&users(), &mut row).await.unwrap_err();
    assert!(err.is_config());
    let err = db
        .save_with_json(&users(), &mut row, &["nickname"])
        .await
        .unwrap_err();
    assert!(err.is_config());

    assert!(db.executor().calls().is_empty());
    assert!(row.is_modified("nickname").unwrap());
    assert!(row.is_modified("age").unwrap());
}

#[tokio::test]
async fn save_with_json_skips_unknown_columns() {
    let db = db(DialectKind::Mysql);
    let mut doc = Record::new();
    doc.set("id", 1)
        .unwrap()
        .set("meta", serde_json::json!([1, 2]))
        .unwrap()
        .set("nickname", "al")
        .unwrap();

    assert!(db.save_with_json(&users(), &mut doc, &["meta"]).await.unwrap());

    let calls = db.executor().calls();
    assert_eq!(calls[0].sql, "INSERT INTO `users`(`id`, `meta`) VALUES(?, ?)");
    assert_eq!(calls[0].params, params![1, "[1,2]"]);
}

#[tokio::test]
async fn zero_affected_rows_keeps_modify_flags() {
    let db = Db::new(DbConfig::new(), MockExecutor::new().affecting(0));
    let mut user = Record::new();
    user.set("id", 1).unwrap();

    assert!(!db.save(&users(), &mut user).await.unwrap());
    assert!(user.is_modified("id").unwrap());
}

#[tokio::test]
async fn failed_statement_keeps_modify_flags() {
    let db = Db::new(DbConfig::new(), MockExecutor::new().failing_on("INSERT"));
    let mut user = Record::new();
    user.set("id", 1).unwrap();

    let err = db.save(&users(), &mut user).await.unwrap_err();
    assert!(matches!(err, DbError::Execution(_)));
    assert!(user.is_modified("id").unwrap());
}

#[tokio::test]
async fn oracle_sequence_key_on_save() {
    let db = db(DialectKind::Oracle);
    let mut user = Record::new();
    user.set("id", "seq_users.nextval")
        .unwrap()
        .set("name", "alice")
        .unwrap();

    db.save(&users(), &mut user).await.unwrap();

    let calls = db.executor().calls();
    assert_eq!(
        calls[0].sql,
        "INSERT INTO users(id, name) VALUES(seq_users.nextval, ?)"
    );
    assert_eq!(calls[0].params, params!["alice"]);
}

#[tokio::test]
async fn json_columns_are_encoded() {
    let db = db(DialectKind::Mysql);
    let mut doc = Record::new();
    doc.set("id", 1)
        .unwrap()
        .set("meta", serde_json::json!({"tags": ["a", "b"]}))
        .unwrap();

    db.save_with_json(&users(), &mut doc, &["meta"]).await.unwrap();
    assert_eq!(doc.get_str("meta").unwrap(), Some(r#"{"tags":["a","b"]}"#));

    doc.set("meta", Value::Null).unwrap();
    db.update_with_json(&users(), &mut doc, &["meta"]).await.unwrap();

    let calls = db.executor().calls();
    assert_eq!(calls[0].sql, "INSERT INTO `users`(`id`, `meta`) VALUES(?, ?)");
    assert_eq!(calls[0].params, params![1, r#"{"tags":["a","b"]}"#]);
    assert_eq!(calls[1].sql, "UPDATE `users` SET `meta` = ? WHERE `id` = ?");
    assert_eq!(calls[1].params, params!["null", 1]);

    let tags: serde_json::Value = Record::from_columns([("meta", r#"{"tags":["a"]}"#)])
        .get_json("meta")
        .unwrap()
        .unwrap();
    assert_eq!(tags["tags"][0], "a");
}

#[tokio::test]
async fn find_and_delete_by_composite_id() {
    let db = db(DialectKind::Mysql);
    let table = Table::new("user_role", &["user_id", "role_id"]).unwrap();
    db.executor()
        .push_rows(vec![Record::from_columns([("user_id", 1), ("role_id", 2)])]);

    let found = db.find_by_id(&table, &params![1, 2]).await.unwrap().unwrap();
    assert_eq!(found.get_i64("role_id").unwrap(), Some(2));
    assert!(!found.has_modified().unwrap());

    assert!(db.delete_by_id(&table, &params![1, 2]).await.unwrap());

    let err = db.delete_by_id(&table, &params![1]).await.unwrap_err();
    assert!(err.is_config());

    let calls = db.executor().calls();
    assert_eq!(
        calls[0].sql,
        "SELECT * FROM `user_role` WHERE `user_id` = ? AND `role_id` = ?"
    );
    assert_eq!(
        calls[1].sql,
        "DELETE FROM `user_role` WHERE `user_id` = ? AND `role_id` = ?"
    );
    assert_eq!(calls.len(), 2);
}

#[tokio::test]
async fn find_by_id_strict_reports_missing_rows() {
    let db = db(DialectKind::Sqlite3);
    let err = db.find_by_id_strict(&users(), &params![9]).await.unwrap_err();
    assert!(err.is_not_found());

    let none = db
        .find_columns_by_id(&users(), "name, email", &params![9])
        .await
        .unwrap();
    assert!(none.is_none());
    assert_eq!(
        db.executor().sql()[1],
        "SELECT `name`,`email` FROM `users` WHERE `id` = ?"
    );
}

#[tokio::test]
async fn delete_by_record_and_find_all() {
    let db = db(DialectKind::Oracle);
    let filter = Record::from_columns([("status", "gone")]);
    db.delete("users", &filter).await.unwrap();
    db.find_all("users").await.unwrap();

    let calls = db.executor().calls();
    assert_eq!(calls[0].sql, "DELETE FROM users WHERE status = ?");
    assert_eq!(calls[0].params, params!["gone"]);
    assert_eq!(calls[1].sql, "SELECT * FROM users");
}

#[tokio::test]
async fn exists_counts_matching_rows() {
    let db = db(DialectKind::Mysql);
    db.executor().push_count(1);
    db.executor().push_count(0);

    assert!(db.exists("users", "name, email", &params!["a", "b"]).await.unwrap());
    assert!(!db.exists("users", "name", &params!["z"]).await.unwrap());
    assert_eq!(
        db.executor().sql()[0],
        "SELECT COUNT(1) FROM `users` WHERE `name` = ? AND `email` = ?"
    );
}

#[tokio::test]
async fn paginate_mysql() {
    let db = db(DialectKind::Mysql);
    db.executor().push_count(45);
    db.executor()
        .push_rows((41..=45).map(|id| Record::from_columns([("id", id)])).collect());

    let page = db
        .paginate(3, 20, "SELECT *", "FROM users WHERE age > ? ORDER BY id", &params![18])
        .await
        .unwrap();

    assert_eq!(page.total_row, 45);
    assert_eq!(page.total_page, 3);
    assert_eq!(page.list.len(), 5);
    assert!(page.is_last_page());

    let calls = db.executor().calls();
    assert_eq!(calls[0].sql, "SELECT COUNT(*) FROM users WHERE age > ?");
    assert_eq!(
        calls[1].sql,
        "SELECT * FROM users WHERE age > ? ORDER BY id LIMIT 40, 20"
    );
    assert_eq!(calls[1].params, params![18]);
}

#[tokio::test]
async fn paginate_oracle() {
    let db = db(DialectKind::Oracle);
    db.executor().push_count(10);

    let page = db.paginate(1, 10, "SELECT *", "FROM t", &[]).await.unwrap();
    assert_eq!(page.total_page, 1);
    assert!(page.is_first_page());
    assert_eq!(
        db.executor().sql()[1],
        "SELECT * FROM ( SELECT row_.*, rownum rownum_ FROM ( SELECT * FROM t ) row_ WHERE rownum <= 10 ) table_alias WHERE table_alias.rownum_ > 0"
    );
}

#[tokio::test]
async fn paginate_past_the_end_skips_the_page_query() {
    let db = db(DialectKind::Sqlite3);
    db.executor().push_count(5);
    let page = db.paginate(2, 10, "SELECT *", "FROM t", &[]).await.unwrap();
    assert!(page.list.is_empty());
    assert_eq!(page.total_page, 1);
    assert_eq!(db.executor().calls().len(), 1);

    db.executor().push_count(0);
    let page = db.paginate(1, 10, "SELECT *", "FROM t", &[]).await.unwrap();
    assert_eq!(page.total_row, 0);
    assert_eq!(page.total_page, 0);
    assert_eq!(db.executor().calls().len(), 2);
}

#[tokio::test]
async fn paginate_rejects_bad_arguments_before_querying() {
    let db = db(DialectKind::Mysql);
    let err = db.paginate(0, 10, "SELECT *", "FROM t", &[]).await.unwrap_err();
    assert!(err.is_config());
    assert!(db.executor().calls().is_empty());
}
