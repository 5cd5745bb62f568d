//! End-to-end scenarios exercising the parser, row store, and executor
//! together.

use oxide_minidb::{execute, Database};

/// Installs a test-writer subscriber so `tracing` events emitted by the
/// engine show up under `cargo test -- --nocapture` instead of going
/// nowhere. Idempotent: later calls after the first are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn run(db: &mut Database, sql: &str) -> oxide_minidb::QueryResult {
    init_tracing();
    execute(db, sql).unwrap_or_else(|e| panic!("executing {sql:?} failed: {e}"))
}

#[test]
fn create_insert_select_update_delete() {
    let mut db = Database::in_memory();
    run(
        &mut db,
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER)",
    );
    run(&mut db, "INSERT INTO users (id, name, age) VALUES (1, 'Ada', 36)");
    run(&mut db, "INSERT INTO users (id, name, age) VALUES (2, 'Bo', 41)");

    let all = run(&mut db, "SELECT * FROM users ORDER BY id");
    assert_eq!(all.rows.len(), 2);

    let updated = run(&mut db, "UPDATE users SET age = 37 WHERE id = 1");
    assert_eq!(updated.affected, 1);

    let deleted = run(&mut db, "DELETE FROM users WHERE id = 2");
    assert_eq!(deleted.affected, 1);

    let remaining = run(&mut db, "SELECT name FROM users");
    assert_eq!(remaining.rows.len(), 1);
}

#[test]
fn duplicate_primary_key_insert_is_rejected() {
    let mut db = Database::in_memory();
    run(&mut db, "CREATE TABLE t (id INTEGER PRIMARY KEY)");
    run(&mut db, "INSERT INTO t (id) VALUES (1)");
    let err = execute(&mut db, "INSERT INTO t (id) VALUES (1)").unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn unknown_table_is_a_schema_error() {
    let mut db = Database::in_memory();
    let err = execute(&mut db, "SELECT * FROM ghosts").unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn malformed_sql_is_a_syntax_error() {
    let mut db = Database::in_memory();
    let err = execute(&mut db, "SELEKT * FROM t").unwrap_err();
    assert!(matches!(err, oxide_minidb::DbError::Syntax(_)));
}

#[test]
fn join_across_two_tables() {
    let mut db = Database::in_memory();
    run(&mut db, "CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT)");
    run(
        &mut db,
        "CREATE TABLE books (id INTEGER PRIMARY KEY, author_id INTEGER, title TEXT)",
    );
    run(&mut db, "INSERT INTO authors (id, name) VALUES (1, 'Hopper')");
    run(
        &mut db,
        "INSERT INTO books (id, author_id, title) VALUES (100, 1, 'Compilers')",
    );

    let result = run(
        &mut db,
        "SELECT * FROM books JOIN authors ON books.author_id = authors.id",
    );
    assert_eq!(result.rows.len(), 1);
    assert_eq!(
        result.rows[0]["name"],
        oxide_minidb::Value::Text("Hopper".into())
    );
}

#[test]
fn snapshot_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    {
        let mut db = Database::open(&path).unwrap();
        run(&mut db, "CREATE TABLE t (id INTEGER PRIMARY KEY, label TEXT)");
        run(&mut db, "INSERT INTO t (id, label) VALUES (1, 'first')");
    }

    let mut reopened = Database::open(&path).unwrap();
    let result = run(&mut reopened, "SELECT * FROM t");
    assert_eq!(result.rows.len(), 1);

    // The row id counter survives the reload, so a fresh insert doesn't
    // collide with what was already persisted.
    run(&mut reopened, "INSERT INTO t (id, label) VALUES (2, 'second')");
    let after = run(&mut reopened, "SELECT * FROM t ORDER BY id");
    assert_eq!(after.rows.len(), 2);
}

#[test]
fn order_by_sorts_nulls_last_in_both_directions() {
    let mut db = Database::in_memory();
    run(&mut db, "CREATE TABLE t (id INTEGER PRIMARY KEY, score INTEGER)");
    run(&mut db, "INSERT INTO t (id, score) VALUES (1, 10)");
    run(&mut db, "INSERT INTO t (id) VALUES (2)");
    run(&mut db, "INSERT INTO t (id, score) VALUES (3, 5)");

    let asc = run(&mut db, "SELECT id FROM t ORDER BY score ASC");
    assert_eq!(asc.rows[2]["id"], oxide_minidb::Value::Integer(2));

    let desc = run(&mut db, "SELECT id FROM t ORDER BY score DESC");
    assert_eq!(desc.rows[2]["id"], oxide_minidb::Value::Integer(2));
}
