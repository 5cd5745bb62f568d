//! Executes parsed statements against a [`Database`].

mod filter;
mod join;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::info;

use crate::ast::{OrderDirection, SelectColumns, Statement};
use crate::database::Database;
use crate::error::Result;
use crate::parser::parse;
use crate::value::Value;

/// The outcome of executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Column names, in projection order. Empty for statements that
    /// don't return rows.
    pub columns: Vec<String>,
    /// The rows produced by a `SELECT`; empty for every other statement.
    pub rows: Vec<BTreeMap<String, Value>>,
    /// A human-readable summary, set for non-`SELECT` statements.
    pub message: Option<String>,
    /// Number of rows inserted/updated/deleted.
    pub affected: usize,
}

impl QueryResult {
    fn message(text: impl Into<String>, affected: usize) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            message: Some(text.into()),
            affected,
        }
    }
}

/// Parses and executes one SQL statement against `db`.
///
/// # Errors
///
/// Returns [`crate::error::DbError::Syntax`] if `sql` can't be parsed,
/// or any error the targeted statement can produce (unknown table,
/// constraint violation, type mismatch, missing row, I/O failure).
pub fn execute(db: &mut Database, sql: &str) -> Result<QueryResult> {
    let statement = parse(sql)?;
    match statement {
        Statement::CreateTable(stmt) => {
            db.create_table(&stmt.table, stmt.columns)?;
            Ok(QueryResult::message(
                format!("Table '{}' created", stmt.table),
                0,
            ))
        }
        Statement::DropTable(stmt) => {
            db.drop_table(&stmt.table)?;
            Ok(QueryResult::message(
                format!("Table '{}' dropped", stmt.table),
                0,
            ))
        }
        Statement::Insert(stmt) => {
            let table = db.table(&stmt.table)?;
            let column_names: Vec<String> = match &stmt.columns {
                Some(names) => names.clone(),
                None => table.columns().iter().map(|c| c.name.clone()).collect(),
            };
            let values: BTreeMap<String, Value> = column_names
                .into_iter()
                .zip(stmt.values)
                .collect();

            let table = db.table_mut(&stmt.table)?;
            table.insert(values)?;
            db.save()?;
            info!(table = %stmt.table, "1 row inserted");
            Ok(QueryResult::message("1 row inserted", 1))
        }
        Statement::Select(stmt) => {
            let table = db.table(&stmt.from)?;

            let base_row_ids = if stmt.where_clause.is_some() && stmt.joins.is_empty() {
                filter::filter_rows(table, stmt.where_clause.as_ref().unwrap())
            } else {
                table.rows().keys().copied().collect()
            };

            let mut rows: Vec<BTreeMap<String, Value>> = if stmt.joins.is_empty() {
                base_row_ids
                    .iter()
                    .map(|rid| table.rows()[rid].clone())
                    .collect()
            } else {
                let mut joined = join::execute_joins(db, table, &stmt.joins, &base_row_ids)?;
                if let Some(pred) = &stmt.where_clause {
                    joined.retain(|row| filter::eval_pred_on_row(row, pred));
                }
                joined
            };

            let columns = match &stmt.columns {
                SelectColumns::All => {
                    if stmt.joins.is_empty() {
                        table.columns().iter().map(|c| c.name.clone()).collect()
                    } else {
                        rows.first()
                            .map(|r| r.keys().cloned().collect())
                            .unwrap_or_default()
                    }
                }
                SelectColumns::List(names) => names.clone(),
            };

            for item in stmt.order_by.iter().rev() {
                rows.sort_by(|a, b| {
                    let left = a.get(&item.column).unwrap_or(&Value::Null);
                    let right = b.get(&item.column).unwrap_or(&Value::Null);
                    compare_for_order(left, right, item.direction)
                });
            }

            if let Some(limit) = stmt.limit {
                let limit = usize::try_from(limit).unwrap_or(0);
                rows.truncate(limit);
            }

            Ok(QueryResult {
                columns,
                rows,
                message: None,
                affected: 0,
            })
        }
        Statement::Update(stmt) => {
            let table = db.table(&stmt.table)?;
            let row_ids = match &stmt.where_clause {
                Some(pred) => filter::filter_rows(table, pred),
                None => table.rows().keys().copied().collect(),
            };

            let table = db.table_mut(&stmt.table)?;
            for rid in &row_ids {
                table.update(*rid, &stmt.assignments)?;
            }
            db.save()?;
            Ok(QueryResult::message(
                format!("{} row(s) updated", row_ids.len()),
                row_ids.len(),
            ))
        }
        Statement::Delete(stmt) => {
            let table = db.table(&stmt.table)?;
            let row_ids = match &stmt.where_clause {
                Some(pred) => filter::filter_rows(table, pred),
                None => table.rows().keys().copied().collect(),
            };

            let table = db.table_mut(&stmt.table)?;
            for rid in &row_ids {
                table.delete(*rid);
            }
            db.save()?;
            Ok(QueryResult::message(
                format!("{} row(s) deleted", row_ids.len()),
                row_ids.len(),
            ))
        }
    }
}

/// Orders two values for `ORDER BY`: nulls always sort last, regardless
/// of `ASC`/`DESC`, and only the non-null comparison flips direction.
fn compare_for_order(a: &Value, b: &Value, direction: OrderDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp_value(b).unwrap_or(Ordering::Equal);
            match direction {
                OrderDirection::Asc => ord,
                OrderDirection::Desc => ord.reverse(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn fresh_db() -> Database {
        Database::in_memory()
    }

    #[test]
    fn create_insert_select_round_trip() {
        let mut db = fresh_db();
        execute(&mut db, "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)").unwrap();
        execute(&mut db, "INSERT INTO users (id, name) VALUES (1, 'Ada')").unwrap();
        execute(&mut db, "INSERT INTO users (id, name) VALUES (2, 'Bo')").unwrap();

        let result = execute(&mut db, "SELECT * FROM users ORDER BY name DESC").unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0]["name"], Value::Text("Bo".into()));
    }

    #[test]
    fn where_equality_uses_index_and_filters() {
        let mut db = fresh_db();
        execute(&mut db, "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").unwrap();
        execute(&mut db, "INSERT INTO users (id, name) VALUES (1, 'Ada')").unwrap();
        execute(&mut db, "INSERT INTO users (id, name) VALUES (2, 'Bo')").unwrap();

        let result = execute(&mut db, "SELECT * FROM users WHERE id = 2").unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["name"], Value::Text("Bo".into()));
    }

    #[test]
    fn update_and_delete_affect_matching_rows_only() {
        let mut db = fresh_db();
        execute(&mut db, "CREATE TABLE t (id INTEGER PRIMARY KEY, n INTEGER)").unwrap();
        execute(&mut db, "INSERT INTO t (id, n) VALUES (1, 10)").unwrap();
        execute(&mut db, "INSERT INTO t (id, n) VALUES (2, 20)").unwrap();

        let updated = execute(&mut db, "UPDATE t SET n = 99 WHERE id = 1").unwrap();
        assert_eq!(updated.affected, 1);

        let deleted = execute(&mut db, "DELETE FROM t WHERE n = 20").unwrap();
        assert_eq!(deleted.affected, 1);

        let remaining = execute(&mut db, "SELECT * FROM t").unwrap();
        assert_eq!(remaining.rows.len(), 1);
        assert_eq!(remaining.rows[0]["n"], Value::Integer(99));
    }

    #[test]
    fn join_merges_rows_with_qualified_and_bare_keys() {
        let mut db = fresh_db();
        execute(&mut db, "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").unwrap();
        execute(&mut db, "CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER, total INTEGER)").unwrap();
        execute(&mut db, "INSERT INTO users (id, name) VALUES (1, 'Ada')").unwrap();
        execute(&mut db, "INSERT INTO orders (id, user_id, total) VALUES (100, 1, 50)").unwrap();

        let result = execute(
            &mut db,
            "SELECT * FROM orders JOIN users ON orders.user_id = users.id",
        )
        .unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["name"], Value::Text("Ada".into()));
        assert_eq!(result.rows[0]["orders.total"], Value::Integer(50));
    }

    #[test]
    fn limit_truncates_after_ordering() {
        let mut db = fresh_db();
        execute(&mut db, "CREATE TABLE t (id INTEGER PRIMARY KEY)").unwrap();
        for i in 1..=5 {
            execute(&mut db, &format!("INSERT INTO t (id) VALUES ({i})")).unwrap();
        }
        let result = execute(&mut db, "SELECT * FROM t ORDER BY id DESC LIMIT 2").unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0]["id"], Value::Integer(5));
        assert_eq!(result.rows[1]["id"], Value::Integer(4));
    }
}
