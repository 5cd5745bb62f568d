//! In-memory row store for a single table.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::{DbError, Result};
use crate::index::Index;
use crate::schema::{Column, DataType};
use crate::value::Value;

/// A table's declared columns, rows, and the indexes kept over its
/// `UNIQUE`/`PRIMARY KEY` columns.
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: BTreeMap<u64, BTreeMap<String, Value>>,
    next_row_id: u64,
    indexes: BTreeMap<String, Index>,
}

impl Table {
    /// Creates an empty table from its column declarations.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let mut indexes = BTreeMap::new();
        for col in &columns {
            if col.is_indexed() {
                indexes.insert(col.name.clone(), Index::new());
            }
        }
        Self {
            name: name.into(),
            columns,
            rows: BTreeMap::new(),
            next_row_id: 1,
            indexes,
        }
    }

    /// The table's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The table's declared columns, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a declared column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All rows, keyed by row id.
    #[must_use]
    pub fn rows(&self) -> &BTreeMap<u64, BTreeMap<String, Value>> {
        &self.rows
    }

    /// Looks up the index kept for `col_name`, if the column is indexed.
    #[must_use]
    pub fn index(&self, col_name: &str) -> Option<&Index> {
        self.indexes.get(col_name)
    }

    /// Coerces `value` to `col`'s declared type, applying the same
    /// permissive conversions the row store always has: numeric
    /// widening between ints, floats, and booleans (`true`/`false` as
    /// `1`/`0`), anything-to-text via `Display`, and string/integer-to-
    /// boolean via a case-insensitive match against `true`/`1`/`yes` or
    /// a nonzero check.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Type`] if `value` can't be coerced, or
    /// [`DbError::Constraint`] if `col` is `NOT NULL` and `value` is null.
    pub fn coerce(col: &Column, value: &Value) -> Result<Value> {
        if value.is_null() {
            if col.not_null {
                return Err(DbError::Constraint(format!(
                    "column '{}' cannot be NULL",
                    col.name
                )));
            }
            return Ok(Value::Null);
        }

        let coerced = match col.dtype {
            DataType::Integer => match value {
                Value::Integer(i) => Value::Integer(*i),
                Value::Float(f) => Value::Integer(*f as i64),
                Value::Boolean(b) => Value::Integer(i64::from(*b)),
                Value::Text(s) => s
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| invalid_value(value, col))?,
                _ => return Err(invalid_value(value, col)),
            },
            DataType::Float => match value {
                Value::Float(f) => Value::Float(*f),
                Value::Integer(i) => Value::Float(*i as f64),
                Value::Boolean(b) => Value::Float(f64::from(*b)),
                Value::Text(s) => s
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| invalid_value(value, col))?,
                _ => return Err(invalid_value(value, col)),
            },
            DataType::Text => Value::Text(value.to_string()),
            DataType::Boolean => match value {
                Value::Boolean(b) => Value::Boolean(*b),
                Value::Text(s) => {
                    Value::Boolean(matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
                }
                Value::Integer(i) => Value::Boolean(*i != 0),
                _ => return Err(invalid_value(value, col)),
            },
        };
        Ok(coerced)
    }

    /// Validates and inserts a new row, returning its row id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Type`]/[`DbError::Constraint`] from coercion,
    /// or [`DbError::Constraint`] if a `UNIQUE`/`PRIMARY KEY` column
    /// would collide with an existing row.
    pub fn insert(&mut self, values: BTreeMap<String, Value>) -> Result<u64> {
        let mut row = BTreeMap::new();
        for col in &self.columns {
            let raw = values.get(&col.name).cloned().unwrap_or(Value::Null);
            let coerced = Self::coerce(col, &raw)?;

            if col.unique && !coerced.is_null() {
                if let Some(index) = self.indexes.get(&col.name) {
                    if index.contains(&coerced) {
                        return Err(DbError::Constraint(format!(
                            "duplicate value '{coerced}' for unique column '{}'",
                            col.name
                        )));
                    }
                }
            }
            row.insert(col.name.clone(), coerced);
        }

        let row_id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.insert(row_id, row.clone());

        for (col_name, index) in &mut self.indexes {
            if let Some(value) = row.get(col_name) {
                if !value.is_null() {
                    index.insert(value.clone(), row_id);
                }
            }
        }

        debug!(table = %self.name, row_id, "inserted row");
        Ok(row_id)
    }

    /// Applies `assignments` to the row at `row_id`, re-checking
    /// constraints for the columns that changed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if `row_id` doesn't exist,
    /// [`DbError::Schema`] for an unknown column name, or the coercion/
    /// uniqueness errors [`Table::insert`] can return.
    pub fn update(&mut self, row_id: u64, assignments: &[(String, Value)]) -> Result<()> {
        let old_row = self
            .rows
            .get(&row_id)
            .ok_or_else(|| DbError::NotFound(format!("row {row_id} not found")))?
            .clone();
        let mut new_row = old_row.clone();

        for (col_name, raw_value) in assignments {
            let col = self
                .column(col_name)
                .ok_or_else(|| DbError::Schema(format!("unknown column '{col_name}'")))?
                .clone();
            let coerced = Self::coerce(&col, raw_value)?;

            let unchanged = old_row.get(col_name) == Some(&coerced);
            if col.unique && !coerced.is_null() && !unchanged {
                if let Some(index) = self.indexes.get(col_name) {
                    if index.contains(&coerced) {
                        return Err(DbError::Constraint(format!(
                            "duplicate value '{coerced}' for unique column '{col_name}'"
                        )));
                    }
                }
            }
            new_row.insert(col_name.clone(), coerced);
        }

        for (col_name, index) in &mut self.indexes {
            let old_val = old_row.get(col_name);
            let new_val = new_row.get(col_name);
            if old_val != new_val {
                if let Some(old_val) = old_val {
                    if !old_val.is_null() {
                        index.remove(old_val, row_id);
                    }
                }
                if let Some(new_val) = new_val {
                    if !new_val.is_null() {
                        index.insert(new_val.clone(), row_id);
                    }
                }
            }
        }

        self.rows.insert(row_id, new_row);
        trace!(table = %self.name, row_id, "updated row");
        Ok(())
    }

    /// Removes the row at `row_id`, a no-op if it doesn't exist.
    pub fn delete(&mut self, row_id: u64) {
        let Some(row) = self.rows.remove(&row_id) else {
            return;
        };
        for (col_name, index) in &mut self.indexes {
            if let Some(value) = row.get(col_name) {
                if !value.is_null() {
                    index.remove(value, row_id);
                }
            }
        }
        debug!(table = %self.name, row_id, "deleted row");
    }

    /// Reconstructs a table from a snapshot's rows, bypassing the
    /// uniqueness checks [`Table::insert`] performs: the snapshot is
    /// trusted to already satisfy them.
    pub(crate) fn load_row(&mut self, row_id: u64, row: BTreeMap<String, Value>) {
        for (col_name, index) in &mut self.indexes {
            if let Some(value) = row.get(col_name) {
                if !value.is_null() {
                    index.insert(value.clone(), row_id);
                }
            }
        }
        self.rows.insert(row_id, row);
    }

    /// Sets the next row id counter directly, used when restoring a
    /// snapshot so new inserts continue after the highest persisted id.
    pub(crate) fn set_next_row_id(&mut self, next_row_id: u64) {
        self.next_row_id = next_row_id;
    }

    /// The next row id counter, for snapshotting.
    #[must_use]
    pub(crate) const fn next_row_id(&self) -> u64 {
        self.next_row_id
    }
}

fn invalid_value(value: &Value, col: &Column) -> DbError {
    DbError::Type(format!(
        "invalid value '{value}' for {} column '{}'",
        col.dtype, col.name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_table() -> Table {
        Table::new(
            "users",
            vec![
                Column::new("id", DataType::Integer).primary_key(),
                Column::new("name", DataType::Text).not_null(),
                Column::new("age", DataType::Integer),
            ],
        )
    }

    fn row(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn insert_assigns_increasing_row_ids() {
        let mut table = users_table();
        let a = table
            .insert(row(&[("id", Value::Integer(1)), ("name", Value::Text("Ada".into()))]))
            .unwrap();
        let b = table
            .insert(row(&[("id", Value::Integer(2)), ("name", Value::Text("Bo".into()))]))
            .unwrap();
        assert_eq!((a, b), (1, 2));
    }

    #[test]
    fn duplicate_primary_key_is_rejected() {
        let mut table = users_table();
        table
            .insert(row(&[("id", Value::Integer(1)), ("name", Value::Text("Ada".into()))]))
            .unwrap();
        let err = table
            .insert(row(&[("id", Value::Integer(1)), ("name", Value::Text("Bo".into()))]))
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn not_null_violation_is_rejected() {
        let mut table = users_table();
        let err = table.insert(row(&[("id", Value::Integer(1))])).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn update_rechecks_uniqueness_only_for_changed_columns() {
        let mut table = users_table();
        let a = table
            .insert(row(&[("id", Value::Integer(1)), ("name", Value::Text("Ada".into()))]))
            .unwrap();
        table
            .insert(row(&[("id", Value::Integer(2)), ("name", Value::Text("Bo".into()))]))
            .unwrap();

        // Unrelated column changes freely.
        table
            .update(a, &[("age".to_string(), Value::Integer(30))])
            .unwrap();

        // Colliding with another row's primary key is rejected.
        let err = table
            .update(a, &[("id".to_string(), Value::Integer(2))])
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn delete_frees_the_unique_value_for_reuse() {
        let mut table = users_table();
        let a = table
            .insert(row(&[("id", Value::Integer(1)), ("name", Value::Text("Ada".into()))]))
            .unwrap();
        table.delete(a);
        table
            .insert(row(&[("id", Value::Integer(1)), ("name", Value::Text("Bo".into()))]))
            .unwrap();
    }

    #[test]
    fn integer_column_coerces_numeric_text() {
        let mut table = users_table();
        let id = table
            .insert(row(&[
                ("id", Value::Text("5".into())),
                ("name", Value::Text("Ada".into())),
            ]))
            .unwrap();
        assert_eq!(table.rows()[&id]["id"], Value::Integer(5));
    }

    #[test]
    fn integer_and_float_columns_coerce_booleans() {
        assert_eq!(
            Table::coerce(&Column::new("n", DataType::Integer), &Value::Boolean(true)).unwrap(),
            Value::Integer(1)
        );
        assert_eq!(
            Table::coerce(&Column::new("n", DataType::Float), &Value::Boolean(false)).unwrap(),
            Value::Float(0.0)
        );
    }

    #[test]
    fn integer_column_truncates_non_integral_floats() {
        assert_eq!(
            Table::coerce(&Column::new("n", DataType::Integer), &Value::Float(5.7)).unwrap(),
            Value::Integer(5)
        );
    }
}
