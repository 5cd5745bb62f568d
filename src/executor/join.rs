//! `JOIN` execution: nested-loop equi-joins over composite rows.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::JoinClause;
use crate::database::Database;
use crate::error::Result;
use crate::table::Table;
use crate::value::Value;

/// A row materialized during join execution, keyed both by its bare
/// column name and by `table.column`. A later join's bare-name columns
/// overwrite an earlier join's, so `col` always means "the column from
/// the most recently joined table that has one", while `table.col`
/// stays unambiguous throughout.
pub(crate) type CompositeRow = BTreeMap<String, Value>;

/// Builds the base composite rows for `base_table`'s `base_row_ids`,
/// then folds in each join in order.
///
/// # Errors
///
/// Returns [`crate::error::DbError::Schema`] if a join names a table
/// that doesn't exist.
pub(crate) fn execute_joins(
    db: &Database,
    base_table: &Table,
    joins: &[JoinClause],
    base_row_ids: &BTreeSet<u64>,
) -> Result<Vec<CompositeRow>> {
    let mut results: Vec<CompositeRow> = base_row_ids
        .iter()
        .map(|rid| {
            let row = &base_table.rows()[rid];
            let mut composite = CompositeRow::new();
            for (col, value) in row {
                composite.insert(format!("{}.{col}", base_table.name()), value.clone());
            }
            composite.extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));
            composite
        })
        .collect();

    for join in joins {
        let join_table = db.table(&join.table)?;
        let left_key = match &join.left.table {
            Some(table) => format!("{table}.{}", join.left.column),
            None => join.left.column.clone(),
        };
        // The right side always names a column of the table being
        // joined in; its own qualifier (if any) is irrelevant since
        // that table's rows aren't composite yet.
        let right_column = &join.right.column;

        let mut next_results = Vec::new();
        for result_row in &results {
            let left_value = result_row.get(&left_key).cloned().unwrap_or(Value::Null);
            for jrow in join_table.rows().values() {
                let matches = jrow
                    .get(right_column)
                    .is_some_and(|v| !v.is_null() && !left_value.is_null() && *v == left_value);
                if !matches {
                    continue;
                }
                let mut merged = result_row.clone();
                for (col, value) in jrow {
                    merged.insert(format!("{}.{col}", join.table), value.clone());
                    merged.insert(col.clone(), value.clone());
                }
                next_results.push(merged);
            }
        }
        results = next_results;
    }

    Ok(results)
}
