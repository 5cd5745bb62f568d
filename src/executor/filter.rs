//! `WHERE` predicate evaluation.

use std::collections::BTreeSet;

use crate::ast::{CompareOp, Pred};
use crate::table::Table;
use crate::value::Value;

/// Returns the row ids of `table` that satisfy `pred`, without
/// materializing any rows. Used before a `JOIN` is involved, where every
/// column in `pred` is known to belong to `table` itself.
#[must_use]
pub(crate) fn filter_rows(table: &Table, pred: &Pred) -> BTreeSet<u64> {
    match pred {
        Pred::Cmp { column, op, value } => eval_comparison(table, &column.column, *op, value),
        Pred::And(left, right) => &filter_rows(table, left) & &filter_rows(table, right),
        Pred::Or(left, right) => &filter_rows(table, left) | &filter_rows(table, right),
    }
}

/// Evaluates a single `column op value` comparison, probing the column's
/// index for an equality match and falling back to a full scan for
/// everything else.
fn eval_comparison(table: &Table, column: &str, op: CompareOp, value: &Value) -> BTreeSet<u64> {
    if matches!(op, CompareOp::Eq) {
        if let Some(index) = table.index(column) {
            return index.get(value).iter().copied().collect();
        }
    }

    table
        .rows()
        .iter()
        .filter(|(_, row)| {
            let row_value = row.get(column).unwrap_or(&Value::Null);
            op.evaluate(row_value, value)
        })
        .map(|(&rid, _)| rid)
        .collect()
}

/// Evaluates `pred` against an already-materialized (possibly joined)
/// row, looking columns up by their qualified or bare key exactly as
/// the predicate names them.
#[must_use]
pub(crate) fn eval_pred_on_row(
    row: &std::collections::BTreeMap<String, Value>,
    pred: &Pred,
) -> bool {
    match pred {
        Pred::Cmp { column, op, value } => {
            let key = match &column.table {
                Some(table) => format!("{table}.{}", column.column),
                None => column.column.clone(),
            };
            let row_value = row.get(&key).unwrap_or(&Value::Null);
            op.evaluate(row_value, value)
        }
        Pred::And(left, right) => eval_pred_on_row(row, left) && eval_pred_on_row(row, right),
        Pred::Or(left, right) => eval_pred_on_row(row, left) || eval_pred_on_row(row, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ColumnRef;
    use crate::schema::{Column, DataType};
    use std::collections::BTreeMap;

    fn table_with_rows() -> Table {
        let mut table = Table::new(
            "t",
            vec![
                Column::new("id", DataType::Integer).primary_key(),
                Column::new("age", DataType::Integer),
            ],
        );
        for (id, age) in [(1, 20), (2, 30), (3, 40)] {
            let mut row = BTreeMap::new();
            row.insert("id".to_string(), Value::Integer(id));
            row.insert("age".to_string(), Value::Integer(age));
            table.insert(row).unwrap();
        }
        table
    }

    #[test]
    fn equality_uses_the_index() {
        let table = table_with_rows();
        let pred = Pred::Cmp {
            column: ColumnRef::unqualified("id"),
            op: CompareOp::Eq,
            value: Value::Integer(2),
        };
        assert_eq!(filter_rows(&table, &pred), BTreeSet::from([2]));
    }

    #[test]
    fn range_comparison_falls_back_to_scan() {
        let table = table_with_rows();
        let pred = Pred::Cmp {
            column: ColumnRef::unqualified("age"),
            op: CompareOp::GtEq,
            value: Value::Integer(30),
        };
        assert_eq!(filter_rows(&table, &pred), BTreeSet::from([2, 3]));
    }

    #[test]
    fn and_intersects_or_unions() {
        let table = table_with_rows();
        let and_pred = Pred::And(
            Box::new(Pred::Cmp {
                column: ColumnRef::unqualified("age"),
                op: CompareOp::GtEq,
                value: Value::Integer(20),
            }),
            Box::new(Pred::Cmp {
                column: ColumnRef::unqualified("age"),
                op: CompareOp::Lt,
                value: Value::Integer(40),
            }),
        );
        assert_eq!(filter_rows(&table, &and_pred), BTreeSet::from([1, 2]));
    }
}
