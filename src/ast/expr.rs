//! Predicate expressions used by `WHERE` and join `ON` clauses.

use crate::value::Value;

/// A possibly-qualified column reference, e.g. `name` or `users.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// The table qualifier, if the column was written as `table.column`.
    pub table: Option<String>,
    /// The column name.
    pub column: String,
}

impl ColumnRef {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn unqualified(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    /// Creates a table-qualified column reference.
    #[must_use]
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// Renders as `column` or `table.column`, matching the key a composite
    /// row carries for this reference.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.table {
            Some(table) => format!("{table}.{}", self.column),
            None => self.column.clone(),
        }
    }
}

/// A comparison operator usable in a `WHERE` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    /// Applies this operator to two already-resolved values.
    ///
    /// A `NULL` on either side makes every comparison false, mirroring
    /// SQL's three-valued logic collapsed to a boolean result.
    #[must_use]
    pub fn evaluate(self, left: &Value, right: &Value) -> bool {
        if left.is_null() || right.is_null() {
            return false;
        }
        match self {
            Self::Eq => left == right,
            Self::NotEq => !(left == right),
            Self::Lt => left.partial_cmp_value(right) == Some(std::cmp::Ordering::Less),
            Self::LtEq => matches!(
                left.partial_cmp_value(right),
                Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
            ),
            Self::Gt => left.partial_cmp_value(right) == Some(std::cmp::Ordering::Greater),
            Self::GtEq => matches!(
                left.partial_cmp_value(right),
                Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
            ),
        }
    }
}

/// A `WHERE`/`ON` predicate tree.
///
/// `And`/`Or` are parsed strictly left-associative with no precedence
/// distinction between them (see the parser), so this tree is exactly
/// the shape the parser builds, not a canonicalized boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Pred {
    /// A single column-to-literal comparison.
    Cmp {
        column: ColumnRef,
        op: CompareOp,
        value: Value,
    },
    /// Conjunction of two predicates.
    And(Box<Pred>, Box<Pred>),
    /// Disjunction of two predicates.
    Or(Box<Pred>, Box<Pred>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_comparisons_are_always_false() {
        assert!(!CompareOp::Eq.evaluate(&Value::Null, &Value::Integer(1)));
        assert!(!CompareOp::NotEq.evaluate(&Value::Integer(1), &Value::Null));
    }

    #[test]
    fn ordinary_equality() {
        assert!(CompareOp::Eq.evaluate(&Value::Integer(5), &Value::Integer(5)));
        assert!(!CompareOp::Eq.evaluate(&Value::Integer(5), &Value::Integer(6)));
    }
}
