//! Statement-level AST nodes.

use crate::schema::Column;
use crate::value::Value;

use super::expr::{ColumnRef, Pred};

/// `CREATE TABLE name (col type [constraints], ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub table: String,
    pub columns: Vec<Column>,
}

/// `DROP TABLE name`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStatement {
    pub table: String,
}

/// `INSERT INTO name [(col, ...)] VALUES (...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    /// Explicit column list, if given; `None` means "all declared columns
    /// in declaration order".
    pub columns: Option<Vec<String>>,
    pub values: Vec<Value>,
}

/// Which columns a `SELECT` projects.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumns {
    /// `SELECT *`
    All,
    /// `SELECT a, b, c`
    List(Vec<String>),
}

/// Ascending or descending sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// A single `ORDER BY` key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub column: String,
    pub direction: OrderDirection,
}

/// `JOIN table [AS alias] ON left = right`.
///
/// Only equi-joins between two column references are supported; this
/// matches how join rows are matched during execution (a nested-loop
/// scan comparing one column from each side).
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub table: String,
    pub alias: Option<String>,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

/// `SELECT ... FROM ... [JOIN ...] [WHERE ...] [ORDER BY ...] [LIMIT ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub columns: SelectColumns,
    pub from: String,
    pub from_alias: Option<String>,
    pub joins: Vec<JoinClause>,
    pub where_clause: Option<Pred>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<i64>,
}

/// `UPDATE table SET col = value, ... [WHERE ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub where_clause: Option<Pred>,
}

/// `DELETE FROM table [WHERE ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: String,
    pub where_clause: Option<Pred>,
}

/// Any of the supported SQL statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTableStatement),
    DropTable(DropTableStatement),
    Insert(InsertStatement),
    Select(SelectStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}
