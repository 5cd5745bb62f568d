//! Abstract syntax tree types for the supported SQL statements.

mod expr;
mod stmt;

pub use expr::{ColumnRef, CompareOp, Pred};
pub use stmt::{
    CreateTableStatement, DeleteStatement, DropTableStatement, InsertStatement, JoinClause,
    OrderByItem, OrderDirection, SelectColumns, SelectStatement, Statement, UpdateStatement,
};
