//! A hand-written recursive-descent parser for a small SQL dialect.
//!
//! # Supported statements
//!
//! `CREATE TABLE`, `DROP TABLE`, `INSERT INTO ... VALUES`, `SELECT`
//! (with `JOIN`/`INNER JOIN`, `WHERE`, `ORDER BY`, `LIMIT`), `UPDATE`,
//! `DELETE`.
//!
//! # Expressions
//!
//! `WHERE`/`ON` predicates are comparisons (`=`, `!=`/`<>`, `<`, `<=`,
//! `>`, `>=`) between a column and a literal, combined with `AND`/`OR`.
//! Both connectives are parsed left-associative with identical
//! precedence; there is no implicit `AND`-binds-tighter-than-`OR` rule.
//!
//! # Not supported
//!
//! Nested subqueries, arithmetic expressions, functions, `GROUP BY`,
//! `HAVING`, set operations, `ALTER TABLE`, transactions.

pub(crate) mod error;
mod parser;

pub use error::SyntaxError;
pub use parser::{parse, Parser};
