//! # oxide-minidb
//!
//! A small embedded SQL engine: a hand-written tokenizer and parser, an
//! in-memory row store with B-Tree-backed indexes on `UNIQUE`/
//! `PRIMARY KEY` columns, a statement executor, and a durable JSON
//! snapshot format.
//!
//! ```rust
//! use oxide_minidb::Database;
//!
//! let mut db = Database::in_memory();
//! oxide_minidb::execute(&mut db, "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").unwrap();
//! oxide_minidb::execute(&mut db, "INSERT INTO users (id, name) VALUES (1, 'Ada')").unwrap();
//! let result = oxide_minidb::execute(&mut db, "SELECT * FROM users").unwrap();
//! assert_eq!(result.rows.len(), 1);
//! ```
//!
//! ## Scope
//!
//! This is a single-process, single-threaded engine with no query
//! planner beyond "use the index if the predicate is an equality on an
//! indexed column, otherwise scan". It is not a client/server database,
//! has no transactions, and does not implement SQL's full type system
//! or expression grammar; see each module's documentation for the exact
//! subset that is supported.

pub mod ast;
pub mod database;
pub mod error;
pub mod executor;
pub mod index;
pub mod lexer;
pub mod parser;
pub mod schema;
pub mod table;
pub mod value;

pub use database::Database;
pub use error::{DbError, Result};
pub use executor::{execute, QueryResult};
pub use schema::{Column, DataType};
pub use value::Value;
