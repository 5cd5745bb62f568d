//! The top-level `Database`: a named collection of tables plus the
//! durable JSON snapshot format.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DbError, Result};
use crate::schema::Column;
use crate::table::Table;
use crate::value::Value;

/// On-disk representation of one table: column declarations, rows keyed
/// by their (string-encoded) row id, and the next row id counter.
#[derive(Debug, Serialize, Deserialize)]
struct TableSnapshot {
    columns: Vec<Column>,
    rows: BTreeMap<String, BTreeMap<String, Value>>,
    next_row_id: u64,
}

/// On-disk representation of the whole database: one [`TableSnapshot`]
/// per table, keyed by table name.
#[derive(Debug, Serialize, Deserialize, Default)]
struct Snapshot {
    #[serde(flatten)]
    tables: BTreeMap<String, TableSnapshot>,
}

/// A collection of named tables, optionally backed by a snapshot file.
///
/// Every mutating statement (`CREATE TABLE`, `DROP TABLE`, `INSERT`,
/// `UPDATE`, `DELETE`) writes the whole snapshot back out immediately
/// afterward when a path is configured; there is no write-ahead log or
/// partial persistence.
pub struct Database {
    tables: BTreeMap<String, Table>,
    path: Option<PathBuf>,
}

impl Database {
    /// Creates an in-memory database with no backing file.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            tables: BTreeMap::new(),
            path: None,
        }
    }

    /// Opens (or creates) a database backed by a snapshot file at `path`.
    ///
    /// If the file already exists, its contents are loaded immediately.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`]/[`DbError::Serialization`] if an existing
    /// snapshot can't be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut db = Self {
            tables: BTreeMap::new(),
            path: Some(path.clone()),
        };
        if path.exists() {
            db.load()?;
        }
        Ok(db)
    }

    /// The tables currently defined, keyed by name.
    #[must_use]
    pub fn tables(&self) -> &BTreeMap<String, Table> {
        &self.tables
    }

    /// Looks up a table by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Schema`] if no table with that name exists.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| DbError::Schema(format!("table '{name}' does not exist")))
    }

    /// Mutable lookup, see [`Database::table`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Schema`] if no table with that name exists.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DbError::Schema(format!("table '{name}' does not exist")))
    }

    /// Creates a new, empty table and persists the change.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Schema`] if a table with that name already
    /// exists, or a persistence error from [`Database::save`].
    pub fn create_table(&mut self, name: &str, columns: Vec<Column>) -> Result<()> {
        if self.tables.contains_key(name) {
            return Err(DbError::Schema(format!("table '{name}' already exists")));
        }
        self.tables.insert(name.to_string(), Table::new(name, columns));
        info!(table = %name, "created table");
        self.save()
    }

    /// Drops a table and persists the change.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Schema`] if no table with that name exists, or
    /// a persistence error from [`Database::save`].
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        if self.tables.remove(name).is_none() {
            return Err(DbError::Schema(format!("table '{name}' does not exist")));
        }
        info!(table = %name, "dropped table");
        self.save()
    }

    /// Writes the whole database to its backing file, if one is set.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] if the file or its parent directory
    /// cannot be created, or [`DbError::Serialization`] if encoding
    /// fails (which should not happen for well-formed in-memory state).
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut snapshot = Snapshot::default();
        for (name, table) in &self.tables {
            let rows = table
                .rows()
                .iter()
                .map(|(id, row)| (id.to_string(), row.clone()))
                .collect();
            snapshot.tables.insert(
                name.clone(),
                TableSnapshot {
                    columns: table.columns().to_vec(),
                    rows,
                    next_row_id: table.next_row_id(),
                },
            );
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "wrote snapshot");
        Ok(())
    }

    /// Loads the database from its backing file, replacing all current
    /// tables. Every persisted row is trusted as-is: indexes are rebuilt
    /// from it, but uniqueness is not re-checked.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] if the file can't be read, or
    /// [`DbError::Serialization`] if it isn't valid JSON in the expected
    /// shape.
    fn load(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let json = std::fs::read_to_string(&path)?;
        let snapshot: Snapshot = serde_json::from_str(&json)?;

        self.tables.clear();
        for (name, table_snapshot) in snapshot.tables {
            let mut table = Table::new(&name, table_snapshot.columns);
            for (row_id_str, row) in table_snapshot.rows {
                let row_id: u64 = row_id_str
                    .parse()
                    .map_err(|_| DbError::Schema(format!("row id '{row_id_str}' is not a valid integer")))?;
                table.load_row(row_id, row);
            }
            table.set_next_row_id(table_snapshot.next_row_id);
            self.tables.insert(name, table);
        }
        warn!(path = %path.display(), tables = self.tables.len(), "loaded snapshot");
        Ok(())
    }
}
