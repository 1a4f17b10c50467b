//! The process-wide mapping from table names to table handles.
//!
//! Higher layers register tables here by name and resolve them when building
//! operator pipelines. The registry has singleton semantics — created on
//! first access, cleared with [`StorageManager::reset`] — but instances can
//! also be constructed directly where tests need isolation.

#![deny(broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use observability_deps::tracing::info;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use snafu::{ensure, OptionExt, Snafu};
use storage::Table;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("a table named '{}' already exists", name))]
    TableAlreadyExists { name: String },

    #[snafu(display("no table named '{}'", name))]
    TableNotFound { name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

static GLOBAL: Lazy<StorageManager> = Lazy::new(StorageManager::new);

/// A registry of named tables.
#[derive(Debug, Default)]
pub struct StorageManager {
    tables: RwLock<BTreeMap<String, Arc<Table>>>,
}

impl StorageManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry instance.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Registers `table` under `name`. The name must be unused.
    pub fn add_table(&self, name: impl Into<String>, table: Arc<Table>) -> Result<()> {
        let name = name.into();
        let mut tables = self.tables.write();
        ensure!(
            !tables.contains_key(&name),
            TableAlreadyExists { name }
        );
        info!(%name, rows = table.row_count(), "table registered");
        tables.insert(name, table);
        Ok(())
    }

    /// Removes the table registered under `name`.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write();
        tables.remove(name).context(TableNotFound { name })?;
        info!(%name, "table dropped");
        Ok(())
    }

    /// The table registered under `name`.
    pub fn get_table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .read()
            .get(name)
            .map(Arc::clone)
            .context(TableNotFound { name })
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// All registered names, sorted.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Unregisters every table.
    pub fn reset(&self) {
        self.tables.write().clear();
    }
}

/// One `name column_count row_count chunk_count` line per registered table.
impl fmt::Display for StorageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        for (name, table) in &*tables {
            writeln!(
                f,
                "{} {} {} {}",
                name,
                table.column_count(),
                table.row_count(),
                table.chunk_count()
            )?;
        }
        Ok(())
    }
}
