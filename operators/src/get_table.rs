//! A leaf operator resolving its table through the storage manager.

use std::sync::Arc;

use catalog::StorageManager;
use snafu::ResultExt;
use storage::Table;

use crate::{Operator, Result, TableLookup};

/// Heads a pipeline with a table registered under a name.
#[derive(Debug)]
pub struct GetTable {
    name: String,
    output: Option<Arc<Table>>,
}

impl GetTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: None,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.name
    }
}

impl Operator for GetTable {
    fn execute(&mut self) -> Result<()> {
        if self.output.is_none() {
            let table = StorageManager::global()
                .get_table(&self.name)
                .context(TableLookup)?;
            self.output = Some(table);
        }
        Ok(())
    }

    fn output(&self) -> Option<Arc<Table>> {
        self.output.as_ref().map(Arc::clone)
    }
}
