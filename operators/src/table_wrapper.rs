//! A leaf operator wrapping an already materialized table.

use std::sync::Arc;

use storage::Table;

use crate::{Operator, Result};

/// Heads a pipeline with an existing table handle.
#[derive(Debug)]
pub struct TableWrapper {
    table: Arc<Table>,
    output: Option<Arc<Table>>,
}

impl TableWrapper {
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table,
            output: None,
        }
    }
}

impl Operator for TableWrapper {
    fn execute(&mut self) -> Result<()> {
        if self.output.is_none() {
            self.output = Some(Arc::clone(&self.table));
        }
        Ok(())
    }

    fn output(&self) -> Option<Arc<Table>> {
        self.output.as_ref().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_the_wrapped_table() {
        let table = Arc::new(Table::new(2));
        let mut wrapper = TableWrapper::new(Arc::clone(&table));
        assert!(wrapper.output().is_none());

        wrapper.execute().unwrap();
        let output = wrapper.output().unwrap();
        assert!(Arc::ptr_eq(&output, &table));

        wrapper.execute().unwrap();
        assert!(Arc::ptr_eq(&wrapper.output().unwrap(), &table));
    }
}
