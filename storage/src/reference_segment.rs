//! The logical segment encoding: a view of selected rows of another table.

use std::sync::Arc;

use data_types::{ColumnId, DataType, PosList, Value};

use crate::table::Table;

/// A segment that materializes no values of its own: it holds an ordered
/// list of row positions into one column of a base table.
///
/// The base table must not itself contain reference segments; scans collapse
/// reference-over-reference so that this invariant holds for every segment
/// they emit.
#[derive(Debug, Clone)]
pub struct ReferenceSegment {
    referenced_table: Arc<Table>,
    referenced_column_id: ColumnId,
    pos_list: Arc<PosList>,
}

impl ReferenceSegment {
    pub fn new(
        referenced_table: Arc<Table>,
        referenced_column_id: ColumnId,
        pos_list: Arc<PosList>,
    ) -> Self {
        debug_assert!(
            !referenced_table.has_reference_segments(),
            "reference segments must point at a base table"
        );
        Self {
            referenced_table,
            referenced_column_id,
            pos_list,
        }
    }

    /// Number of referenced rows.
    pub fn size(&self) -> usize {
        self.pos_list.len()
    }

    /// The element type of the referenced column.
    pub fn data_type(&self) -> DataType {
        self.referenced_table
            .column_type(self.referenced_column_id)
    }

    /// Resolves the row position at `offset` through the base table.
    pub fn value_at(&self, offset: usize) -> Value {
        let row_id = self.pos_list[offset];
        let chunk = self.referenced_table.get_chunk(row_id.chunk_id);
        let chunk = chunk.read();
        chunk
            .get_segment(self.referenced_column_id)
            .value_at(row_id.chunk_offset as usize)
    }

    pub fn referenced_table(&self) -> &Arc<Table> {
        &self.referenced_table
    }

    pub fn referenced_column_id(&self) -> ColumnId {
        self.referenced_column_id
    }

    pub fn pos_list(&self) -> &Arc<PosList> {
        &self.pos_list
    }
}
