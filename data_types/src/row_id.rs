//! Addressing types: chunks, columns, dictionary codes, and row positions.

/// Index of a chunk within a table.
pub type ChunkId = u32;

/// Offset of a row within one chunk.
pub type ChunkOffset = u32;

/// Index of a column within a table's schema.
pub type ColumnId = u16;

/// Index of an entry in a dictionary segment's sorted dictionary.
///
/// Codes are stored width-fitted (1, 2 or 4 bytes); `ValueId` is the widest
/// form they widen back to.
pub type ValueId = u32;

/// Sentinel for "no such dictionary entry".
///
/// Defined at the widest code width. Narrowing it with `as` to any supported
/// width yields that width's maximum, so a comparison done in a code's native
/// width still treats the sentinel as larger than every valid code.
pub const INVALID_VALUE_ID: ValueId = ValueId::MAX;

/// Identifies one row inside one chunk of a specific table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId {
    pub chunk_id: ChunkId,
    pub chunk_offset: ChunkOffset,
}

/// An ordered sequence of row positions. Order is meaningful: it defines the
/// row order of tables built over the list.
pub type PosList = Vec<RowId>;
