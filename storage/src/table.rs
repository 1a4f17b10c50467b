//! A table: a schema plus an ordered sequence of fixed-capacity chunks.

use std::fmt;
use std::sync::Arc;

use data_types::{ChunkId, ColumnId, DataType, Value};
use observability_deps::tracing::info;
use parking_lot::RwLock;
use snafu::{ensure, OptionExt, ResultExt, Snafu};

use crate::chunk::Chunk;
use crate::dictionary_segment::DictionarySegment;
use crate::segment::{Segment, SegmentEncoding};
use crate::value_segment::ValueSegment;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("cannot add columns once rows have been appended"))]
    ColumnsAfterRows,

    #[snafu(display("column with name '{}' already exists", name))]
    DuplicateColumnName { name: String },

    #[snafu(display("{}", source))]
    UnknownColumnType { source: data_types::data_type::Error },

    #[snafu(display("no column with name '{}'", name))]
    ColumnNotFound { name: String },

    #[snafu(display("error appending row: {}", source))]
    RowAppend { source: crate::chunk::Error },

    #[snafu(display("error compressing chunk {}: {}", chunk_id, source))]
    ChunkCompression {
        chunk_id: ChunkId,
        source: crate::dictionary_segment::Error,
    },

    #[snafu(display(
        "emplaced chunk has {} columns but the table has {}",
        actual,
        expected
    ))]
    ChunkColumnMismatch { expected: u16, actual: u16 },

    #[snafu(display("cannot emplace a chunk while the last chunk is partially full"))]
    EmplaceIntoPartialTable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A chunked, columnar table.
///
/// Rows are appended to the last chunk; when it reaches the configured
/// `chunk_size` a fresh chunk is started, so every chunk except the last is
/// exactly full. Structural changes to the chunk list are serialized behind
/// one exclusive lock; handed-out chunks are shared and locked individually.
pub struct Table {
    chunk_size: u32,
    columns: RwLock<Columns>,
    chunks: RwLock<Vec<Arc<RwLock<Chunk>>>>,
}

#[derive(Debug, Default)]
struct Columns {
    names: Vec<String>,
    types: Vec<DataType>,
}

impl Table {
    /// A new table that fills chunks up to `chunk_size` rows.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: u32) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        Self {
            chunk_size,
            columns: RwLock::new(Columns::default()),
            chunks: RwLock::new(vec![Arc::new(RwLock::new(Chunk::new()))]),
        }
    }

    /// Declares a column. Columns can only be added while the table has no
    /// rows; every existing (empty) chunk gains an empty value segment of
    /// the matching element type.
    pub fn add_column(&self, name: &str, type_name: &str) -> Result<()> {
        let data_type: DataType = type_name.parse().context(UnknownColumnType)?;

        let mut columns = self.columns.write();
        ensure!(self.row_count() == 0, ColumnsAfterRows);
        ensure!(
            !columns.names.iter().any(|existing| existing == name),
            DuplicateColumnName { name }
        );

        columns.names.push(name.to_string());
        columns.types.push(data_type);
        let chunks = self.chunks.read();
        for chunk in &*chunks {
            chunk
                .write()
                .add_segment(Segment::Value(ValueSegment::new(data_type)));
        }
        Ok(())
    }

    /// Appends one row, rolling over to a fresh chunk when the last one is
    /// full.
    pub fn append(&self, row: Vec<Value>) -> Result<()> {
        let columns = self.columns.read();
        let mut chunks = self.chunks.write();

        let last_is_full = {
            let last = chunks.last().expect("table always has at least one chunk");
            last.read().size() == self.chunk_size as usize
        };
        if last_is_full {
            chunks.push(Arc::new(RwLock::new(Self::empty_chunk(&columns.types))));
        }

        let last = chunks.last().expect("table always has at least one chunk");
        let result = last.write().append(row).context(RowAppend);
        result
    }

    fn empty_chunk(types: &[DataType]) -> Chunk {
        let mut chunk = Chunk::new();
        for data_type in types {
            chunk.add_segment(Segment::Value(ValueSegment::new(*data_type)));
        }
        chunk
    }

    /// Total number of rows across all chunks.
    pub fn row_count(&self) -> u64 {
        self.chunks
            .read()
            .iter()
            .map(|chunk| chunk.read().size() as u64)
            .sum()
    }

    /// Number of chunks; always at least one.
    pub fn chunk_count(&self) -> ChunkId {
        self.chunks.read().len() as ChunkId
    }

    /// The chunk with the given id. Callers take a read or write lock on the
    /// returned chunk as needed.
    pub fn get_chunk(&self, chunk_id: ChunkId) -> Arc<RwLock<Chunk>> {
        let chunks = self.chunks.read();
        debug_assert!(
            (chunk_id as usize) < chunks.len(),
            "chunk id {} out of range",
            chunk_id
        );
        Arc::clone(&chunks[chunk_id as usize])
    }

    pub fn column_id_by_name(&self, name: &str) -> Result<ColumnId> {
        self.columns
            .read()
            .names
            .iter()
            .position(|existing| existing == name)
            .map(|position| position as ColumnId)
            .context(ColumnNotFound { name })
    }

    pub fn column_name(&self, column_id: ColumnId) -> String {
        self.columns.read().names[usize::from(column_id)].clone()
    }

    pub fn column_type(&self, column_id: ColumnId) -> DataType {
        self.columns.read().types[usize::from(column_id)]
    }

    pub fn column_count(&self) -> u16 {
        self.columns.read().names.len() as u16
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.read().names.clone()
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Replaces the chunk with a dictionary-compressed version of itself.
    ///
    /// The replacement is built without holding the chunk-list lock; only
    /// the final swap takes it exclusively.
    pub fn compress_chunk(&self, chunk_id: ChunkId) -> Result<()> {
        let chunk = self.get_chunk(chunk_id);

        let compressed = {
            let chunk = chunk.read();
            let mut compressed = Chunk::new();
            for segment in chunk.segments() {
                let dictionary_segment = DictionarySegment::from_segment(segment)
                    .context(ChunkCompression { chunk_id })?;
                compressed.add_segment(Segment::Dictionary(dictionary_segment));
            }
            compressed
        };

        info!(
            chunk_id,
            rows = compressed.size(),
            columns = usize::from(compressed.column_count()),
            "chunk compressed"
        );

        self.chunks.write()[chunk_id as usize] = Arc::new(RwLock::new(compressed));
        Ok(())
    }

    /// Appends a preconstructed chunk.
    ///
    /// An empty table swaps the incoming chunk in for its initial empty
    /// chunk; otherwise the last chunk must be exactly full.
    pub fn emplace_chunk(&self, chunk: Chunk) -> Result<()> {
        let columns = self.columns.read();
        ensure!(
            usize::from(chunk.column_count()) == columns.names.len(),
            ChunkColumnMismatch {
                expected: columns.names.len() as u16,
                actual: chunk.column_count(),
            }
        );

        let mut chunks = self.chunks.write();
        let row_count: u64 = chunks.iter().map(|chunk| chunk.read().size() as u64).sum();
        let chunk = Arc::new(RwLock::new(chunk));
        if row_count == 0 {
            chunks.clear();
            chunks.push(chunk);
        } else {
            let last_size = {
                let last = chunks.last().expect("table always has at least one chunk");
                last.read().size()
            };
            ensure!(
                last_size == self.chunk_size as usize,
                EmplaceIntoPartialTable
            );
            chunks.push(chunk);
        }
        Ok(())
    }

    pub(crate) fn has_reference_segments(&self) -> bool {
        self.chunks.read().iter().any(|chunk| {
            chunk
                .read()
                .segments()
                .iter()
                .any(|segment| segment.encoding() == SegmentEncoding::Reference)
        })
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.column_names())
            .field("chunk_size", &self.chunk_size)
            .field("chunks", &self.chunk_count())
            .field("rows", &self.row_count())
            .finish()
    }
}
