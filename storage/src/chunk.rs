//! A horizontal partition of a table: one segment per column, all the same
//! size.

use data_types::{ColumnId, Value};
use snafu::{ensure, ResultExt, Snafu};

use crate::segment::Segment;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("row has {} values but the chunk has {} columns", actual, expected))]
    WrongRowLength { expected: usize, actual: usize },

    #[snafu(display("error appending to column {}: {}", column_id, source))]
    SegmentAppend {
        column_id: ColumnId,
        source: crate::segment::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An ordered collection of segments, one per column of the owning table.
#[derive(Debug, Default)]
pub struct Chunk {
    segments: Vec<Segment>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a segment as the next column. Only used while a chunk is being
    /// laid out; rows arrive via [`append`](Self::append) afterwards.
    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn get_segment(&self, column_id: ColumnId) -> &Segment {
        &self.segments[usize::from(column_id)]
    }

    /// Appends one row. The row must supply exactly one convertible value
    /// per column.
    pub fn append(&mut self, row: Vec<Value>) -> Result<()> {
        ensure!(
            row.len() == self.segments.len(),
            WrongRowLength {
                expected: self.segments.len(),
                actual: row.len(),
            }
        );
        for (column_id, (segment, value)) in self.segments.iter_mut().zip(row).enumerate() {
            segment.append(value).context(SegmentAppend {
                column_id: column_id as ColumnId,
            })?;
        }
        Ok(())
    }

    pub fn column_count(&self) -> u16 {
        self.segments.len() as u16
    }

    /// Number of rows, which is the common size of all segments.
    pub fn size(&self) -> usize {
        self.segments.first().map_or(0, |segment| segment.size())
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
