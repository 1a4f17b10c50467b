//! Relational operators over chunked tables.
//!
//! An operator node consumes the output tables of up to two input operators
//! and materializes one output table on its first
//! [`execute`](Operator::execute). Pipelines are built by handing one
//! operator to the next as input; executing the tail executes the whole
//! chain.

#![deny(broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

use std::fmt;
use std::sync::Arc;

use data_types::{ColumnId, DataType};
use snafu::Snafu;
use storage::Table;

pub mod get_table;
pub mod predicate;
pub mod table_scan;
pub mod table_wrapper;

pub use get_table::GetTable;
pub use predicate::Predicate;
pub use table_scan::TableScan;
pub use table_wrapper::TableWrapper;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{}", source))]
    TableLookup { source: catalog::Error },

    #[snafu(display(
        "column id {} out of range for a table with {} columns",
        column_id,
        column_count
    ))]
    ColumnIdOutOfRange {
        column_id: ColumnId,
        column_count: u16,
    },

    #[snafu(display(
        "search value not convertible to column type {}: {}",
        data_type,
        source
    ))]
    SearchValueConversion {
        data_type: DataType,
        source: data_types::value::Error,
    },

    #[snafu(display("{}", source))]
    DictionaryScan {
        source: storage::dictionary_segment::Error,
    },

    #[snafu(display("reference segments must be the only segments of a scanned column"))]
    MixedSegmentEncodings,

    #[snafu(display("error building the result table: {}", source))]
    ResultTable { source: storage::table::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A node in an operator pipeline.
///
/// `execute` is explicit and idempotent: the first call materializes the
/// output table and caches it, later calls are no-ops. Executing a node
/// executes its inputs first, so only the tail of a pipeline needs to be
/// driven.
pub trait Operator: fmt::Debug {
    /// Materializes the output table if that has not happened yet.
    fn execute(&mut self) -> Result<()>;

    /// The cached output table; `None` until `execute` succeeds.
    fn output(&self) -> Option<Arc<Table>>;
}
