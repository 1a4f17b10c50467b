//! This crate contains the data types shared between the chunkstore storage
//! layer and its operators: the closed set of column element types, the
//! variant value that crosses the typed/untyped boundary, and the id types
//! used to address rows, chunks, columns and dictionary entries.

#![deny(broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

pub mod data_type;
pub mod row_id;
pub mod value;

pub use data_type::DataType;
pub use row_id::{ChunkId, ChunkOffset, ColumnId, PosList, RowId, ValueId, INVALID_VALUE_ID};
pub use value::{NativeType, Value};
