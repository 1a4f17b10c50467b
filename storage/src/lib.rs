//! The physical storage layer of the engine.
//!
//! Tables hold a sequence of fixed-capacity [`Chunk`]s; a chunk holds one
//! [`Segment`] per column. Segments come in three encodings: append-only
//! typed vectors ([`ValueSegment`]), immutable order-preserving dictionary
//! encodings ([`DictionarySegment`]) and logical views of selected rows of
//! another table ([`ReferenceSegment`]).

#![deny(broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

pub mod attribute_vector;
pub mod chunk;
pub mod dictionary_segment;
pub mod reference_segment;
pub mod segment;
pub mod table;
pub mod value_segment;

pub use attribute_vector::AttributeVector;
pub use chunk::Chunk;
pub use dictionary_segment::DictionarySegment;
pub use reference_segment::ReferenceSegment;
pub use segment::{Segment, SegmentEncoding, SegmentType};
pub use table::Table;
pub use value_segment::ValueSegment;
