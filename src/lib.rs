//! An in-memory, chunk-oriented column-store table engine.
//!
//! Tables are stored as a sequence of fixed-capacity chunks of columnar
//! segments. Chunks start out as append-only typed vectors and can be
//! replaced wholesale by order-preserving dictionary encodings; the scan
//! operator selects rows by a comparison predicate and emits tables of
//! references back into the scanned data.
//!
//! This crate is a facade over the workspace members:
//!
//! * [`data_types`] — element types, variant values, row addressing
//! * [`storage`] — segments, chunks and tables
//! * [`operators`] — the operator contract and the predicate scan
//! * [`catalog`] — the process-wide named-table registry

#![deny(broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

pub use catalog;
pub use data_types;
pub use operators;
pub use storage;
