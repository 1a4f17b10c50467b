//! This crate exists to coordinate versions of the observability stack used
//! by the rest of the workspace. Depend on `observability_deps` and use the
//! re-exports rather than adding `tracing` to each `Cargo.toml`.

#![deny(broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

pub use tracing;
