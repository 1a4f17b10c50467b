//! Helpers shared by the test suites of the workspace crates.

#![deny(broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

use tracing_subscriber::EnvFilter;

/// Start tracing output if `RUST_LOG` is set, so that a plain `cargo test`
/// run stays quiet but failures can be rerun with full logs.
pub fn maybe_start_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        start_logging()
    }
}

/// Install a fmt subscriber honoring `RUST_LOG`. Safe to call from multiple
/// tests; only the first installation wins.
pub fn start_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
