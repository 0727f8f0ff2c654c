//! Prune stale build artifacts from a Cargo `target` directory.
//!
//! The sweeper runs as two phases around a build. Phase 1 ([`stamp`]) records
//! a reference timestamp. Phase 2 ([`post`]) locates `target`, deletes every
//! file whose access time precedes that timestamp, and reports the space
//! reclaimed. The layout follows a strict split:
//!
//! - **[`core`]**: Pure, deterministic logic (classification, exemptions,
//!   formatting). No I/O.
//! - **[`io`]**: Side-effecting adapters (filesystem, child processes, state,
//!   config), behind traits where tests need to substitute them.
//!
//! [`sweep`] is the concurrent walker; [`guarded`] wraps a build command with
//! both phases.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod guarded;
pub mod io;
pub mod logging;
pub mod post;
pub mod stamp;
pub mod sweep;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
