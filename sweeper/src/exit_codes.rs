//! Stable exit codes for sweeper CLI commands.

/// Command succeeded (including a sweep that freed nothing).
pub const OK: i32 = 0;
/// Locate, enumeration, config, or state failure aborted the command.
pub const FATAL: i32 = 1;
/// Sweep skipped because an upstream pipeline step recorded a failure.
pub const UPSTREAM_FAILED: i32 = 2;
/// `sweeper run` build command failed or timed out; the sweep was skipped.
pub const BUILD_FAILED: i32 = 3;
