//! Deterministic, pure logic shared by the sweeper.
//!
//! Core modules must be free of I/O side effects. They classify already
//! observed metadata and render results, which keeps them testable without a
//! filesystem.

pub mod classifier;
pub mod exemption;
pub mod humanize;
pub mod types;
