//! I/O adapters for sweeper commands.

pub mod config;
pub mod fs;
pub mod locate;
pub mod process;
pub mod state;
