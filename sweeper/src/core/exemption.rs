//! Files that are never swept, whatever their age.

use std::ffi::OsStr;

/// Basenames cargo keeps exactly one copy of and recreates on every build.
/// Removing them frees nothing worth having and costs the next build work.
///
/// See <https://doc.rust-lang.org/nightly/nightly-rustc/cargo/core/compiler/layout/index.html>.
pub const CARGO_EXEMPT_NAMES: &[&str] = &["CACHEDIR.TAG", ".rustc_info.json"];

/// Static predicate over basenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExemptionPolicy {
    names: &'static [&'static str],
}

impl ExemptionPolicy {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    pub fn is_exempt(&self, basename: &OsStr) -> bool {
        self.names.iter().any(|name| OsStr::new(name) == basename)
    }
}

impl Default for ExemptionPolicy {
    fn default() -> Self {
        Self::new(CARGO_EXEMPT_NAMES)
    }
}
