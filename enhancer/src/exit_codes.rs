//! Stable exit codes for enhancer CLI commands.

/// Command succeeded (including runs with nothing to enhance).
pub const OK: i32 = 0;
/// Validation, transformation, I/O, or configuration failure.
pub const FAILED: i32 = 1;
/// `enhancer status` found at least one artifact that needs enhancement.
pub const STALE: i32 = 2;
