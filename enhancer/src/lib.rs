//! Build-time bytecode enhancement of compiled class files.
//!
//! A manifest lists class files (relative to a compiled-classes directory)
//! that must be rewritten by an external bytecode transformer. Each listed
//! file is rewritten in place; the pre-enhancement original is kept under a
//! backup directory that mirrors the output layout. The backup's existence and
//! modification time are the only record of past enhancement: an artifact is
//! re-enhanced only when it is newer than its backup.
//!
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (path rules, staleness decision,
//!   report types). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (configuration, manifest reading,
//!   transformer invocation, file replacement).
//!
//! Orchestration modules ([`pipeline`], [`status`]) coordinate core logic with
//! I/O to implement CLI commands.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{EnhanceError, EnhanceResult, ValidationFailure};
