//! Deterministic, pure logic shared by the enhancement pipeline.
//!
//! Core modules must be free of I/O side effects. They operate on paths and
//! timestamps handed to them and return deterministic outputs suitable for
//! tests.

pub mod artifact;
pub mod staleness;
pub mod types;
