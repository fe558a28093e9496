//! Side-effecting helpers: configuration, manifests, transformers, and file replacement.

pub mod config;
pub mod layout;
pub mod manifest;
pub mod process;
pub mod replace;
pub mod staleness;
pub mod transformer;
