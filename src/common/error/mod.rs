//! Unified error types for docfill.
//!
//! This module provides a unified error type that encompasses errors from the
//! package, XML, document, and template layers.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
