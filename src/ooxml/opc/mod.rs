/// Open Packaging Conventions (OPC) implementation.
///
/// This module provides the subset of the OPC specification needed to open a
/// WordprocessingML package, rewrite some of its parts, and save it again:
///
/// - Package structure (parts, relationships)
/// - Content type lookup
/// - ZIP-based physical packaging
///
/// Parts the caller never touches are written back byte-for-byte.
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod phys_pkg;
pub mod rel;

// Re-export commonly used types
pub use error::OpcError;
pub use package::{OpcPackage, PackagePart};
pub use packuri::PackURI;
pub use rel::{Relationship, Relationships};
