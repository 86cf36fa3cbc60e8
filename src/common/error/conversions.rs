//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from the
//! layer-specific error types to the unified Error type.

use super::types::Error;
use crate::ooxml::error::OoxmlError;
use crate::ooxml::opc::error::OpcError;

impl From<OpcError> for Error {
    fn from(err: OpcError) -> Self {
        match err {
            OpcError::IoError(e) => Error::Io(e),
            OpcError::ZipError(e) => Error::Zip(e.to_string()),
            OpcError::PackageNotFound(path) => Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Package not found: {}", path),
            )),
            OpcError::XmlError(s) | OpcError::AttrError(s) => Error::Xml(s),
            OpcError::QuickXmlError(e) => Error::Xml(e.to_string()),
            OpcError::PartNotFound(s) => Error::PartNotFound(s),
            OpcError::InvalidPackUri(s)
            | OpcError::RelationshipNotFound(s)
            | OpcError::ContentTypeNotFound(s)
            | OpcError::InvalidRelationship(s) => Error::InvalidFormat(s),
        }
    }
}

impl From<OoxmlError> for Error {
    fn from(err: OoxmlError) -> Self {
        match err {
            OoxmlError::Opc(e) => Error::from(e),
            OoxmlError::Io(e) => Error::Io(e),
            OoxmlError::Xml(s) => Error::Xml(s),
            OoxmlError::PartNotFound(s) => Error::PartNotFound(s),
            OoxmlError::InvalidContentType { expected, got } => {
                Error::InvalidContentType { expected, got }
            },
            OoxmlError::InvalidRelationship(s) | OoxmlError::InvalidFormat(s) => {
                Error::InvalidFormat(s)
            },
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_package_is_not_found_io() {
        let err = Error::from(OpcError::PackageNotFound("in.docx".to_string()));
        match err {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_content_type_passes_through() {
        let err = Error::from(OoxmlError::InvalidContentType {
            expected: "a".to_string(),
            got: "b".to_string(),
        });
        assert!(matches!(err, Error::InvalidContentType { .. }));
        assert_eq!(err.to_string(), "Invalid content type: expected a, got b");
    }

    #[test]
    fn test_nested_opc_error() {
        let err = Error::from(OoxmlError::Opc(OpcError::PartNotFound(
            "/word/header1.xml".to_string(),
        )));
        assert!(matches!(err, Error::PartNotFound(p) if p == "/word/header1.xml"));
    }
}
