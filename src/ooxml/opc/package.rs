/// Objects that implement reading and writing OPC packages.
///
/// This module provides the main OpcPackage type, which represents an Open Packaging
/// Convention package in memory. It keeps every part as raw bytes in archive order,
/// resolves content types and relationships, and lets callers swap the content of
/// the parts they rewrite before the package is serialized again.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::{PhysPkgReader, PhysPkgWriter};
use crate::ooxml::opc::rel::Relationships;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// A part of the package: its name and serialized content.
#[derive(Debug, Clone)]
pub struct PackagePart {
    partname: PackURI,
    blob: Vec<u8>,
}

impl PackagePart {
    /// Get the partname of this part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Get the serialized content of this part.
    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }
}

/// Maps partnames to content types, as declared in `[Content_Types].xml`.
#[derive(Debug, Default)]
struct ContentTypeMap {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::default();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let is_default = match e.local_name().as_ref() {
                        b"Default" => true,
                        b"Override" => false,
                        _ => {
                            buf.clear();
                            continue;
                        },
                    };

                    // <Default Extension="xml" ContentType="application/xml"/>
                    // <Override PartName="/word/document.xml" ContentType="..."/>
                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => {
                                key = Some(attr.unescape_value()?.to_string());
                            },
                            b"ContentType" => {
                                content_type = Some(attr.unescape_value()?.to_string());
                            },
                            _ => {},
                        }
                    }

                    if let (Some(key), Some(ct)) = (key, content_type) {
                        if is_default {
                            map.defaults.insert(key.to_lowercase(), ct);
                        } else {
                            map.overrides.insert(key.to_lowercase(), ct);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    fn get(&self, pack_uri: &PackURI) -> Result<&str> {
        // Partnames compare case-insensitively per OPC
        if let Some(ct) = self.overrides.get(&pack_uri.as_str().to_lowercase()) {
            return Ok(ct);
        }

        self.defaults
            .get(&pack_uri.ext().to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }
}

/// Main API class for working with OPC packages.
///
/// OpcPackage holds the package in memory as an ordered list of parts.
/// Content types and package-level relationships are parsed on load; part-level
/// relationships are parsed on demand with [`OpcPackage::part_rels`].
pub struct OpcPackage {
    /// Parts in archive order
    parts: Vec<PackagePart>,

    /// Partname to index into `parts`
    index: HashMap<String, usize>,

    /// Parsed `[Content_Types].xml`
    content_types: ContentTypeMap,

    /// Package-level relationships (`/_rels/.rels`)
    rels: Relationships,
}

impl OpcPackage {
    /// Open an OPC package from a file.
    ///
    /// # Example
    /// ```no_run
    /// use docfill::ooxml::opc::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("template.docx")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::open(path)?)
    }

    /// Load an OPC package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::new(reader)?)
    }

    /// Load an OPC package from an in-memory archive.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }

    fn from_phys_reader(phys_reader: PhysPkgReader) -> Result<Self> {
        let members = phys_reader.into_members();

        let mut parts = Vec::with_capacity(members.len());
        let mut index = HashMap::with_capacity(members.len());
        for member in members {
            let partname = PackURI::from_membername(&member.name);
            index.insert(partname.as_str().to_string(), parts.len());
            parts.push(PackagePart {
                partname,
                blob: member.data,
            });
        }

        let mut package = Self {
            parts,
            index,
            content_types: ContentTypeMap::default(),
            rels: Relationships::default(),
        };

        let content_types_uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        package.content_types = ContentTypeMap::from_xml(package.blob(&content_types_uri)?)?;

        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        package.rels = package.part_rels(&package_uri)?;

        Ok(package)
    }

    /// Get the partname of the main document part.
    ///
    /// For Word documents, this is usually `/word/document.xml`.
    pub fn main_document_partname(&self) -> Result<PackURI> {
        let rel = self.rels.part_with_reltype(relationship_type::OFFICE_DOCUMENT)?;
        let partname = rel.target_partname()?;
        if !self.contains_part(&partname) {
            return Err(OpcError::PartNotFound(partname.to_string()));
        }
        Ok(partname)
    }

    /// Get the content type of a part.
    pub fn content_type(&self, partname: &PackURI) -> Result<&str> {
        self.content_types.get(partname)
    }

    /// Get the serialized content of a part.
    pub fn blob(&self, partname: &PackURI) -> Result<&[u8]> {
        self.index
            .get(partname.as_str())
            .map(|&i| self.parts[i].blob())
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Replace the serialized content of an existing part.
    pub fn set_blob(&mut self, partname: &PackURI, blob: Vec<u8>) -> Result<()> {
        let i = *self
            .index
            .get(partname.as_str())
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))?;
        self.parts[i].blob = blob;
        Ok(())
    }

    /// Get the relationships whose source is `source`.
    ///
    /// Returns an empty collection if the source has no `.rels` part.
    pub fn part_rels(&self, source: &PackURI) -> Result<Relationships> {
        let rels_uri = source.rels_uri().map_err(OpcError::InvalidPackUri)?;
        match self.blob(&rels_uri) {
            Ok(xml) => Relationships::from_xml(xml, source.base_uri()),
            Err(OpcError::PartNotFound(_)) => Ok(Relationships::new(source.base_uri().to_string())),
            Err(e) => Err(e),
        }
    }

    /// Get a reference to the package-level relationships.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Get an iterator over all parts in archive order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &PackagePart> {
        self.parts.iter()
    }

    /// Get the number of parts in the package.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Check if a part exists in the package.
    #[inline]
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.index.contains_key(partname.as_str())
    }

    /// Serialize the package to ZIP bytes, keeping the original member order.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_replacing(&HashMap::new())
    }

    /// Serialize the package, substituting the content of some parts.
    ///
    /// Parts named in `replacements` are written with the given content instead
    /// of their stored blob; every other part is written unchanged. Names that
    /// do not match a part are ignored.
    pub fn to_bytes_replacing(&self, replacements: &HashMap<PackURI, Vec<u8>>) -> Result<Vec<u8>> {
        let mut phys_writer = PhysPkgWriter::new();
        for part in &self.parts {
            let blob = replacements
                .get(part.partname())
                .map(Vec::as_slice)
                .unwrap_or(part.blob());
            phys_writer.write(part.partname(), blob)?;
        }
        phys_writer.finish()
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
