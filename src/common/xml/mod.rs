//! XML text helpers shared by the package and document layers.

mod escape;

pub use escape::{escape_attr, escape_text, is_xml_char, resolve_entity, unescape_xml};
