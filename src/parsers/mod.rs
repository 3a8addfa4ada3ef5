pub mod jacoco;

use std::io::BufRead;

use quick_xml::events::BytesStart;
use quick_xml::Reader;

use crate::error::CovprError;

/// Read a named attribute off an XML element, unescaping entities.
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}

/// Wrap a quick-xml error with the byte position it occurred at.
pub(crate) fn xml_err<R: BufRead>(source: quick_xml::Error, reader: &Reader<R>) -> CovprError {
    CovprError::Xml {
        source,
        position: reader.buffer_position(),
    }
}
