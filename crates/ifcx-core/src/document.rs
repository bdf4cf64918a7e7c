// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! On-disk IFCX document model (`header` / `schemas` / `data`).

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DocumentError;
use crate::refmap::RefMap;

/// Attribute map keyed by namespaced property name (`domain::sub::prop`).
pub type Attributes = serde_json::Map<String, Value>;

/// Schema dictionary keyed by schema id (same namespace as attribute keys).
pub type SchemaTable = HashMap<String, SchemaDef>;

/// One raw record of a file's `data` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Node identifier, unique within its file.
    pub path: String,
    /// Own attributes.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Child slot → reference path.
    #[serde(default, skip_serializing_if = "RefMap::is_empty")]
    pub children: RefMap,
    /// Inheritance slot → reference path.
    #[serde(default, skip_serializing_if = "RefMap::is_empty")]
    pub inherits: RefMap,
}

impl RawEntry {
    /// Entry with only a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Physical quantity declared by a schema; drives display units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityKind {
    /// Metres.
    Length,
    /// Square metres.
    Area,
    /// Cubic metres.
    Volume,
    /// Any other declared kind (no unit suffix).
    Other(String),
}

impl QuantityKind {
    fn parse(raw: &str) -> Self {
        match raw {
            "Length" => Self::Length,
            "Area" => Self::Area,
            "Volume" => Self::Volume,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Display unit suffix, if the kind has one.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Length => Some("m"),
            Self::Area => Some("m²"),
            Self::Volume => Some("m³"),
            Self::Other(_) => None,
        }
    }
}

/// Opaque schema definition; only `quantityKind` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDef(pub Value);

impl SchemaDef {
    /// Declared quantity kind, read from `value.quantityKind` or `quantityKind`.
    pub fn quantity_kind(&self) -> Option<QuantityKind> {
        self.0
            .pointer("/value/quantityKind")
            .or_else(|| self.0.get("quantityKind"))
            .and_then(Value::as_str)
            .map(QuantityKind::parse)
    }
}

/// A parsed IFCX file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IfcxDocument {
    /// Opaque header block.
    #[serde(default)]
    pub header: Value,
    /// Schema dictionary.
    #[serde(default)]
    pub schemas: SchemaTable,
    /// Raw entries in file order.
    #[serde(default)]
    pub data: Vec<RawEntry>,
}

impl IfcxDocument {
    /// Document holding only `data`.
    pub fn from_entries(data: Vec<RawEntry>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a document from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Read `reader` to the end, then parse it.
    ///
    /// Read failures surface as [`DocumentError::Io`], malformed content as
    /// [`DocumentError::Parse`].
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DocumentError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_json_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_sections_default() {
        let doc = IfcxDocument::from_json_str(r#"{"data": [{"path": "a"}]}"#).unwrap();
        assert!(doc.schemas.is_empty());
        assert_eq!(doc.header, Value::Null);
        assert_eq!(doc.data, vec![RawEntry::new("a")]);
    }

    #[test]
    fn attribute_order_follows_document() {
        let doc = IfcxDocument::from_json_str(
            r#"{"data": [{"path": "a", "attributes": {"z::a": 1, "a::z": 2}}]}"#,
        )
        .unwrap();
        let keys: Vec<_> = doc.data[0].attributes.keys().cloned().collect();
        assert_eq!(keys, vec!["z::a", "a::z"]);
    }

    #[test]
    fn quantity_kind_lookup() {
        let nested = SchemaDef(serde_json::json!({
            "value": {"dataType": "Real", "quantityKind": "Area"}
        }));
        let flat = SchemaDef(serde_json::json!({"quantityKind": "Volume"}));
        let other = SchemaDef(serde_json::json!({"value": {"quantityKind": "Mass"}}));
        assert_eq!(nested.quantity_kind(), Some(QuantityKind::Area));
        assert_eq!(flat.quantity_kind().and_then(|k| k.unit()), Some("m³"));
        assert_eq!(other.quantity_kind().and_then(|k| k.unit()), None);
        assert_eq!(SchemaDef::default().quantity_kind(), None);
    }

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn reader_failures_are_io_errors() {
        let err = IfcxDocument::from_reader(BrokenPipe).unwrap_err();
        assert!(matches!(err, DocumentError::Io(_)));

        let doc = IfcxDocument::from_reader(&br#"{"data": [{"path": "x"}]}"#[..]).unwrap();
        assert_eq!(doc.data, vec![RawEntry::new("x")]);
        let err = IfcxDocument::from_reader(&b"{\"data\": 3}"[..]).unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let err = IfcxDocument::from_json_str(r#"{"data": [{"attributes": {}}]}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }
}
