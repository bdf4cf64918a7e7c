// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Display/export view of a node's attributes.

use serde_json::Value;

use crate::document::{Attributes, SchemaDef, SchemaTable};

/// Flatten object attributes one level into `key::sub` and annotate units.
///
/// Non-object values whose schema declares Length/Area/Volume become strings
/// with a unit suffix (`"3 m"`). Values below the first object level are kept
/// as JSON. The input is not modified.
pub fn flatten_attributes(attributes: &Attributes, schemas: &SchemaTable) -> Attributes {
    let mut flat = Attributes::new();
    for (key, value) in attributes {
        match value {
            Value::Object(fields) => {
                for (sub, inner) in fields {
                    flat.insert(format!("{key}::{sub}"), inner.clone());
                }
            }
            scalar => {
                let unit = schemas
                    .get(key)
                    .and_then(SchemaDef::quantity_kind)
                    .and_then(|kind| kind.unit());
                let shown = match unit {
                    Some(unit) => Value::String(format!("{} {unit}", display(scalar))),
                    None => scalar.clone(),
                };
                flat.insert(key.clone(), shown);
            }
        }
    }
    flat
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
