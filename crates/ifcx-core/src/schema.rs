// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Non-blocking attribute/schema cross-check.

use crate::collapse::NodeTable;
use crate::diagnostics::Diagnostic;
use crate::document::SchemaTable;

/// One `MissingSchema` diagnostic per attribute key with no schema of that id.
pub fn validate(table: &NodeTable, schemas: &SchemaTable) -> Vec<Diagnostic> {
    table
        .iter()
        .flat_map(|node| {
            node.attributes
                .keys()
                .filter(|key| !schemas.contains_key(*key))
                .map(|key| Diagnostic::MissingSchema {
                    path: node.path.clone(),
                    key: key.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collapse::collapse;
    use crate::document::{RawEntry, SchemaDef};
    use crate::federate::TaggedEntry;
    use serde_json::json;

    #[test]
    fn reports_only_unknown_keys() {
        let mut entry = RawEntry::new("wall");
        entry.attributes.insert("known".into(), json!(1));
        entry.attributes.insert("unknown".into(), json!(2));
        let table = collapse(&[TaggedEntry {
            source: "f",
            entry: &entry,
        }]);
        let mut schemas = SchemaTable::new();
        schemas.insert("known".into(), SchemaDef::default());

        let found = validate(&table, &schemas);
        assert_eq!(
            found,
            vec![Diagnostic::MissingSchema {
                path: "wall".into(),
                key: "unknown".into()
            }]
        );
    }
}
