//! JSON Schema generation for `manifest.json` and the `--json` outputs.
//!
//! Exported through the `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// All schemas by name. BTreeMap keeps the output order stable.
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    schemas.insert("manifest", schema_for!(crate::manifest::Manifest));
    schemas.insert("generate", schema_for!(crate::cmd::GenerateJsonOutput));
    schemas.insert("list", schema_for!(crate::cmd::ListJsonOutput));
    schemas.insert("show", schema_for!(crate::cmd::ShowJsonOutput));
    schemas.insert("verify", schema_for!(crate::cmd::VerifyJsonOutput));

    schemas
}

pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names_are_sorted() {
        assert_eq!(
            schema_names(),
            vec!["generate", "list", "manifest", "show", "verify"]
        );
    }

    #[test]
    fn test_manifest_schema_lists_artifact_fields() {
        let schema = get_schema("manifest").unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        for field in ["artifacts", "sha256", "page_version", "compression"] {
            assert!(json.contains(field), "missing {}", field);
        }
    }
}
