use crate::domain::models::Finding;
use jsonschema::JSONSchema;
use serde_json::Value;

/// JSON Schema for the inventory fixture, also published under `docs/contracts`.
pub const INVENTORY_SCHEMA: &str = include_str!("../../docs/contracts/inventory.schema.json");

fn display_pointer(pointer: String) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer
    }
}

pub fn compile_inventory_schema() -> anyhow::Result<JSONSchema> {
    let schema: Value = serde_json::from_str(INVENTORY_SCHEMA)?;
    JSONSchema::compile(&schema)
        .map_err(|e| anyhow::anyhow!("bundled inventory schema does not compile: {}", e))
}

/// Schema violations of a fixture document, in the order the validator reports them.
pub fn schema_findings(value: &Value) -> anyhow::Result<Vec<Finding>> {
    let compiled = compile_inventory_schema()?;
    let findings = match compiled.validate(value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|e| Finding {
                path: display_pointer(e.instance_path.to_string()),
                message: e.to_string(),
            })
            .collect(),
    };
    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_fixture_conforms() {
        let v = json!({"storage": {"name": "fake_storage", "total_capacity": 0}});
        assert!(schema_findings(&v).unwrap().is_empty());
    }

    #[test]
    fn wrong_primitive_type_is_reported_with_its_pointer() {
        let v = json!({
            "storage": {"name": "fake_storage"},
            "volumes": [{
                "name": "vol_0",
                "storage_id": "s1",
                "native_volume_id": "v0",
                "total_capacity": "lots"
            }]
        });
        let findings = schema_findings(&v).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].path, "/volumes/0/total_capacity");
    }

    #[test]
    fn missing_required_field_is_reported() {
        let v = json!({
            "storage": {"name": "fake_storage"},
            "shares": [{"name": "share_0", "storage_id": "s1"}]
        });
        let findings = schema_findings(&v).unwrap();
        assert!(findings
            .iter()
            .any(|f| f.path == "/shares/0" && f.message.contains("native_share_id")));
    }

    #[test]
    fn missing_storage_is_reported_at_root() {
        let findings = schema_findings(&json!({"volumes": []})).unwrap();
        assert_eq!(findings[0].path, "/");
    }

    #[test]
    fn nulls_are_accepted_for_optional_fields() {
        let v = json!({
            "storage": {"name": "fake_storage", "location": null, "raw_capacity": null}
        });
        assert!(schema_findings(&v).unwrap().is_empty());
    }
}
