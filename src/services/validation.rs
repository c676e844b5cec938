use crate::domain::models::{Finding, ValidationReport};
use crate::inventory::{parse_inventory, LoadedFixture};
use crate::services::references::convention_findings;
use crate::services::schema::schema_findings;

/// Schema errors first; convention warnings only once the document conforms.
pub fn validate_fixture(fixture: &LoadedFixture) -> anyhow::Result<ValidationReport> {
    let errors = schema_findings(&fixture.value)?;
    let mut warnings = Vec::new();
    let mut typed_errors = Vec::new();

    if errors.is_empty() {
        match parse_inventory(&fixture.value) {
            Ok(inv) => warnings = convention_findings(&fixture.value, &inv)?,
            Err(e) => typed_errors.push(Finding {
                path: "/".to_string(),
                message: e.to_string(),
            }),
        }
    }

    let errors: Vec<Finding> = errors.into_iter().chain(typed_errors).collect();
    let overall = if !errors.is_empty() {
        "invalid"
    } else if !warnings.is_empty() {
        "warnings"
    } else {
        "ok"
    };
    log::info!(
        "validated {}: {} error(s), {} warning(s)",
        fixture.source,
        errors.len(),
        warnings.len()
    );

    Ok(ValidationReport {
        source: fixture.source.clone(),
        sha256: fixture.sha256(),
        overall: overall.to_string(),
        errors,
        warnings,
    })
}
