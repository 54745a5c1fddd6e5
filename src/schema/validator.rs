//! Validate YAML documents against the embedded JSON schemas

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use crate::schema::registry::{SchemaKind, SchemaRegistry};
use crate::yaml::{parse_yaml, YamlError};

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value (empty for the document root)
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("No schema registered for {0:?}")]
    #[diagnostic(code(dlt::schema::missing))]
    MissingSchema(SchemaKind),

    #[error("Embedded schema for {kind:?} is invalid: {reason}")]
    #[diagnostic(code(dlt::schema::invalid))]
    BadSchema { kind: SchemaKind, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("{filename} failed schema validation:\n{}", format_violations(.violations))]
    #[diagnostic(code(dlt::schema::violation))]
    Violations {
        filename: String,
        violations: Vec<SchemaViolation>,
    },
}

fn format_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Schema validator over a registry
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Parse YAML `content` and validate it, returning the document as JSON
    pub fn validate_yaml(
        &self,
        content: &str,
        filename: &str,
        kind: SchemaKind,
    ) -> Result<Value, ValidationError> {
        let value: Value = parse_yaml(content, filename)?;

        let violations = self.iter_errors(&value, kind)?;
        if violations.is_empty() {
            tracing::debug!(file = filename, schema = ?kind, "schema validation passed");
            Ok(value)
        } else {
            Err(ValidationError::Violations {
                filename: filename.to_string(),
                violations,
            })
        }
    }

    /// Every violation of `value` against the schema for `kind`
    pub fn iter_errors(
        &self,
        value: &Value,
        kind: SchemaKind,
    ) -> Result<Vec<SchemaViolation>, ValidationError> {
        let source = self
            .registry
            .get(kind)
            .ok_or(ValidationError::MissingSchema(kind))?;
        let schema: Value =
            serde_json::from_str(source).map_err(|e| ValidationError::BadSchema {
                kind,
                reason: e.to_string(),
            })?;
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| ValidationError::BadSchema {
                kind,
                reason: e.to_string(),
            })?;

        Ok(validator
            .iter_errors(value)
            .map(|e| SchemaViolation {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(content: &str) -> Result<Value, ValidationError> {
        let registry = SchemaRegistry::new();
        Validator::new(&registry).validate_yaml(content, "intake.yaml", SchemaKind::CaseIntake)
    }

    #[test]
    fn test_valid_intake() {
        let content = r#"
category: fixed
fixed_material: zirconia_layered
doctor_name: Dr. Ortiz
patient_name: J. Doe
due_date: "2026-05-01"
tooth_numbers: [11, "12"]
"#;
        let value = validate(content).unwrap();
        assert_eq!(value["fixed_material"], "zirconia_layered");
    }

    #[test]
    fn test_fixed_without_material_fails() {
        let content = r#"
category: fixed
doctor_name: Dr. Ortiz
patient_name: J. Doe
due_date: "2026-05-01"
"#;
        match validate(content) {
            Err(ValidationError::Violations { violations, .. }) => assert!(!violations.is_empty()),
            other => panic!("expected violations, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_and_bad_enum() {
        let content = r#"
category: veneer
doctor: Dr. Ortiz
patient_name: J. Doe
due_date: "2026-05-01"
"#;
        match validate(content) {
            Err(ValidationError::Violations { violations, .. }) => {
                assert!(violations.len() >= 2);
                assert!(violations.iter().any(|v| v.path == "/category"));
            }
            other => panic!("expected violations, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_product_needs_steps() {
        let content = r#"
category: removable
is_custom_product: true
custom_steps: []
doctor_name: Dr. Ortiz
patient_name: J. Doe
due_date: "2026-05-01"
"#;
        assert!(validate(content).is_err());
    }

    #[test]
    fn test_yaml_syntax_error() {
        let err = validate("category: [fixed\n").unwrap_err();
        assert!(matches!(err, ValidationError::Yaml(_)));
    }
}
