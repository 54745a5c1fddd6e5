//! Schema registry - embedded JSON schemas

use rust_embed::Embed;
use std::collections::HashMap;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// Documents that have a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    CaseIntake,
}

impl SchemaKind {
    pub fn all() -> &'static [SchemaKind] {
        &[SchemaKind::CaseIntake]
    }

    pub fn filename(&self) -> &'static str {
        match self {
            SchemaKind::CaseIntake => "case-intake.schema.json",
        }
    }
}

/// Registry of JSON schemas for document validation
pub struct SchemaRegistry {
    schemas: HashMap<SchemaKind, String>,
}

impl SchemaRegistry {
    /// Create a new schema registry with embedded schemas
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        for kind in SchemaKind::all() {
            if let Some(file) = EmbeddedSchemas::get(kind.filename()) {
                if let Ok(content) = std::str::from_utf8(&file.data) {
                    schemas.insert(*kind, content.to_string());
                }
            }
        }

        Self { schemas }
    }

    /// Get the JSON schema source for a document kind
    pub fn get(&self, kind: SchemaKind) -> Option<&str> {
        self.schemas.get(&kind).map(|s| s.as_str())
    }

    pub fn has_schema(&self, kind: SchemaKind) -> bool {
        self.schemas.contains_key(&kind)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
