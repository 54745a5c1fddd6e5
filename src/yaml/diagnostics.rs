//! Miette diagnostics for YAML documents
//!
//! Syntax and shape errors point back into the offending file, so a broken
//! `cases.yaml` or intake form shows the exact line that needs fixing.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors raised while loading a YAML document
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error("Failed to read YAML file: {0}")]
    #[diagnostic(code(dlt::yaml::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),
}

/// A YAML error with a pointer into the source
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {filename}: {message}")]
#[diagnostic(code(dlt::yaml::syntax), help("check indentation and field names near the marked line"))]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Wrap a serde_yml error, locating it in `content`
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let span = err.location().map(|loc| {
            let offset = loc.index().min(content.len());
            SourceSpan::from((offset, 1))
        });

        // serde_yml appends "at line X column Y"; the label already shows that
        let message = err.to_string();
        let message = match message.find(" at line ") {
            Some(pos) => message[..pos].to_string(),
            None => message,
        };

        Self {
            filename: filename.to_string(),
            message,
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }

    /// 1-based line of the error, when known
    pub fn line(&self) -> Option<usize> {
        let offset = self.span?.offset();
        let content = self.src.inner();
        Some(content[..offset.min(content.len())].matches('\n').count() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_error_points_at_bad_line() {
        let content = "name: crown\ncount: many\n";
        let err = serde_yml::from_str::<Doc>(content).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, content, "cases.yaml");
        assert_eq!(diag.filename, "cases.yaml");
        if let Some(line) = diag.line() {
            assert_eq!(line, 2);
        }
        assert!(!diag.message.contains(" at line "));
        assert!(diag.message.contains("many"));
    }
}
