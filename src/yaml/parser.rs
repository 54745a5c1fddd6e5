//! Typed YAML loading for lab files (case store, config, intake forms)

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Deserialize `content`, attributing syntax errors to `filename`
pub fn parse_yaml<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, filename).into())
}

pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::store::StoreSnapshot;

    #[test]
    fn test_parse_config_layer() {
        let config: Config =
            parse_yaml("author: Sam\nfinal_status_threshold: 90\n", "config.yaml").unwrap();
        assert_eq!(config.author.as_deref(), Some("Sam"));
        assert_eq!(config.final_status_threshold, Some(90));
        assert!(config.role.is_none());
    }

    #[test]
    fn test_empty_snapshot_document() {
        let snapshot: StoreSnapshot = parse_yaml("cases: []\n", "cases.yaml").unwrap();
        assert_eq!(snapshot.next_sequence, 1);
        assert!(snapshot.cases.is_empty());
    }

    #[test]
    fn test_syntax_error_names_the_file() {
        let err = parse_yaml::<Config>("author: [unclosed\n", "broken.yaml").unwrap_err();
        match err {
            YamlError::Syntax(syntax) => assert_eq!(syntax.filename, "broken.yaml"),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_yaml_file::<Config>(Path::new("/nonexistent/dlt/config.yaml")).unwrap_err();
        assert!(matches!(err, YamlError::Io(_)));
    }
}
