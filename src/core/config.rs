//! Layered configuration
//!
//! Values are merged from lowest to highest precedence: built-in defaults,
//! the user config file, the workspace `.dlt/config.yaml`, then the
//! `DLT_AUTHOR` and `DLT_ROLE` environment variables.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::identity::is_valid_case_prefix;
use crate::core::lifecycle::{LifecycleConfig, Operator};
use crate::core::project::Lab;
use crate::core::store::DEFAULT_PREFIX;
use crate::core::vocabulary::Role;
use crate::yaml::parse_yaml_file;

pub const CONFIG_FILE: &str = "config.yaml";
pub const AUTHOR_ENV: &str = "DLT_AUTHOR";
pub const ROLE_ENV: &str = "DLT_ROLE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Minimum progress (percent) before a final status may be recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_status_threshold: Option<u8>,

    /// Case ID prefix, `DL` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_prefix: Option<String>,
}

impl Config {
    /// Load the merged configuration for the current directory
    pub fn load() -> Self {
        let workspace = Lab::discover().ok().map(|lab| lab.config_path());
        Self::load_layers(Self::user_config_path().as_deref(), workspace.as_deref())
    }

    /// Merge the given config files (either may be absent) and the environment
    pub fn load_layers(user: Option<&Path>, workspace: Option<&Path>) -> Self {
        let mut config = Config::default();
        for path in [user, workspace].into_iter().flatten() {
            if let Some(layer) = Self::read_file(path) {
                config.merge(layer);
            }
        }
        config.apply_env();
        config
    }

    /// Path of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dlt").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match parse_yaml_file::<Config>(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Overlay every value set in `other`
    pub fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.role.is_some() {
            self.role = other.role;
        }
        if other.final_status_threshold.is_some() {
            self.final_status_threshold = other.final_status_threshold;
        }
        if other.sequence_prefix.is_some() {
            self.sequence_prefix = other.sequence_prefix;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(author) = std::env::var(AUTHOR_ENV) {
            if !author.trim().is_empty() {
                self.author = Some(author.trim().to_string());
            }
        }
        if let Ok(role) = std::env::var(ROLE_ENV) {
            match role.parse::<Role>() {
                Ok(role) => self.role = Some(role),
                Err(e) => tracing::warn!(error = %e, "ignoring {}", ROLE_ENV),
            }
        }
    }

    /// Name recorded on notes, falling back to the login name
    pub fn author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    /// Case ID prefix, falling back to `DL` when unset or unusable
    pub fn sequence_prefix(&self) -> String {
        let Some(prefix) = self.sequence_prefix.as_deref().map(str::trim) else {
            return DEFAULT_PREFIX.to_string();
        };
        if !is_valid_case_prefix(prefix) {
            if !prefix.is_empty() {
                tracing::warn!(
                    prefix,
                    fallback = DEFAULT_PREFIX,
                    "sequence_prefix must be ASCII letters only, using the default"
                );
            }
            return DEFAULT_PREFIX.to_string();
        }
        prefix.to_uppercase()
    }

    pub fn operator(&self) -> Operator {
        Operator::new(self.author(), self.role())
    }

    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig {
            final_status_threshold: self.final_status_threshold.map(|t| t.min(100)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_merge_overrides_only_set_values() {
        let mut base = Config {
            author: Some("base".to_string()),
            final_status_threshold: Some(50),
            ..Default::default()
        };
        base.merge(Config {
            role: Some(Role::Admin),
            final_status_threshold: Some(90),
            ..Default::default()
        });
        assert_eq!(base.author.as_deref(), Some("base"));
        assert_eq!(base.role(), Role::Admin);
        assert_eq!(base.lifecycle().final_status_threshold, Some(90));
    }

    #[test]
    fn test_workspace_layer_beats_user_layer() {
        let dir = tempdir().unwrap();
        let user = dir.path().join("user.yaml");
        let workspace = dir.path().join("workspace.yaml");
        fs::write(&user, "sequence_prefix: ab\nfinal_status_threshold: 80\n").unwrap();
        fs::write(&workspace, "final_status_threshold: 95\n").unwrap();

        let config = Config::load_layers(Some(&user), Some(&workspace));
        assert_eq!(config.sequence_prefix(), "AB");
        assert_eq!(config.final_status_threshold, Some(95));
    }

    #[test]
    fn test_bad_file_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "role: [oops").unwrap();
        let config = Config::load_layers(None, Some(&path));
        assert!(config.sequence_prefix.is_none());
    }

    #[test]
    fn test_unusable_prefix_falls_back_to_default() {
        for bad in ["LAB1", "D-L", "  ", "ÄB"] {
            let config = Config {
                sequence_prefix: Some(bad.to_string()),
                ..Default::default()
            };
            assert_eq!(config.sequence_prefix(), "DL", "prefix {bad:?}");
        }

        let config = Config {
            sequence_prefix: Some(" lab ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.sequence_prefix(), "LAB");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sequence_prefix(), "DL");
        assert_eq!(config.role(), Role::Tech);
        assert_eq!(config.lifecycle(), LifecycleConfig::default());
    }
}
