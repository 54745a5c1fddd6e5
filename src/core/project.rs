//! Lab workspace discovery and persistence
//!
//! A workspace is any directory containing `.dlt/`. The case store lives in
//! `.dlt/cases.yaml` and is rewritten in full after every command that
//! mutates it.

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::core::store::{CaseStore, StoreSnapshot};
use crate::yaml::{parse_yaml, YamlError};

pub const LAB_DIR: &str = ".dlt";
pub const CASES_FILE: &str = "cases.yaml";

const CONFIG_TEMPLATE: &str = r#"# Dental Lab Tracker workspace configuration
#
# author: "Front Desk"          # name recorded on notes (or set DLT_AUTHOR)
# role: tech                    # tech | admin (or set DLT_ROLE)
# final_status_threshold: 90    # refuse try-in/delivery below this progress
# sequence_prefix: DL           # case IDs look like DL-2026-0001
"#;

#[derive(Debug, Error, Diagnostic)]
pub enum LabError {
    #[error("Not inside a lab workspace (searched upward from {0})")]
    #[diagnostic(code(dlt::lab::not_found), help("run `dlt init` to create one"))]
    NotFound(PathBuf),

    #[error("A lab workspace already exists at {0}")]
    #[diagnostic(code(dlt::lab::exists), help("use --force to reinitialize"))]
    AlreadyExists(PathBuf),

    #[error("I/O error on {path}: {source}")]
    #[diagnostic(code(dlt::lab::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Failed to serialize case store: {0}")]
    #[diagnostic(code(dlt::lab::serialize))]
    Serialize(String),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> LabError + '_ {
    move |source| LabError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A discovered lab workspace
#[derive(Debug, Clone)]
pub struct Lab {
    root: PathBuf,
}

impl Lab {
    /// Find the workspace containing the current directory
    pub fn discover() -> Result<Self, LabError> {
        let cwd = std::env::current_dir().map_err(io_err(Path::new(".")))?;
        Self::discover_from(&cwd)
    }

    /// Walk up from `start` looking for `.dlt/`
    pub fn discover_from(start: &Path) -> Result<Self, LabError> {
        start
            .ancestors()
            .find(|dir| dir.join(LAB_DIR).is_dir())
            .map(|dir| Self {
                root: dir.to_path_buf(),
            })
            .ok_or_else(|| LabError::NotFound(start.to_path_buf()))
    }

    /// Create a workspace at `root`
    pub fn init(root: &Path, force: bool) -> Result<Self, LabError> {
        let lab = Self {
            root: root.to_path_buf(),
        };
        let dir = lab.lab_dir();
        if dir.exists() && !force {
            return Err(LabError::AlreadyExists(root.to_path_buf()));
        }

        fs::create_dir_all(&dir).map_err(io_err(&dir))?;
        let config = lab.config_path();
        if !config.exists() {
            fs::write(&config, CONFIG_TEMPLATE).map_err(io_err(&config))?;
        }
        if force || !lab.cases_path().exists() {
            lab.write_snapshot(&StoreSnapshot {
                next_sequence: 1,
                cases: Vec::new(),
            })?;
        }

        tracing::info!(root = %root.display(), "initialized lab workspace");
        Ok(lab)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lab_dir(&self) -> PathBuf {
        self.root.join(LAB_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.lab_dir().join(crate::core::config::CONFIG_FILE)
    }

    pub fn cases_path(&self) -> PathBuf {
        self.lab_dir().join(CASES_FILE)
    }

    /// Load the case store, or an empty one if nothing has been saved yet
    pub fn load_store(&self, prefix: &str) -> Result<CaseStore, LabError> {
        let path = self.cases_path();
        if !path.exists() {
            return Ok(CaseStore::new(prefix));
        }

        let content = fs::read_to_string(&path).map_err(io_err(&path))?;
        if content.trim().is_empty() {
            return Ok(CaseStore::new(prefix));
        }
        let snapshot: StoreSnapshot = parse_yaml(&content, &path.display().to_string())?;
        Ok(CaseStore::from_snapshot(snapshot, prefix))
    }

    /// Persist the whole store
    pub fn save_store(&self, store: &CaseStore) -> Result<(), LabError> {
        self.write_snapshot(&store.snapshot())
    }

    fn write_snapshot(&self, snapshot: &StoreSnapshot) -> Result<(), LabError> {
        let yaml =
            serde_yml::to_string(snapshot).map_err(|e| LabError::Serialize(e.to_string()))?;

        // Write beside the target then rename so a crash never truncates the store
        let path = self.cases_path();
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;

        tracing::debug!(path = %path.display(), cases = snapshot.cases.len(), "saved case store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::{Category, OrthodonticsType};
    use crate::entities::case::CaseInput;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_init_and_discover_from_subdir() {
        let dir = tempdir().unwrap();
        Lab::init(dir.path(), false).unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let lab = Lab::discover_from(&nested).unwrap();
        assert_eq!(lab.root(), dir.path());
        assert!(lab.config_path().exists());
        assert!(lab.cases_path().exists());
    }

    #[test]
    fn test_init_twice_requires_force() {
        let dir = tempdir().unwrap();
        Lab::init(dir.path(), false).unwrap();
        assert!(matches!(
            Lab::init(dir.path(), false),
            Err(LabError::AlreadyExists(_))
        ));
        assert!(Lab::init(dir.path(), true).is_ok());
    }

    #[test]
    fn test_discover_outside_workspace() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Lab::discover_from(dir.path()),
            Err(LabError::NotFound(_))
        ));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempdir().unwrap();
        let lab = Lab::init(dir.path(), false).unwrap();

        let mut store = lab.load_store("DL").unwrap();
        let mut input = CaseInput {
            category: Some(Category::Orthodontics),
            doctor_name: "Dr. Patel".to_string(),
            patient_name: "K. Wong".to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 7, 10),
            ..Default::default()
        };
        input.options.orthodontics_type = Some(OrthodonticsType::Expander);
        let case = store.create(input).unwrap();
        lab.save_store(&store).unwrap();

        let reloaded = lab.load_store("DL").unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(&case.id), Some(&case));
    }

    #[test]
    fn test_corrupt_store_reports_yaml_error() {
        let dir = tempdir().unwrap();
        let lab = Lab::init(dir.path(), false).unwrap();
        fs::write(lab.cases_path(), "cases: [\n").unwrap();
        assert!(matches!(lab.load_store("DL"), Err(LabError::Yaml(_))));
    }
}
