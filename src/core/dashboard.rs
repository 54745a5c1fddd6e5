//! Dashboard aggregates and the read-only case feed
//!
//! The feed is an external, loosely structured list of case rows. It is only
//! ever read, and any failure to read it is swallowed in favour of the
//! built-in sample rows so the dashboard always has something to show.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::store::CaseStore;
use crate::core::vocabulary::{Department, FinalStatus, Priority};
use crate::entities::case::{Case, CaseState};

/// Counts shown at the top of the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub active: usize,
    pub paused: usize,
    pub in_try_in: usize,
    pub delivered: usize,
    pub rush: usize,
    pub emergency: usize,
    pub overdue: usize,
    pub due_today: usize,

    /// Open cases per department, in pipeline order, zero counts omitted
    pub by_department: Vec<(Department, usize)>,
}

impl DashboardSummary {
    pub fn from_store(store: &CaseStore, today: NaiveDate) -> Self {
        let mut summary = DashboardSummary::default();
        let mut per_dept = vec![0usize; Department::all().len()];

        for case in store.list() {
            summary.total += 1;
            match case.state() {
                CaseState::Active => summary.active += 1,
                CaseState::Paused => summary.paused += 1,
                CaseState::Finalized(FinalStatus::TryIn) => summary.in_try_in += 1,
                CaseState::Finalized(FinalStatus::Delivery) => summary.delivered += 1,
            }

            if case.final_status == Some(FinalStatus::Delivery) {
                continue;
            }

            match case.priority {
                Priority::Rush => summary.rush += 1,
                Priority::Emergency => summary.emergency += 1,
                Priority::Normal => {}
            }

            let days = case.days_until_due(today);
            if days < 0 {
                summary.overdue += 1;
            } else if days == 0 {
                summary.due_today += 1;
            }

            if let Some(dept) = case.current_department() {
                if let Some(pos) = Department::all().iter().position(|d| *d == dept) {
                    per_dept[pos] += 1;
                }
            }
        }

        summary.by_department = Department::all()
            .iter()
            .zip(per_dept)
            .filter(|(_, n)| *n > 0)
            .map(|(d, n)| (*d, n))
            .collect();
        summary
    }
}

/// One row of the dashboard table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedRow {
    pub id: String,
    pub doctor: String,
    #[serde(rename = "caseType")]
    pub case_type: String,
    pub status: String,
    pub progress: u8,
}

impl From<&Case> for FeedRow {
    fn from(case: &Case) -> Self {
        Self {
            id: case.id.to_string(),
            doctor: case.doctor_name.clone(),
            case_type: case.classification.label(),
            status: case.state().to_string(),
            progress: case.progress_percent(),
        }
    }
}

/// Errors reading an external feed
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to read feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Feed is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Feed must be a JSON array of rows (or an object with a `cases` array)")]
    Shape,
}

/// Read-only source of dashboard rows
pub trait CaseFeed {
    fn fetch(&self) -> Result<Vec<FeedRow>, FeedError>;
}

/// Feed backed by a JSON file on disk
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CaseFeed for FileFeed {
    fn fetch(&self) -> Result<Vec<FeedRow>, FeedError> {
        let content = fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_rows(&content)
    }
}

/// Map a loosely shaped JSON document to rows
///
/// Accepts camelCase or snake_case keys. Rows without an id are dropped and
/// progress is clamped to 0..=100.
pub fn parse_rows(content: &str) -> Result<Vec<FeedRow>, FeedError> {
    let value: Value = serde_json::from_str(content)?;
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("cases") {
            Some(Value::Array(items)) => items,
            _ => return Err(FeedError::Shape),
        },
        _ => return Err(FeedError::Shape),
    };

    Ok(items.iter().filter_map(row_from_value).collect())
}

fn row_from_value(value: &Value) -> Option<FeedRow> {
    let id = text_field(value, &["id", "caseId", "case_id"])?;
    let progress = match field(value, &["progress"]) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    Some(FeedRow {
        id,
        doctor: text_field(value, &["doctor", "doctorName", "doctor_name"]).unwrap_or_default(),
        case_type: text_field(value, &["caseType", "case_type", "type"]).unwrap_or_default(),
        status: text_field(value, &["status"]).unwrap_or_else(|| "unknown".to_string()),
        progress: progress.clamp(0.0, 100.0).round() as u8,
    })
}

fn field<'v>(value: &'v Value, keys: &[&str]) -> Option<&'v Value> {
    keys.iter().find_map(|k| value.get(*k))
}

fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    match field(value, keys)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Built-in rows shown when no feed is reachable
pub fn sample_rows() -> Vec<FeedRow> {
    let row = |id: &str, doctor: &str, case_type: &str, status: &str, progress: u8| FeedRow {
        id: id.to_string(),
        doctor: doctor.to_string(),
        case_type: case_type.to_string(),
        status: status.to_string(),
        progress,
    };
    vec![
        row("DL-SAMPLE-0001", "Dr. Sample", "Zirconia (layered)", "active", 40),
        row("DL-SAMPLE-0002", "Dr. Sample", "Night guard", "paused", 33),
        row("DL-SAMPLE-0003", "Dr. Sample", "Hawley retainer", "finalized(delivery)", 100),
    ]
}

/// Fetch rows, falling back to the sample rows on any failure
pub fn rows_or_sample(feed: &dyn CaseFeed) -> Vec<FeedRow> {
    match feed.fetch() {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "case feed unavailable, showing sample rows");
            sample_rows()
        }
    }
}
