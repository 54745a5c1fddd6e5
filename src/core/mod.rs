//! Core module - the case workflow engine and its supporting types

pub mod attachments;
pub mod audit;
pub mod classification;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod project;
pub mod routing;
pub mod store;
pub mod vocabulary;

pub use classification::{Classification, ClassificationOptions};
pub use config::Config;
pub use dashboard::{CaseFeed, DashboardSummary, FeedRow, FileFeed};
pub use error::CaseError;
pub use identity::{CaseId, IdParseError, RecordId, RecordPrefix};
pub use lifecycle::{LifecycleConfig, LifecycleController, Operator};
pub use project::{Lab, LabError};
pub use routing::{generate, instantiate, StageTemplate};
pub use store::{CaseStore, StoreEvent, StoreSnapshot};
