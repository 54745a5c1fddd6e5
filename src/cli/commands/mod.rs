//! CLI command implementations

pub mod attach;
pub mod case;
pub mod completions;
pub mod dashboard;
pub mod dept;
pub mod init;
pub mod note;
pub mod whoami;
pub mod workflow;
