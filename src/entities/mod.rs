//! Entity type definitions

pub mod case;

pub use case::{Attachment, Case, CaseInput, CaseNote, CaseState, PauseRecord, Stage};
