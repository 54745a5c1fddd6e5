//! DLT: Dental Lab Tracker
//!
//! Tracks dental-lab production cases through their department workflows:
//! template generation from a case's classification, stage advancement,
//! clinical pauses, final disposition, notes and attachments.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
pub mod yaml;
