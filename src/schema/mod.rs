//! Embedded JSON schemas and report templates

pub mod registry;
pub mod template;
pub mod validator;
