//! Construction tests
//!
//! - Keyed collections and container flattening
//! - Dual elements and term forms
//! - Langenv inheritance
//! - Fatal structural errors

pub mod tests_construction;
pub mod tests_errors;
pub mod tests_inheritance;
