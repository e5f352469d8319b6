//! Foundation types for the glossary model.
//!
//! - [`Key`] - identifier of a keyed entity (language, environment, concept, ...)
//! - [`SourceLocation`] - file and line a node was built from
//!
//! This module has NO dependencies on other crate modules.

mod location;

pub use location::SourceLocation;

/// Identifier of a keyed glossary entity.
///
/// Keys are short (`en`, `sr@latin`, `kde4`) so they stay inline.
pub type Key = smol_str::SmolStr;

/// Split a whitespace-separated attribute value into keys.
pub fn split_keys(value: &str) -> Vec<Key> {
    value.split_whitespace().map(Key::new).collect()
}
