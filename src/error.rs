//! Fatal errors of a glossary build.

use thiserror::Error;

use crate::base::{Key, SourceLocation};

/// Errors that abort construction of a glossary.
///
/// Located variants render as `file:line: message`.
#[derive(Debug, Error)]
pub enum GlossError {
    /// Markup could not be read into an element tree.
    #[error("XML parsing failed: {0}")]
    Xml(String),

    /// IO error while loading a document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document root is not a glossary.
    #[error("{location}: expected a 'glossary' root element, found '{tag}'")]
    UnknownRoot { tag: String, location: SourceLocation },

    /// The same `id` appears twice anywhere in the document.
    #[error("{second}: duplicate ID '{id}' (first defined at {first})")]
    DuplicateId {
        id: Key,
        first: SourceLocation,
        second: SourceLocation,
    },

    /// A keyed collection member has no `id` attribute.
    #[error("{location}: element '{tag}' in a keyed collection has no 'id' attribute")]
    MissingId { tag: String, location: SourceLocation },

    /// A cross-reference attribute names keys that do not exist.
    #[error("{location}: attribute '{attribute}' states non-{target} keys: {}", join_keys(.keys))]
    UnresolvedKeys {
        attribute: &'static str,
        target: &'static str,
        keys: Vec<Key>,
        location: SourceLocation,
    },
}

impl GlossError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Source location of the offending node, when the error has one.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::UnknownRoot { location, .. }
            | Self::MissingId { location, .. }
            | Self::UnresolvedKeys { location, .. } => Some(location),
            Self::DuplicateId { second, .. } => Some(second),
            Self::Xml(_) | Self::Io(_) => None,
        }
    }
}

fn join_keys(keys: &[Key]) -> String {
    keys.iter().map(Key::as_str).collect::<Vec<_>>().join(" ")
}
