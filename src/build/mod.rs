//! Glossary construction.
//!
//! ```text
//! Element tree ──► duplicate-id scan ──► Builder ──► Glossary ──► validate
//!                                          │
//!                                          └── selector resolution per d-set insertion
//! ```
//!
//! Construction stops at the first fatal problem; warnings are collected and
//! returned with the glossary.

mod builder;
mod ids;
mod text;

use std::sync::Arc;

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::error::GlossError;
use crate::markup::Element;
use crate::model::Glossary;
use crate::validate;

pub use crate::selector::SelectorFallback;

use builder::Builder;

/// Settings for one build run.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Run the referential check on the finished tree.
    pub validate: bool,
    /// File name recorded in source locations.
    pub source_name: String,
    /// Pick used when a selector has no variant for an environment.
    pub selector_fallback: SelectorFallback,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            validate: true,
            source_name: "<unknown>".to_string(),
            selector_fallback: SelectorFallback::default(),
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn with_selector_fallback(mut self, fallback: SelectorFallback) -> Self {
        self.selector_fallback = fallback;
        self
    }
}

/// Result of a successful build.
#[derive(Clone, Debug)]
pub struct Build {
    pub glossary: Glossary,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build a glossary from its root element.
pub fn build(root: &Element, options: &BuildOptions) -> Result<Build, GlossError> {
    let file: Arc<str> = Arc::from(options.source_name.as_str());
    debug!(file = %file, "building glossary");

    ids::check_unique(root, &file)?;

    let builder = Builder::new(root, file, options.selector_fallback)?;
    let (glossary, mut diagnostics) = builder.build(root)?;

    if options.validate {
        validate::check(&glossary)?;
    } else {
        debug!("referential check skipped");
    }

    debug!(
        nodes = glossary.len(),
        concepts = glossary.root().concepts.len(),
        warnings = diagnostics.warning_count(),
        "glossary built"
    );
    Ok(Build {
        glossary,
        diagnostics: diagnostics.take(),
    })
}

/// Parse XML text and build a glossary from it.
#[cfg(feature = "xml")]
pub fn from_str(input: &str, options: &BuildOptions) -> Result<Build, GlossError> {
    let root = crate::markup::xml::parse_str(input)?;
    build(&root, options)
}

/// Read an XML file and build a glossary from it. The path becomes the
/// source name.
#[cfg(feature = "xml")]
pub fn from_file(
    path: impl AsRef<std::path::Path>,
    options: &BuildOptions,
) -> Result<Build, GlossError> {
    let path = path.as_ref();
    let root = crate::markup::xml::parse_file(path)?;
    let options = options
        .clone()
        .with_source_name(path.display().to_string());
    build(&root, &options)
}
