//! # divergloss-base
//!
//! Core library for building, resolving and validating Divergloss glossaries.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! validate  → Referential integrity of the finished tree
//!   ↓
//! build     → Typed node tree from the generic element tree
//!   ↓
//! selector  → Embedded environment selectors inside text
//!   ↓
//! model     → Glossary arena, nodes, text, d-sets, traversal
//!   ↓
//! markup    → Generic element tree (+ XML reader behind `xml`)
//!   ↓
//! base      → Primitives (Key, SourceLocation)
//! ```

// ============================================================================
// MODULES (dependency order: base → markup → model → selector → build → validate)
// ============================================================================

/// Foundation types: keys and source locations
pub mod base;

/// Generic element tree consumed by the builder
pub mod markup;

/// Glossary model: arena of typed nodes, text, d-sets
pub mod model;

/// Embedded selector resolution
pub mod selector;

/// Node tree construction
pub mod build;

/// Post-construction referential checks
pub mod validate;

/// Located warnings collected during a build
pub mod diagnostics;

mod error;

pub use base::{Key, SourceLocation};
pub use build::{Build, BuildOptions, SelectorFallback, build};
#[cfg(feature = "xml")]
pub use build::{from_file, from_str};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity};
pub use error::GlossError;
pub use model::{Dset, EnvKey, Glossary, LangEnv, Node, NodeId, NodeKind, NodeType, Text};
