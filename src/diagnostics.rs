//! Located, coded warnings gathered during a build.
//!
//! Problems that do not stop construction (a malformed selector, a repeated
//! singleton child) are recorded here and handed back with the glossary.
//! Fatal problems go through [`GlossError`](crate::GlossError) instead.

use std::fmt;

use crate::base::SourceLocation;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
        })
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Warning code (e.g., "W0001").
    pub code: &'static str,
    /// Where the offending node was built from.
    pub location: SourceLocation,
    /// The diagnostic message.
    pub message: String,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(
        code: &'static str,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.location, self.severity, self.code, self.message
        )
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Code Ranges
///
/// - **W0001-W0099**: Content warnings (selectors, structure)
pub mod codes {
    /// Selector opened with `~` but never closed.
    pub const UNTERMINATED_SELECTOR: &str = "W0001";
    /// Same environment assigned twice within one selector.
    pub const REPEATED_SELECTOR_ENV: &str = "W0002";
    /// No selector alternative matches the target environment, directly or
    /// by closeness.
    pub const UNRESOLVED_SELECTOR_ENV: &str = "W0003";
    /// More than one candidate for a single-valued child.
    pub const DUPLICATE_SINGLETON: &str = "W0004";
    /// Selector whose alternatives name no environment at all.
    pub const EMPTY_SELECTOR: &str = "W0005";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during one build run.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record a warning and emit it through `tracing`.
    pub fn warning(
        &mut self,
        code: &'static str,
        location: &SourceLocation,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic::warning(code, location.clone(), message);
        tracing::warn!(
            code = diagnostic.code,
            location = %diagnostic.location,
            "{}",
            diagnostic.message
        );
        self.add(diagnostic);
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics carrying a given code.
    pub fn with_code(&self, code: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.code == code).collect()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
