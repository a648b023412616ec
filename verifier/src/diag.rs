// diag.rs — Verification diagnostics model
//
// Provides the shared diagnostic types emitted by every verification pass.
// Category strings are a stable contract: downstream consumers filter and
// group findings by them.
//
// Preconditions: none (types only).
// Postconditions: none (types only).
// Failure modes: none.
// Side effects: none.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Source location ──────────────────────────────────────────────────────

/// A 1-based line/column position in the DSL source, as reported by the parser.
///
/// `0:0` marks a finding that belongs to the whole model rather than to one
/// statement (e.g. a missing backend).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ── Severity level ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Category ─────────────────────────────────────────────────────────────

/// Which pass produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    TypeSafety,
    NullSafety,
    Endpoint,
    Exhaustiveness,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::TypeSafety => "type-safety",
            Category::NullSafety => "null-safety",
            Category::Endpoint => "endpoint",
            Category::Exhaustiveness => "exhaustiveness",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Diagnostic ───────────────────────────────────────────────────────────

/// A single verification finding. Created once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with no suggestion.
    pub fn new(
        severity: Severity,
        category: Category,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            location,
            message: message.into(),
            category,
            suggestion: None,
        }
    }

    pub fn error(category: Category, location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, location, message)
    }

    pub fn warning(category: Category, location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, location, message)
    }

    pub fn info(category: Category, location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, location, message)
    }

    /// Attach a remediation suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.category, self.location, self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  hint: {}", suggestion)?;
        }
        Ok(())
    }
}
