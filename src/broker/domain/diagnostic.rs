//! Non-fatal problems recorded alongside successful results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a secondary failure that did not fail the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The driver user capability refused the descriptor at connect time.
    ContextMaterializationFailed,
    /// Exclusive access could not be released after a successful transfer.
    ReleaseFailed,
    /// One-shot teardown failed after a successful operation.
    TeardownFailed,
}

impl DiagnosticKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContextMaterializationFailed => "context_materialization_failed",
            Self::ReleaseFailed => "release_failed",
            Self::TeardownFailed => "teardown_failed",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Timestamped record of a secondary failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    recorded_at: DateTime<Utc>,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(
        kind: DiagnosticKind,
        message: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            recorded_at,
        }
    }

    /// Returns the diagnostic category.
    #[must_use]
    pub const fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the problem was observed.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.kind, self.message)
    }
}
