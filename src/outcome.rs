//! Per-stage outcomes for best-effort pipeline stages
//!
//! The summary follow-up and the audio pipeline never fail an `ask` call.
//! Instead of swallowing their errors, each stage reports a `StageOutcome`
//! that callers and tests can inspect.

use std::fmt;

/// Result of a best-effort stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome<T> {
    /// The stage ran and produced a value
    Completed(T),
    /// The stage ran but failed; the call continues without its output
    Degraded {
        /// Human-readable reason, also written to the log
        reason: String,
    },
    /// The stage was not requested
    Skipped,
}

impl<T> StageOutcome<T> {
    /// Build a degraded outcome from anything displayable
    pub fn degraded(reason: impl fmt::Display) -> Self {
        Self::Degraded {
            reason: reason.to_string(),
        }
    }

    /// Whether the stage completed
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Whether the stage degraded
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Whether the stage was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Borrow the completed value, if any
    pub fn as_completed(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// Convert into the completed value, if any
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// Short label used for metrics and logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Degraded { .. } => "degraded",
            Self::Skipped => "skipped",
        }
    }
}
