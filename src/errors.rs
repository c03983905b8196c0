//! Error and diagnostic types for the center-selection pipeline.
//!
//! Only data-quality problems abort an invocation: an empty candidate
//! history, or a composite score that comes out NaN/Inf. Fit failures and
//! data sparsity are expected operating conditions (a storm track always
//! starts with too few volumes) and are reported as [`Diagnostic`] entries
//! while the pipeline falls back to the last scored mean.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChooseCenterError {
    #[error("candidate history is empty; cannot choose a center")]
    EmptyHistory,

    #[error("scoring produced a non-finite score at volume {volume}, level {level}, radius {radius}")]
    NonFiniteScore {
        volume: usize,
        level: usize,
        radius: usize,
    },

    #[error("least-squares fit failed: {0}")]
    FitFailure(String),

    #[error("invalid parameter: {0}")]
    InvalidParams(String),
}

impl ChooseCenterError {
    /// True for errors caused by the input data rather than configuration.
    pub fn is_data_quality(&self) -> bool {
        matches!(
            self,
            ChooseCenterError::EmptyHistory | ChooseCenterError::NonFiniteScore { .. }
        )
    }
}

/// Severity attached to a [`Diagnostic`] message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Human-readable message produced while choosing a center, intended for
/// the caller's logging layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}
