// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;
use thiserror::Error;

use crate::sources::SourceKind;

/// A single record failed normalization. Recoverable: the record is skipped
/// and reported alongside the result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("record is not an object")]
    NotAnObject,

    #[error("missing field '{field}'")]
    MissingField { field: String },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    pub fn invalid(field: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotAnObject => None,
            Self::MissingField { field } | Self::InvalidField { field, .. } => Some(field),
        }
    }
}

/// Caller bug. Raised before any aggregation work begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("window size must not be negative (got {0})")]
    NegativeWindow(i64),

    #[error("window size must be at most {max} months (got {got})")]
    WindowTooLarge { got: i64, max: usize },

    #[error("feed limit must not be negative (got {0})")]
    NegativeLimit(i64),

    #[error("alert thresholds must satisfy 0 <= near_limit < over_budget (got {near_limit} / {over_budget})")]
    Thresholds {
        near_limit: String,
        over_budget: String,
    },

    #[error("invalid category rule '{pattern}': {reason}")]
    CategoryRule { pattern: String, reason: String },
}

/// One of the concurrent input fetches failed. The source is treated as
/// empty and flagged in the report.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{source_kind} unavailable: {message}")]
pub struct PartialSourceFailure {
    pub source_kind: SourceKind,
    pub message: String,
}

/// A skipped record: where it came from and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub source: SourceKind,
    pub index: usize,
    pub error: ValidationError,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.source, self.index, self.error)
    }
}
