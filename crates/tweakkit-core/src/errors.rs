// ABOUTME: Validation error type shared by tweaks, the registry and the command console
// ABOUTME: Covers unparsable values, unknown keys, range violations and step misalignment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! # Tweak Error Types
//!
//! Every failing tweak operation reports one of three kinds of problem. None of
//! them are fatal: the caller gets the error back and the tweak keeps its
//! previous value.

use thiserror::Error;

/// Errors returned by tweak validation and registry mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TweakError {
    /// The text could not be parsed as the tweak's type, or the key is unknown
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The value falls outside the configured bounds
    #[error(
        "Value out of range (min: {} max: {})",
        .min.as_deref().unwrap_or("-"),
        .max.as_deref().unwrap_or("-")
    )]
    OutOfRange {
        /// Display form of the lower bound, if any
        min: Option<String>,
        /// Display form of the upper bound, if any
        max: Option<String>,
    },

    /// The value is not a whole number of steps away from the base
    #[error("Value must align to step {step}")]
    StepMismatch {
        /// Display form of the configured step
        step: String,
    },
}

impl TweakError {
    /// Error for a key with no registered tweak
    #[must_use]
    pub fn unknown_key(key: &str) -> Self {
        Self::InvalidValue(format!("Unknown key: {key}"))
    }

    /// Error for text that does not parse as the tweak's value type
    #[must_use]
    pub fn invalid_value(input: impl Into<String>) -> Self {
        Self::InvalidValue(input.into())
    }
}
