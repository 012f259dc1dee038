// ABOUTME: Range and step constraints for typed tweaks
// ABOUTME: Evaluates min/max bounds and step alignment against candidate values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! Constraint validation
//!
//! `min`, `max` and `step` are independent and optional. Range checks need an
//! ordered type; step checks need a [`Numeric`] type. The checks are only
//! reachable for types that have the capability, so a `String` tweak can carry
//! bounds but never a step check.

use crate::errors::TweakError;
use crate::value::{Numeric, TweakValue};
use serde::{Deserialize, Serialize};

/// Absolute tolerance for step alignment and integral conversion
pub const REAL_TOLERANCE: f64 = 1e-7;

/// Optional bounds and step for a tweak value
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints<T> {
    /// Inclusive lower bound; also the base for step alignment
    pub min: Option<T>,
    /// Inclusive upper bound
    pub max: Option<T>,
    /// Step size, measured from `min` (or zero when there is no `min`)
    pub step: Option<T>,
}

impl<T> Default for Constraints<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            step: None,
        }
    }
}

/// Display-string projection of constraints for listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintInfo {
    /// Lower bound, if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    /// Upper bound, if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    /// Step, if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

impl ConstraintInfo {
    /// Render as ` {min=.., max=.., step=..}`, or an empty string when nothing is set
    #[must_use]
    pub fn suffix(&self) -> String {
        let pieces: Vec<String> = [("min", &self.min), ("max", &self.max), ("step", &self.step)]
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|value| format!("{name}={value}")))
            .collect();

        if pieces.is_empty() {
            String::new()
        } else {
            format!(" {{{}}}", pieces.join(", "))
        }
    }
}

impl<T> Constraints<T> {
    /// No constraints
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inclusive lower bound
    #[must_use]
    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the inclusive upper bound
    #[must_use]
    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }

    /// Set both bounds
    #[must_use]
    pub fn range(self, min: T, max: T) -> Self {
        self.min(min).max(max)
    }

    /// Set the step size
    #[must_use]
    pub fn step(mut self, step: T) -> Self {
        self.step = Some(step);
        self
    }
}

impl<T: TweakValue> Constraints<T> {
    /// Display strings of the configured constraints
    #[must_use]
    pub fn info(&self) -> ConstraintInfo {
        ConstraintInfo {
            min: self.min.as_ref().map(TweakValue::describe),
            max: self.max.as_ref().map(TweakValue::describe),
            step: self.step.as_ref().map(TweakValue::describe),
        }
    }

    /// Check `value` against `min` and `max`.
    ///
    /// # Errors
    ///
    /// Returns [`TweakError::OutOfRange`] carrying both configured bounds.
    pub fn check_range(&self, value: &T) -> Result<(), TweakError>
    where
        T: PartialOrd,
    {
        let below = self.min.as_ref().is_some_and(|min| value < min);
        let above = self.max.as_ref().is_some_and(|max| value > max);
        if below || above {
            return Err(TweakError::OutOfRange {
                min: self.min.as_ref().map(TweakValue::describe),
                max: self.max.as_ref().map(TweakValue::describe),
            });
        }
        Ok(())
    }

    /// Check that `value` is a whole number of steps away from `min` (or zero).
    ///
    /// # Errors
    ///
    /// Returns [`TweakError::StepMismatch`] when the remainder is further than
    /// [`REAL_TOLERANCE`] from a multiple of the step.
    pub fn check_step(&self, value: &T) -> Result<(), TweakError>
    where
        T: Numeric,
    {
        let Some(step) = &self.step else {
            return Ok(());
        };

        let step_real = step.as_real();
        let base = self.min.as_ref().map_or(0.0, Numeric::as_real);
        let remainder = (value.as_real() - base) % step_real;

        // `%` keeps the dividend's sign, so values below the base land near -step
        let aligned = remainder.abs() < REAL_TOLERANCE
            || (remainder - step_real).abs() < REAL_TOLERANCE
            || (remainder + step_real).abs() < REAL_TOLERANCE;

        if aligned {
            Ok(())
        } else {
            Err(TweakError::StepMismatch {
                step: step.describe(),
            })
        }
    }
}
