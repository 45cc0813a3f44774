// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for neural parameter and population operations
//!
//! The per-cycle kernel never fails; every error here is raised while a
//! parameter set or population is being built.

use std::string::String;

/// Error types for neural operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NeuralError {
    #[error("Invalid parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("Array size mismatch: expected {expected}, got {actual}")]
    ArraySizeMismatch { expected: usize, actual: usize },
}

impl NeuralError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        NeuralError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, NeuralError>;
pub type Error = NeuralError;
