// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for encode/decode and registry population.
//!
//! Format errors (a record that cannot be interpreted) and I/O errors (a
//! stream that failed underneath the codec) are kept apart so callers can
//! decide which ones are worth retrying at their level.

use crate::types::{FormatVariant, TypeIdentifier};
use thiserror::Error;

/// Convenient alias for codec results.
pub type Result<T> = core::result::Result<T, CodecError>;

/// Errors returned by the codec, the registry and the serializer facade.
#[derive(Debug, Error)]
pub enum CodecError {
    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// No handler was registered for a type reached during encode/decode.
    #[error("no handler registered for type {type_name}")]
    UnregisteredType { type_name: &'static str },

    /// The same type was registered twice inside one handler unit.
    #[error("handler for {type_name} registered more than once in unit '{unit}'")]
    DuplicateHandler { unit: String, type_name: &'static str },

    /// Two different handler units both registered a handler for one type.
    #[error("handler collision for {type_name}: units '{first}' and '{second}'")]
    HandlerCollision {
        type_name: &'static str,
        first: String,
        second: String,
    },

    // ========================================================================
    // Format Errors
    // ========================================================================
    /// The record's embedded type identifier is not the one requested.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: TypeIdentifier,
        found: TypeIdentifier,
    },

    /// Destination shorter than the estimated record size.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Leading format variant tag is not recognized by this build.
    #[error("unsupported format variant {0}")]
    UnsupportedVariant(FormatVariant),

    /// Source ended before the record did.
    #[error("truncated record at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Payload bytes are structurally invalid for the target type.
    #[error("invalid payload: {reason}")]
    InvalidPayload { reason: String },

    /// A handler wrote a different number of bytes than it estimated.
    #[error("size mismatch for {type_name}: estimated {estimated} bytes, wrote {written}")]
    SizeMismatch {
        type_name: &'static str,
        estimated: usize,
        written: usize,
    },

    /// Stream frame exceeds the configured maximum.
    #[error("frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },

    /// Raw-pointer entry point received a null pointer.
    #[error("null pointer passed to raw memory entry point")]
    NullPointer,

    // ========================================================================
    // Stream Errors
    // ========================================================================
    /// Underlying stream failed (short read, broken pipe, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Shorthand for [`CodecError::InvalidPayload`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            reason: reason.into(),
        }
    }

    /// True when the error came from the underlying stream.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// True when the bytes themselves could not be interpreted.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. }
                | Self::UnsupportedVariant(_)
                | Self::Truncated { .. }
                | Self::InvalidPayload { .. }
                | Self::FrameTooLarge { .. }
        )
    }

    /// Rebase position fields reported against a nested slice that starts
    /// `base` bytes into the enclosing buffer.
    pub(crate) fn at_offset(self, base: usize) -> Self {
        match self {
            Self::BufferTooSmall { needed, available } => Self::BufferTooSmall {
                needed: needed + base,
                available: available + base,
            },
            Self::Truncated {
                offset,
                needed,
                available,
            } => Self::Truncated {
                offset: offset + base,
                needed,
                available,
            },
            other => other,
        }
    }
}
