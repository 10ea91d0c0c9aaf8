// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The per-type handler contract.

use crate::error::Result;
use crate::registry::HandlerRegistry;
use crate::types::TypeIdentity;

/// Serialization strategy for exactly one target type.
///
/// A handler only deals with the payload of a record. The record header
/// (variant, type identifier, presence byte) is written and validated by
/// [`BoundHandler`](crate::registry::BoundHandler), which is what
/// [`HandlerRegistry::resolve`] hands out.
///
/// Contract:
/// - `payload_size` returns the exact byte count `encode_payload` writes for
///   that value, and has no side effects.
/// - `encode_payload` returns the number of bytes written.
/// - `decode_payload` returns the number of bytes consumed, which equals what
///   `encode_payload` wrote for the decoded value.
///
/// Nested fields and elements go back through `registry`, which is how
/// composites reach handlers registered by other units.
///
/// Handlers are registered by type and built with `Default`, so they must
/// not need caller-supplied state.
pub trait SerializationHandler: Send + Sync + 'static {
    type Target: TypeIdentity;

    fn payload_size(&self, value: &Self::Target, registry: &HandlerRegistry) -> Result<usize>;

    fn encode_payload(
        &self,
        dst: &mut [u8],
        value: &Self::Target,
        registry: &HandlerRegistry,
    ) -> Result<usize>;

    fn decode_payload(
        &self,
        src: &[u8],
        registry: &HandlerRegistry,
    ) -> Result<(usize, Self::Target)>;
}
