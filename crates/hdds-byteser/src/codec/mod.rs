// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec core: record header, the handler contract and the shipped handlers.
//!
//! - `handler` - [`SerializationHandler`] payload contract
//! - `record` - record header read/write and the variant gate
//! - `builtin` - scalars and `String`
//! - `array` - `Vec`, nullable-element, fixed and rectangular arrays
//! - `composite` - helpers for hand-written structured handlers

pub mod array;
pub mod builtin;
pub mod composite;
pub mod handler;
pub mod record;

pub use array::{ArrayHandler, FixedArrayHandler, Matrix, MatrixHandler, NullableArrayHandler};
pub use builtin::{builtin_unit, Primitive, PrimitiveHandler, StringHandler, BUILTIN_UNIT_NAME};
pub use composite::{FieldReader, FieldWriter, SizeEstimator};
pub use handler::SerializationHandler;
pub use record::RecordHeader;
