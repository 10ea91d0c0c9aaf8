// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds-byteser - self-describing binary object codec
//!
//! Every encoded value is a record that names its own type and wire revision,
//! so a reader can check it is decoding what it thinks it is decoding.
//!
//! ## Quick Start
//!
//! ```rust
//! use hdds_byteser::{builtin_unit, ByteSerializer, HandlerRegistry, Result};
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let registry = HandlerRegistry::builder().merge(builtin_unit()?)?.build();
//!     let serializer = ByteSerializer::new(Arc::new(registry));
//!
//!     let bytes = serializer.serialize(&"hello".to_string())?;
//!     let (used, value) = serializer.deserialize::<String>(&bytes)?;
//!
//!     assert_eq!(used, bytes.len());
//!     assert_eq!(value.as_deref(), Some("hello"));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        ByteSerializer                               |
//! |   buffer | raw pointer | Read/Write | tokio AsyncRead/AsyncWrite    |
//! +---------------------------------------------------------------------+
//! |                        HandlerRegistry                              |
//! |   HandlerUnit merge | TypeId -> handler | BoundHandler (header)     |
//! +---------------------------------------------------------------------+
//! |                          Codec core                                 |
//! |   record header | scalars/String | arrays/matrix | composites       |
//! +---------------------------------------------------------------------+
//! |                            Types                                    |
//! |   TypeDescriptor -> TypeIdentifier (MD5/14) | FormatVariant         |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Record layout
//!
//! ```text
//! [variant: u32 LE][type identifier: 14][presence: 1][payload]
//! ```
//!
//! An absent value is the 19-byte header with presence `0` and no payload.
//!
//! ## Modules Overview
//!
//! - [`types`] - type identity: descriptors, identifiers, variants
//! - [`codec`] - handler contract, record header, shipped handlers
//! - [`registry`] - handler units and the merged registry
//! - [`serializer`] - the [`ByteSerializer`] facade
//! - [`config`] - wire constants and [`CodecConfig`]

pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod ser;
pub mod serializer;
pub mod types;

pub use codec::{
    builtin_unit, ArrayHandler, FieldReader, FieldWriter, FixedArrayHandler, Matrix,
    MatrixHandler, NullableArrayHandler, PrimitiveHandler, SerializationHandler, SizeEstimator,
    StringHandler,
};
pub use config::CodecConfig;
pub use error::{CodecError, Result};
pub use registry::{BoundHandler, HandlerRegistry, HandlerUnit, UnitSummary};
pub use serializer::ByteSerializer;
pub use types::{FormatVariant, TypeDescriptor, TypeIdentifier, TypeIdentity};
