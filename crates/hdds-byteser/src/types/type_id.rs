// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeIdentifier - content-derived identity embedded in every record.
//!
//! The identifier is the MD5 digest of the descriptor's canonical bytes,
//! truncated to 14 bytes. Two separately compiled units that describe a type
//! the same way get the same identifier, which is what lets one unit decode
//! what another wrote.

use super::descriptor::TypeDescriptor;
use md5::{Digest, Md5};
use std::fmt;

/// Width of a [`TypeIdentifier`] on the wire.
pub const TYPE_ID_LEN: usize = 14;

/// TypeIdentifier - 14-byte truncated MD5 of a [`TypeDescriptor`].
///
/// Equality is the only operation dispatch relies on: a record whose
/// identifier differs from the requested type's is rejected.
///
/// # Example
///
/// ```
/// use hdds_byteser::types::{TypeDescriptor, TypeIdentifier};
///
/// let point = TypeDescriptor::new("geometry", "Point").with_origin("app");
/// let a = TypeIdentifier::create_from(&point);
/// let b = TypeIdentifier::create_from(&point.clone());
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeIdentifier([u8; TYPE_ID_LEN]);

impl TypeIdentifier {
    /// Create from raw 14-byte array
    pub const fn from_bytes(bytes: [u8; TYPE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw 14-byte array
    pub const fn as_bytes(&self) -> &[u8; TYPE_ID_LEN] {
        &self.0
    }

    /// Create a zero identifier (for testing/placeholder)
    pub const fn zero() -> Self {
        Self([0u8; TYPE_ID_LEN])
    }

    /// Compute the identifier of a type descriptor.
    ///
    /// Pure and deterministic; cannot fail.
    pub fn create_from(descriptor: &TypeDescriptor) -> Self {
        let mut hasher = Md5::new();
        hasher.update(descriptor.canonical_bytes());
        let digest = hasher.finalize();

        // Truncate MD5 (16 bytes) to 14 bytes
        let mut bytes = [0u8; TYPE_ID_LEN];
        bytes.copy_from_slice(&digest[..TYPE_ID_LEN]);
        Self(bytes)
    }
}

impl fmt::Debug for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentifier(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<[u8; TYPE_ID_LEN]> for TypeIdentifier {
    fn from(bytes: [u8; TYPE_ID_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for TypeIdentifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
