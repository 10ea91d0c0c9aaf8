// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type identification: descriptors, identifiers and format variants.
//!
//! Every record is self-describing through two leading fields:
//!
//! ```text
//! +-----------------+---------------------------+
//! | FormatVariant 4 | TypeIdentifier 14         |
//! +-----------------+---------------------------+
//! ```
//!
//! The identifier is content-derived (truncated MD5 of the descriptor), so
//! independently compiled units agree on it without sharing any state.

mod descriptor;
mod type_id;
mod variant;

pub use descriptor::{TypeDescriptor, TypeIdentity, BUILTIN_ORIGIN};
pub use type_id::{TypeIdentifier, TYPE_ID_LEN};
pub use variant::FormatVariant;
