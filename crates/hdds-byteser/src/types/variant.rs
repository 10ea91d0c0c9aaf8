// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! FormatVariant - revision tag leading every record.

use std::fmt;

/// Revision of the encoding rules a producer used.
///
/// Fixed per handler unit and read first on decode. Only
/// [`FormatVariant::CURRENT`] is recognized; mixing variants across units is
/// rejected rather than negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormatVariant(u32);

impl FormatVariant {
    /// Variant written by this build.
    pub const CURRENT: FormatVariant = FormatVariant(1);

    /// Every variant this build can decode.
    pub const SUPPORTED: &'static [FormatVariant] = &[FormatVariant::CURRENT];

    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    pub const fn tag(self) -> u32 {
        self.0
    }

    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }

    pub const fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    pub const fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }
}

impl Default for FormatVariant {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_is_supported() {
        assert!(FormatVariant::CURRENT.is_supported());
        assert_eq!(FormatVariant::default(), FormatVariant::CURRENT);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        assert!(!FormatVariant::new(0).is_supported());
        assert!(!FormatVariant::new(0xDEAD_BEEF).is_supported());
    }

    #[test]
    fn test_le_roundtrip() {
        let v = FormatVariant::new(0x0102_0304);
        assert_eq!(v.to_le_bytes(), [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(FormatVariant::from_le_bytes(v.to_le_bytes()), v);
    }
}
