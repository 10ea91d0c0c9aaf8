// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration - single source of truth for wire widths and limits.
//!
//! - **Static**: header widths and hard limits, fixed at compile time.
//! - **Dynamic**: [`CodecConfig`] for stream framing limits, optionally read
//!   from the environment.

use crate::types::TYPE_ID_LEN;

/// Width of the leading format variant tag.
pub const VARIANT_LEN: usize = 4;

/// Width of the presence byte.
pub const PRESENCE_LEN: usize = 1;

/// Full record header: variant + type identifier + presence.
pub const RECORD_HEADER_LEN: usize = VARIANT_LEN + TYPE_ID_LEN + PRESENCE_LEN;

/// Presence byte for an absent (null) value.
pub const PRESENCE_ABSENT: u8 = 0x0;

/// Presence byte for a present value.
pub const PRESENCE_PRESENT: u8 = 0x1;

/// Width of a collection element count.
pub const COUNT_LEN: usize = 4;

/// Width of the length prefix framing a record on stream surfaces.
pub const FRAME_PREFIX_LEN: usize = 4;

/// Maximum element count accepted when decoding a collection.
///
/// Catches allocation bombs from malformed input long before the remaining
/// byte check would.
pub const MAX_COLLECTION_LEN: usize = 1_000_000;

/// Maximum record nesting depth accepted when decoding.
///
/// Every nested record (composite field, array element) is one level. Input
/// nested deeper than this is rejected instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Default maximum frame length on stream surfaces (64 MiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Environment variable overriding [`CodecConfig::max_frame_len`].
pub const ENV_MAX_FRAME_LEN: &str = "HDDS_BYTESER_MAX_FRAME_LEN";

/// Runtime configuration for the serializer facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest record accepted or produced on stream surfaces.
    pub max_frame_len: usize,
}

impl CodecConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }

    #[must_use]
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    /// Defaults overridden by `HDDS_BYTESER_*` environment variables.
    ///
    /// Unparseable values are ignored (logged at warn).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CodecConfig::from_env`], reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        if let Some(raw) = lookup(ENV_MAX_FRAME_LEN) {
            match parse_max_frame_len(&raw) {
                Some(len) => config.max_frame_len = len,
                None => log::warn!(
                    "[config] ignoring {}={:?}: expected a positive integer",
                    ENV_MAX_FRAME_LEN,
                    raw
                ),
            }
        }
        config
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_max_frame_len(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|len| *len > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_header_len() {
        assert_eq!(RECORD_HEADER_LEN, 19);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = CodecConfig::from_lookup(|key| {
            (key == ENV_MAX_FRAME_LEN).then(|| "4096".to_string())
        });
        assert_eq!(config.max_frame_len, 4096);

        let config = CodecConfig::from_lookup(|_| Some("not-a-number".to_string()));
        assert_eq!(config.max_frame_len, DEFAULT_MAX_FRAME_LEN);

        let config = CodecConfig::from_lookup(|_| None);
        assert_eq!(config, CodecConfig::default());
    }

    #[test]
    fn test_config_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_frame_len, DEFAULT_MAX_FRAME_LEN);
        assert_eq!(config.with_max_frame_len(128).max_frame_len, 128);
    }

    #[test]
    fn test_parse_max_frame_len() {
        assert_eq!(parse_max_frame_len("4096"), Some(4096));
        assert_eq!(parse_max_frame_len(" 17 "), Some(17));
        assert_eq!(parse_max_frame_len("0"), None);
        assert_eq!(parse_max_frame_len("-1"), None);
        assert_eq!(parse_max_frame_len("lots"), None);
    }
}
