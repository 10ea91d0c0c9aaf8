// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record header encoding.
//!
//! ```text
//! +------------------+----------------------+-------------+-----------------+
//! | FormatVariant 4  | TypeIdentifier 14    | Presence 1  | Payload (var)   |
//! +------------------+----------------------+-------------+-----------------+
//! ```
//!
//! The variant is checked before anything else is read, so a record from an
//! unknown revision fails with `UnsupportedVariant` even when the rest of the
//! buffer is missing.

use crate::config::{PRESENCE_ABSENT, PRESENCE_PRESENT, RECORD_HEADER_LEN};
use crate::error::{CodecError, Result};
use crate::ser::{Cursor, CursorMut};
use crate::types::{FormatVariant, TypeIdentifier, TYPE_ID_LEN};

/// Decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub variant: FormatVariant,
    pub type_id: TypeIdentifier,
    pub present: bool,
}

impl RecordHeader {
    pub const LEN: usize = RECORD_HEADER_LEN;

    pub fn write(&self, cursor: &mut CursorMut<'_>) -> Result<()> {
        if cursor.remaining() < Self::LEN {
            return Err(CodecError::BufferTooSmall {
                needed: cursor.offset() + Self::LEN,
                available: cursor.offset() + cursor.remaining(),
            });
        }
        cursor.write_bytes(&self.variant.to_le_bytes())?;
        cursor.write_bytes(self.type_id.as_bytes())?;
        cursor.write_u8(if self.present {
            PRESENCE_PRESENT
        } else {
            PRESENCE_ABSENT
        })
    }

    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        let variant = FormatVariant::from_le_bytes(cursor.read_array()?);
        if !variant.is_supported() {
            return Err(CodecError::UnsupportedVariant(variant));
        }
        let type_id = TypeIdentifier::from_bytes(cursor.read_array::<TYPE_ID_LEN>()?);
        let present = match cursor.read_u8()? {
            PRESENCE_ABSENT => false,
            PRESENCE_PRESENT => true,
            other => {
                return Err(CodecError::invalid(format!(
                    "presence byte 0x{:02x} at offset {}",
                    other,
                    cursor.offset() - 1
                )))
            }
        };
        Ok(Self {
            variant,
            type_id,
            present,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(present: bool) -> RecordHeader {
        RecordHeader {
            variant: FormatVariant::CURRENT,
            type_id: TypeIdentifier::from_bytes([0xAB; TYPE_ID_LEN]),
            present,
        }
    }

    #[test]
    fn test_header_layout() {
        let mut buf = [0u8; RECORD_HEADER_LEN];
        sample(true).write(&mut CursorMut::new(&mut buf)).unwrap();
        assert_eq!(&buf[..4], &[1, 0, 0, 0]);
        assert_eq!(&buf[4..18], &[0xAB; TYPE_ID_LEN]);
        assert_eq!(buf[18], PRESENCE_PRESENT);

        let decoded = RecordHeader::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(decoded, sample(true));
    }

    #[test]
    fn test_header_write_needs_full_header() {
        let mut buf = [0u8; RECORD_HEADER_LEN - 1];
        let err = sample(false).write(&mut CursorMut::new(&mut buf)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::BufferTooSmall {
                needed: RECORD_HEADER_LEN,
                available
            } if available == RECORD_HEADER_LEN - 1
        ));
        // Nothing partially written
        assert_eq!(buf, [0u8; RECORD_HEADER_LEN - 1]);
    }

    #[test]
    fn test_unknown_variant_gate_reads_only_tag() {
        let buf = 0xDEAD_BEEFu32.to_le_bytes();
        let err = RecordHeader::read(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedVariant(v) if v.tag() == 0xDEAD_BEEF));
    }

    #[test]
    fn test_invalid_presence_byte() {
        let mut buf = [0u8; RECORD_HEADER_LEN];
        sample(true).write(&mut CursorMut::new(&mut buf)).unwrap();
        buf[18] = 0x02;
        let err = RecordHeader::read(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidPayload { .. }));
    }

    #[test]
    fn test_truncated_header() {
        let buf = [1u8, 0, 0, 0, 0xAB, 0xAB];
        let err = RecordHeader::read(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { offset: 4, .. }));
    }
}
