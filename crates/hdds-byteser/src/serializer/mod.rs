// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ByteSerializer - entry points over every I/O surface.
//!
//! | Surface | Encode | Decode |
//! |---|---|---|
//! | owned buffer | [`ByteSerializer::serialize`] | [`ByteSerializer::deserialize`] |
//! | caller buffer | [`ByteSerializer::serialize_into`] | [`ByteSerializer::deserialize`] |
//! | raw pointer | [`ByteSerializer::serialize_to_ptr`] | [`ByteSerializer::deserialize_from_ptr`] |
//! | `dyn Read`/`dyn Write` | [`ByteSerializer::serialize_to_stream`] | [`ByteSerializer::deserialize_from_stream`] |
//! | generic `Read`/`Write` | [`ByteSerializer::serialize_to_writer`] | [`ByteSerializer::deserialize_from_reader`] |
//! | tokio (feature `async`) | `serialize_to_async_writer` | `deserialize_from_async_reader` |
//!
//! Every surface runs the same two passes: size the record, then encode into
//! exactly that many bytes. Stream surfaces add a `u32` length prefix.

#[cfg(feature = "async")]
mod async_stream;
mod stream;

use crate::error::{CodecError, Result};
use crate::registry::HandlerRegistry;
use crate::types::TypeIdentity;
use crate::CodecConfig;
use std::sync::Arc;

/// Serializer facade over a shared, immutable [`HandlerRegistry`].
///
/// Cheap to clone; every call is independent, so one instance can be used
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct ByteSerializer {
    registry: Arc<HandlerRegistry>,
    config: CodecConfig,
}

impl ByteSerializer {
    /// Serializer configured from the environment, see [`CodecConfig::from_env`].
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self::with_config(registry, CodecConfig::from_env())
    }

    pub fn with_config(registry: Arc<HandlerRegistry>, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Exact record size for `value`, for callers that pre-allocate.
    pub fn expected_serialized_size<T: TypeIdentity>(&self, value: Option<&T>) -> Result<usize> {
        self.registry.resolve::<T>()?.estimate_size(value)
    }

    /// Encode a present value into a new buffer of exactly the record size.
    pub fn serialize<T: TypeIdentity>(&self, value: &T) -> Result<Vec<u8>> {
        self.serialize_nullable(Some(value))
    }

    pub fn serialize_nullable<T: TypeIdentity>(&self, value: Option<&T>) -> Result<Vec<u8>> {
        let handler = self.registry.resolve::<T>()?;
        let size = handler.estimate_size(value)?;
        let mut buf = vec![0u8; size];
        let written = handler.encode(&mut buf, value)?;
        check_written::<T>(size, written)?;
        Ok(buf)
    }

    /// Encode into the start of `dst`; returns the bytes written.
    ///
    /// `dst` is checked against the estimated size before anything is
    /// written, so a short buffer is left untouched.
    pub fn serialize_into<T: TypeIdentity>(&self, dst: &mut [u8], value: Option<&T>) -> Result<usize> {
        let handler = self.registry.resolve::<T>()?;
        let size = handler.estimate_size(value)?;
        if dst.len() < size {
            return Err(CodecError::BufferTooSmall {
                needed: size,
                available: dst.len(),
            });
        }
        let written = handler.encode(&mut dst[..size], value)?;
        check_written::<T>(size, written)?;
        Ok(written)
    }

    /// Decode one record from the start of `src`.
    pub fn deserialize<T: TypeIdentity>(&self, src: &[u8]) -> Result<(usize, Option<T>)> {
        self.registry.resolve::<T>()?.decode(src)
    }

    /// Encode into raw memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `len` bytes and not aliased for the
    /// duration of the call.
    pub unsafe fn serialize_to_ptr<T: TypeIdentity>(
        &self,
        ptr: *mut u8,
        len: usize,
        value: Option<&T>,
    ) -> Result<usize> {
        if ptr.is_null() {
            return Err(CodecError::NullPointer);
        }
        // SAFETY: caller guarantees ptr is valid for len writable bytes.
        let dst = unsafe { std::slice::from_raw_parts_mut(ptr, len) };
        self.serialize_into(dst, value)
    }

    /// Decode from raw memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `len` bytes for the duration of the
    /// call.
    pub unsafe fn deserialize_from_ptr<T: TypeIdentity>(
        &self,
        ptr: *const u8,
        len: usize,
    ) -> Result<(usize, Option<T>)> {
        if ptr.is_null() {
            return Err(CodecError::NullPointer);
        }
        // SAFETY: caller guarantees ptr is valid for len readable bytes.
        let src = unsafe { std::slice::from_raw_parts(ptr, len) };
        self.deserialize(src)
    }

    /// Frame length check shared by every stream surface.
    fn check_frame_len(&self, len: usize) -> Result<()> {
        if len > self.config.max_frame_len || u32::try_from(len).is_err() {
            return Err(CodecError::FrameTooLarge {
                len,
                max: self.config.max_frame_len,
            });
        }
        Ok(())
    }

    /// Decode a complete frame body; the record must fill it exactly.
    fn decode_frame<T: TypeIdentity>(&self, frame: &[u8]) -> Result<(usize, Option<T>)> {
        let (used, value) = self.deserialize::<T>(frame)?;
        if used != frame.len() {
            return Err(CodecError::invalid(format!(
                "frame of {} bytes holds a {}-byte record",
                frame.len(),
                used
            )));
        }
        Ok((used, value))
    }
}

fn check_written<T>(estimated: usize, written: usize) -> Result<()> {
    if estimated != written {
        log::warn!(
            "[serializer] {} handler estimated {} bytes but wrote {}",
            std::any::type_name::<T>(),
            estimated,
            written
        );
        return Err(CodecError::SizeMismatch {
            type_name: std::any::type_name::<T>(),
            estimated,
            written,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::builtin_unit;
    use crate::config::RECORD_HEADER_LEN;

    fn serializer() -> ByteSerializer {
        let registry = HandlerRegistry::builder()
            .merge(builtin_unit().unwrap())
            .unwrap()
            .build();
        ByteSerializer::new(Arc::new(registry))
    }

    #[test]
    fn test_serialize_allocates_exact_size() {
        let ser = serializer();
        let bytes = ser.serialize(&42u16).unwrap();
        assert_eq!(bytes.len(), RECORD_HEADER_LEN + 2);
        assert_eq!(ser.expected_serialized_size(Some(&42u16)).unwrap(), bytes.len());
        assert_eq!(ser.deserialize::<u16>(&bytes).unwrap(), (bytes.len(), Some(42)));
    }

    #[test]
    fn test_serialize_into_short_buffer_untouched() {
        let ser = serializer();
        let mut buf = [0xAAu8; RECORD_HEADER_LEN + 3];
        let err = ser.serialize_into(&mut buf, Some(&1u32)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::BufferTooSmall { needed, available }
                if needed == RECORD_HEADER_LEN + 4 && available == RECORD_HEADER_LEN + 3
        ));
        assert_eq!(buf, [0xAAu8; RECORD_HEADER_LEN + 3]);
    }

    #[test]
    fn test_serialize_into_larger_buffer() {
        let ser = serializer();
        let mut buf = [0xAAu8; 64];
        let written = ser.serialize_into(&mut buf, Some(&"hi".to_string())).unwrap();
        assert_eq!(written, RECORD_HEADER_LEN + 4 + 2);
        assert!(buf[written..].iter().all(|b| *b == 0xAA));

        let (used, value) = ser.deserialize::<String>(&buf).unwrap();
        assert_eq!(used, written);
        assert_eq!(value.as_deref(), Some("hi"));
    }

    #[test]
    fn test_raw_pointer_roundtrip() {
        let ser = serializer();
        let mut buf = vec![0u8; ser.expected_serialized_size(Some(&-9i64)).unwrap()];
        let written = unsafe { ser.serialize_to_ptr(buf.as_mut_ptr(), buf.len(), Some(&-9i64)) }
            .unwrap();
        assert_eq!(written, buf.len());

        let (used, value) =
            unsafe { ser.deserialize_from_ptr::<i64>(buf.as_ptr(), buf.len()) }.unwrap();
        assert_eq!(used, written);
        assert_eq!(value, Some(-9));
    }

    #[test]
    fn test_raw_pointer_null() {
        let ser = serializer();
        let err = unsafe { ser.serialize_to_ptr(std::ptr::null_mut(), 16, Some(&1u8)) }.unwrap_err();
        assert!(matches!(err, CodecError::NullPointer));
        let err = unsafe { ser.deserialize_from_ptr::<u8>(std::ptr::null(), 16) }.unwrap_err();
        assert!(matches!(err, CodecError::NullPointer));
    }

    #[test]
    fn test_frame_len_limit() {
        let ser = ByteSerializer::with_config(
            Arc::clone(&serializer().registry),
            CodecConfig::default().with_max_frame_len(8),
        );
        assert!(ser.check_frame_len(8).is_ok());
        assert!(matches!(
            ser.check_frame_len(9),
            Err(CodecError::FrameTooLarge { len: 9, max: 8 })
        ));
    }

    #[test]
    fn test_decode_frame_rejects_trailing_bytes() {
        let ser = serializer();
        let mut frame = ser.serialize(&5u8).unwrap();
        frame.push(0);
        assert!(matches!(
            ser.decode_frame::<u8>(&frame),
            Err(CodecError::InvalidPayload { .. })
        ));
    }
}
