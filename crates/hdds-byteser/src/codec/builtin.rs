// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handlers for scalar types and strings.
//!
//! Fixed-width scalars write their little-endian bit pattern as the whole
//! payload, so their record size is constant: header + `Primitive::SIZE`.

use super::handler::SerializationHandler;
use crate::config::COUNT_LEN;
use crate::error::{CodecError, Result};
use crate::registry::{HandlerRegistry, HandlerUnit};
use crate::ser::{Cursor, CursorMut};
use crate::types::TypeIdentity;
use std::marker::PhantomData;

/// Name of the unit returned by [`builtin_unit`].
pub const BUILTIN_UNIT_NAME: &str = "core";

/// Fixed-width value with a direct bit-pattern encoding.
pub trait Primitive: TypeIdentity + Copy + Send + Sync {
    /// Encoded payload width in bytes.
    const SIZE: usize;

    fn write(self, cursor: &mut CursorMut<'_>) -> Result<()>;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self>;
}

/// Generate `Primitive` impls for numeric types (little-endian bit pattern)
macro_rules! impl_numeric_primitive {
    ($($ty:ty => $size:literal),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = $size;

                fn write(self, cursor: &mut CursorMut<'_>) -> Result<()> {
                    cursor.write_bytes(&self.to_le_bytes())
                }

                fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
                    Ok(<$ty>::from_le_bytes(cursor.read_array::<$size>()?))
                }
            }
        )*
    };
}

impl_numeric_primitive! {
    u8 => 1,
    u16 => 2,
    u32 => 4,
    u64 => 8,
    u128 => 16,
    i8 => 1,
    i16 => 2,
    i32 => 4,
    i64 => 8,
    i128 => 16,
    f32 => 4,
    f64 => 8,
}

impl Primitive for bool {
    const SIZE: usize = 1;

    fn write(self, cursor: &mut CursorMut<'_>) -> Result<()> {
        cursor.write_u8(u8::from(self))
    }

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        match cursor.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::invalid(format!("bool byte 0x{:02x}", other))),
        }
    }
}

impl Primitive for char {
    const SIZE: usize = 4;

    fn write(self, cursor: &mut CursorMut<'_>) -> Result<()> {
        cursor.write_u32_le(u32::from(self))
    }

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        let raw = cursor.read_u32_le()?;
        char::from_u32(raw)
            .ok_or_else(|| CodecError::invalid(format!("invalid char scalar 0x{:x}", raw)))
    }
}

/// Handler for any [`Primitive`].
pub struct PrimitiveHandler<P>(PhantomData<fn() -> P>);

impl<P> Default for PrimitiveHandler<P> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<P: Primitive> SerializationHandler for PrimitiveHandler<P> {
    type Target = P;

    fn payload_size(&self, _value: &P, _registry: &HandlerRegistry) -> Result<usize> {
        Ok(P::SIZE)
    }

    fn encode_payload(&self, dst: &mut [u8], value: &P, _registry: &HandlerRegistry) -> Result<usize> {
        let mut cursor = CursorMut::new(dst);
        value.write(&mut cursor)?;
        Ok(cursor.offset())
    }

    fn decode_payload(&self, src: &[u8], _registry: &HandlerRegistry) -> Result<(usize, P)> {
        let mut cursor = Cursor::new(src);
        let value = P::read(&mut cursor)?;
        Ok((cursor.offset(), value))
    }
}

/// UTF-8 string: `u32` byte length followed by the bytes.
#[derive(Default)]
pub struct StringHandler;

impl SerializationHandler for StringHandler {
    type Target = String;

    fn payload_size(&self, value: &String, _registry: &HandlerRegistry) -> Result<usize> {
        Ok(COUNT_LEN + value.len())
    }

    fn encode_payload(
        &self,
        dst: &mut [u8],
        value: &String,
        _registry: &HandlerRegistry,
    ) -> Result<usize> {
        let mut cursor = CursorMut::new(dst);
        cursor.write_count(value.len())?;
        cursor.write_bytes(value.as_bytes())?;
        Ok(cursor.offset())
    }

    fn decode_payload(&self, src: &[u8], _registry: &HandlerRegistry) -> Result<(usize, String)> {
        let mut cursor = Cursor::new(src);
        let len = cursor.read_count()?;
        let bytes = cursor.read_bytes(len)?;
        let value = String::from_utf8(bytes.to_vec())
            .map_err(|e| CodecError::invalid(format!("string is not UTF-8: {}", e)))?;
        Ok((cursor.offset(), value))
    }
}

/// Handler unit with every scalar type and `String`.
///
/// Array handlers are generic over their element type and are registered
/// by the unit that needs them.
pub fn builtin_unit() -> Result<HandlerUnit> {
    HandlerUnit::builder(BUILTIN_UNIT_NAME)
        .register::<PrimitiveHandler<bool>>()
        .register::<PrimitiveHandler<char>>()
        .register::<PrimitiveHandler<u8>>()
        .register::<PrimitiveHandler<u16>>()
        .register::<PrimitiveHandler<u32>>()
        .register::<PrimitiveHandler<u64>>()
        .register::<PrimitiveHandler<u128>>()
        .register::<PrimitiveHandler<i8>>()
        .register::<PrimitiveHandler<i16>>()
        .register::<PrimitiveHandler<i32>>()
        .register::<PrimitiveHandler<i64>>()
        .register::<PrimitiveHandler<i128>>()
        .register::<PrimitiveHandler<f32>>()
        .register::<PrimitiveHandler<f64>>()
        .register::<StringHandler>()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RECORD_HEADER_LEN;

    fn registry() -> HandlerRegistry {
        HandlerRegistry::builder()
            .merge(builtin_unit().unwrap())
            .unwrap()
            .build()
    }

    fn roundtrip<T: TypeIdentity + PartialEq + std::fmt::Debug>(registry: &HandlerRegistry, value: T) {
        let handler = registry.resolve::<T>().unwrap();
        let size = handler.estimate_size(Some(&value)).unwrap();
        let mut buf = vec![0u8; size];
        assert_eq!(handler.encode(&mut buf, Some(&value)).unwrap(), size);
        let (used, decoded) = handler.decode(&buf).unwrap();
        assert_eq!(used, size);
        assert_eq!(decoded, Some(value));
    }

    #[test]
    fn test_scalar_roundtrips() {
        let registry = registry();
        roundtrip(&registry, true);
        roundtrip(&registry, false);
        roundtrip(&registry, 'λ');
        roundtrip(&registry, 0xABu8);
        roundtrip(&registry, 0xBEEFu16);
        roundtrip(&registry, u32::MAX);
        roundtrip(&registry, 0x1122_3344_5566_7788u64);
        roundtrip(&registry, u128::MAX - 1);
        roundtrip(&registry, -5i8);
        roundtrip(&registry, i16::MIN);
        roundtrip(&registry, -123_456i32);
        roundtrip(&registry, i64::MIN);
        roundtrip(&registry, i128::MIN);
        roundtrip(&registry, 3.5f32);
        roundtrip(&registry, -0.125f64);
    }

    #[test]
    fn test_primitive_size_is_constant() {
        let registry = registry();
        let handler = registry.resolve::<u64>().unwrap();
        assert_eq!(handler.estimate_size(Some(&0)).unwrap(), RECORD_HEADER_LEN + 8);
        assert_eq!(handler.estimate_size(Some(&u64::MAX)).unwrap(), RECORD_HEADER_LEN + 8);
        assert_eq!(handler.estimate_size(None).unwrap(), RECORD_HEADER_LEN);
    }

    #[test]
    fn test_primitive_bit_pattern() {
        let registry = registry();
        let handler = registry.resolve::<u32>().unwrap();
        let mut buf = [0u8; RECORD_HEADER_LEN + 4];
        handler.encode(&mut buf, Some(&0x0A0B_0C0D)).unwrap();
        assert_eq!(&buf[RECORD_HEADER_LEN..], &[0x0D, 0x0C, 0x0B, 0x0A]);
    }

    #[test]
    fn test_string_roundtrip_and_layout() {
        let registry = registry();
        roundtrip(&registry, String::new());
        roundtrip(&registry, "hello, world".to_string());
        roundtrip(&registry, "日本語".to_string());

        let handler = registry.resolve::<String>().unwrap();
        let value = "abc".to_string();
        let mut buf = vec![0u8; handler.estimate_size(Some(&value)).unwrap()];
        handler.encode(&mut buf, Some(&value)).unwrap();
        assert_eq!(&buf[RECORD_HEADER_LEN..], &[3, 0, 0, 0, b'a', b'b', b'c']);
    }

    #[test]
    fn test_invalid_bool_rejected() {
        let registry = registry();
        let handler = registry.resolve::<bool>().unwrap();
        let mut buf = [0u8; RECORD_HEADER_LEN + 1];
        handler.encode(&mut buf, Some(&true)).unwrap();
        buf[RECORD_HEADER_LEN] = 2;
        assert!(matches!(
            handler.decode(&buf),
            Err(CodecError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_invalid_char_rejected() {
        let registry = registry();
        let handler = registry.resolve::<char>().unwrap();
        let mut buf = [0u8; RECORD_HEADER_LEN + 4];
        handler.encode(&mut buf, Some(&'a')).unwrap();
        buf[RECORD_HEADER_LEN..].copy_from_slice(&0xD800u32.to_le_bytes());
        assert!(matches!(
            handler.decode(&buf),
            Err(CodecError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let registry = registry();
        let handler = registry.resolve::<String>().unwrap();
        let value = "ab".to_string();
        let mut buf = vec![0u8; handler.estimate_size(Some(&value)).unwrap()];
        handler.encode(&mut buf, Some(&value)).unwrap();
        let last = buf.len() - 1;
        buf[last] = 0xFF;
        assert!(matches!(
            handler.decode(&buf),
            Err(CodecError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_string_length_past_end_is_truncated() {
        let registry = registry();
        let handler = registry.resolve::<String>().unwrap();
        let value = "abcd".to_string();
        let mut buf = vec![0u8; handler.estimate_size(Some(&value)).unwrap()];
        handler.encode(&mut buf, Some(&value)).unwrap();
        buf.truncate(buf.len() - 2);
        assert!(matches!(handler.decode(&buf), Err(CodecError::Truncated { .. })));
    }
}
