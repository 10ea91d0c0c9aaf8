// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Array handlers: dynamic, nullable-element, fixed-size and rectangular.
//!
//! # Payload layout
//!
//! ```text
//! Vec<E>      : count(4) | record(E)[count]
//! Vec<Vec<E>> : count(4) | record(Vec<E>)[count]          (one count per row)
//! Matrix<E>   : rows(4)  | { cols(4) | record(E)[cols] }[rows]
//! ```
//!
//! Every element is a full record, so nested arrays and nullable elements
//! need no special casing: jaggedness falls out of each row carrying its own
//! count.

use super::handler::SerializationHandler;
use crate::config::{COUNT_LEN, MAX_COLLECTION_LEN, RECORD_HEADER_LEN};
use crate::error::{CodecError, Result};
use crate::registry::HandlerRegistry;
use crate::ser::{Cursor, CursorMut};
use crate::types::{TypeDescriptor, TypeIdentity};
use std::marker::PhantomData;

/// Rejects counts that exceed the hard limit or cannot fit in what is left
/// of `cursor`, which sits just past the count.
///
/// `min_item_len` is the smallest encoding one item can have, which bounds
/// the allocation before a single item is decoded.
pub(crate) fn check_count(count: usize, cursor: &Cursor<'_>, min_item_len: usize) -> Result<()> {
    if count > MAX_COLLECTION_LEN {
        return Err(CodecError::invalid(format!(
            "collection count {} exceeds maximum allowed ({})",
            count, MAX_COLLECTION_LEN
        )));
    }
    let needed = count.saturating_mul(min_item_len);
    if needed > cursor.remaining() {
        return Err(CodecError::Truncated {
            offset: cursor.offset(),
            needed,
            available: cursor.remaining(),
        });
    }
    Ok(())
}

fn elements_size<'v, E: TypeIdentity>(
    registry: &HandlerRegistry,
    items: impl Iterator<Item = Option<&'v E>>,
) -> Result<usize> {
    let handler = registry.resolve::<E>()?;
    let mut total = COUNT_LEN;
    for item in items {
        total += handler.estimate_size(item)?;
    }
    Ok(total)
}

fn encode_elements<'v, E: TypeIdentity>(
    cursor: &mut CursorMut<'_>,
    registry: &HandlerRegistry,
    count: usize,
    items: impl Iterator<Item = Option<&'v E>>,
) -> Result<()> {
    let handler = registry.resolve::<E>()?;
    cursor.write_count(count)?;
    for item in items {
        let base = cursor.offset();
        let written = handler
            .encode(cursor.tail(), item)
            .map_err(|e| e.at_offset(base))?;
        cursor.advance(written)?;
    }
    Ok(())
}

fn decode_elements<E: TypeIdentity>(
    cursor: &mut Cursor<'_>,
    registry: &HandlerRegistry,
) -> Result<Vec<Option<E>>> {
    let handler = registry.resolve::<E>()?;
    let count = cursor.read_count()?;
    check_count(count, cursor, RECORD_HEADER_LEN)?;

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let base = cursor.offset();
        let (used, item) = handler
            .decode(cursor.tail())
            .map_err(|e| e.at_offset(base))?;
        cursor.advance(used)?;
        items.push(item);
    }
    Ok(items)
}

fn require_all<E>(items: Vec<Option<E>>) -> Result<Vec<E>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            item.ok_or_else(|| {
                CodecError::invalid(format!(
                    "array element {} of type {} is absent",
                    index,
                    std::any::type_name::<E>()
                ))
            })
        })
        .collect()
}

/// `Vec<E>` with present elements.
pub struct ArrayHandler<E>(PhantomData<fn() -> E>);

impl<E> Default for ArrayHandler<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<E: TypeIdentity> SerializationHandler for ArrayHandler<E> {
    type Target = Vec<E>;

    fn payload_size(&self, value: &Vec<E>, registry: &HandlerRegistry) -> Result<usize> {
        elements_size(registry, value.iter().map(Some))
    }

    fn encode_payload(
        &self,
        dst: &mut [u8],
        value: &Vec<E>,
        registry: &HandlerRegistry,
    ) -> Result<usize> {
        let mut cursor = CursorMut::new(dst);
        encode_elements(&mut cursor, registry, value.len(), value.iter().map(Some))?;
        Ok(cursor.offset())
    }

    fn decode_payload(&self, src: &[u8], registry: &HandlerRegistry) -> Result<(usize, Vec<E>)> {
        let mut cursor = Cursor::new(src);
        let items = require_all(decode_elements::<E>(&mut cursor, registry)?)?;
        Ok((cursor.offset(), items))
    }
}

/// `Vec<Option<E>>`: same wire form as `Vec<E>`, absent elements allowed.
pub struct NullableArrayHandler<E>(PhantomData<fn() -> E>);

impl<E> Default for NullableArrayHandler<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<E: TypeIdentity> SerializationHandler for NullableArrayHandler<E> {
    type Target = Vec<Option<E>>;

    fn payload_size(&self, value: &Vec<Option<E>>, registry: &HandlerRegistry) -> Result<usize> {
        elements_size(registry, value.iter().map(Option::as_ref))
    }

    fn encode_payload(
        &self,
        dst: &mut [u8],
        value: &Vec<Option<E>>,
        registry: &HandlerRegistry,
    ) -> Result<usize> {
        let mut cursor = CursorMut::new(dst);
        encode_elements(
            &mut cursor,
            registry,
            value.len(),
            value.iter().map(Option::as_ref),
        )?;
        Ok(cursor.offset())
    }

    fn decode_payload(
        &self,
        src: &[u8],
        registry: &HandlerRegistry,
    ) -> Result<(usize, Vec<Option<E>>)> {
        let mut cursor = Cursor::new(src);
        let items = decode_elements::<E>(&mut cursor, registry)?;
        Ok((cursor.offset(), items))
    }
}

/// `[E; N]`: the count is still written, and must equal `N` on decode.
pub struct FixedArrayHandler<E, const N: usize>(PhantomData<fn() -> E>);

impl<E, const N: usize> Default for FixedArrayHandler<E, N> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<E: TypeIdentity, const N: usize> SerializationHandler for FixedArrayHandler<E, N> {
    type Target = [E; N];

    fn payload_size(&self, value: &[E; N], registry: &HandlerRegistry) -> Result<usize> {
        elements_size(registry, value.iter().map(Some))
    }

    fn encode_payload(
        &self,
        dst: &mut [u8],
        value: &[E; N],
        registry: &HandlerRegistry,
    ) -> Result<usize> {
        let mut cursor = CursorMut::new(dst);
        encode_elements(&mut cursor, registry, N, value.iter().map(Some))?;
        Ok(cursor.offset())
    }

    fn decode_payload(&self, src: &[u8], registry: &HandlerRegistry) -> Result<(usize, [E; N])> {
        let mut cursor = Cursor::new(src);
        let items = require_all(decode_elements::<E>(&mut cursor, registry)?)?;
        let len = items.len();
        let array = <[E; N]>::try_from(items).map_err(|_| {
            CodecError::invalid(format!("fixed array expects {} elements, found {}", N, len))
        })?;
        Ok((cursor.offset(), array))
    }
}

/// Rectangular two-dimensional array stored row-major.
///
/// An empty matrix has no columns: `Matrix::new(0, 5, vec![])` reports
/// `cols() == 0`, since a zero-row encoding has nowhere to carry a column
/// count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<E> {
    rows: usize,
    cols: usize,
    data: Vec<E>,
}

impl<E> Matrix<E> {
    /// Returns `None` if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<E>) -> Option<Self> {
        if rows.checked_mul(cols)? != data.len() {
            return None;
        }
        let cols = if rows == 0 { 0 } else { cols };
        Some(Self { rows, cols, data })
    }

    pub fn from_rows(rows: Vec<Vec<E>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        let row_count = rows.len();
        let data = rows.into_iter().flatten().collect();
        Self::new(row_count, cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&E> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    pub fn row(&self, row: usize) -> Option<&[E]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.data.get(start..start + self.cols)
    }

    pub fn as_slice(&self) -> &[E] {
        &self.data
    }

    fn row_iter(&self) -> impl Iterator<Item = &[E]> {
        (0..self.rows).map(move |r| &self.data[r * self.cols..(r + 1) * self.cols])
    }
}

impl<E: TypeIdentity> TypeIdentity for Matrix<E> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builtin("Matrix").with_generic_arg(E::type_identifier())
    }
}

/// Handler for [`Matrix`]: one count per dimension level.
pub struct MatrixHandler<E>(PhantomData<fn() -> E>);

impl<E> Default for MatrixHandler<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<E: TypeIdentity> SerializationHandler for MatrixHandler<E> {
    type Target = Matrix<E>;

    fn payload_size(&self, value: &Matrix<E>, registry: &HandlerRegistry) -> Result<usize> {
        let mut total = COUNT_LEN;
        for row in value.row_iter() {
            total += elements_size(registry, row.iter().map(Some))?;
        }
        Ok(total)
    }

    fn encode_payload(
        &self,
        dst: &mut [u8],
        value: &Matrix<E>,
        registry: &HandlerRegistry,
    ) -> Result<usize> {
        let mut cursor = CursorMut::new(dst);
        cursor.write_count(value.rows)?;
        for row in value.row_iter() {
            encode_elements(&mut cursor, registry, row.len(), row.iter().map(Some))?;
        }
        Ok(cursor.offset())
    }

    fn decode_payload(&self, src: &[u8], registry: &HandlerRegistry) -> Result<(usize, Matrix<E>)> {
        let mut cursor = Cursor::new(src);
        let rows = cursor.read_count()?;
        check_count(rows, &cursor, COUNT_LEN)?;

        let mut cols = None;
        let mut data = Vec::new();
        for row in 0..rows {
            let items = require_all(decode_elements::<E>(&mut cursor, registry)?)?;
            match cols {
                None => cols = Some(items.len()),
                Some(expected) if expected != items.len() => {
                    return Err(CodecError::invalid(format!(
                        "matrix row {} has {} columns, expected {}",
                        row,
                        items.len(),
                        expected
                    )))
                }
                Some(_) => {}
            }
            data.extend(items);
        }

        let matrix = Matrix::new(rows, cols.unwrap_or(0), data)
            .ok_or_else(|| CodecError::invalid("matrix dimensions overflow"))?;
        Ok((cursor.offset(), matrix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_count_limits() {
        let empty = Cursor::new(&[]);
        assert!(check_count(0, &empty, RECORD_HEADER_LEN).is_ok());

        let buffer = [0u8; 2 * RECORD_HEADER_LEN];
        let cursor = Cursor::new(&buffer);
        assert!(check_count(2, &cursor, RECORD_HEADER_LEN).is_ok());
        assert!(matches!(
            check_count(3, &cursor, RECORD_HEADER_LEN),
            Err(CodecError::Truncated { .. })
        ));
        assert!(matches!(
            check_count(MAX_COLLECTION_LEN + 1, &cursor, 1),
            Err(CodecError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_check_count_reports_position() {
        let buffer = [0u8; COUNT_LEN + RECORD_HEADER_LEN];
        let mut cursor = Cursor::new(&buffer);
        cursor.advance(COUNT_LEN).unwrap();

        match check_count(5, &cursor, RECORD_HEADER_LEN) {
            Err(CodecError::Truncated {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, COUNT_LEN);
                assert_eq!(needed, 5 * RECORD_HEADER_LEN);
                assert_eq!(available, RECORD_HEADER_LEN);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_matrix_construction() {
        let m = Matrix::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(1, 0), Some(&4));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.row(1), Some(&[4, 5, 6][..]));

        assert!(Matrix::new(2, 3, vec![1, 2]).is_none());
        assert!(Matrix::from_rows(vec![vec![1, 2], vec![3]]).is_none());
        assert_eq!(
            Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]),
            Matrix::new(2, 2, vec![1, 2, 3, 4])
        );
    }

    #[test]
    fn test_empty_matrix_has_no_columns() {
        let m = Matrix::<u8>::new(0, 5, Vec::new()).unwrap();
        assert_eq!(m.cols(), 0);
        assert_eq!(m, Matrix::from_rows(Vec::new()).unwrap());
    }
}
