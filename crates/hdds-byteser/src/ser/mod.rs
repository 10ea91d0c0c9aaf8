// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Low-level byte cursors shared by every handler.

pub mod cursor;

pub use cursor::{Cursor, CursorMut};
