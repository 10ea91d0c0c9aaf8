// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the fully-qualified description a [`TypeIdentifier`] is
//! derived from.

use super::type_id::{TypeIdentifier, TYPE_ID_LEN};
use std::borrow::Cow;

/// Origin used by the handlers shipped with this crate.
///
/// Kept as a fixed string (not the crate name) so identifiers of builtin
/// types never change between releases.
pub const BUILTIN_ORIGIN: &str = "core";

/// Fully-qualified description of a serializable type.
///
/// Namespace, name, generic arguments (by identifier, in order) and the
/// origin of the compiled unit that defines the type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    namespace: Cow<'static, str>,
    name: Cow<'static, str>,
    generic_args: Vec<TypeIdentifier>,
    origin: Cow<'static, str>,
}

impl TypeDescriptor {
    pub fn new(namespace: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            generic_args: Vec::new(),
            origin: Cow::Borrowed(""),
        }
    }

    /// Descriptor for a type shipped with this crate.
    pub fn builtin(name: &'static str) -> Self {
        Self::new(BUILTIN_ORIGIN, name).with_origin(BUILTIN_ORIGIN)
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<Cow<'static, str>>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Append a generic argument. Order is significant.
    #[must_use]
    pub fn with_generic_arg(mut self, arg: TypeIdentifier) -> Self {
        self.generic_args.push(arg);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn generic_args(&self) -> &[TypeIdentifier] {
        &self.generic_args
    }

    pub fn arity(&self) -> usize {
        self.generic_args.len()
    }

    /// Human-readable name, e.g. `core.Array`1@core`.
    pub fn qualified_name(&self) -> String {
        let mut out = String::with_capacity(self.namespace.len() + self.name.len() + 8);
        if !self.namespace.is_empty() {
            out.push_str(&self.namespace);
            out.push('.');
        }
        out.push_str(&self.name);
        if self.arity() > 0 {
            out.push('`');
            out.push_str(&self.arity().to_string());
        }
        if !self.origin.is_empty() {
            out.push('@');
            out.push_str(&self.origin);
        }
        out
    }

    pub fn identifier(&self) -> TypeIdentifier {
        TypeIdentifier::create_from(self)
    }

    /// Canonical byte form hashed into the identifier.
    ///
    /// Every string is length-prefixed so adjacent fields cannot bleed into
    /// each other.
    pub(crate) fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            16 + self.namespace.len()
                + self.name.len()
                + self.origin.len()
                + self.generic_args.len() * TYPE_ID_LEN,
        );
        for part in [&self.namespace, &self.name, &self.origin] {
            out.extend_from_slice(&(part.len() as u32).to_le_bytes());
            out.extend_from_slice(part.as_bytes());
        }
        out.extend_from_slice(&(self.generic_args.len() as u32).to_le_bytes());
        for arg in &self.generic_args {
            out.extend_from_slice(arg.as_bytes());
        }
        out
    }
}

/// Static type identity, implemented once per serializable type.
///
/// ```
/// use hdds_byteser::types::{TypeDescriptor, TypeIdentity};
///
/// struct Point;
///
/// impl TypeIdentity for Point {
///     fn type_descriptor() -> TypeDescriptor {
///         TypeDescriptor::new("geometry", "Point").with_origin("app")
///     }
/// }
///
/// assert_eq!(Point::type_identifier(), Point::type_descriptor().identifier());
/// ```
pub trait TypeIdentity: 'static {
    fn type_descriptor() -> TypeDescriptor;

    fn type_identifier() -> TypeIdentifier {
        TypeIdentifier::create_from(&Self::type_descriptor())
    }
}

macro_rules! impl_builtin_identity {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl TypeIdentity for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::builtin($name)
                }
            }
        )*
    };
}

impl_builtin_identity! {
    bool => "bool",
    char => "char",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    f32 => "f32",
    f64 => "f64",
    String => "String",
}

impl<E: TypeIdentity> TypeIdentity for Vec<E> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builtin("Array").with_generic_arg(E::type_identifier())
    }
}

// Same payload as Vec<E>, so the same identity: either side can decode the other.
impl<E: TypeIdentity, const N: usize> TypeIdentity for [E; N] {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builtin("Array").with_generic_arg(E::type_identifier())
    }
}

// Absence is carried by the presence byte, not by the type.
impl<E: TypeIdentity> TypeIdentity for Option<E> {
    fn type_descriptor() -> TypeDescriptor {
        E::type_descriptor()
    }
}
