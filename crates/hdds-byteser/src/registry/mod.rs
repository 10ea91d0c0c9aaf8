// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handler registry: one handler per Rust type, merged from handler units.
//!
//! # Architecture
//!
//! ```text
//! HandlerUnit::builder("core")        HandlerUnit::builder("app")
//!   .register::<PrimitiveHandler<u32>>   .register::<ReadingHandler>()
//!   .build()?  ── duplicate check        .build()?
//!          \                                  /
//!           └──── HandlerRegistry::builder() ┘
//!                   .merge(unit)?   ── collision + variant check
//!                   .build()        ── immutable, Send + Sync
//!                        │
//!                  resolve::<T>() ──> BoundHandler<T>
//!                                     (record header + handler payload)
//! ```
//!
//! Population happens once, through the builders. The built registry is
//! read-only: handlers are instantiated lazily on first resolution and cached
//! in a `OnceLock`, so concurrent `resolve` calls never lock after the first
//! one for a given type.

use crate::codec::handler::SerializationHandler;
use crate::codec::record::RecordHeader;
use crate::config::MAX_NESTING_DEPTH;
use crate::error::{CodecError, Result};
use crate::ser::{Cursor, CursorMut};
use crate::types::{FormatVariant, TypeIdentifier, TypeIdentity};
use std::any::{Any, TypeId};
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

type ErasedHandler = Box<dyn Any + Send + Sync>;

fn instantiate<H>() -> ErasedHandler
where
    H: SerializationHandler + Default,
{
    let handler: Box<dyn SerializationHandler<Target = H::Target>> = Box::new(H::default());
    Box::new(handler)
}

/// One handler registration, not yet instantiated.
struct Registration {
    type_id: TypeId,
    type_name: &'static str,
    identifier: TypeIdentifier,
    instantiate: fn() -> ErasedHandler,
}

/// Set of handlers contributed by one compiled unit.
///
/// Every handler in a unit stamps the unit's [`FormatVariant`].
pub struct HandlerUnit {
    name: String,
    variant: FormatVariant,
    registrations: Vec<Registration>,
}

impl HandlerUnit {
    pub fn builder(name: impl Into<String>) -> HandlerUnitBuilder {
        HandlerUnitBuilder {
            name: name.into(),
            variant: FormatVariant::CURRENT,
            registrations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl fmt::Debug for HandlerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerUnit")
            .field("name", &self.name)
            .field("variant", &self.variant)
            .field(
                "types",
                &self
                    .registrations
                    .iter()
                    .map(|r| r.type_name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Collects registrations for a [`HandlerUnit`].
pub struct HandlerUnitBuilder {
    name: String,
    variant: FormatVariant,
    registrations: Vec<Registration>,
}

impl HandlerUnitBuilder {
    /// Register `H` as the handler for `H::Target`.
    #[must_use]
    pub fn register<H>(mut self) -> Self
    where
        H: SerializationHandler + Default,
    {
        self.registrations.push(Registration {
            type_id: TypeId::of::<H::Target>(),
            type_name: std::any::type_name::<H::Target>(),
            identifier: H::Target::type_identifier(),
            instantiate: instantiate::<H>,
        });
        self
    }

    /// Stamp a variant other than [`FormatVariant::CURRENT`].
    ///
    /// Only useful to exercise the variant gate: a registry refuses units
    /// whose variant this build cannot decode.
    #[must_use]
    pub fn with_variant(mut self, variant: FormatVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Finish the unit, rejecting any type registered more than once.
    pub fn build(self) -> Result<HandlerUnit> {
        let mut seen = HashSet::with_capacity(self.registrations.len());
        for registration in &self.registrations {
            if !seen.insert(registration.type_id) {
                log::warn!(
                    "[registry] unit '{}' registers {} more than once",
                    self.name,
                    registration.type_name
                );
                return Err(CodecError::DuplicateHandler {
                    unit: self.name,
                    type_name: registration.type_name,
                });
            }
        }
        Ok(HandlerUnit {
            name: self.name,
            variant: self.variant,
            registrations: self.registrations,
        })
    }
}

/// Summary of a unit merged into a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSummary {
    pub name: String,
    pub variant: FormatVariant,
    pub handlers: usize,
}

struct HandlerEntry {
    unit: Arc<str>,
    variant: FormatVariant,
    type_name: &'static str,
    identifier: TypeIdentifier,
    instantiate: fn() -> ErasedHandler,
    handler: OnceLock<ErasedHandler>,
}

/// Immutable type -> handler mapping.
///
/// Built once with [`HandlerRegistry::builder`], then shared (typically in an
/// `Arc`) by every serializer and thread.
pub struct HandlerRegistry {
    entries: HashMap<TypeId, HandlerEntry>,
    units: Vec<UnitSummary>,
}

impl HandlerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            entries: HashMap::new(),
            units: Vec::new(),
        }
    }

    /// Handler for `T`, wrapped with the record header logic.
    pub fn resolve<T: TypeIdentity>(&self) -> Result<BoundHandler<'_, T>> {
        let entry = self.entry::<T>()?;
        let erased = entry.handler.get_or_init(|| {
            log::debug!(
                "[registry] instantiating handler for {} (unit '{}')",
                entry.type_name,
                entry.unit
            );
            (entry.instantiate)()
        });
        let handler = (**erased)
            .downcast_ref::<Box<dyn SerializationHandler<Target = T>>>()
            .ok_or(CodecError::UnregisteredType {
                type_name: std::any::type_name::<T>(),
            })?;
        Ok(BoundHandler {
            handler: &**handler,
            entry,
            registry: self,
        })
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Identifier that records of `T` carry.
    pub fn identifier_of<T: 'static>(&self) -> Result<TypeIdentifier> {
        Ok(self.entry::<T>()?.identifier)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Units in merge order.
    pub fn units(&self) -> &[UnitSummary] {
        &self.units
    }

    fn entry<T: 'static>(&self) -> Result<&HandlerEntry> {
        self.entries
            .get(&TypeId::of::<T>())
            .ok_or(CodecError::UnregisteredType {
                type_name: std::any::type_name::<T>(),
            })
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("types", &self.entries.len())
            .field("units", &self.units)
            .finish()
    }
}

/// Accumulates handler units into a [`HandlerRegistry`].
pub struct RegistryBuilder {
    entries: HashMap<TypeId, HandlerEntry>,
    units: Vec<UnitSummary>,
}

impl RegistryBuilder {
    /// Merge a unit. All-or-nothing: on error nothing from `unit` is added.
    pub fn merge(mut self, unit: HandlerUnit) -> Result<Self> {
        if !unit.variant.is_supported() {
            log::warn!(
                "[registry] unit '{}' uses unsupported variant {}",
                unit.name,
                unit.variant
            );
            return Err(CodecError::UnsupportedVariant(unit.variant));
        }

        for registration in &unit.registrations {
            if let Some(existing) = self.entries.get(&registration.type_id) {
                log::warn!(
                    "[registry] {} registered by both '{}' and '{}'",
                    registration.type_name,
                    existing.unit,
                    unit.name
                );
                return Err(CodecError::HandlerCollision {
                    type_name: registration.type_name,
                    first: existing.unit.to_string(),
                    second: unit.name,
                });
            }
        }

        let unit_name: Arc<str> = Arc::from(unit.name.as_str());
        log::debug!(
            "[registry] merging unit '{}' ({} handlers, variant {})",
            unit.name,
            unit.registrations.len(),
            unit.variant
        );
        self.units.push(UnitSummary {
            name: unit.name,
            variant: unit.variant,
            handlers: unit.registrations.len(),
        });
        for registration in unit.registrations {
            self.entries.insert(
                registration.type_id,
                HandlerEntry {
                    unit: Arc::clone(&unit_name),
                    variant: unit.variant,
                    type_name: registration.type_name,
                    identifier: registration.identifier,
                    instantiate: registration.instantiate,
                    handler: OnceLock::new(),
                },
            );
        }
        Ok(self)
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            entries: self.entries,
            units: self.units,
        }
    }
}

/// A resolved handler together with its record header.
///
/// This is the full three-operation contract: sizes, writes and reads whole
/// records (header + payload), with `None` standing for an absent value.
pub struct BoundHandler<'r, T: TypeIdentity> {
    handler: &'r dyn SerializationHandler<Target = T>,
    entry: &'r HandlerEntry,
    registry: &'r HandlerRegistry,
}

impl<'r, T: TypeIdentity> BoundHandler<'r, T> {
    pub fn identifier(&self) -> TypeIdentifier {
        self.entry.identifier
    }

    pub fn variant(&self) -> FormatVariant {
        self.entry.variant
    }

    pub fn type_name(&self) -> &'static str {
        self.entry.type_name
    }

    /// Name of the unit that registered this handler.
    pub fn unit(&self) -> &str {
        &self.entry.unit
    }

    /// Exact record size for `value`.
    pub fn estimate_size(&self, value: Option<&T>) -> Result<usize> {
        match value {
            Some(v) => Ok(RecordHeader::LEN + self.handler.payload_size(v, self.registry)?),
            None => Ok(RecordHeader::LEN),
        }
    }

    /// Write the record for `value` at the start of `dst`.
    pub fn encode(&self, dst: &mut [u8], value: Option<&T>) -> Result<usize> {
        let mut cursor = CursorMut::new(dst);
        RecordHeader {
            variant: self.entry.variant,
            type_id: self.entry.identifier,
            present: value.is_some(),
        }
        .write(&mut cursor)?;
        if let Some(v) = value {
            let base = cursor.offset();
            let written = self
                .handler
                .encode_payload(cursor.tail(), v, self.registry)
                .map_err(|e| e.at_offset(base))?;
            cursor.advance(written)?;
        }
        Ok(cursor.offset())
    }

    /// Read one record of `T` from the start of `src`.
    pub fn decode(&self, src: &[u8]) -> Result<(usize, Option<T>)> {
        let mut cursor = Cursor::new(src);
        let header = RecordHeader::read(&mut cursor)?;
        if header.type_id != self.entry.identifier {
            return Err(CodecError::TypeMismatch {
                expected: self.entry.identifier,
                found: header.type_id,
            });
        }
        if !header.present {
            return Ok((cursor.offset(), None));
        }
        let _depth = DepthGuard::enter(self.entry.type_name)?;
        let base = cursor.offset();
        let (used, value) = self
            .handler
            .decode_payload(cursor.tail(), self.registry)
            .map_err(|e| e.at_offset(base))?;
        cursor.advance(used)?;
        Ok((cursor.offset(), Some(value)))
    }
}

thread_local! {
    static DECODE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Nesting level of the payload decode running on this thread.
///
/// Decoding is synchronous, so a payload never spans threads.
struct DepthGuard;

impl DepthGuard {
    fn enter(type_name: &'static str) -> Result<Self> {
        DECODE_DEPTH.with(|depth| {
            let next = depth.get() + 1;
            if next > MAX_NESTING_DEPTH {
                log::debug!(
                    "[registry] nesting limit {} reached decoding {}",
                    MAX_NESTING_DEPTH,
                    type_name
                );
                return Err(CodecError::invalid(format!(
                    "{} nested deeper than {} records",
                    type_name, MAX_NESTING_DEPTH
                )));
            }
            depth.set(next);
            Ok(Self)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DECODE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

impl<T: TypeIdentity> fmt::Debug for BoundHandler<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundHandler")
            .field("type_name", &self.entry.type_name)
            .field("identifier", &self.entry.identifier)
            .field("unit", &self.entry.unit)
            .finish()
    }
}
