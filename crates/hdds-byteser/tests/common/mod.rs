// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Shared fixtures: an application unit with a hand-written composite handler.

#![allow(dead_code)]

use hdds_byteser::{
    builtin_unit, ArrayHandler, ByteSerializer, FieldReader, FieldWriter, FixedArrayHandler,
    HandlerRegistry, HandlerUnit, MatrixHandler, NullableArrayHandler, Result,
    SerializationHandler, SizeEstimator, TypeDescriptor, TypeIdentity,
};
use std::sync::Arc;

pub const APP_UNIT: &str = "telemetry";

#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub sensor_id: u32,
    pub label: Option<String>,
    pub samples: Vec<f64>,
}

impl TypeIdentity for Reading {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new("telemetry", "Reading").with_origin(APP_UNIT)
    }
}

#[derive(Default)]
pub struct ReadingHandler;

impl SerializationHandler for ReadingHandler {
    type Target = Reading;

    fn payload_size(&self, value: &Reading, registry: &HandlerRegistry) -> Result<usize> {
        let mut size = SizeEstimator::new(registry);
        size.field(Some(&value.sensor_id))?
            .field(value.label.as_ref())?
            .field(Some(&value.samples))?;
        Ok(size.total())
    }

    fn encode_payload(
        &self,
        dst: &mut [u8],
        value: &Reading,
        registry: &HandlerRegistry,
    ) -> Result<usize> {
        let mut writer = FieldWriter::new(dst, registry);
        writer
            .field(Some(&value.sensor_id))?
            .field(value.label.as_ref())?
            .field(Some(&value.samples))?;
        Ok(writer.finish())
    }

    fn decode_payload(&self, src: &[u8], registry: &HandlerRegistry) -> Result<(usize, Reading)> {
        let mut reader = FieldReader::new(src, registry);
        let sensor_id = reader.required()?;
        let label = reader.field()?;
        let samples = reader.required()?;
        Ok((
            reader.finish(),
            Reading {
                sensor_id,
                label,
                samples,
            },
        ))
    }
}

/// Tree node; each level of nesting costs two records (node and child list).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub children: Vec<Node>,
}

impl TypeIdentity for Node {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new("telemetry", "Node").with_origin(APP_UNIT)
    }
}

#[derive(Default)]
pub struct NodeHandler;

impl SerializationHandler for NodeHandler {
    type Target = Node;

    fn payload_size(&self, value: &Node, registry: &HandlerRegistry) -> Result<usize> {
        let mut size = SizeEstimator::new(registry);
        size.field(Some(&value.children))?;
        Ok(size.total())
    }

    fn encode_payload(
        &self,
        dst: &mut [u8],
        value: &Node,
        registry: &HandlerRegistry,
    ) -> Result<usize> {
        let mut writer = FieldWriter::new(dst, registry);
        writer.field(Some(&value.children))?;
        Ok(writer.finish())
    }

    fn decode_payload(&self, src: &[u8], registry: &HandlerRegistry) -> Result<(usize, Node)> {
        let mut reader = FieldReader::new(src, registry);
        let children = reader.required()?;
        Ok((reader.finish(), Node { children }))
    }
}

/// Chain of `depth` single-child nodes ending in a leaf.
pub fn chain(depth: usize) -> Node {
    let mut node = Node::default();
    for _ in 0..depth {
        node = Node {
            children: vec![node],
        };
    }
    node
}

/// Wire bytes of a [`chain`] built without materializing the tree, so the
/// depth can exceed what recursive encoding would allow.
pub fn chain_bytes(ser: &ByteSerializer, depth: usize) -> Vec<u8> {
    let leaf = ser.serialize(&Node::default()).expect("encode leaf");
    // Leaf layout: node header | child list header | count(4).
    let headers = &leaf[..leaf.len() - 4];

    let mut bytes = Vec::with_capacity(leaf.len() * (depth + 1));
    for _ in 0..depth {
        bytes.extend_from_slice(headers);
        bytes.extend_from_slice(&1u32.to_le_bytes());
    }
    bytes.extend_from_slice(&leaf);
    bytes
}

pub fn app_unit() -> HandlerUnit {
    HandlerUnit::builder(APP_UNIT)
        .register::<ReadingHandler>()
        .register::<NodeHandler>()
        .register::<ArrayHandler<Node>>()
        .register::<ArrayHandler<Reading>>()
        .register::<ArrayHandler<f64>>()
        .register::<ArrayHandler<i32>>()
        .register::<ArrayHandler<Vec<i32>>>()
        .register::<NullableArrayHandler<String>>()
        .register::<FixedArrayHandler<i32, 3>>()
        .register::<MatrixHandler<i32>>()
        .build()
        .expect("application unit has no duplicates")
}

pub fn registry() -> Arc<HandlerRegistry> {
    let registry = HandlerRegistry::builder()
        .merge(builtin_unit().expect("builtin unit"))
        .expect("merge builtin unit")
        .merge(app_unit())
        .expect("merge application unit")
        .build();
    Arc::new(registry)
}

pub fn serializer() -> ByteSerializer {
    ByteSerializer::new(registry())
}

pub fn sample_reading(seed: u64) -> Reading {
    let mut rng = fastrand::Rng::with_seed(seed);
    let samples = (0..rng.usize(0..16)).map(|_| rng.f64() * 100.0).collect();
    let label = if rng.bool() {
        Some(format!("sensor-{}", rng.u32(..1000)))
    } else {
        None
    };
    Reading {
        sensor_id: rng.u32(..),
        label,
        samples,
    }
}
