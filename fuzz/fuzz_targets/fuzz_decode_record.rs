// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hdds_byteser::{
    builtin_unit, ArrayHandler, ByteSerializer, FieldReader, FieldWriter, HandlerRegistry,
    HandlerUnit, Matrix, MatrixHandler, NullableArrayHandler, Result, SerializationHandler,
    SizeEstimator, TypeDescriptor, TypeIdentity,
};
use libfuzzer_sys::fuzz_target;
use std::sync::{Arc, OnceLock};

/// Recursive type: nesting depth is driven entirely by the input.
#[derive(Debug, Default)]
struct Node {
    children: Vec<Node>,
}

impl TypeIdentity for Node {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new("fuzz", "Node").with_origin("fuzz")
    }
}

#[derive(Default)]
struct NodeHandler;

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

fn serializer() -> &'static ByteSerializer {
    static SERIALIZER: OnceLock<ByteSerializer> = OnceLock::new();
    SERIALIZER.get_or_init(|| {
        let app = HandlerUnit::builder("fuzz")
            .register::<ArrayHandler<u32>>()
            .register::<ArrayHandler<Vec<u32>>>()
            .register::<NullableArrayHandler<String>>()
            .register::<MatrixHandler<u32>>()
            .register::<NodeHandler>()
            .register::<ArrayHandler<Node>>()
            .build()
            .expect("fuzz unit");
        let registry = HandlerRegistry::builder()
            .merge(builtin_unit().expect("builtin unit"))
            .expect("merge builtin")
            .merge(app)
            .expect("merge fuzz unit")
            .build();
        ByteSerializer::new(Arc::new(registry))
    })
}

fuzz_target!(|data: &[u8]| {
    let ser = serializer();

    // Decoding arbitrary bytes must fail cleanly or consume at most the input
    let _ = ser.deserialize::<u32>(data).map(|(used, _)| assert!(used <= data.len()));
    let _ = ser.deserialize::<String>(data).map(|(used, _)| assert!(used <= data.len()));
    // Anything accepted re-encodes to the exact bytes it was decoded from
    if let Ok((used, value)) = ser.deserialize::<Vec<Vec<u32>>>(data) {
        let again = ser.serialize_nullable(value.as_ref()).expect("re-encode");
        assert_eq!(again.as_slice(), &data[..used]);
    }
    let _ = ser.deserialize::<Vec<Option<String>>>(data);
    let _ = ser.deserialize::<Matrix<u32>>(data);
    // Arbitrarily deep nesting is rejected, never a stack overflow
    if let Ok((used, value)) = ser.deserialize::<Node>(data) {
        let again = ser.serialize_nullable(value.as_ref()).expect("re-encode");
        assert_eq!(again.as_slice(), &data[..used]);
    }

    // Stream framing
    let _ = ser.deserialize_from_reader::<Vec<u32>, _>(&mut &data[..]);
});
