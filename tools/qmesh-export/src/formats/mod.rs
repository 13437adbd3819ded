//! Binary format definitions for .qmesh files
//!
//! Re-exports from qmesh-common for writing asset files.

pub use qmesh_common::formats::*;

use anyhow::Result;
use std::io::Write;

use crate::arena::Arena;
use crate::mesh::Model;

/// Write a complete QMesh file
///
/// Header first, then the u16 index block, then the vertex records.
pub fn write_qmesh<W: Write>(w: &mut W, model: &Model, arena: &Arena<'_>) -> Result<()> {
    w.write_all(&pack_model(model, arena))?;
    Ok(())
}

/// Serialize a model into a new buffer
pub fn pack_model(model: &Model, arena: &Arena<'_>) -> Vec<u8> {
    let header = model.header();
    let mut out = Vec::with_capacity(QMeshHeader::SIZE + header.payload_size());
    out.extend_from_slice(&header.to_bytes());
    for i in model.indices(arena) {
        out.extend_from_slice(&i.to_le_bytes());
    }
    for vertex in model.vertices(arena) {
        out.extend_from_slice(&encode_vertex(vertex));
    }
    out
}

/// Little-endian vertex record, padding zeroed
fn encode_vertex(vertex: &PackedVertex) -> [u8; PackedVertex::SIZE] {
    let mut bytes = [0u8; PackedVertex::SIZE];
    for (i, c) in vertex.position.iter().enumerate() {
        bytes[i * 2..i * 2 + 2].copy_from_slice(&c.to_le_bytes());
    }
    for (i, c) in vertex.normal.iter().enumerate() {
        bytes[8 + i] = *c as u8;
    }
    for (i, c) in vertex.uv.iter().enumerate() {
        bytes[12 + i * 2..14 + i * 2].copy_from_slice(&c.to_le_bytes());
    }
    bytes
}
