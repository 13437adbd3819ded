//! QMesh binary format (.qmesh)
//!
//! Quantized mesh with a fixed header, a u16 index block and a block of
//! 16-byte vertex records. All fields are little-endian.
//!
//! # Layout
//! ```text
//! 0x00: magic "QMSH"
//! 0x04: version u32
//! 0x08: indices_count u32
//! 0x0C: indices_size u32 (bytes)
//! 0x10: vertices_count u32
//! 0x14: vertices_size u32 (bytes)
//! 0x18: uv_scale [f32; 2]
//! 0x20: uv_offset [f32; 2]
//! 0x28: min_boundary [u16; 3]
//! 0x2E: max_boundary [u16; 3]
//! 0x34: base_color_factor [f32; 4]
//! 0x44: metallic_factor f32
//! 0x48: roughness_factor f32
//! 0x4C: index_data (indices_count * 2 bytes)
//! var:  vertex_data (vertices_count * 16 bytes)
//! ```

use bytemuck::{Pod, Zeroable};

/// File magic
pub const QMESH_MAGIC: [u8; 4] = *b"QMSH";
/// Current format version
pub const QMESH_VERSION: u32 = 1;
/// File extension
pub const QMESH_EXT: &str = "qmesh";

/// Packed vertex record (16 bytes)
///
/// Positions live in the quantized grid described by the header boundaries,
/// normals are signed bytes, UVs are unorm16 before the header UV transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct PackedVertex {
    pub position: [u16; 3],
    pub _pad0: u16,
    pub normal: [i8; 3],
    pub _pad1: i8,
    pub uv: [u16; 2],
}

const _: () = assert!(std::mem::size_of::<PackedVertex>() == PackedVertex::SIZE);

impl PackedVertex {
    pub const SIZE: usize = 16;

    pub fn new(position: [u16; 3], normal: [i8; 3], uv: [u16; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            ..Self::default()
        }
    }
}

/// QMesh header (76 bytes including magic and version)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QMeshHeader {
    pub indices_count: u32,
    pub indices_size: u32,
    pub vertices_count: u32,
    pub vertices_size: u32,
    pub uv_scale: [f32; 2],
    pub uv_offset: [f32; 2],
    pub min_boundary: [u16; 3],
    pub max_boundary: [u16; 3],
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
}

impl QMeshHeader {
    pub const SIZE: usize = 76;

    /// Size of the index block plus the vertex block in bytes
    pub fn payload_size(&self) -> usize {
        self.indices_size as usize + self.vertices_size as usize
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0x00..0x04].copy_from_slice(&QMESH_MAGIC);
        bytes[0x04..0x08].copy_from_slice(&QMESH_VERSION.to_le_bytes());
        bytes[0x08..0x0C].copy_from_slice(&self.indices_count.to_le_bytes());
        bytes[0x0C..0x10].copy_from_slice(&self.indices_size.to_le_bytes());
        bytes[0x10..0x14].copy_from_slice(&self.vertices_count.to_le_bytes());
        bytes[0x14..0x18].copy_from_slice(&self.vertices_size.to_le_bytes());
        put_f32s(&mut bytes, 0x18, &self.uv_scale);
        put_f32s(&mut bytes, 0x20, &self.uv_offset);
        put_u16s(&mut bytes, 0x28, &self.min_boundary);
        put_u16s(&mut bytes, 0x2E, &self.max_boundary);
        put_f32s(&mut bytes, 0x34, &self.base_color_factor);
        put_f32s(&mut bytes, 0x44, &[self.metallic_factor, self.roughness_factor]);
        bytes
    }

    /// Read header from bytes
    ///
    /// Returns `None` for short input, a foreign magic or an unknown version.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0x00..0x04] != QMESH_MAGIC {
            return None;
        }
        if get_u32(bytes, 0x04) != QMESH_VERSION {
            return None;
        }
        Some(Self {
            indices_count: get_u32(bytes, 0x08),
            indices_size: get_u32(bytes, 0x0C),
            vertices_count: get_u32(bytes, 0x10),
            vertices_size: get_u32(bytes, 0x14),
            uv_scale: [get_f32(bytes, 0x18), get_f32(bytes, 0x1C)],
            uv_offset: [get_f32(bytes, 0x20), get_f32(bytes, 0x24)],
            min_boundary: [get_u16(bytes, 0x28), get_u16(bytes, 0x2A), get_u16(bytes, 0x2C)],
            max_boundary: [get_u16(bytes, 0x2E), get_u16(bytes, 0x30), get_u16(bytes, 0x32)],
            base_color_factor: [
                get_f32(bytes, 0x34),
                get_f32(bytes, 0x38),
                get_f32(bytes, 0x3C),
                get_f32(bytes, 0x40),
            ],
            metallic_factor: get_f32(bytes, 0x44),
            roughness_factor: get_f32(bytes, 0x48),
        })
    }
}

/// A fully decoded `.qmesh` file
#[derive(Debug, Clone, PartialEq)]
pub struct QMesh {
    pub header: QMeshHeader,
    pub indices: Vec<u16>,
    pub vertices: Vec<PackedVertex>,
}

impl QMesh {
    /// Decode header and payload
    ///
    /// Returns `None` if the header is invalid, the block sizes disagree with
    /// the counts, or the payload is truncated.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let header = QMeshHeader::from_bytes(bytes)?;
        let indices_size = header.indices_count as usize * 2;
        let vertices_size = header.vertices_count as usize * PackedVertex::SIZE;
        if header.indices_size as usize != indices_size
            || header.vertices_size as usize != vertices_size
        {
            return None;
        }

        let payload = bytes.get(QMeshHeader::SIZE..QMeshHeader::SIZE + header.payload_size())?;
        let (index_data, vertex_data) = payload.split_at(indices_size);

        let indices = index_data
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        let vertices = vertex_data
            .chunks_exact(PackedVertex::SIZE)
            .map(bytemuck::pod_read_unaligned)
            .collect();

        Some(Self {
            header,
            indices,
            vertices,
        })
    }
}

fn put_f32s(bytes: &mut [u8], at: usize, values: &[f32]) {
    for (i, v) in values.iter().enumerate() {
        let start = at + i * 4;
        bytes[start..start + 4].copy_from_slice(&v.to_le_bytes());
    }
}

fn put_u16s(bytes: &mut [u8], at: usize, values: &[u16]) {
    for (i, v) in values.iter().enumerate() {
        let start = at + i * 2;
        bytes[start..start + 2].copy_from_slice(&v.to_le_bytes());
    }
}

fn get_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn get_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn get_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_bits(get_u32(bytes, at))
}
