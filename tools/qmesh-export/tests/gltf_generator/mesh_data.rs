//! Quantized mesh data and binary buffer packing.

/// Pre-quantized single-triangle mesh, as gltfpack would emit it
pub(crate) struct MeshData {
    pub indices: Vec<u16>,
    pub positions: Vec<[u16; 3]>,
    pub normals: Vec<[i8; 3]>,
    pub uvs: Vec<[u16; 2]>,
}

/// Byte ranges of each channel inside the packed buffer
pub(crate) struct BufferLayout {
    pub indices: (usize, usize),
    pub positions: (usize, usize),
    pub normals: (usize, usize),
    pub uvs: (usize, usize),
}

/// Position stride: 3 x u16 padded to 8 bytes
pub(crate) const POSITION_STRIDE: usize = 8;
/// Normal stride: 3 x i8 padded to 4 bytes
pub(crate) const NORMAL_STRIDE: usize = 4;
/// Texcoord stride: 2 x u16
pub(crate) const UV_STRIDE: usize = 4;

pub(crate) fn create_triangle() -> MeshData {
    MeshData {
        indices: vec![0, 1, 2],
        positions: vec![[0, 0, 0], [10, 5, 2], [7, 9, 1]],
        normals: vec![[0, 0, 127], [0, 127, 0], [-127, 0, 0]],
        uvs: vec![[0, 0], [65535, 0], [0, 65535]],
    }
}

/// Pack all channels into one buffer, each view starting 4-byte aligned
pub(crate) fn pack_binary_data(mesh: &MeshData) -> (Vec<u8>, BufferLayout) {
    let mut buffer = Vec::new();

    let start = buffer.len();
    for i in &mesh.indices {
        buffer.extend_from_slice(&i.to_le_bytes());
    }
    let indices = (start, buffer.len() - start);
    pad_to_4(&mut buffer);

    let start = buffer.len();
    for p in &mesh.positions {
        for c in p {
            buffer.extend_from_slice(&c.to_le_bytes());
        }
        buffer.extend_from_slice(&[0, 0]);
    }
    let positions = (start, buffer.len() - start);

    let start = buffer.len();
    for n in &mesh.normals {
        buffer.extend(n.iter().map(|&c| c as u8));
        buffer.push(0);
    }
    let normals = (start, buffer.len() - start);

    let start = buffer.len();
    for uv in &mesh.uvs {
        for c in uv {
            buffer.extend_from_slice(&c.to_le_bytes());
        }
    }
    let uvs = (start, buffer.len() - start);

    (
        buffer,
        BufferLayout {
            indices,
            positions,
            normals,
            uvs,
        },
    )
}

fn pad_to_4(buffer: &mut Vec<u8>) {
    while buffer.len() % 4 != 0 {
        buffer.push(0);
    }
}
