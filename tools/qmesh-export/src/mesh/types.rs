//! Types and constants for mesh conversion

use qmesh_common::{PackedVertex, QMeshHeader};

use crate::arena::{Arena, Region};
use crate::document::{MetallicRoughness, UvTransform};

/// Maximum index value for u16 indices (65535)
/// Meshes with more vertices must be split before export.
pub(crate) const MAX_INDEX_VALUE: u32 = u16::MAX as u32;

/// Maximum vertex count addressable by u16 indices
pub(crate) const MAX_VERTICES: usize = MAX_INDEX_VALUE as usize + 1;

/// Converted mesh living in the conversion arena
///
/// Index and vertex data are region handles; resolve them through the
/// arena the model was extracted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Model {
    pub indices_count: u32,
    pub vertices_count: u32,
    pub uv_transform: UvTransform,
    pub min_boundary: [u16; 3],
    pub max_boundary: [u16; 3],
    pub material: MetallicRoughness,
    pub indices: Region<u16>,
    pub vertices: Region<PackedVertex>,
}

impl Model {
    /// Index block size in bytes
    pub fn indices_size(&self) -> u32 {
        self.indices_count * std::mem::size_of::<u16>() as u32
    }

    /// Vertex block size in bytes
    pub fn vertices_size(&self) -> u32 {
        self.vertices_count * PackedVertex::SIZE as u32
    }

    pub fn header(&self) -> QMeshHeader {
        QMeshHeader {
            indices_count: self.indices_count,
            indices_size: self.indices_size(),
            vertices_count: self.vertices_count,
            vertices_size: self.vertices_size(),
            uv_scale: self.uv_transform.scale,
            uv_offset: self.uv_transform.offset,
            min_boundary: self.min_boundary,
            max_boundary: self.max_boundary,
            base_color_factor: self.material.base_color_factor,
            metallic_factor: self.material.metallic_factor,
            roughness_factor: self.material.roughness_factor,
        }
    }

    pub fn indices<'s>(&self, arena: &'s Arena<'_>) -> &'s [u16] {
        arena.get(self.indices)
    }

    pub fn vertices<'s>(&self, arena: &'s Arena<'_>) -> &'s [PackedVertex] {
        arena.get(self.vertices)
    }
}
