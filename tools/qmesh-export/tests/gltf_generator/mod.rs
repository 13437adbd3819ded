//! Programmatic glTF/GLB generation for integration tests.
//!
//! Generates a gltfpack-style quantized triangle:
//! - u16 indices, u16 positions (stride 8), i8 normals, u16 texcoords
//! - one metallic-roughness material with a texture transform

#![allow(dead_code)]

mod glb_assembly;
mod gltf_json;
mod mesh_data;

use std::path::Path;

use mesh_data::{create_triangle, pack_binary_data};

/// Knobs for the generated document
pub struct GltfOptions {
    pub generator: String,
    pub mesh_count: usize,
    pub unlit: bool,
    /// `(offset, scale)` of `KHR_texture_transform` on the base color texture
    pub texture_transform: Option<([f32; 2], [f32; 2])>,
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    /// Published POSITION min/max
    pub position_bounds: ([f32; 3], [f32; 3]),
    /// External buffer file name; `None` embeds the buffer in the GLB
    pub buffer_uri: Option<String>,
    /// Add a second (data URI) buffer
    pub extra_buffer: bool,
}

impl Default for GltfOptions {
    fn default() -> Self {
        Self {
            generator: "gltfpack 0.21".to_string(),
            mesh_count: 1,
            unlit: false,
            texture_transform: Some(([0.25, 0.5], [0.5, 0.5])),
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            position_bounds: ([0.0, 0.0, 0.0], [10.0, 9.0, 2.0]),
            buffer_uri: None,
            extra_buffer: false,
        }
    }
}

/// Raw triangle buffer shared by the GLB and .gltf variants
pub fn triangle_buffer() -> Vec<u8> {
    pack_binary_data(&create_triangle()).0
}

/// Generate a triangle GLB
pub fn generate_triangle_glb(options: &GltfOptions) -> Vec<u8> {
    let mesh = create_triangle();
    let (buffer_data, layout) = pack_binary_data(&mesh);
    let root = gltf_json::build_gltf_json(
        &layout,
        mesh.positions.len(),
        mesh.indices.len(),
        options,
    );
    glb_assembly::assemble_glb(&root, &buffer_data)
}

/// Write a `.gltf` plus an external `.bin` next to it
pub fn write_triangle_gltf(path: &Path, options: &GltfOptions) {
    let bin_name = "triangle.bin";
    let mesh = create_triangle();
    let (buffer_data, layout) = pack_binary_data(&mesh);

    let options = GltfOptions {
        buffer_uri: Some(bin_name.to_string()),
        generator: options.generator.clone(),
        texture_transform: options.texture_transform,
        position_bounds: options.position_bounds,
        ..GltfOptions::default()
    };
    let mut root = gltf_json::build_gltf_json(
        &layout,
        mesh.positions.len(),
        mesh.indices.len(),
        &options,
    );
    root["buffers"][0]["byteLength"] = serde_json::json!(buffer_data.len());

    let dir = path.parent().expect("gltf path has a parent");
    std::fs::write(dir.join(bin_name), &buffer_data).expect("Failed to write buffer");
    std::fs::write(
        path,
        serde_json::to_string_pretty(&root).expect("Failed to serialize JSON"),
    )
    .expect("Failed to write glTF");
}
