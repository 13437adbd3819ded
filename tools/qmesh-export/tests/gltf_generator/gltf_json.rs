//! GLTF JSON structure building.

use serde_json::{json, Value};

use super::mesh_data::{BufferLayout, NORMAL_STRIDE, POSITION_STRIDE, UV_STRIDE};
use super::GltfOptions;

// Accessor indices (must match the order built below)
const INDICES_ACCESSOR: usize = 0;
const POS_ACCESSOR: usize = 1;
const NORM_ACCESSOR: usize = 2;
const UV_ACCESSOR: usize = 3;

// glTF component types
const BYTE: u32 = 5120;
const UNSIGNED_SHORT: u32 = 5123;

/// Build the GLTF JSON structure
pub(crate) fn build_gltf_json(
    layout: &BufferLayout,
    vertex_count: usize,
    index_count: usize,
    options: &GltfOptions,
) -> Value {
    let view = |(offset, length): (usize, usize), stride: Option<usize>| {
        let mut view = json!({ "buffer": 0, "byteOffset": offset, "byteLength": length });
        if let Some(stride) = stride {
            view["byteStride"] = json!(stride);
        }
        view
    };

    let (min, max) = options.position_bounds;
    let accessors = json!([
        { "bufferView": 0, "componentType": UNSIGNED_SHORT, "count": index_count, "type": "SCALAR" },
        { "bufferView": 1, "componentType": UNSIGNED_SHORT, "count": vertex_count, "type": "VEC3",
          "min": min, "max": max },
        { "bufferView": 2, "componentType": BYTE, "normalized": true, "count": vertex_count, "type": "VEC3" },
        { "bufferView": 3, "componentType": UNSIGNED_SHORT, "normalized": true, "count": vertex_count, "type": "VEC2" }
    ]);

    let primitive = json!({
        "attributes": {
            "POSITION": POS_ACCESSOR,
            "NORMAL": NORM_ACCESSOR,
            "TEXCOORD_0": UV_ACCESSOR
        },
        "indices": INDICES_ACCESSOR,
        "material": 0,
        "mode": 4
    });
    let meshes: Vec<Value> = (0..options.mesh_count)
        .map(|i| json!({ "name": format!("Mesh{i}"), "primitives": [primitive.clone()] }))
        .collect();
    let nodes: Vec<Value> = (0..options.mesh_count)
        .map(|i| json!({ "mesh": i }))
        .collect();
    let scene_nodes: Vec<usize> = (0..options.mesh_count).collect();

    let mut base_color_texture = json!({ "index": 0 });
    if let Some((offset, scale)) = options.texture_transform {
        base_color_texture["extensions"] = json!({
            "KHR_texture_transform": { "offset": offset, "scale": scale }
        });
    }
    let mut material = json!({
        "name": "Base",
        "pbrMetallicRoughness": {
            "baseColorFactor": options.base_color_factor,
            "metallicFactor": options.metallic_factor,
            "roughnessFactor": options.roughness_factor,
            "baseColorTexture": base_color_texture
        }
    });
    if options.unlit {
        material["extensions"] = json!({ "KHR_materials_unlit": {} });
    }

    let mut buffer = json!({ "byteLength": 0 });
    if let Some(uri) = &options.buffer_uri {
        buffer["uri"] = json!(uri);
    }
    let mut buffers = vec![buffer];
    if options.extra_buffer {
        buffers.push(json!({
            "byteLength": 4,
            "uri": "data:application/octet-stream;base64,AAAAAA=="
        }));
    }

    json!({
        "asset": { "version": "2.0", "generator": options.generator },
        "extensionsUsed": ["KHR_mesh_quantization", "KHR_texture_transform", "KHR_materials_unlit"],
        "scene": 0,
        "scenes": [{ "nodes": scene_nodes }],
        "nodes": nodes,
        "meshes": meshes,
        "materials": [material],
        "textures": [{ "source": 0 }],
        "images": [{ "uri": "base.png" }],
        "accessors": accessors,
        "bufferViews": [
            view(layout.indices, None),
            view(layout.positions, Some(POSITION_STRIDE)),
            view(layout.normals, Some(NORMAL_STRIDE)),
            view(layout.uvs, Some(UV_STRIDE))
        ],
        "buffers": buffers
    })
}
