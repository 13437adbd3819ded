//! Mesh converter (glTF -> .qmesh)

mod extract;
mod gltf;
mod quantize;
mod types;

// Re-export public API
pub use extract::extract_model;
pub use gltf::{convert_gltf, convert_gltf_to_memory, import_gltf, ImportedGltf};
pub use types::Model;
