//! qmesh-export library
//!
//! Converts gltfpack-optimized glTF meshes into quantized .qmesh files.
//! All working memory of a conversion comes from one [`arena::Arena`].

pub mod arena;
pub mod config;
pub mod document;
pub mod error;
pub mod formats;
pub mod mesh;

// Re-export narrowing helpers and the file layout from qmesh-common
pub use qmesh_common::{narrow_to_i8, narrow_to_u16, PackedVertex, QMesh, QMeshHeader, QMESH_EXT};

// Re-export key types for mesh conversion
pub use arena::{Arena, ArenaError, Region, TempScope};
pub use config::{ExportConfig, DEFAULT_ARENA_CAPACITY};
pub use error::{Channel, ConvertError};
pub use mesh::{convert_gltf, convert_gltf_to_memory, extract_model, Model};
