//! Shared types and utilities for the qmesh quantized mesh format
//!
//! This crate provides the pieces shared between:
//! - `qmesh-export` (asset pipeline)
//! - runtime loaders reading `.qmesh` files
//!
//! # Modules
//!
//! - [`packing`] - Component narrowing utilities (f32 → u16/i8)
//! - [`formats`] - The `.qmesh` header, vertex record and decoder

pub mod formats;
pub mod packing;

// Re-export commonly used packing items
pub use packing::{narrow_to_i8, narrow_to_u16};

// Re-export commonly used format items
pub use formats::{PackedVertex, QMESH_EXT, QMESH_MAGIC, QMESH_VERSION, QMesh, QMeshHeader};
