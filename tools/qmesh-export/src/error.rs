//! Conversion error types

use std::fmt;

use thiserror::Error;

use crate::arena::ArenaError;
use crate::document::{ComponentType, Topology};

/// Data channel read from the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Indices,
    Position,
    Normal,
    TexCoord,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Indices => "indices",
            Self::Position => "vertices positions",
            Self::Normal => "vertices normals",
            Self::TexCoord => "vertices texcoords",
        })
    }
}

/// Reasons a conversion is aborted
///
/// Every variant names the precondition the input failed; none is
/// recoverable and no output is produced once one is returned.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Model vertices should be gltfpack optimized (generator: {generator:?})")]
    NotOptimized { generator: Option<String> },

    #[error("Model must be merged into a single mesh (found {0} meshes)")]
    MeshCount(usize),

    #[error("Model must be merged into a single primitive (found {0} primitives)")]
    PrimitiveCount(usize),

    #[error("Model doesn't contain any accessors (required to get its boundaries)")]
    NoAccessors,

    #[error("Model must be triangulated (primitive topology is {0:?})")]
    NotTriangulated(Topology),

    #[error("Model must have exactly one material (found {0})")]
    MaterialCount(usize),

    #[error("Model must have a metallic roughness PBR material")]
    MissingMetallicRoughness,

    #[error("Primitive must be indexed")]
    MissingIndices,

    #[error("Triangle list needs a non-zero index count divisible by 3 that fits in u32 (found {0})")]
    InvalidIndexCount(usize),

    #[error("Primitive has no POSITION attribute (required to count vertices)")]
    MissingPositions,

    #[error("Vertex count {0} is outside 1..=65536 (u16 indices)")]
    InvalidVertexCount(usize),

    #[error("Accessor {0} does not exist")]
    DanglingAccessor(usize),

    #[error("Accessor for {0} has no buffer view")]
    MissingBufferView(Channel),

    #[error("Invalid stride for fetching {0}")]
    ZeroStride(Channel),

    #[error("Accessor for {channel} has unsupported component type {found:?}")]
    UnsupportedComponent {
        channel: Channel,
        found: ComponentType,
    },

    #[error("Accessor for {channel} has {found} components, expected at least {expected}")]
    ComponentCount {
        channel: Channel,
        found: usize,
        expected: usize,
    },

    #[error("Accessor for {channel} has {found} elements, expected at least {expected}")]
    ShortChannel {
        channel: Channel,
        found: usize,
        expected: usize,
    },

    #[error("Reading {channel} needs bytes up to {needed}, but only {available} are available")]
    OutOfRange {
        channel: Channel,
        needed: usize,
        available: usize,
    },

    #[error("Index {value} at position {position} exceeds vertex count {vertices}")]
    IndexOutOfRange {
        position: usize,
        value: u32,
        vertices: usize,
    },

    #[error("Failed to allocate conversion memory")]
    Arena(#[from] ArenaError),
}
