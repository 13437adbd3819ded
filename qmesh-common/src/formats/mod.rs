//! qmesh binary asset formats
//!
//! POD formats for GPU-ready mesh assets. Every file starts with a magic and
//! a format version so loaders can reject foreign or newer files.

pub mod mesh;

pub use mesh::*;
