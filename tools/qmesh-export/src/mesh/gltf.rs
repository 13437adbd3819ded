//! glTF/GLB mesh conversion

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::extract::extract_model;
use crate::arena::Arena;
use crate::config::ExportConfig;
use crate::document::SceneDocument;
use crate::formats::pack_model;

/// Parsed glTF document plus its single binary buffer
pub struct ImportedGltf {
    pub document: SceneDocument,
    pub buffer: Vec<u8>,
}

/// Load a `.gltf` or `.glb` file and its binary buffer
///
/// External buffers are resolved relative to the input file. Images are
/// never loaded.
pub fn import_gltf(input: &Path) -> Result<ImportedGltf> {
    let ::gltf::Gltf { document, blob } =
        ::gltf::Gltf::open(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let mut buffers = ::gltf::import_buffers(&document, input.parent(), blob)
        .with_context(|| format!("Failed to load glTF buffers: {:?}", input))?;
    if buffers.len() != 1 {
        bail!(
            "Model must have exactly one binary buffer (found {}): {:?}",
            buffers.len(),
            input
        );
    }

    Ok(ImportedGltf {
        document: SceneDocument::from_gltf(&document),
        buffer: buffers.remove(0).0,
    })
}

/// Convert a glTF/GLB file to in-memory .qmesh bytes
pub fn convert_gltf_to_memory(input: &Path, config: &ExportConfig) -> Result<Vec<u8>> {
    let imported = import_gltf(input)?;
    let mut backing = arena_backing(config.arena_capacity)?;
    let mut arena = Arena::new(&mut backing);

    let model = extract_model(&mut arena, &imported.document, &imported.buffer, config)
        .with_context(|| format!("Failed to convert mesh: {:?}", input))?;

    tracing::info!(
        "Converted mesh: {} vertices, {} indices, bounds {:?}..{:?}, arena {}/{} bytes",
        model.vertices_count,
        model.indices_count,
        model.min_boundary,
        model.max_boundary,
        arena.used(),
        arena.capacity()
    );

    Ok(pack_model(&model, &arena))
}

/// Convert a glTF/GLB file to a .qmesh file
///
/// The output file is only created once the conversion succeeded, and is
/// removed again if writing it fails.
pub fn convert_gltf(input: &Path, output: &Path, config: &ExportConfig) -> Result<()> {
    let bytes = convert_gltf_to_memory(input, config)?;

    if let Err(err) = fs::write(output, &bytes) {
        let _ = fs::remove_file(output);
        return Err(err).with_context(|| format!("Failed to write output: {:?}", output));
    }
    Ok(())
}

/// Zeroed backing memory for the conversion arena
fn arena_backing(capacity: usize) -> Result<Vec<u8>> {
    let mut backing = Vec::new();
    backing
        .try_reserve_exact(capacity)
        .with_context(|| format!("Failed to reserve {} bytes of conversion memory", capacity))?;
    backing.resize(capacity, 0);
    Ok(backing)
}
