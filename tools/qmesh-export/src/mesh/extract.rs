//! Document validation and attribute extraction

use bytemuck::Pod;
use qmesh_common::PackedVertex;
use tracing::debug;

use super::quantize::{
    decode_elements, fill_normals, fill_positions, fill_texcoords, Bounds, Component,
};
use super::types::{Model, MAX_VERTICES};
use crate::arena::{Arena, Region};
use crate::config::ExportConfig;
use crate::document::{
    ComponentType, MetallicRoughness, SceneAccessor, SceneDocument, ScenePrimitive, Semantic,
    Topology, UvTransform,
};
use crate::error::{Channel, ConvertError};

/// Generator prefix written by gltfpack
const GLTFPACK_GENERATOR: &str = "gltfpack";

/// Document shape that passed validation
struct Validated<'d> {
    primitive: &'d ScenePrimitive,
    material: MetallicRoughness,
    uv_transform: UvTransform,
    indices_accessor: usize,
    indices_count: usize,
    position_index: usize,
    position_accessor: &'d SceneAccessor,
    vertices_count: usize,
}

/// Strided byte window of one accessor inside the raw buffer
struct ChannelSource<'b> {
    bytes: &'b [u8],
    stride: usize,
    component: ComponentType,
}

/// Validate the document and extract its single primitive into the arena
///
/// Every check runs before any buffer data is read. On success the
/// returned [`Model`] references index and vertex regions allocated from
/// `arena`; per-channel scratch memory is released again before returning.
pub fn extract_model(
    arena: &mut Arena<'_>,
    document: &SceneDocument,
    buffer: &[u8],
    config: &ExportConfig,
) -> Result<Model, ConvertError> {
    let shape = validate(document, config)?;

    let bounds = Bounds::resolve(shape.position_accessor, config.force_bounds_scan);
    debug!("Position bounds: {:?}", bounds);

    let indices = arena.alloc_slice::<u16>(shape.indices_count)?;
    read_indices(
        document,
        buffer,
        shape.indices_accessor,
        shape.vertices_count,
        arena.get_mut(indices),
    )?;

    let vertices = arena.alloc_slice::<PackedVertex>(shape.vertices_count)?;

    let (min_boundary, max_boundary) = {
        let source = resolve_source::<u16>(
            document,
            buffer,
            shape.position_index,
            Channel::Position,
            3,
            shape.vertices_count,
        )?;
        decode_into_records::<u16, 3, _>(arena, &source, vertices, |records, positions| {
            fill_positions(records, positions, bounds)
        })?
    };

    for (semantic, accessor) in &shape.primitive.attributes {
        match semantic {
            Semantic::Position => {}
            Semantic::Normal => {
                let source = resolve_source::<i8>(
                    document,
                    buffer,
                    *accessor,
                    Channel::Normal,
                    3,
                    shape.vertices_count,
                )?;
                decode_into_records::<i8, 3, _>(arena, &source, vertices, fill_normals)?;
            }
            Semantic::TexCoord(0) => {
                let source = resolve_source::<u16>(
                    document,
                    buffer,
                    *accessor,
                    Channel::TexCoord,
                    2,
                    shape.vertices_count,
                )?;
                decode_into_records::<u16, 2, _>(arena, &source, vertices, fill_texcoords)?;
            }
            other => debug!("Skipping unsupported attribute {:?}", other),
        }
    }

    Ok(Model {
        indices_count: shape.indices_count as u32,
        vertices_count: shape.vertices_count as u32,
        uv_transform: shape.uv_transform,
        min_boundary,
        max_boundary,
        material: shape.material,
        indices,
        vertices,
    })
}

fn validate<'d>(
    document: &'d SceneDocument,
    config: &ExportConfig,
) -> Result<Validated<'d>, ConvertError> {
    if config.require_gltfpack
        && !document
            .generator
            .as_deref()
            .is_some_and(|g| g.starts_with(GLTFPACK_GENERATOR))
    {
        return Err(ConvertError::NotOptimized {
            generator: document.generator.clone(),
        });
    }

    let [mesh] = document.meshes.as_slice() else {
        return Err(ConvertError::MeshCount(document.meshes.len()));
    };
    let [primitive] = mesh.primitives.as_slice() else {
        return Err(ConvertError::PrimitiveCount(mesh.primitives.len()));
    };
    if document.accessors.is_empty() {
        return Err(ConvertError::NoAccessors);
    }
    if primitive.topology != Topology::Triangles {
        return Err(ConvertError::NotTriangulated(primitive.topology));
    }

    let [material] = document.materials.as_slice() else {
        return Err(ConvertError::MaterialCount(document.materials.len()));
    };
    let pbr = material
        .metallic_roughness
        .ok_or(ConvertError::MissingMetallicRoughness)?;

    let indices_accessor = primitive.indices.ok_or(ConvertError::MissingIndices)?;
    let indices_count = accessor(document, indices_accessor)?.count;
    let fits_u32 = indices_count
        .checked_mul(std::mem::size_of::<u16>())
        .is_some_and(|size| u32::try_from(size).is_ok());
    if indices_count == 0 || indices_count % 3 != 0 || !fits_u32 {
        return Err(ConvertError::InvalidIndexCount(indices_count));
    }

    let position_index = find_positions(primitive)?;
    let position_accessor = accessor(document, position_index)?;
    let vertices_count = position_accessor.count;
    if !(1..=MAX_VERTICES).contains(&vertices_count) {
        return Err(ConvertError::InvalidVertexCount(vertices_count));
    }

    Ok(Validated {
        primitive,
        material: pbr,
        uv_transform: material.uv_transform.unwrap_or_default(),
        indices_accessor,
        indices_count,
        position_index,
        position_accessor,
        vertices_count,
    })
}

fn find_positions(primitive: &ScenePrimitive) -> Result<usize, ConvertError> {
    primitive
        .attributes
        .iter()
        .find(|(semantic, _)| *semantic == Semantic::Position)
        .map(|(_, index)| *index)
        .ok_or(ConvertError::MissingPositions)
}

fn accessor(document: &SceneDocument, index: usize) -> Result<&SceneAccessor, ConvertError> {
    document
        .accessor(index)
        .ok_or(ConvertError::DanglingAccessor(index))
}

/// Resolve the bytes of the first `count` elements of an accessor
///
/// `T` picks the accepted component types (its own type or F32) and
/// `components` the number of components read from each element.
fn resolve_source<'b, T: Component>(
    document: &SceneDocument,
    buffer: &'b [u8],
    accessor_index: usize,
    channel: Channel,
    components: usize,
    count: usize,
) -> Result<ChannelSource<'b>, ConvertError> {
    let source = accessor(document, accessor_index)?;
    if source.component != T::TYPE && source.component != ComponentType::F32 {
        return Err(ConvertError::UnsupportedComponent {
            channel,
            found: source.component,
        });
    }
    resolve_window(source, buffer, channel, components, count)
}

fn resolve_window<'b>(
    source: &SceneAccessor,
    buffer: &'b [u8],
    channel: Channel,
    components: usize,
    count: usize,
) -> Result<ChannelSource<'b>, ConvertError> {
    let view = source.view.ok_or(ConvertError::MissingBufferView(channel))?;
    if view.stride == 0 {
        return Err(ConvertError::ZeroStride(channel));
    }
    if source.dimensions < components {
        return Err(ConvertError::ComponentCount {
            channel,
            found: source.dimensions,
            expected: components,
        });
    }
    if source.count < count {
        return Err(ConvertError::ShortChannel {
            channel,
            found: source.count,
            expected: count,
        });
    }

    let available = view.offset.saturating_add(view.length).min(buffer.len());
    let start = view.offset.saturating_add(source.offset);
    let needed = count
        .saturating_sub(1)
        .checked_mul(view.stride)
        .and_then(|span| span.checked_add(components * source.component.size()))
        .and_then(|len| len.checked_add(start))
        .unwrap_or(usize::MAX);
    if needed > available {
        return Err(ConvertError::OutOfRange {
            channel,
            needed,
            available,
        });
    }

    Ok(ChannelSource {
        bytes: &buffer[start..needed],
        stride: view.stride,
        component: source.component,
    })
}

/// Read the index channel into `out`, checking every index against the
/// vertex count
fn read_indices(
    document: &SceneDocument,
    buffer: &[u8],
    accessor_index: usize,
    vertices_count: usize,
    out: &mut [u16],
) -> Result<(), ConvertError> {
    let source = accessor(document, accessor_index)?;
    if !matches!(
        source.component,
        ComponentType::U8 | ComponentType::U16 | ComponentType::U32
    ) {
        return Err(ConvertError::UnsupportedComponent {
            channel: Channel::Indices,
            found: source.component,
        });
    }
    let window = resolve_window(source, buffer, Channel::Indices, 1, out.len())?;
    let bytes = window.bytes;

    for (position, slot) in out.iter_mut().enumerate() {
        let at = position * window.stride;
        let value = match window.component {
            ComponentType::U8 => u32::from(bytes[at]),
            ComponentType::U16 => u32::from(u16::from_le_bytes([bytes[at], bytes[at + 1]])),
            _ => u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]),
        };
        if value as usize >= vertices_count {
            return Err(ConvertError::IndexOutOfRange {
                position,
                value,
                vertices: vertices_count,
            });
        }
        // vertices_count <= 65536, so the value fits
        *slot = value as u16;
    }
    Ok(())
}

/// Decode a channel into temporary scratch memory, then scatter it into
/// the vertex records
fn decode_into_records<T, const N: usize, R>(
    arena: &mut Arena<'_>,
    source: &ChannelSource<'_>,
    vertices: Region<PackedVertex>,
    scatter: impl FnOnce(&mut [PackedVertex], &[[T; N]]) -> R,
) -> Result<R, ConvertError>
where
    T: Component,
    [T; N]: Pod,
{
    let mut scope = arena.temporary();
    let scratch = scope.alloc_slice::<[T; N]>(vertices.len())?;
    decode_elements(
        source.bytes,
        source.stride,
        source.component,
        scope.get_mut(scratch),
    );
    let (decoded, records) = scope.get_disjoint(scratch, vertices);
    Ok(scatter(records, decoded))
}
