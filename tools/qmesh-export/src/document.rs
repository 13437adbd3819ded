//! Parsed scene view consumed by the converter
//!
//! The conversion core never touches the glTF JSON or the file system; it
//! reads this plain-data snapshot of the parts it needs. [`SceneDocument::from_gltf`]
//! builds one from a `gltf::Document`, tests build them by hand.

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Attribute semantic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Semantic {
    Position,
    Normal,
    TexCoord(u32),
    /// Anything the exporter does not consume (tangents, colors, skinning)
    Other(String),
}

/// Accessor component type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }
}

/// Metallic-roughness material summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetallicRoughness {
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
}

impl Default for MetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0; 4],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
        }
    }
}

/// UV dequantization transform (`KHR_texture_transform` offset and scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    pub offset: [f32; 2],
    pub scale: [f32; 2],
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            offset: [0.0; 2],
            scale: [1.0; 2],
        }
    }
}

/// Byte range of the raw buffer an accessor reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferView {
    pub offset: usize,
    pub length: usize,
    /// Distance between consecutive elements; the element size when the
    /// source view is tightly packed
    pub stride: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneAccessor {
    pub count: usize,
    pub component: ComponentType,
    /// Components per element (1 for SCALAR, 3 for VEC3, ...)
    pub dimensions: usize,
    /// Offset relative to the buffer view
    pub offset: usize,
    pub view: Option<BufferView>,
    pub min: Option<Vec<f32>>,
    pub max: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenePrimitive {
    pub topology: Topology,
    /// Index accessor
    pub indices: Option<usize>,
    /// Attribute accessors in source order
    pub attributes: Vec<(Semantic, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneMesh {
    pub primitives: Vec<ScenePrimitive>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneMaterial {
    /// `None` for unlit or specular-glossiness materials
    pub metallic_roughness: Option<MetallicRoughness>,
    pub uv_transform: Option<UvTransform>,
}

/// The parts of a glTF document the converter reads
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneDocument {
    pub generator: Option<String>,
    pub meshes: Vec<SceneMesh>,
    pub materials: Vec<SceneMaterial>,
    pub accessors: Vec<SceneAccessor>,
}

impl SceneDocument {
    pub fn accessor(&self, index: usize) -> Option<&SceneAccessor> {
        self.accessors.get(index)
    }

    /// Snapshot a parsed glTF document
    pub fn from_gltf(document: &gltf::Document) -> Self {
        Self {
            generator: document.as_json().asset.generator.clone(),
            meshes: document.meshes().map(convert_mesh).collect(),
            materials: document.materials().map(convert_material).collect(),
            accessors: document.accessors().map(convert_accessor).collect(),
        }
    }
}

fn convert_mesh(mesh: gltf::Mesh) -> SceneMesh {
    let primitives = mesh
        .primitives()
        .map(|primitive| ScenePrimitive {
            topology: convert_mode(primitive.mode()),
            indices: primitive.indices().map(|a| a.index()),
            attributes: primitive
                .attributes()
                .map(|(semantic, accessor)| (convert_semantic(semantic), accessor.index()))
                .collect(),
        })
        .collect();
    SceneMesh { primitives }
}

fn convert_mode(mode: gltf::mesh::Mode) -> Topology {
    use gltf::mesh::Mode;
    match mode {
        Mode::Points => Topology::Points,
        Mode::Lines => Topology::Lines,
        Mode::LineLoop => Topology::LineLoop,
        Mode::LineStrip => Topology::LineStrip,
        Mode::Triangles => Topology::Triangles,
        Mode::TriangleStrip => Topology::TriangleStrip,
        Mode::TriangleFan => Topology::TriangleFan,
    }
}

fn convert_semantic(semantic: gltf::Semantic) -> Semantic {
    match semantic {
        gltf::Semantic::Positions => Semantic::Position,
        gltf::Semantic::Normals => Semantic::Normal,
        gltf::Semantic::TexCoords(set) => Semantic::TexCoord(set),
        other => Semantic::Other(format!("{other:?}")),
    }
}

fn convert_material(material: gltf::Material) -> SceneMaterial {
    let pbr = material.pbr_metallic_roughness();
    let uv_transform = pbr
        .base_color_texture()
        .and_then(|info| info.texture_transform())
        .map(|transform| UvTransform {
            offset: transform.offset(),
            scale: transform.scale(),
        });

    // The material JSON always deserializes a metallic-roughness block, so
    // the other shading models are what mark it as absent.
    let other_workflow = material.unlit() || material.pbr_specular_glossiness().is_some();
    let metallic_roughness = (!other_workflow).then(|| MetallicRoughness {
        base_color_factor: pbr.base_color_factor(),
        metallic_factor: pbr.metallic_factor(),
        roughness_factor: pbr.roughness_factor(),
    });

    SceneMaterial {
        metallic_roughness,
        uv_transform,
    }
}

fn convert_accessor(accessor: gltf::Accessor) -> SceneAccessor {
    use gltf::accessor::DataType;

    let component = match accessor.data_type() {
        DataType::I8 => ComponentType::I8,
        DataType::U8 => ComponentType::U8,
        DataType::I16 => ComponentType::I16,
        DataType::U16 => ComponentType::U16,
        DataType::U32 => ComponentType::U32,
        DataType::F32 => ComponentType::F32,
    };
    let element_size = accessor.size();
    let view = accessor.view().map(|view| BufferView {
        offset: view.offset(),
        length: view.length(),
        stride: view.stride().unwrap_or(element_size),
    });

    SceneAccessor {
        count: accessor.count(),
        component,
        dimensions: accessor.dimensions().multiplicity(),
        offset: accessor.offset(),
        view,
        min: accessor.min().as_ref().and_then(json_floats),
        max: accessor.max().as_ref().and_then(json_floats),
    }
}

fn json_floats(value: &gltf::json::Value) -> Option<Vec<f32>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect()
}
