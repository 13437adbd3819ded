//! Attribute quantization into packed vertex records

use bytemuck::Pod;
use qmesh_common::{narrow_to_i8, narrow_to_u16, PackedVertex};

use crate::document::{ComponentType, SceneAccessor};

/// Where the position boundaries come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bounds {
    /// Published by the position accessor; passed through without a scan
    Trusted { min: [u16; 3], max: [u16; 3] },
    /// Computed from the position data while it is copied
    Scanned,
}

impl Bounds {
    /// Pick the policy for a position accessor
    pub(crate) fn resolve(accessor: &SceneAccessor, force_scan: bool) -> Self {
        match (&accessor.min, &accessor.max) {
            (Some(min), Some(max)) if !force_scan && min.len() >= 3 && max.len() >= 3 => {
                Self::Trusted {
                    min: [min[0], min[1], min[2]].map(narrow_to_u16),
                    max: [max[0], max[1], max[2]].map(narrow_to_u16),
                }
            }
            _ => Self::Scanned,
        }
    }
}

/// Integer component stored in a vertex record
pub(crate) trait Component: Pod {
    /// Source component type copied verbatim
    const TYPE: ComponentType;

    fn from_le(bytes: &[u8]) -> Self;

    /// Narrow a floating-point source component
    fn narrow(value: f32) -> Self;
}

impl Component for u16 {
    const TYPE: ComponentType = ComponentType::U16;

    fn from_le(bytes: &[u8]) -> Self {
        u16::from_le_bytes([bytes[0], bytes[1]])
    }

    fn narrow(value: f32) -> Self {
        narrow_to_u16(value)
    }
}

impl Component for i8 {
    const TYPE: ComponentType = ComponentType::I8;

    fn from_le(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }

    fn narrow(value: f32) -> Self {
        narrow_to_i8(value)
    }
}

/// Decode strided source elements
///
/// `bytes` starts at the first element and must hold `out.len()` elements
/// of `N` components of type `component`, which is either `T::TYPE` or F32.
pub(crate) fn decode_elements<T: Component, const N: usize>(
    bytes: &[u8],
    stride: usize,
    component: ComponentType,
    out: &mut [[T; N]],
) {
    let size = component.size();
    for (i, element) in out.iter_mut().enumerate() {
        let base = i * stride;
        for (j, value) in element.iter_mut().enumerate() {
            let at = base + j * size;
            *value = match component {
                ComponentType::F32 => T::narrow(f32::from_le_bytes([
                    bytes[at],
                    bytes[at + 1],
                    bytes[at + 2],
                    bytes[at + 3],
                ])),
                _ => T::from_le(&bytes[at..at + size]),
            };
        }
    }
}

/// Copy positions into records and settle the boundaries
///
/// Returns `(min, max)`: the trusted values untouched, or the per-axis
/// extremes of the copied positions.
pub(crate) fn fill_positions(
    records: &mut [PackedVertex],
    positions: &[[u16; 3]],
    bounds: Bounds,
) -> ([u16; 3], [u16; 3]) {
    let mut min = [u16::MAX; 3];
    let mut max = [0u16; 3];
    let scan = bounds == Bounds::Scanned;

    for (record, position) in records.iter_mut().zip(positions) {
        record.position = *position;
        if scan {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
        }
    }

    match bounds {
        Bounds::Trusted { min, max } => (min, max),
        Bounds::Scanned => (min, max),
    }
}

pub(crate) fn fill_normals(records: &mut [PackedVertex], normals: &[[i8; 3]]) {
    for (record, normal) in records.iter_mut().zip(normals) {
        record.normal = *normal;
    }
}

pub(crate) fn fill_texcoords(records: &mut [PackedVertex], uvs: &[[u16; 2]]) {
    for (record, uv) in records.iter_mut().zip(uvs) {
        record.uv = *uv;
    }
}
