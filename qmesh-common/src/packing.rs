//! Component narrowing utilities
//!
//! gltfpack emits attributes that are already quantized (u16 positions,
//! i8 normals, u16 texcoords); those are copied verbatim. Floating-point
//! sources are narrowed to the record's integer width with a saturating
//! cast and no rescaling: the dequantization transform travels with the
//! mesh as bounds and UV offset/scale.

/// Narrow an f32 component to u16.
///
/// Saturates at `0` and `65535`, truncates toward zero, maps NaN to `0`.
#[inline]
pub fn narrow_to_u16(value: f32) -> u16 {
    value as u16
}

/// Narrow an f32 component to i8.
///
/// Saturates at `-128` and `127`, truncates toward zero, maps NaN to `0`.
#[inline]
pub fn narrow_to_i8(value: f32) -> i8 {
    value as i8
}
