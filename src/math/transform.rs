//! Transform composition shared by joint samples and skeleton root transforms

use crate::core::types::{Mat4, Quat, Vec3};

/// Compose a translation, rotation and scale into a single matrix.
///
/// The translation matrix is built first, the rotation is applied on top of
/// it and the scale is applied in local space: `R * T * S`. The translation
/// is therefore rotated, unlike `Mat4::from_scale_rotation_translation`.
/// Joint samples and skeleton root transforms both use this order.
pub fn compose_transform(translation: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    let translated = Mat4::from_translation(translation);
    let rotated = Mat4::from_quat(rotation) * translated;
    rotated * Mat4::from_scale(scale)
}

/// Translation column of an affine matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    matrix.w_axis.truncate()
}
