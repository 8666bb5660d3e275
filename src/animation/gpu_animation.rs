//! Hand-off of joint matrices to the renderer

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::Skeleton;

/// Receives named matrix uniforms, e.g. a shader program wrapper.
///
/// Skinning uniforms are named `joints[<ID>]`; vertex skinning shaders index
/// that array by joint id.
pub trait UniformSink {
    fn set_uniform_mat4(&mut self, name: &str, value: &Mat4);
}

/// Uniform name for the skinning matrix of a joint
pub fn joint_uniform_name(id: usize) -> String {
    format!("joints[{id}]")
}

/// GPU-side joint transform (mat4 skinning matrix, column-major)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuJointTransform {
    pub matrix: [[f32; 4]; 4],
}

impl GpuJointTransform {
    /// Create from a glam Mat4
    pub fn from_mat4(matrix: Mat4) -> Self {
        Self {
            matrix: matrix.to_cols_array_2d(),
        }
    }

    /// Create identity transform
    pub fn identity() -> Self {
        Self::from_mat4(Mat4::IDENTITY)
    }
}

/// CPU copy of a skeleton's skinning matrices, ready for a buffer upload
#[derive(Clone, Debug, Default)]
pub struct JointPalette {
    transforms: Vec<GpuJointTransform>,
}

impl JointPalette {
    /// Pack the skeleton's current skinning matrices, indexed by joint id
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        Self {
            transforms: skeleton
                .joint_matrices()
                .into_iter()
                .map(GpuJointTransform::from_mat4)
                .collect(),
        }
    }

    /// Number of matrices in the palette
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms(&self) -> &[GpuJointTransform] {
        &self.transforms
    }

    /// Raw bytes for `queue.write_buffer` style uploads
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }
}
