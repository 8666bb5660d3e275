//! Mesh components attached to entities

use crate::animation::Skeleton;
use crate::core::types::{share_skeleton, SharedSkeleton};

/// Mesh without a skeleton
#[derive(Clone, Debug)]
pub struct StaticMesh {
    pub name: String,
}

impl StaticMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Mesh deformed by a skeleton. The mesh owns the skeleton; animators
/// hold weak references to it.
#[derive(Clone, Debug)]
pub struct SkinnedMesh {
    pub name: String,
    skeleton: SharedSkeleton,
}

impl SkinnedMesh {
    pub fn new(name: impl Into<String>, skeleton: Skeleton) -> Self {
        Self {
            name: name.into(),
            skeleton: share_skeleton(skeleton),
        }
    }

    pub fn skeleton(&self) -> &SharedSkeleton {
        &self.skeleton
    }
}

/// Mesh component of an entity
#[derive(Clone, Debug)]
pub enum MeshComponent {
    Static(StaticMesh),
    Skinned(SkinnedMesh),
}

impl MeshComponent {
    pub fn name(&self) -> &str {
        match self {
            Self::Static(mesh) => &mesh.name,
            Self::Skinned(mesh) => &mesh.name,
        }
    }

    pub fn is_skinned(&self) -> bool {
        matches!(self, Self::Skinned(_))
    }

    /// Skeleton of a skinned mesh
    pub fn skeleton(&self) -> Option<&SharedSkeleton> {
        match self {
            Self::Static(_) => None,
            Self::Skinned(mesh) => Some(mesh.skeleton()),
        }
    }
}

impl From<StaticMesh> for MeshComponent {
    fn from(mesh: StaticMesh) -> Self {
        Self::Static(mesh)
    }
}

impl From<SkinnedMesh> for MeshComponent {
    fn from(mesh: SkinnedMesh) -> Self {
        Self::Skinned(mesh)
    }
}
