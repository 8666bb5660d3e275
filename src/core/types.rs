//! Core type aliases and re-exports

use std::sync::Arc;

use parking_lot::RwLock;

pub use glam::{
    Vec3, Vec4,
    Mat4,
    Quat,
};

use crate::animation::Skeleton;

/// Standard Result type for the engine
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// A skeleton shared between its owning mesh and the animators bound to it
pub type SharedSkeleton = Arc<RwLock<Skeleton>>;

/// Wrap a skeleton for sharing between a mesh component and animators
pub fn share_skeleton(skeleton: Skeleton) -> SharedSkeleton {
    Arc::new(RwLock::new(skeleton))
}
